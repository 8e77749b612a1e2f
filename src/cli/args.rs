//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ServerConfig;

/// Serve browser-executed MapReduce jobs
#[derive(Parser)]
#[command(name = "browsermr")]
#[command(about = "browsermr - Job-session server for browser-executed MapReduce", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML configuration file (defaults to ./browsermr.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the job server (default command)
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Load the template set and report whether it is complete
    #[command(name = "check-templates")]
    CheckTemplates {
        /// Template directory to check (defaults to the configured or built-in set)
        #[arg(long)]
        templates: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: 5500)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Load page templates from this directory
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Serve static assets under /static from this directory
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Exclusive upper bound of the numeric job id space
    #[arg(long, value_name = "N")]
    pub id_bound: Option<u64>,
}

impl ServeArgs {
    /// Apply flags on top of the loaded configuration.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.templates {
            config.templates_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = Some(dir.clone());
        }
        if let Some(bound) = self.id_bound {
            config.id_bound = bound;
        }
    }
}
