use browsermr::cli::{
    log_directives, resolve_config, run_check_templates, run_serve, Cli, Commands, ServeArgs,
};
use browsermr::render::TemplateSource;
use clap::Parser;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let serve_args = match &cli.command {
        Some(Commands::Serve(args)) => args.clone(),
        _ => ServeArgs::default(),
    };

    let config = match resolve_config(&cli, &serve_args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = log_directives(cli.verbose, rust_log.as_deref(), &config.log_level);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter {directives:?}: {e}");
        EnvFilter::new(&config.log_level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("browsermr started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Some(Commands::CheckTemplates { templates }) => {
            let source = match templates {
                Some(dir) => TemplateSource::Directory(dir),
                None => config.template_source(),
            };
            run_check_templates(&source)
        }
        Some(Commands::Serve(_)) | None => run_serve(config).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
