//! # browsermr
//!
//! Job-session server for MapReduce jobs that run inside participants'
//! browsers. It mints job ids and serves the pages for the three roles of a
//! job; the map/reduce execution, data fetching and peer messaging all live
//! in the browser-side scripts those pages load.
//!
//! ## Routes
//!
//! - `GET /` - allocate a new job id and show the landing page
//! - `GET /create/{id}` - job creation form
//! - `GET|POST /server/{id}` - coordinator page (`mapper`, `reducer`, `dataurl`)
//! - `GET /job/{id}` - worker page
//!
//! ## Modules
//!
//! - `cli` - Command-line arguments and command handlers
//! - `config` - Layered server configuration (defaults, TOML, environment)
//! - `error` - Crate error type
//! - `ids` - Job id allocation
//! - `job` - Job ids, job definitions, roles and views
//! - `render` - Template loading and view rendering
//! - `server` - Role router and HTTP serving
pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod job;
pub mod render;
pub mod server;

pub use error::{Error, Result};
