//! HTTP server for the job pages
//!
//! Routes requests to one of the role views. The only shared state is the
//! read-only template set and the id allocator.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::ids::IdAllocator;
use crate::render::ViewRenderer;

mod handlers;
mod params;

pub use handlers::AppError;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<ViewRenderer>,
    pub ids: Arc<IdAllocator>,
}

impl AppState {
    pub fn new(renderer: ViewRenderer, ids: IdAllocator) -> Self {
        Self {
            renderer: Arc::new(renderer),
            ids: Arc::new(ids),
        }
    }
}

/// Build the role router.
///
/// `static_dir`, when given, is served under `/static` with the prefix stripped.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/create/{id}", get(handlers::create))
        .route(
            "/server/{id}",
            get(handlers::coordinator).post(handlers::coordinator),
        )
        .route("/job/{id}", get(handlers::worker))
        .fallback(handlers::not_found)
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}

/// The job server, fully initialized and ready to bind.
pub struct JobServer {
    state: AppState,
    addr: String,
    static_dir: Option<PathBuf>,
}

impl JobServer {
    /// Load templates and seed the id allocator.
    ///
    /// Fails if the configuration is invalid or the template set is
    /// incomplete, before anything is bound.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        config.validate()?;

        let source = config.template_source();
        let renderer = ViewRenderer::load(&source)
            .with_context(|| format!("Failed to load templates from {source:?}"))?;
        let ids = IdAllocator::new(config.id_bound);

        Ok(Self {
            state: AppState::new(renderer, ids),
            addr: config.bind_addr(),
            static_dir: config.static_dir.clone(),
        })
    }

    pub fn build_router(&self) -> Router {
        router(self.state.clone(), self.static_dir.as_deref())
    }

    /// Serve until Ctrl+C.
    pub async fn start(self) -> Result<()> {
        let app = self.build_router();

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        info!("Job server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Job server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown requested");
}
