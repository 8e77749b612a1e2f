use axum::{
    extract::{rejection::QueryRejection, Path, Query, Request, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error, info};

use super::{params, AppState};
use crate::error::Error;
use crate::job::{JobDefinition, JobForm, JobId, View};

/// Request-scoped failure. Never takes the server down.
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.is_not_found() {
            debug!("Not found: {}", self.0);
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }

        error!("Request failed: {}", error_chain(&self.0));
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn render(state: &AppState, view: View) -> Result<Html<String>, AppError> {
    Ok(Html(state.renderer.render(&view)?))
}

pub(super) async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let id = state.ids.allocate();
    info!("Allocated job id {}", id);
    render(&state, View::Landing(id))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = JobId::parse(&id)?;
    render(&state, View::Creation(id))
}

/// Coordinator page. Parameters come from the query string and from a form
/// or multipart body; the body wins per field and anything missing renders
/// empty. A repeated key contributes its first value.
pub(super) async fn coordinator(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    request: Request,
) -> Result<Html<String>, AppError> {
    let id = JobId::parse(&id)?;

    let query = match query {
        Ok(Query(pairs)) => JobForm::from_pairs(pairs),
        Err(rejection) => {
            debug!("Ignoring query parameters for job {}: {}", id, rejection);
            JobForm::default()
        }
    };
    let body = params::body_form(request).await;

    let definition = JobDefinition::from_form(id, JobForm::merge(body, query));
    info!(
        "Coordinator page for job {} (mapper {} bytes, reducer {} bytes, data url {:?})",
        definition.id,
        definition.mapper_code.len(),
        definition.reducer_code.len(),
        definition.data_url
    );
    render(&state, View::Coordinator(definition))
}

pub(super) async fn worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = JobId::parse(&id)?;
    render(&state, View::Worker(id))
}

pub(super) async fn not_found(uri: Uri) -> AppError {
    Error::NotFound(uri.path().to_string()).into()
}
