//! Coordinator parameters from the request body
//!
//! Accepts `application/x-www-form-urlencoded` and `multipart/form-data`
//! bodies. Any other body counts as absent. File parts of a multipart body
//! are skipped; only text fields can carry job parameters.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use tracing::debug;

use crate::job::JobForm;

pub(super) async fn body_form(request: Request) -> JobForm {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        return multipart_form(request).await;
    }

    match Form::<Vec<(String, String)>>::from_request(request, &()).await {
        Ok(Form(pairs)) => JobForm::from_pairs(pairs),
        Err(rejection) => {
            debug!("Ignoring request body: {}", rejection);
            JobForm::default()
        }
    }
}

/// Read text fields until the body ends or stops parsing. Fields read before
/// a malformed or oversized part are kept.
async fn multipart_form(request: Request) -> JobForm {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Ignoring multipart body: {}", rejection);
            return JobForm::default();
        }
    };

    let mut pairs = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading multipart body: {}", e);
                break;
            }
        };

        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if !matches!(name.as_str(), "mapper" | "reducer" | "dataurl") {
            continue;
        }

        match field.text().await {
            Ok(value) => pairs.push((name, value)),
            Err(e) => {
                debug!("Stopped reading multipart field {}: {}", name, e);
                break;
            }
        }
    }

    JobForm::from_pairs(pairs)
}
