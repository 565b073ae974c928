use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use vitrine_common::error::VitrineError;

use crate::pages;

fn status_for(err: &VitrineError) -> StatusCode {
    match err {
        VitrineError::NotFound(_) => StatusCode::NOT_FOUND,
        VitrineError::Validation(_) => StatusCode::BAD_REQUEST,
        VitrineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        VitrineError::Forbidden(_) => StatusCode::FORBIDDEN,
        VitrineError::Gone(_) => StatusCode::GONE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error shape for the JSON endpoints: `{"error": msg}` with a mapped
/// status code.
pub struct ApiError(pub VitrineError);

impl From<VitrineError> for ApiError {
    fn from(err: VitrineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            VitrineError::NotFound(msg)
            | VitrineError::Validation(msg)
            | VitrineError::Unauthorized(msg)
            | VitrineError::Forbidden(msg)
            | VitrineError::Gone(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

/// Error shape for the HTML page routes: a dedicated error page with the
/// matching status code. Internals are never echoed into the page body.
pub struct PageError(pub VitrineError);

impl From<VitrineError> for PageError {
    fn from(err: VitrineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "page request failed");
        }
        pages::error_page(status).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_statuses() {
        let cases = [
            (VitrineError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (VitrineError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (VitrineError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (VitrineError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (VitrineError::Gone("x".into()), StatusCode::GONE),
            (VitrineError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let resp = ApiError(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn page_error_renders_matching_status() {
        let resp = PageError(VitrineError::Gone("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::GONE);
    }
}
