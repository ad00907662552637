use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Guard failures surfaced to lab clients as GraphQL-style error bodies.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("Invalid query encoding")]
    InvalidQueryEncoding,
    #[error("Introspection blocked: Security policy violation detected")]
    IntrospectionBlocked,
}

impl LabError {
    fn status(&self) -> StatusCode {
        match self {
            LabError::InvalidQueryEncoding => StatusCode::BAD_REQUEST,
            LabError::IntrospectionBlocked => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for LabError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "errors": [{ "message": self.to_string() }]
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(LabError::InvalidQueryEncoding.to_string(), "Invalid query encoding");
        assert_eq!(
            LabError::IntrospectionBlocked.to_string(),
            "Introspection blocked: Security policy violation detected"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(LabError::InvalidQueryEncoding.status(), StatusCode::BAD_REQUEST);
        assert_eq!(LabError::IntrospectionBlocked.status(), StatusCode::FORBIDDEN);
    }
}
