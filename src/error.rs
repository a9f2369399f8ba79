use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::id::IdParseError;
use crate::posts::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request payload could not be decoded
    #[error("{0}")]
    Binding(String),

    #[error("{0}")]
    InvalidId(#[from] IdParseError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Persistence(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Binding(_) | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound(err.to_string()),
            other => AppError::Persistence(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Persistence(msg) => tracing::error!("Persistence error: {}", msg),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!(status = %status, "request rejected: {}", other),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn response_status(err: AppError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn binding_returns_400() {
        assert_eq!(
            response_status(AppError::Binding("bad body".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invalid_id_returns_400() {
        assert_eq!(
            response_status(AppError::InvalidId(IdParseError::InvalidHex)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(
            response_status(AppError::NotFound("post not found".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unauthorized_returns_401() {
        assert_eq!(
            response_status(AppError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn persistence_returns_500() {
        assert_eq!(
            response_status(AppError::Persistence("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn repository_failures_map_to_500() {
        let err: AppError = RepositoryError::Corrupt("bad id".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("bad id"));
    }

    #[tokio::test]
    async fn body_is_error_envelope() {
        let response = AppError::Binding("expected a sequence".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "expected a sequence" }));
    }
}
