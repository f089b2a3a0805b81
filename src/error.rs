use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors raised by the ledger core and the services on top of it.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Conflict(_) => StatusCode::CONFLICT,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return LedgerError::Conflict("ledger already exists".into());
            }
        }
        LedgerError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Storage(format!("ledger document: {}", e))
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            LedgerError::Storage(detail) => {
                error!(error = %detail, "storage failure");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(LedgerError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(LedgerError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(LedgerError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            LedgerError::Storage("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let res = LedgerError::Storage("password=hunter2".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn broken_document_maps_to_storage() {
        let err: LedgerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
