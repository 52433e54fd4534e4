//! Error types for the medirag crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse '{filename}': {message}")]
    FileParse { filename: String, message: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::FileParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            // Upstream service failures surface as bad gateway
            Error::Embedding(_) | Error::VectorIndex(_) | Error::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("Request failed: {}", self);

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// A type alias for results using the crate's `Error`
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing index name".into());
        assert_eq!(err.to_string(), "Configuration error: missing index name");
    }

    #[test]
    fn test_error_display_file_parse() {
        let err = Error::file_parse("report.pdf", "no extractable text");
        assert_eq!(
            err.to_string(),
            "Failed to parse 'report.pdf': no extractable text"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_upstream_errors_map_to_bad_gateway() {
        for err in [
            Error::Embedding("timeout".into()),
            Error::VectorIndex("upsert failed".into()),
            Error::Llm("rate limited".into()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }
}
