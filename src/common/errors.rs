use lambda_http::Response;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A finished response to hand back as-is, used for early rejections.
    #[error("request rejected with status {}", .0.status())]
    HttpError(Response<String>),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build response: {0}")]
    Http(#[from] lambda_http::http::Error),
    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input problems reported to the caller as a 400 with the display text as body.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing body")]
    MissingBody,
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("Invalid email")]
    InvalidEmail,
}
