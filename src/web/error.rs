use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::error::{CheckpointError, StorageError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("QR issuance failed: {0}")]
    Issuance(#[from] CheckpointError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
