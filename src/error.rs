use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("QR rendering failed for {payload}: {message}")]
    Render { payload: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures of the attendee data file. Always fatal for the operation
/// that hit them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("data file {} not found. Run `checkpoint roster` first.", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("duplicate token in data file: {0}")]
    DuplicateToken(String),
}

/// Why a scan was turned down. These are reported back to the scanner,
/// never raised as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid QR")]
    InvalidEntryToken,

    #[error("Invalid lunch QR")]
    InvalidLunchToken,

    #[error("Lunch already claimed")]
    AlreadyClaimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}
