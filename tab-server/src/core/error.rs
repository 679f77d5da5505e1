use thiserror::Error;

use crate::utils::AppError;

/// Startup and serving failures (request-level errors are [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("initialization failed: {0}")]
    Init(#[from] AppError),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
