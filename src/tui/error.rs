use crate::capture::CaptureError;
use crate::config::ConfigError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Capture error: {0}")]
    CaptureError(#[from] CaptureError),

    #[error("Render error: {0}")]
    RenderError(String),
}
