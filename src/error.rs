use thiserror::Error;

/// Errors produced while configuring, rendering or exporting a seal.
#[derive(Debug, Error)]
pub enum StampError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("render failed: {0}")]
    Render(String),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StampError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StampError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StampError>;
