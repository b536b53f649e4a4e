use std::io;

/// All error types for the material bridge.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Cannot repack empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;
