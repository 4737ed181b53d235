//! Error types for handcue

use thiserror::Error;

/// Result type alias for handcue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tracking gestures and issuing media commands
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Capture device could not be opened (fatal at startup)
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Capture device went away after it was opened
    #[error("capture device disconnected: {0}")]
    DeviceDisconnected(String),

    /// No usable frame for this iteration (transient)
    #[error("frame unavailable: {0}")]
    FrameUnavailable(String),

    /// Pose estimator failure
    #[error("pose estimator error: {0}")]
    Estimator(String),

    /// Landmark set rejected at the estimator boundary
    #[error("invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Synthetic key input could not be delivered
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
