use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No video selected")]
    MissingVideoSelection,

    #[error("No playable video: {0}")]
    NoPlayableVideo(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Command channel closed")]
    ChannelClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
