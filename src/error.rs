use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported image file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
