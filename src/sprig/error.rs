use thiserror::Error;

#[derive(Error, Debug)]
pub enum SprigError {
    #[error("Invalid plant id: {0:?}")]
    InvalidId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Optimizer error: {0}")]
    Optimizer(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Failures while handling an uploaded plant photo.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("File type not allowed: {0:?} (expected png, jpg, jpeg or gif)")]
    DisallowedExtension(String),

    #[error("Refusing to touch a path outside the asset root: {0}")]
    UnsafePath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SprigError>;
