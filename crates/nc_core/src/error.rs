use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed error: {0}")]
    Fetch(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Cache read error: {0}")]
    CacheRead(String),

    #[error("Cache write error: {0}")]
    CacheWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
