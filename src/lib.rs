use std::path::PathBuf;

pub mod config;
pub mod lifecycle;
pub mod runner;
pub mod sniff;
pub mod storage;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Any failure of a smoke-test run. Every kind aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to load configuration")]
    Config(#[from] config::Error),
    #[error("Failed to create storage client")]
    Session(#[from] storage::s3::Error),
    #[error("Failed to read file ({path:?}): {error}")]
    ReadPayload {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Failed to upload {bucket}/{key}: {error}")]
    Put {
        error: BoxError,
        bucket: String,
        key: String,
    },
    #[error("Failed to find {bucket}/{key}: {error}")]
    Get {
        error: BoxError,
        bucket: String,
        key: String,
    },
    #[error("Failed to remove {bucket}/{key}: {error}")]
    Delete {
        error: BoxError,
        bucket: String,
        key: String,
    },
}
