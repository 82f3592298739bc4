use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read document {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write document {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Chart error: {0}")]
    Chart(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown block type: {0}")]
    UnknownBlock(String),
}

impl From<gix::discover::Error> for ReportError {
    fn from(err: gix::discover::Error) -> Self {
        ReportError::GitDiscover(Box::new(err))
    }
}
