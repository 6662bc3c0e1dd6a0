use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not create run directory {0}")]
    CreateDir(PathBuf),
}

pub type RecorderResult<T> = Result<T, RecorderError>;
