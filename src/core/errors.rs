use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cross-device link not supported")]
    CrossDeviceLink,
    #[error("symlink not supported")]
    SymlinkUnsupported,
    #[error("destination is inside source")]
    DestinationInsideSource,
    #[error("unsupported file type")]
    UnsupportedFileType,
    #[error("source not found")]
    NotFound,
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by the request rather than by the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Other(_))
    }
}
