use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading a probe source.  Detection itself never fails; these only
/// surface from the reader and path wrappers.
#[derive(Error, Debug)]
pub enum SniffError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot read {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SniffError>;
