use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("cannot resolve home directory")]
    HomeDirUnavailable,

    #[error("cannot walk {path}: {source}")]
    WalkRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("index file not found: {0}")]
    IndexMissing(PathBuf),

    #[error("corrupt index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
