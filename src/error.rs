use std::path::PathBuf;

/// Terminal failures of a checker run.
///
/// Unreachable targets are never reported through this type; they are a
/// regular probe outcome.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("failed to read targets from {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write proxy list {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to get the current executable path: {0}")]
    SelfPath(#[source] std::io::Error),

    #[error("failed to read the current executable {}: {source}", path.display())]
    SelfRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write the executable to {}: {source}", path.display())]
    SelfWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type CheckerResult<T> = Result<T, CheckerError>;
