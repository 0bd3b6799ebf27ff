use std::io;
use std::path::PathBuf;

/// Failures that abort a run. Malformed lines are not errors; they are
/// skipped and counted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open input {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to build task pool: {0}")]
    TaskPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("aggregation worker panicked")]
    WorkerPanicked,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
