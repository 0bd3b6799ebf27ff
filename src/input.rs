use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Error, Result};

const READ_BUFFER_BYTES: usize = 1 << 20;

/// How the input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Sequential reads through a large buffer.
    #[default]
    Buffered,
    /// Memory-map the whole file and read lines out of the mapping.
    Mapped,
}

/// An opened input file.
pub enum Input {
    Buffered(BufReader<File>),
    Mapped(Mmap),
}

impl Input {
    pub fn open(path: &Path, mode: ReadMode) -> Result<Self> {
        let open_err = |source: std::io::Error| Error::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        match mode {
            ReadMode::Buffered => Ok(Input::Buffered(BufReader::with_capacity(
                READ_BUFFER_BYTES,
                file,
            ))),
            ReadMode::Mapped => {
                // SAFETY: the file must not be truncated or modified while the
                // run is in progress.
                let mmap = unsafe { Mmap::map(&file) }.map_err(open_err)?;
                advise_sequential(&mmap);
                Ok(Input::Mapped(mmap))
            }
        }
    }
}

// Read-ahead hint only, so a failure is logged and ignored.
#[cfg(unix)]
fn advise_sequential(mmap: &Mmap) {
    if let Err(e) = mmap.advise(memmap2::Advice::Sequential) {
        tracing::debug!(error = %e, "madvise(sequential) failed");
    }
}

#[cfg(not(unix))]
fn advise_sequential(_: &Mmap) {}
