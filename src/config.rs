use std::fmt;

use crate::error::{Error, Result};

/// Lines per chunk unless configured otherwise.
pub const DEFAULT_CHUNK_LINES: usize = 1_000_000;

/// How chunks are handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Fixed pool of workers behind a bounded queue.
    #[default]
    WorkerPool,
    /// One task per chunk, no backpressure.
    SpawnPerChunk,
    /// Everything on one thread.
    Sequential,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::WorkerPool => "worker-pool",
            Strategy::SpawnPerChunk => "spawn-per-chunk",
            Strategy::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Worker threads for the pool, or task threads for spawn-per-chunk.
    pub workers: usize,
    /// Target number of lines per chunk.
    pub chunk_lines: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            strategy: Strategy::default(),
            workers: num_cpus::get().max(1),
            chunk_lines: DEFAULT_CHUNK_LINES,
        }
    }
}

impl EngineConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_chunk_lines(mut self, chunk_lines: usize) -> Self {
        self.chunk_lines = chunk_lines;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if self.chunk_lines == 0 {
            return Err(Error::InvalidConfig("chunk_lines must be at least 1".into()));
        }
        Ok(())
    }
}
