use std::io::BufRead;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded};

use crate::chunk::ChunkSource;
use crate::config::{EngineConfig, Strategy};
use crate::dispatch::{DispatchReport, Dispatcher, Sequential, SpawnPerChunk, WorkerPool};
use crate::error::{Error, Result};
use crate::input::{Input, ReadMode};
use crate::reduce::{FinalMapping, Reducer};

/// Counters describing one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub strategy: &'static str,
    pub chunks: u64,
    pub lines: u64,
    pub skipped: u64,
    pub keys: usize,
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

/// Result of a run: the merged mapping plus its report.
#[derive(Debug, Clone)]
pub struct Summary {
    pub mapping: FinalMapping,
    pub report: RunReport,
}

/// Wires chunk source, dispatcher and reducer together.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens `path` and aggregates it.
    pub fn run_path(&self, path: &Path, mode: ReadMode) -> Result<Summary> {
        match Input::open(path, mode)? {
            Input::Buffered(reader) => self.run(reader),
            Input::Mapped(mmap) => self.run(&mmap[..]),
        }
    }

    /// Aggregates every line of `reader` with the configured strategy.
    pub fn run<R: BufRead + Send>(&self, reader: R) -> Result<Summary> {
        let workers = self.config.workers;
        match self.config.strategy {
            Strategy::WorkerPool => self.run_with(&WorkerPool::new(workers), reader),
            Strategy::SpawnPerChunk => self.run_with(&SpawnPerChunk::new(workers), reader),
            Strategy::Sequential => self.run_with(&Sequential, reader),
        }
    }

    /// Aggregates every line of `reader` with an explicit dispatcher.
    ///
    /// Reading and dispatching run on a scoped thread while the calling
    /// thread reduces partial mappings as they arrive. Nothing is returned
    /// unless every chunk was aggregated and merged.
    pub fn run_with<D, R>(&self, dispatcher: &D, reader: R) -> Result<Summary>
    where
        D: Dispatcher,
        R: BufRead + Send,
    {
        let started = Instant::now();
        tracing::info!(
            strategy = dispatcher.name(),
            workers = self.config.workers,
            chunk_lines = self.config.chunk_lines,
            "starting aggregation"
        );

        let source = ChunkSource::new(reader, self.config.chunk_lines);
        let (results_tx, results_rx) = match dispatcher.results_capacity() {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        let (mapping, dispatched) = thread::scope(|s| {
            let dispatch = thread::Builder::new()
                .name("brc-dispatch".into())
                .spawn_scoped(s, move || dispatcher.dispatch(source, results_tx))
                .map_err(Error::Spawn)?;
            let mapping = Reducer::new().drain(results_rx);
            let dispatched = dispatch.join().map_err(|_| Error::WorkerPanicked)?;
            Ok::<_, Error>((mapping, dispatched))
        })?;
        let DispatchReport {
            chunks,
            peak_in_flight,
        } = dispatched?;

        let report = RunReport {
            strategy: dispatcher.name(),
            chunks,
            lines: mapping.lines(),
            skipped: mapping.skipped(),
            keys: mapping.len(),
            peak_in_flight,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            chunks = report.chunks,
            lines = report.lines,
            skipped = report.skipped,
            keys = report.keys,
            peak_in_flight = report.peak_in_flight,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "aggregation finished"
        );

        Ok(Summary { mapping, report })
    }
}
