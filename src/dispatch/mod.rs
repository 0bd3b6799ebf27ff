//! Strategies for handing chunks to aggregation workers.
//!
//! Every strategy guarantees that each chunk from the source is aggregated
//! exactly once and that each resulting [`PartialMapping`] is sent on the
//! results channel exactly once. The results channel closes when the last
//! sender is dropped, which happens only after every chunk has been
//! delivered.

mod pool;
mod sequential;
mod spawn;

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::Sender;

use crate::aggregate::PartialMapping;
use crate::chunk::Chunk;
use crate::error::Result;

pub use pool::WorkerPool;
pub use sequential::Sequential;
pub use spawn::SpawnPerChunk;

/// Counters a dispatcher reports once all its chunks are delivered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Chunks handed to workers.
    pub chunks: u64,
    /// Most chunks queued or being aggregated at the same time.
    pub peak_in_flight: usize,
}

pub trait Dispatcher: Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Capacity of the results channel, `None` for unbounded.
    fn results_capacity(&self) -> Option<usize>;

    /// Drains `chunks`, aggregates each one and sends the partial mapping on
    /// `results`. Returns once every dispatched chunk has been delivered.
    ///
    /// The first `Err` from `chunks` stops dispatching; chunks already handed
    /// out are still finished before the error is returned.
    fn dispatch<I>(&self, chunks: I, results: Sender<PartialMapping>) -> Result<DispatchReport>
    where
        I: Iterator<Item = Result<Chunk>>;
}

/// Tracks how many chunks are outstanding and the high-water mark.
#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::AcqRel);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}


/// Shared harness for the per-strategy tests.
#[cfg(test)]
pub(crate) mod testing {
    use crossbeam_channel::unbounded;

    use super::*;
    use crate::aggregate::{merge_maps, StatsMap};
    use crate::error::Error;

    pub fn chunks<S: AsRef<str>>(lines: &[S], per_chunk: usize) -> Vec<Result<Chunk>> {
        lines
            .chunks(per_chunk)
            .map(|group| Ok(Chunk::from_lines(group.iter().map(|l| l.as_ref().as_bytes()))))
            .collect()
    }

    /// Runs `dispatcher` to completion and merges what it sent.
    pub fn run<D: Dispatcher>(
        dispatcher: &D,
        input: Vec<Result<Chunk>>,
    ) -> (Result<DispatchReport>, StatsMap, usize) {
        let (tx, rx) = unbounded();
        let report = dispatcher.dispatch(input.into_iter(), tx);
        let mut merged = StatsMap::default();
        let mut partials = 0;
        for partial in rx.try_iter() {
            partials += 1;
            merge_maps(&mut merged, partial.stats);
        }
        assert!(rx.is_empty());
        (report, merged, partials)
    }

    pub fn read_failure() -> Result<Chunk> {
        Err(Error::Read(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        )))
    }

    pub fn sample_lines() -> Vec<String> {
        (0..500)
            .map(|i| format!("key{};{}.5", i % 7, i % 41 - 20))
            .collect()
    }
}
