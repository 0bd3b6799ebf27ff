use crossbeam_channel::Sender;
use rayon::ThreadPoolBuilder;

use super::{DispatchReport, Dispatcher, InFlight};
use crate::aggregate::{aggregate, PartialMapping};
use crate::chunk::Chunk;
use crate::error::Result;

/// Spawns one short-lived task per chunk as soon as the chunk is read.
///
/// Reading never waits on the workers, so every chunk of the input may be
/// resident at once. Tasks run on a dedicated pool of `threads` threads.
#[derive(Debug, Clone)]
pub struct SpawnPerChunk {
    threads: usize,
}

impl SpawnPerChunk {
    pub fn new(threads: usize) -> Self {
        SpawnPerChunk {
            threads: threads.max(1),
        }
    }
}

impl Dispatcher for SpawnPerChunk {
    fn name(&self) -> &'static str {
        "spawn-per-chunk"
    }

    fn results_capacity(&self) -> Option<usize> {
        None
    }

    fn dispatch<I>(&self, chunks: I, results: Sender<PartialMapping>) -> Result<DispatchReport>
    where
        I: Iterator<Item = Result<Chunk>>,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("brc-task-{i}"))
            .build()?;
        let in_flight = InFlight::default();
        let mut spawned = 0;

        // The scope returns only after every spawned task has finished, and
        // each task owns a sender clone, so the channel closes with the last
        // task once `results` itself is dropped below.
        let fed: Result<()> = pool.in_place_scope(|s| {
            for chunk in chunks {
                let chunk = chunk?;
                let results = results.clone();
                let in_flight = &in_flight;
                in_flight.enter();
                s.spawn(move |_| {
                    let partial = aggregate(&chunk);
                    drop(chunk);
                    tracing::trace!(
                        lines = partial.lines,
                        keys = partial.stats.len(),
                        "chunk aggregated"
                    );
                    if results.send(partial).is_err() {
                        tracing::debug!("results channel closed, dropping partial mapping");
                    }
                    in_flight.leave();
                });
                spawned += 1;
            }
            Ok(())
        });
        drop(results);
        fed?;

        Ok(DispatchReport {
            chunks: spawned,
            peak_in_flight: in_flight.peak(),
        })
    }
}
