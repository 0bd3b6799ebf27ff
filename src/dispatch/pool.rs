use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use super::{DispatchReport, Dispatcher, InFlight};
use crate::aggregate::{aggregate, PartialMapping};
use crate::chunk::Chunk;
use crate::error::{Error, Result};

/// Fixed set of long-lived workers fed through a bounded chunk queue.
///
/// The queue holds at most `workers` chunks, so reading blocks whenever the
/// workers fall behind and memory stays proportional to the worker count.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        WorkerPool {
            workers: workers.max(1),
        }
    }
}

impl Dispatcher for WorkerPool {
    fn name(&self) -> &'static str {
        "worker-pool"
    }

    fn results_capacity(&self) -> Option<usize> {
        Some(self.workers)
    }

    fn dispatch<I>(&self, chunks: I, results: Sender<PartialMapping>) -> Result<DispatchReport>
    where
        I: Iterator<Item = Result<Chunk>>,
    {
        let (chunk_tx, chunk_rx) = bounded::<Chunk>(self.workers);
        let in_flight = InFlight::default();

        thread::scope(|s| {
            let handles: Vec<_> = (0..self.workers)
                .map(|id| {
                    let chunk_rx = chunk_rx.clone();
                    let results = results.clone();
                    let in_flight = &in_flight;
                    thread::Builder::new()
                        .name(format!("brc-worker-{id}"))
                        .spawn_scoped(s, move || worker_loop(id, chunk_rx, results, in_flight))
                })
                .collect::<std::io::Result<_>>()
                .map_err(Error::Spawn)?;
            // Workers hold the only receivers and result senders from here on.
            drop(chunk_rx);
            drop(results);

            let fed = feed(chunks, &chunk_tx, &in_flight);
            drop(chunk_tx);

            let mut panicked = false;
            for handle in handles {
                panicked |= handle.join().is_err();
            }
            if panicked {
                return Err(Error::WorkerPanicked);
            }

            Ok(DispatchReport {
                chunks: fed?,
                peak_in_flight: in_flight.peak(),
            })
        })
    }
}

// Pushes chunks into the queue, blocking while it is full.
fn feed<I>(chunks: I, queue: &Sender<Chunk>, in_flight: &InFlight) -> Result<u64>
where
    I: Iterator<Item = Result<Chunk>>,
{
    let mut sent = 0;
    for chunk in chunks {
        let chunk = chunk?;
        in_flight.enter();
        if queue.send(chunk).is_err() {
            // Every worker is gone, which only happens if they panicked.
            in_flight.leave();
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

fn worker_loop(
    id: usize,
    chunks: Receiver<Chunk>,
    results: Sender<PartialMapping>,
    in_flight: &InFlight,
) {
    for chunk in chunks.iter() {
        let partial = aggregate(&chunk);
        drop(chunk);
        tracing::trace!(
            worker = id,
            lines = partial.lines,
            keys = partial.stats.len(),
            "chunk aggregated"
        );
        let delivered = results.send(partial).is_ok();
        in_flight.leave();
        if !delivered {
            tracing::debug!(worker = id, "results channel closed, stopping");
            break;
        }
    }
}
