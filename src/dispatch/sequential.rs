use crossbeam_channel::Sender;

use super::{DispatchReport, Dispatcher};
use crate::aggregate::{aggregate, PartialMapping};
use crate::chunk::Chunk;
use crate::error::Result;

/// Aggregates each chunk inline on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Dispatcher for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn results_capacity(&self) -> Option<usize> {
        Some(1)
    }

    fn dispatch<I>(&self, chunks: I, results: Sender<PartialMapping>) -> Result<DispatchReport>
    where
        I: Iterator<Item = Result<Chunk>>,
    {
        let mut report = DispatchReport::default();
        for chunk in chunks {
            let partial = aggregate(&chunk?);
            report.chunks += 1;
            report.peak_in_flight = 1;
            if results.send(partial).is_err() {
                tracing::debug!("results channel closed, stopping");
                break;
            }
        }
        Ok(report)
    }
}
