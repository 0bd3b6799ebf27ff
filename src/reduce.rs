use crossbeam_channel::Receiver;

use crate::aggregate::{merge_maps, PartialMapping, StatsMap};
use crate::stats::Stats;

/// Folds partial mappings, in whatever order they arrive, into one map.
#[derive(Debug, Default)]
pub struct Reducer {
    stats: StatsMap,
    partials: u64,
    lines: u64,
    skipped: u64,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, partial: PartialMapping) {
        self.partials += 1;
        self.lines += partial.lines;
        self.skipped += partial.skipped;
        merge_maps(&mut self.stats, partial.stats);
    }

    /// Absorbs partial mappings until every sender is gone and the channel is
    /// empty.
    pub fn drain(mut self, results: Receiver<PartialMapping>) -> FinalMapping {
        for partial in results.iter() {
            self.absorb(partial);
        }
        self.finish()
    }

    pub fn finish(self) -> FinalMapping {
        FinalMapping {
            stats: self.stats,
            partials: self.partials,
            lines: self.lines,
            skipped: self.skipped,
        }
    }
}

/// The merged result of a whole run.
#[derive(Debug, Default, Clone)]
pub struct FinalMapping {
    stats: StatsMap,
    partials: u64,
    lines: u64,
    skipped: u64,
}

impl FinalMapping {
    pub fn get(&self, key: &str) -> Option<&Stats> {
        self.stats.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Stats)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries ordered by key.
    pub fn sorted(&self) -> Vec<(&str, &Stats)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Partial mappings merged into this one.
    pub fn partials(&self) -> u64 {
        self.partials
    }

    /// Input lines seen, valid or not.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Input lines dropped as malformed.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Valid records folded in.
    pub fn records(&self) -> u64 {
        self.stats.values().map(Stats::count).sum()
    }

    pub fn into_stats(self) -> StatsMap {
        self.stats
    }
}
