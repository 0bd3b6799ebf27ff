use ahash::AHashMap;

use crate::chunk::Chunk;
use crate::parse::parse_line;
use crate::stats::Stats;

/// Key to statistics map used by both the workers and the reducer.
pub type StatsMap = AHashMap<String, Stats>;

/// What one worker produced from one chunk.
///
/// Owned outright by whoever holds it; workers hand it off by value.
#[derive(Debug, Default, Clone)]
pub struct PartialMapping {
    pub stats: StatsMap,
    /// Lines in the chunk, valid or not.
    pub lines: u64,
    /// Lines dropped as malformed.
    pub skipped: u64,
}

/// Folds every valid record in `chunk` into a fresh map.
pub fn aggregate(chunk: &Chunk) -> PartialMapping {
    let mut partial = PartialMapping::default();
    for line in chunk.lines() {
        partial.lines += 1;
        let Some(record) = parse_line(line) else {
            partial.skipped += 1;
            continue;
        };
        match partial.stats.get_mut(record.key) {
            Some(stats) => stats.update(record.value),
            None => {
                partial
                    .stats
                    .insert(record.key.to_owned(), Stats::new(record.value));
            }
        }
    }
    partial
}

/// Merges `local` into `global`, consuming it.
pub fn merge_maps(global: &mut StatsMap, local: StatsMap) {
    for (key, stats) in local {
        global
            .entry(key)
            .and_modify(|existing| existing.merge(&stats))
            .or_insert(stats);
    }
}
