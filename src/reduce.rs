use std::sync::atomic::{AtomicUsize, Ordering};

use crate::stats::StatsMapping;

/// Folds one worker's partial mapping into the global mapping and advances the
/// progress counter by the number of entries merged.
///
/// Names already present are summed into, never overwritten. Taking `global` by
/// exclusive reference keeps merges strictly sequential. Returns the number of
/// entries merged.
pub fn merge_partial(
    global: &mut StatsMapping,
    partial: StatsMapping,
    progress: &AtomicUsize,
) -> usize {
    let merged = partial.len();
    for (name, stats) in partial {
        global.record(name, stats);
    }
    progress.fetch_add(merged, Ordering::Relaxed);
    merged
}
