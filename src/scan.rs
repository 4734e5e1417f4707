use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use futures::future::join_all;
use tokio::task::JoinError;
use tracing::{error, info};

use crate::aggregate::aggregate_chunk;
use crate::enumerate::enumerate_paths;
use crate::metrics::Metrics;
use crate::partition::plan_chunks;
use crate::reduce::merge_partial;
use crate::stats::StatsMapping;

/// Outcome of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub stats: StatsMapping,
    pub directories_merged: usize,
    pub elapsed: Duration,
}

/// Scans `root` with `worker_count` parallel aggregators.
///
/// All workers run to completion before the first merge. A worker whose task
/// fails contributes an empty mapping, so exactly one result is merged per
/// planned chunk. No more workers are started than there are entries.
pub async fn run_scan(
    root: &Path,
    worker_count: usize,
    metrics: Arc<Metrics>,
) -> Result<ScanReport> {
    let start = Instant::now();

    let paths: Arc<[PathBuf]> = enumerate_paths(root, &metrics).await?.into();
    let chunks = plan_chunks(paths.len(), worker_count);
    info!(
        "aggregating {} entries across {} workers",
        paths.len(),
        chunks.len()
    );

    let handles = chunks.into_iter().enumerate().map(|(worker, range)| {
        let paths = paths.clone();
        let metrics = metrics.clone();
        tokio::task::spawn_blocking(move || aggregate_chunk(worker, &paths[range], &metrics))
    });
    let results = join_all(handles).await;

    let mut stats = StatsMapping::new();
    for partial in substitute_failed(results, &metrics) {
        merge_partial(&mut stats, partial, &metrics.directories_merged);
    }
    if stats.is_empty() {
        info!("no directories found under {}", root.display());
    }

    Ok(ScanReport {
        stats,
        directories_merged: metrics.directories_merged.load(Ordering::Relaxed),
        elapsed: start.elapsed(),
    })
}

/// Replaces every failed worker result with an empty mapping, preserving order
/// and count.
fn substitute_failed(
    results: Vec<std::result::Result<StatsMapping, JoinError>>,
    metrics: &Metrics,
) -> Vec<StatsMapping> {
    results
        .into_iter()
        .enumerate()
        .map(|(worker, result)| {
            result.unwrap_or_else(|e| {
                metrics.workers_failed.fetch_add(1, Ordering::Relaxed);
                error!("worker {} failed, merging an empty result: {}", worker, e);
                StatsMapping::new()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::stats::DirectoryStats;

    fn stats(file_count: u64, total_bytes: u64) -> DirectoryStats {
        DirectoryStats {
            file_count,
            total_bytes,
        }
    }

    /// `a` holds three files of 10, 20 and 30 bytes; `b` is empty.
    fn sample_tree() -> TempDir {
        let root = TempDir::new().unwrap();
        let a = root.path().join("a");
        fs::create_dir(&a).unwrap();
        fs::create_dir(root.path().join("b")).unwrap();
        for (name, len) in [("f10", 10), ("f20", 20), ("f30", 30)] {
            fs::write(a.join(name), vec![b'.'; len]).unwrap();
        }
        root
    }

    #[tokio::test]
    async fn scans_sample_tree() {
        let root = sample_tree();

        for workers in [1, 2, 3, 8] {
            let metrics = Arc::new(Metrics::default());
            let report = run_scan(root.path(), workers, metrics.clone())
                .await
                .unwrap();

            assert_eq!(report.stats.len(), 2, "workers = {workers}");
            assert_eq!(report.stats.get("a"), Some(&stats(3, 60)));
            assert_eq!(report.stats.get("b"), Some(&stats(0, 0)));
            assert_eq!(report.stats.totals(), stats(3, 60));
            assert_eq!(report.directories_merged, 2);
            assert_eq!(metrics.workers_failed.load(Ordering::Relaxed), 0);
        }
    }

    #[tokio::test]
    async fn rescan_is_deterministic() {
        let root = sample_tree();
        fs::create_dir_all(root.path().join("a/inner/core")).unwrap();
        fs::write(root.path().join("a/inner/core/x"), b"12345").unwrap();
        fs::write(root.path().join("a/inner/y"), b"12").unwrap();

        let first = run_scan(root.path(), 3, Arc::new(Metrics::default()))
            .await
            .unwrap();
        let second = run_scan(root.path(), 3, Arc::new(Metrics::default()))
            .await
            .unwrap();

        assert_eq!(first.stats, second.stats);
        assert_eq!(first.directories_merged, second.directories_merged);
        assert_eq!(first.stats.get("inner"), Some(&stats(1, 2)));
        assert_eq!(first.stats.get("core"), Some(&stats(1, 5)));
    }

    #[tokio::test]
    async fn empty_root_produces_empty_report() {
        let root = TempDir::new().unwrap();
        let report = run_scan(root.path(), 4, Arc::new(Metrics::default()))
            .await
            .unwrap();

        assert!(report.stats.is_empty());
        assert_eq!(report.directories_merged, 0);
    }

    #[tokio::test]
    async fn failed_worker_is_replaced_by_empty_result() {
        let ok = tokio::task::spawn_blocking(|| {
            let mut partial = StatsMapping::new();
            partial.record("kept".into(), stats(1, 1));
            partial
        });
        let failed = tokio::task::spawn_blocking(|| -> StatsMapping { panic!("worker died") });
        let results = join_all([ok, failed]).await;

        let metrics = Metrics::default();
        let partials = substitute_failed(results, &metrics);

        assert_eq!(partials.len(), 2);
        assert_eq!(partials[0].get("kept"), Some(&stats(1, 1)));
        assert!(partials[1].is_empty());
        assert_eq!(metrics.workers_failed.load(Ordering::Relaxed), 1);
    }
}
