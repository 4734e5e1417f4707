use std::fs;
use std::fs::DirEntry;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, warn};

use crate::metrics::Metrics;
use crate::stats::{DirectoryStats, StatsMapping};

/// Builds the partial mapping for one chunk of the path list.
///
/// Every directory in the chunk gets an entry keyed by its final name component,
/// holding the count and total size of its immediate regular files. Other paths
/// are skipped. I/O failures are logged and counted, and never abort the chunk:
/// a directory that cannot be listed keeps a zeroed entry, and an unreadable
/// child is left out of its parent's totals.
#[tracing::instrument(skip_all, fields(worker = worker, paths = chunk.len()))]
pub fn aggregate_chunk(worker: usize, chunk: &[PathBuf], metrics: &Metrics) -> StatsMapping {
    aggregate_with(chunk, metrics, tally_directory)
}

fn aggregate_with<F>(chunk: &[PathBuf], metrics: &Metrics, tally: F) -> StatsMapping
where
    F: Fn(&Path, &Metrics) -> Result<DirectoryStats>,
{
    let mut partial = StatsMapping::new();

    for path in chunk {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                metrics.entries_failed.fetch_add(1, Ordering::Relaxed);
                warn!("cannot stat {}: {}", path.display(), e);
                continue;
            }
        }

        let name = directory_name(path);
        let entry = partial.entry(name);

        match tally(path, metrics) {
            Ok(stats) => {
                metrics.directories_scanned.fetch_add(1, Ordering::Relaxed);
                entry.absorb(stats);
            }
            Err(e) => {
                metrics.entries_failed.fetch_add(1, Ordering::Relaxed);
                warn!("{:#}", e);
            }
        }
    }

    for (dir, stats) in &partial {
        debug!(
            "{}: {} files {} bytes",
            dir, stats.file_count, stats.total_bytes
        );
    }

    partial
}

/// Counts the immediate regular files of `dir`, following symlinks.
///
/// Fails only when the directory itself cannot be listed; failures on
/// individual children are logged and skipped.
pub fn tally_directory(dir: &Path, metrics: &Metrics) -> Result<DirectoryStats> {
    let children =
        fs::read_dir(dir).wrap_err_with(|| format!("failed to list {}", dir.display()))?;

    let mut stats = DirectoryStats::default();
    for child in children {
        match regular_file_len(child) {
            Ok(Some(len)) => {
                metrics.files_counted.fetch_add(1, Ordering::Relaxed);
                stats.add_file(len);
            }
            Ok(None) => {}
            Err(e) => {
                metrics.entries_failed.fetch_add(1, Ordering::Relaxed);
                warn!("skipping entry in {}: {}", dir.display(), e);
            }
        }
    }

    Ok(stats)
}

/// `Some(size)` when the child resolves to a regular file, `None` otherwise.
fn regular_file_len(child: io::Result<DirEntry>) -> io::Result<Option<u64>> {
    let child = child?;
    let metadata = fs::metadata(child.path()).map_err(|e| {
        io::Error::new(e.kind(), format!("{}: {}", child.path().display(), e))
    })?;

    Ok(metadata.is_file().then(|| metadata.len()))
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
