use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use async_walkdir::WalkDir;
use color_eyre::eyre::{eyre, Result};
use futures::StreamExt;
use tracing::info;

use crate::metrics::Metrics;

/// Walks `root` recursively and returns every file and directory beneath it,
/// in traversal order. The root itself is not included.
///
/// The caller is expected to have checked that `root` is a directory. The first
/// error raised by the walk aborts enumeration.
pub async fn enumerate_paths(root: &Path, metrics: &Metrics) -> Result<Vec<PathBuf>> {
    let mut entries = WalkDir::new(root);
    let mut paths = Vec::new();

    while let Some(entry) = entries.next().await {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => return Err(eyre!("failed to walk {}: {}", root.display(), e)),
        }
    }

    metrics
        .entries_enumerated
        .fetch_add(paths.len(), Ordering::Relaxed);
    info!("enumerated {} entries under {}", paths.len(), root.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn lists_files_and_directories_at_every_depth() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("a/deep/deeper")).unwrap();
        fs::create_dir(root.path().join("b")).unwrap();
        fs::write(root.path().join("top.txt"), b"x").unwrap();
        fs::write(root.path().join("a/deep/deeper/leaf.bin"), b"xyz").unwrap();

        let metrics = Metrics::default();
        let paths = enumerate_paths(root.path(), &metrics).await.unwrap();

        let relative: BTreeSet<_> = paths
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().to_path_buf())
            .collect();
        let expected: BTreeSet<PathBuf> = [
            "a",
            "a/deep",
            "a/deep/deeper",
            "a/deep/deeper/leaf.bin",
            "b",
            "top.txt",
        ]
        .into_iter()
        .map(PathBuf::from)
        .collect();

        assert_eq!(relative, expected);
        assert_eq!(paths.len(), 6);
        assert_eq!(metrics.entries_enumerated.load(Ordering::Relaxed), 6);
    }

    #[tokio::test]
    async fn empty_root_yields_nothing() {
        let root = TempDir::new().unwrap();
        let paths = enumerate_paths(root.path(), &Metrics::default())
            .await
            .unwrap();
        assert!(paths.is_empty());
    }
}
