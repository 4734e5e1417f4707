use std::collections::btree_map;
use std::collections::BTreeMap;

/// Immediate regular-file count and cumulative byte size of one directory name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    pub file_count: u64,
    pub total_bytes: u64,
}

impl DirectoryStats {
    pub fn add_file(&mut self, len: u64) {
        self.file_count += 1;
        self.total_bytes += len;
    }

    pub fn absorb(&mut self, other: DirectoryStats) {
        self.file_count += other.file_count;
        self.total_bytes += other.total_bytes;
    }
}

/// Directory name to [DirectoryStats], iterated in sorted key order.
///
/// Every insertion is an additive upsert: recording a name that is already
/// present sums into the existing entry instead of replacing it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatsMapping {
    entries: BTreeMap<String, DirectoryStats>,
}

impl StatsMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, creating a zeroed one if absent.
    pub fn entry(&mut self, name: String) -> &mut DirectoryStats {
        self.entries.entry(name).or_default()
    }

    pub fn record(&mut self, name: String, stats: DirectoryStats) {
        self.entry(name).absorb(stats);
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&DirectoryStats> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, DirectoryStats> {
        self.entries.iter()
    }

    /// Sum over the entries holding at least one file.
    pub fn totals(&self) -> DirectoryStats {
        self.entries
            .values()
            .filter(|stats| stats.file_count > 0)
            .fold(DirectoryStats::default(), |mut acc, stats| {
                acc.absorb(*stats);
                acc
            })
    }
}

impl IntoIterator for StatsMapping {
    type Item = (String, DirectoryStats);
    type IntoIter = btree_map::IntoIter<String, DirectoryStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a StatsMapping {
    type Item = (&'a String, &'a DirectoryStats);
    type IntoIter = btree_map::Iter<'a, String, DirectoryStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, DirectoryStats)> for StatsMapping {
    fn from_iter<I: IntoIterator<Item = (String, DirectoryStats)>>(iter: I) -> Self {
        let mut mapping = StatsMapping::new();
        for (name, stats) in iter {
            mapping.record(name, stats);
        }
        mapping
    }
}
