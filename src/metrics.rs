use std::sync::atomic::AtomicUsize;

#[derive(Default, Debug)]
pub struct Metrics {
    pub entries_enumerated: AtomicUsize,

    pub directories_scanned: AtomicUsize,
    pub files_counted: AtomicUsize,
    pub entries_failed: AtomicUsize,

    pub workers_failed: AtomicUsize,

    /// Progress counter: sum of the entry counts of every partial mapping merged so far.
    pub directories_merged: AtomicUsize,
}
