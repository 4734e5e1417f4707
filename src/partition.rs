use std::ops::Range;

/// Splits `len` items into `workers` contiguous ranges.
///
/// Every range but the last holds `len / workers` items (at least one); the last
/// absorbs the remainder. Ranges are returned in order, never overlap, and
/// together cover `0..len` exactly. The number of ranges is `workers` clamped
/// to `1..=max(len, 1)`, so surplus workers are never given a range.
pub fn plan_chunks(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, len.max(1));
    let chunk_len = (len / workers).max(1);

    (0..workers)
        .map(|i| {
            let start = (i * chunk_len).min(len);
            let end = if i == workers - 1 {
                len
            } else {
                (start + chunk_len).min(len)
            };
            start..end
        })
        .collect()
}
