use std::fmt;

use crate::scan::ScanReport;

const HEADER: &str = "                 -------------[Directories]------------";

/// Human-readable report: one line per directory holding at least one file,
/// followed by the summary line.
impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f)?;

        for (dir, stats) in self.stats.iter().filter(|(_, s)| s.file_count > 0) {
            writeln!(
                f,
                "{:>25}: {:>5} files {:>10} bytes",
                dir, stats.file_count, stats.total_bytes
            )?;
        }

        let totals = self.stats.totals();
        writeln!(f)?;
        writeln!(
            f,
            "{:>20}Total: {:>5} files {:>10} bytes | {} folders [{} ms]",
            "",
            totals.file_count,
            totals.total_bytes,
            self.directories_merged,
            self.elapsed.as_millis()
        )
    }
}
