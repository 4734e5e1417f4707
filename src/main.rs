//! Reports, per directory found beneath a root, how many regular files it
//! directly contains and their cumulative size.
//!
//! The root is read as one line from standard input. The directory tree is
//! enumerated once, split into contiguous chunks, and each chunk is aggregated
//! on its own blocking worker. Once every worker has finished, the partial
//! results are merged into a single mapping keyed by directory name and printed.
//!
//! The worker count defaults to one less than the available parallelism and can
//! be overridden with `DIRSTAT_WORKER_COUNT`. Logs go to standard error and are
//! filtered with `RUST_LOG`.

mod aggregate;
mod config;
mod enumerate;
mod metrics;
mod partition;
mod reduce;
mod report;
mod scan;
mod stats;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::Config;
use crate::metrics::Metrics;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("{:?}", &config);

    let root = read_root().await?;
    let is_dir = tokio::fs::metadata(&root)
        .await
        .map_or(false, |metadata| metadata.is_dir());
    if !is_dir {
        println!("you must indicate an actual directory");
        return Ok(());
    }

    let metrics = Arc::new(Metrics::default());
    let report = scan::run_scan(&root, config.worker_count, metrics.clone()).await?;

    print!("{report}");
    info!("{:?}", metrics);

    Ok(())
}

async fn read_root() -> Result<PathBuf> {
    print!("Please insert a root: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .wrap_err("failed to read root from standard input")?;

    Ok(PathBuf::from(line.trim_end_matches(['\r', '\n'])))
}
