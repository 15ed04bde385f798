//! Caller-side batch driver.
//!
//! Runs [`Engine::convert`] over a list of files and turns every failure into
//! data, so one bad file never aborts its siblings. Conversions run on
//! tokio's blocking pool, off the caller's task; with the default
//! `concurrency = 1` files are processed one at a time in list order.
//!
//! There is no cancellation: a file that has started runs to completion.

use crate::convert::Engine;
use crate::error::ConvertError;
use crate::output::{BatchReport, FileOutcome};
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Convert every file in `files` into `out_dir` as `format_name`.
///
/// Progress events go to the engine's configured callback. The returned
/// report lists outcomes in file order regardless of completion order.
///
/// # Example
/// ```rust,no_run
/// use docshift::{convert_batch, ConversionConfig, Engine};
///
/// # #[tokio::main]
/// # async fn main() {
/// let engine = Engine::new(ConversionConfig::default());
/// let report = convert_batch(&engine, &["scan.pdf", "logo.png"], "out", "PNG").await;
/// println!("{} artifacts", report.total_artifacts);
/// for e in &report.errors {
///     eprintln!("{e}");
/// }
/// # }
/// ```
pub async fn convert_batch<P: AsRef<Path>>(
    engine: &Engine,
    files: &[P],
    out_dir: impl AsRef<Path>,
    format_name: &str,
) -> BatchReport {
    let start = Instant::now();
    let total = files.len();
    let callback = engine.config().progress_callback.clone();
    let concurrency = engine.config().concurrency.max(1);
    info!("Starting batch: {} file(s), concurrency {}", total, concurrency);

    if let Some(ref cb) = callback {
        cb.on_batch_start(total);
    }

    let out_dir = Arc::new(out_dir.as_ref().to_path_buf());
    let format_name: Arc<str> = Arc::from(format_name);

    let outcomes: Vec<FileOutcome> = stream::iter(files.iter().enumerate().map(|(index, p)| {
        convert_one(
            engine.clone(),
            index,
            total,
            p.as_ref().to_path_buf(),
            Arc::clone(&out_dir),
            Arc::clone(&format_name),
        )
    }))
    .buffer_unordered(concurrency)
    .collect()
    .await;

    finish(outcomes, start, callback.as_ref())
}

/// Sequential batch on the current thread, for callers without a runtime.
pub fn convert_batch_blocking<P: AsRef<Path>>(
    engine: &Engine,
    files: &[P],
    out_dir: impl AsRef<Path>,
    format_name: &str,
) -> BatchReport {
    let start = Instant::now();
    let total = files.len();
    let callback = engine.config().progress_callback.clone();
    let out_dir = out_dir.as_ref();

    if let Some(ref cb) = callback {
        cb.on_batch_start(total);
    }

    let outcomes = files
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let source = p.as_ref().to_path_buf();
            if let Some(ref cb) = callback {
                cb.on_file_start(index, total);
            }
            let result = engine.convert(&source, out_dir, format_name);
            let outcome = FileOutcome::from_result(index, source, result);
            notify_outcome(callback.as_ref(), &outcome, total);
            outcome
        })
        .collect();

    finish(outcomes, start, callback.as_ref())
}

/// Convert a single batch entry on the blocking pool.
pub(crate) async fn convert_one(
    engine: Engine,
    index: usize,
    total: usize,
    source: PathBuf,
    out_dir: Arc<PathBuf>,
    format_name: Arc<str>,
) -> FileOutcome {
    let callback = engine.config().progress_callback.clone();
    if let Some(ref cb) = callback {
        cb.on_file_start(index, total);
    }

    let src = source.clone();
    let result = tokio::task::spawn_blocking(move || engine.convert(&src, out_dir.as_path(), &format_name))
        .await
        .unwrap_or_else(|e| Err(ConvertError::Internal(format!("conversion task failed: {e}"))));

    let outcome = FileOutcome::from_result(index, source, result);
    notify_outcome(callback.as_ref(), &outcome, total);
    outcome
}

fn notify_outcome(callback: Option<&ProgressCallback>, outcome: &FileOutcome, total: usize) {
    match &outcome.error {
        None => {
            if let Some(cb) = callback {
                cb.on_file_complete(outcome.index, total, outcome.artifacts);
            }
        }
        Some(e) => {
            warn!("{}", e);
            if let Some(cb) = callback {
                cb.on_file_error(outcome.index, total, e);
            }
        }
    }
}

fn finish(outcomes: Vec<FileOutcome>, start: Instant, callback: Option<&ProgressCallback>) -> BatchReport {
    let report = BatchReport::from_outcomes(outcomes, start.elapsed().as_millis() as u64);
    info!(
        "Batch complete: {} artifact(s) from {} file(s), {} failed, {}ms",
        report.total_artifacts, report.total_files, report.failed_files, report.duration_ms
    );
    if let Some(cb) = callback {
        cb.on_batch_complete(&report);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    #[test]
    fn blocking_batch_collects_failures_as_data() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("t.csv");
        std::fs::write(&csv, b"x,y\n").unwrap();
        let missing = dir.path().join("gone.csv");
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let engine = Engine::new(ConversionConfig::default());
        let report = convert_batch_blocking(&engine, &[missing, csv], &out, "CSV");

        assert_eq!(report.total_files, 2);
        assert_eq!(report.total_artifacts, 1);
        assert_eq!(report.failed_files, 1);
        assert!(report.errors[0].starts_with("Error converting"));
        assert!(report.errors[0].contains("gone.csv"));
        assert!(report.outcomes[1].is_success());
    }

    #[tokio::test]
    async fn empty_batch() {
        let engine = Engine::new(ConversionConfig::default());
        let files: [&str; 0] = [];
        let report = convert_batch(&engine, &files, ".", "PNG").await;
        assert_eq!(report.total_files, 0);
        assert!(!report.has_failures());
    }
}
