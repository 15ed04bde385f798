//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch drivers work through their file list. The engine's
//! single-file entry point never calls it.
//!
//! # Example
//!
//! ```rust
//! use docshift::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     artifacts: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, _index: usize, _total: usize, artifacts: usize) {
//!         self.artifacts.fetch_add(artifacts, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { artifacts: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::BatchReport;
use std::sync::Arc;

/// Called by the batch drivers as each file is processed.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the file
/// events arrive from several worker threads and out of order. All methods
/// default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first file starts.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is handed to the engine.
    ///
    /// `index` is 0-based in the caller's file order.
    fn on_file_start(&self, index: usize, total_files: usize) {
        let _ = (index, total_files);
    }

    /// Called when a file produced its artifacts (pages for PDFs).
    fn on_file_complete(&self, index: usize, total_files: usize, artifacts: usize) {
        let _ = (index, total_files, artifacts);
    }

    /// Called when a file failed as a whole.
    fn on_file_error(&self, index: usize, total_files: usize, error: &str) {
        let _ = (index, total_files, error);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// A no-op implementation, used when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
