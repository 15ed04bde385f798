//! Result types produced by the engine and the batch drivers.

use crate::error::{ConvertError, PageError};
use crate::format::{FormatSpec, InputClass};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of converting one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub source: PathBuf,
    pub input_class: InputClass,
    /// The resolved target (after any unknown-name fallback).
    pub format: FormatSpec,
    /// Paths of produced artifacts, in page order for PDFs.
    pub artifacts: Vec<PathBuf>,
    /// Pages that were skipped. Always empty for non-PDF sources.
    pub page_failures: Vec<PageError>,
    /// Failures that were logged but did not fail the file, e.g. an SVG that
    /// could not be written under [`crate::SvgWriteFailure::LogAndContinue`].
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl ConversionOutput {
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }
}

/// One file's entry in a batch, success or failure, as plain data.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// 0-based position in the caller's file list.
    pub index: usize,
    pub source: PathBuf,
    pub artifacts: usize,
    /// `"Error converting <path>: <cause>"` when the file failed.
    pub error: Option<String>,
    #[serde(skip)]
    pub output: Option<ConversionOutput>,
}

impl FileOutcome {
    pub(crate) fn from_result(
        index: usize,
        source: PathBuf,
        result: Result<ConversionOutput, ConvertError>,
    ) -> Self {
        match result {
            Ok(output) => Self {
                index,
                artifacts: output.artifact_count(),
                source,
                error: None,
                output: Some(output),
            },
            Err(e) => Self {
                index,
                error: Some(format!("Error converting {}: {}", source.display(), e)),
                source,
                artifacts: 0,
                output: None,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate over a batch: what the UI shows once the run completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total_files: usize,
    /// Sum of artifacts over all files (PDF pages count individually).
    pub total_artifacts: usize,
    pub failed_files: usize,
    /// One message per failed file, in file order.
    pub errors: Vec<String>,
    /// Per-file outcomes, in file order.
    pub outcomes: Vec<FileOutcome>,
    pub duration_ms: u64,
}

impl BatchReport {
    /// Assemble a report from outcomes in any order.
    pub fn from_outcomes(mut outcomes: Vec<FileOutcome>, duration_ms: u64) -> Self {
        outcomes.sort_by_key(|o| o.index);
        let errors: Vec<String> = outcomes.iter().filter_map(|o| o.error.clone()).collect();
        Self {
            total_files: outcomes.len(),
            total_artifacts: outcomes.iter().map(|o| o.artifacts).sum(),
            failed_files: errors.len(),
            errors,
            outcomes,
            duration_ms,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files > 0
    }
}
