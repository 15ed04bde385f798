//! Source checks and input collection.
//!
//! [`check_source`] runs after routing has accepted a job and before any
//! strategy touches the file, so a missing or unreadable source reports as
//! such rather than as a decoder error. [`collect_inputs`] expands the
//! caller's path list for batch runs.

use crate::error::ConvertError;
use crate::format::is_supported_input;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Verify the source exists and is readable.
pub fn check_source(path: &Path) -> Result<(), ConvertError> {
    match std::fs::File::open(path) {
        Ok(_) => {
            debug!("Source ok: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(ConvertError::SourceNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Inputs accepted for a batch, plus the paths that were passed over.
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Expand `paths` into the list of files to convert, preserving order.
///
/// Directories contribute their supported files (not recursively, sorted by
/// name). Files with an unrecognised extension are skipped.
pub fn collect_inputs<I, P>(paths: I) -> CollectedInputs
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut out = CollectedInputs::default();
    for p in paths {
        let p = p.as_ref();
        if p.is_dir() {
            let mut entries: Vec<PathBuf> = match std::fs::read_dir(p) {
                Ok(rd) => rd
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|e| e.is_file())
                    .collect(),
                Err(e) => {
                    warn!("Cannot read directory {}: {}", p.display(), e);
                    out.skipped.push(p.to_path_buf());
                    continue;
                }
            };
            entries.sort();
            for entry in entries {
                if is_supported_input(&entry) {
                    out.files.push(entry);
                } else {
                    out.skipped.push(entry);
                }
            }
        } else if is_supported_input(p) {
            out.files.push(p.to_path_buf());
        } else {
            out.skipped.push(p.to_path_buf());
        }
    }
    out
}
