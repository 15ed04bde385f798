//! Artifact writes.
//!
//! Encoded bytes go to a temp file in the destination directory and are then
//! renamed over the target, so a reader never sees a half-written artifact.
//! An existing file with the same name is replaced without warning. The
//! destination directory must already exist.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// `out_dir / (source stem + tail)`, where `tail` is the extension or a page
/// suffix plus extension.
pub fn artifact_path(out_dir: &Path, source: &Path, tail: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}{tail}"))
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        let out = Path::new("/out");
        assert_eq!(
            artifact_path(out, Path::new("/in/photo.final.png"), ".jpg"),
            PathBuf::from("/out/photo.final.jpg")
        );
        assert_eq!(
            artifact_path(out, Path::new("/in/deck.PDF"), "_page3.png"),
            PathBuf::from("/out/deck_page3.png")
        );
    }

    #[test]
    fn writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.bin");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nope").join("a.bin");
        assert!(write_atomic(&target, b"x").is_err());
    }
}
