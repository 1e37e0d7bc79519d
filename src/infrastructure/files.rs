//! Durable text file writing and reading

use crate::error::{NotepadError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Create the parent directory of `path` if needed and check that it is writable
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !parent.exists() {
        debug!(dir = %parent.display(), "creating directory");
        fs::create_dir_all(parent).map_err(|e| {
            NotepadError::Storage(format!(
                "Cannot create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let metadata = fs::metadata(parent).map_err(|e| {
        NotepadError::Storage(format!(
            "Cannot access directory {}: {}",
            parent.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(NotepadError::Storage(format!(
            "Not a directory: {}",
            parent.display()
        )));
    }
    if metadata.permissions().readonly() {
        return Err(NotepadError::Storage(format!(
            "Directory is not writable: {}",
            parent.display()
        )));
    }

    Ok(())
}

/// Write `text` as UTF-8 to `path`, replacing any existing file.
///
/// The file is flushed and synced before it is closed, then checked on disk:
/// a missing, empty, or truncated result (less than half the expected bytes)
/// is removed and reported as an IO error. Returns the size on disk.
pub fn write_text(path: &Path, text: &str) -> Result<u64> {
    ensure_parent_dir(path)?;

    if path.exists() {
        debug!(path = %path.display(), "removing previous file");
        fs::remove_file(path)?;
    }

    debug!(path = %path.display(), bytes = text.len(), "writing file");
    if let Err(err) = write_and_sync(path, text) {
        remove_artifact(path);
        return Err(write_failure(path, err));
    }

    verify_written(path, text.len() as u64)
}

// The handle is closed when the writer drops, on every return path.
fn write_and_sync(path: &Path, text: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    if let Err(err) = writer.get_ref().sync_all() {
        warn!(path = %path.display(), error = %err, "sync not supported, continuing");
    }

    Ok(())
}

// The read-only check above only sees cleared write bits, so ownership
// problems surface here.
fn write_failure(path: &Path, err: std::io::Error) -> NotepadError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        let dir = path.parent().unwrap_or(path);
        NotepadError::Storage(format!(
            "Directory is not writable: {}: {}",
            dir.display(),
            err
        ))
    } else {
        NotepadError::Io(err)
    }
}

/// Check that `path` holds a plausible copy of `expected_bytes` bytes
pub fn verify_written(path: &Path, expected_bytes: u64) -> Result<u64> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(_) => {
            return Err(NotepadError::verification(format!(
                "File does not exist after write: {}",
                path.display()
            )));
        }
    };

    if size == 0 {
        remove_artifact(path);
        return Err(NotepadError::verification(format!(
            "File is empty after write: {}",
            path.display()
        )));
    }

    if size.saturating_mul(2) < expected_bytes {
        remove_artifact(path);
        return Err(NotepadError::verification(format!(
            "Incomplete write to {}: expected {} bytes, found {}",
            path.display(),
            expected_bytes,
            size
        )));
    }

    debug!(path = %path.display(), size, "file verified");
    Ok(size)
}

fn remove_artifact(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "failed to remove partial file");
        }
    }
}

/// Read a UTF-8 text file
pub fn read_text(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading file");
    let text = fs::read_to_string(path)?;
    // Editors on some platforms prepend a byte order mark.
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("out.json");

        let size = write_text(&path, "{\"k\":1}").unwrap();

        assert_eq!(size, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"k\":1}");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        fs::write(&path, "a much longer previous payload").unwrap();

        write_text(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_written_size_matches_utf8_length() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unicode.json");
        let text = "ノート 🦀 café";

        let size = write_text(&path, text).unwrap();

        assert_eq!(size, text.len() as u64);
        assert!(size * 2 >= text.len() as u64);
    }

    #[test]
    fn test_empty_payload_is_rejected_and_removed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.json");

        let result = write_text(&path, "");

        assert!(matches!(result, Err(NotepadError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_permission_denied_on_write_is_storage_error() {
        let path = Path::new("/srv/exports/out.json");

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        match write_failure(path, denied) {
            NotepadError::Storage(msg) => assert!(msg.contains("/srv/exports"), "{}", msg),
            other => panic!("Expected Storage error, got {:?}", other),
        }

        let full = std::io::Error::other("disk full");
        assert!(matches!(write_failure(path, full), NotepadError::Io(_)));
    }

    #[test]
    fn test_uncreatable_parent_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = write_text(&blocker.join("sub").join("out.json"), "data");

        assert!(matches!(result, Err(NotepadError::Storage(_))));
    }

    #[test]
    fn test_verify_detects_truncation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("short.json");
        fs::write(&path, "abc").unwrap();

        let result = verify_written(&path, 100);

        assert!(matches!(result, Err(NotepadError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_verify_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = verify_written(&temp.path().join("missing.json"), 10);
        assert!(matches!(result, Err(NotepadError::Io(_))));
    }

    #[test]
    fn test_verify_accepts_half_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("half.json");
        fs::write(&path, "12345").unwrap();

        assert_eq!(verify_written(&path, 10).unwrap(), 5);
        assert!(path.exists());
    }

    #[test]
    fn test_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("in.json");
        write_text(&path, "héllo\nwörld").unwrap();

        assert_eq!(read_text(&path).unwrap(), "héllo\nwörld");
    }

    #[test]
    fn test_read_strips_byte_order_mark() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bom.json");
        fs::write(&path, "\u{feff}{}").unwrap();

        assert_eq!(read_text(&path).unwrap(), "{}");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = read_text(&temp.path().join("nope.json"));
        assert!(matches!(result, Err(NotepadError::Io(_))));
    }

    #[test]
    fn test_read_invalid_utf8_is_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(read_text(&path), Err(NotepadError::Io(_))));
    }
}
