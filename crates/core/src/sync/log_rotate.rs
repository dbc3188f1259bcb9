//! Size-triggered rotation of the synchronizer log file.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

/// Compress and archive the log file if it has grown past `max_size` bytes.
///
/// The archive lands next to the original as `<stem>_<timestamp>.log.gz`
/// and the original is removed. Returns the archive path when rotation
/// happened, `None` when the file is absent or still small enough.
pub fn rotate_log(path: &Path, max_size: u64) -> io::Result<Option<PathBuf>> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    if metadata.len() <= max_size {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sync");
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let archive_path = path.with_file_name(format!("{}_{}.log.gz", stem, timestamp));

    let mut input = File::open(path)?;
    let output = File::create(&archive_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    let compressed = io::copy(&mut input, &mut encoder).and_then(|_| encoder.finish().map(drop));
    if let Err(e) = compressed {
        // A truncated archive must not survive a failed compression.
        let _ = std::fs::remove_file(&archive_path);
        return Err(e);
    }

    std::fs::remove_file(path)?;
    info!(archive = %archive_path.display(), "Log file rotated and compressed");

    Ok(Some(archive_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let result = rotate_log(&dir.path().join("sync.log"), 100).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_small_file_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.log");
        std::fs::write(&path, b"short").unwrap();

        let result = rotate_log(&path, 100).unwrap();
        assert!(result.is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_failed_compression_removes_partial_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.log");
        // A directory passes the size check but cannot be read as a file,
        // so compression starts and then fails.
        std::fs::create_dir(&path).unwrap();

        let result = rotate_log(&path, 0);

        assert!(result.is_err());
        assert!(path.exists());
        // No stray .log.gz left next to the original
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_oversized_file_rotated_and_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.log");
        let content = "line of log output\n".repeat(100);
        std::fs::write(&path, &content).unwrap();

        let archive = rotate_log(&path, 100).unwrap().expect("should rotate");

        assert!(!path.exists());
        assert!(archive.exists());
        assert!(archive.file_name().unwrap().to_str().unwrap().starts_with("sync_"));
        assert!(archive.extension().unwrap() == "gz");

        // Round-trip the archive to verify the content survived.
        let mut decoder = flate2::read::GzDecoder::new(File::open(&archive).unwrap());
        let mut restored = String::new();
        decoder.read_to_string(&mut restored).unwrap();
        assert_eq!(restored, content);
    }
}
