//! File system utilities.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// First free variant of a destination path: the path itself, or the
/// stem suffixed `_001`, `_002`, ... Deterministic; never overwrites.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = path.with_file_name(format!("{}_{:03}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copy a file and verify the destination size matches the source.
/// On mismatch the partial destination is deleted and an error returned;
/// the source is never touched.
pub fn copy_with_verification(src: &Path, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let copied = std::fs::copy(src, dest)?;

    let src_size = std::fs::metadata(src)?.len();
    let dest_size = std::fs::metadata(dest)?.len();
    if src_size != dest_size {
        let _ = std::fs::remove_file(dest);
        return Err(Error::IntegrityMismatch {
            src: src.display().to_string(),
            dest: dest.display().to_string(),
            src_size,
            dest_size,
        });
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_directory_accepts_dir_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_directory(dir.path()).is_ok());

        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(ensure_directory(&file), Err(Error::NotADirectory(_))));
        assert!(matches!(
            ensure_directory(&dir.path().join("absent")),
            Err(Error::PathNotFound(_))
        ));
    }

    #[test]
    fn test_unique_path_free_destination_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");
        assert_eq!(unique_path(&target), target);
    }

    #[test]
    fn test_unique_path_suffixes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.mp4");
        std::fs::write(&target, b"a").unwrap();
        assert_eq!(unique_path(&target), dir.path().join("clip_001.mp4"));

        std::fs::write(dir.path().join("clip_001.mp4"), b"b").unwrap();
        assert_eq!(unique_path(&target), dir.path().join("clip_002.mp4"));
    }

    #[test]
    fn test_copy_with_verification_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.mp4");
        let dest = dir.path().join("nested/dest.mp4");
        std::fs::write(&src, b"payload").unwrap();

        let copied = copy_with_verification(&src, &dest).unwrap();
        assert_eq!(copied, 7);
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert!(src.exists());
    }
}
