//! Discovery of media files under the raw footage root.
//!
//! Walks the tree with `walkdir`, classifies files by extension, and
//! prefers `_stabilized` versions: when a clip and its stabilized
//! sibling both exist, only the stabilized one is listed.

use crate::models::media::{MediaFile, MediaType};
use crate::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which media types a run processes. Videos by default; photos opt in.
#[derive(Debug, Clone, Copy)]
pub struct MediaFilter {
    pub videos: bool,
    pub photos: bool,
}

impl Default for MediaFilter {
    fn default() -> Self {
        MediaFilter {
            videos: true,
            photos: false,
        }
    }
}

impl MediaFilter {
    pub fn accepts(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Video => self.videos,
            MediaType::Photo => self.photos,
        }
    }
}

/// Strip a trailing `_stabilized` (or ` stabilized`) marker from a stem,
/// case-insensitively. Returns the base stem and whether the marker was
/// present.
pub fn split_stabilized(stem: &str) -> (&str, bool) {
    let lower = stem.to_lowercase();
    if lower.ends_with("_stabilized") || lower.ends_with(" stabilized") {
        (&stem[..stem.len() - 11], true)
    } else {
        (stem, false)
    }
}

/// The same-directory, same-extension sibling a stabilized file was
/// derived from, when it exists. Single hop only: the sibling is used
/// as found, never re-resolved for its own marker.
pub fn stabilized_original(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let (base, is_stabilized) = split_stabilized(stem);
    if !is_stabilized {
        return None;
    }
    let ext = path.extension()?.to_str()?;
    let original = path.with_file_name(format!("{}.{}", base, ext));
    original.exists().then_some(original)
}

fn mtime_naive(metadata: &std::fs::Metadata) -> Result<NaiveDateTime> {
    let modified = metadata.modified()?;
    let local: DateTime<Local> = modified.into();
    Ok(local.naive_local())
}

fn to_media_file(path: &Path) -> Result<Option<(MediaFile, bool)>> {
    let filename = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => return Ok(None),
    };
    if filename.starts_with('.') {
        return Ok(None);
    }

    let extension = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return Ok(None),
    };
    let media_type = match MediaType::from_extension(&extension) {
        Some(t) => t,
        None => return Ok(None),
    };

    let metadata = std::fs::metadata(path)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let (_, is_stabilized) = split_stabilized(stem);

    Ok(Some((
        MediaFile {
            path: path.to_path_buf(),
            filename,
            size: metadata.len(),
            modified: mtime_naive(&metadata)?,
            extension,
            media_type,
        },
        is_stabilized,
    )))
}

/// Scan the raw footage root for media files matching the filter.
///
/// Files whose stabilized sibling exists in the same directory are
/// skipped; the stabilized version stands in for them. Results come
/// back in path order for deterministic runs.
pub fn scan(raw_root: &Path, filter: MediaFilter) -> Result<Vec<MediaFile>> {
    crate::utils::fs::ensure_directory(raw_root)?;

    // (parent, base stem, extension) -> preferred file per version group
    #[derive(Default)]
    struct Versions {
        original: Option<MediaFile>,
        stabilized: Option<MediaFile>,
    }
    let mut groups: HashMap<(PathBuf, String, String), Versions> = HashMap::new();

    for entry in WalkDir::new(raw_root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let (file, is_stabilized) = match to_media_file(entry.path())? {
            Some(pair) => pair,
            None => continue,
        };
        if !filter.accepts(file.media_type) {
            continue;
        }

        let stem = entry
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let (base, _) = split_stabilized(stem);
        let key = (
            entry.path().parent().map(Path::to_path_buf).unwrap_or_default(),
            base.to_lowercase(),
            file.extension.clone(),
        );

        let versions = groups.entry(key).or_default();
        if is_stabilized {
            versions.stabilized = Some(file);
        } else {
            versions.original = Some(file);
        }
    }

    let mut files = Vec::new();
    let mut skipped = 0usize;
    for versions in groups.into_values() {
        match (versions.stabilized, versions.original) {
            (Some(stabilized), original) => {
                if let Some(original) = original {
                    tracing::debug!(
                        "Skipping original (stabilized version exists): {}",
                        original.filename
                    );
                    skipped += 1;
                }
                files.push(stabilized);
            }
            (None, Some(original)) => files.push(original),
            (None, None) => {}
        }
    }

    if skipped > 0 {
        tracing::info!("Skipped {} original file(s) with stabilized versions", skipped);
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stabilized() {
        assert_eq!(split_stabilized("DJI_0012_stabilized"), ("DJI_0012", true));
        assert_eq!(split_stabilized("DJI_0012_Stabilized"), ("DJI_0012", true));
        assert_eq!(split_stabilized("DJI_0012 stabilized"), ("DJI_0012", true));
        assert_eq!(split_stabilized("DJI_0012"), ("DJI_0012", false));
        assert_eq!(split_stabilized("stabilizer_test"), ("stabilizer_test", false));
    }

    #[test]
    fn test_media_filter_defaults_to_videos() {
        let filter = MediaFilter::default();
        assert!(filter.accepts(MediaType::Video));
        assert!(!filter.accepts(MediaType::Photo));
    }
}
