//! metadata.csv generation for color-grading tooling.
//!
//! Reads every video placeholder under the sorted tree, derives the
//! (source, profile) group per clip, assigns colors over the complete
//! group set, and writes one row per clip sorted by relpath. Photos are
//! excluded; the CSV drives video grading only.

use crate::core::organizer::{FINAL_DIR, SORTED_DIR};
use crate::core::palette;
use crate::models::media::{group_key, ProfileBucket};
use crate::models::record::MetadataRecord;
use crate::placeholder;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The complete CSV content for one run, built before anything is
/// written so dry-run can show the same numbers.
#[derive(Debug)]
pub struct MetadataCsv {
    pub rows: Vec<MetadataRecord>,
    /// Group key -> assigned color, over the full group set.
    pub colors: std::collections::HashMap<String, String>,
    pub csv_path: PathBuf,
}

fn under_photo_segment(relpath: &Path) -> bool {
    relpath.components().any(|c| {
        let s = c.as_os_str().to_string_lossy().to_lowercase();
        s == "photo" || s == "photos"
    })
}

/// Scan the sorted tree and assemble rows and colors.
pub fn build(project_root: &Path) -> Result<MetadataCsv> {
    let sorted_dir = project_root.join(SORTED_DIR);
    if !sorted_dir.is_dir() {
        return Err(Error::SortedDirMissing(project_root.display().to_string()));
    }

    let mut rows = Vec::new();

    for entry in WalkDir::new(&sorted_dir).into_iter().flatten() {
        if !entry.file_type().is_file() || !placeholder::is_placeholder(entry.path()) {
            continue;
        }
        let relpath = entry
            .path()
            .strip_prefix(&sorted_dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        if under_photo_segment(&relpath) {
            continue;
        }

        let doc = match placeholder::read_any(entry.path()) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Skipping unreadable placeholder: {}", e);
                continue;
            }
        };

        let bucket = ProfileBucket::from_hdr_tag(doc.hdr_tag());
        let group_name = group_key(&doc.source_detection.source_tag, bucket);

        // The real video keeps the placeholder's name with its original
        // extension restored.
        let original_ext = Path::new(&doc.placeholder_info.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let mut video_relpath = relpath.clone();
        if !original_ext.is_empty() {
            video_relpath.set_extension(original_ext);
        }
        let filename = video_relpath
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        rows.push(MetadataRecord {
            filename,
            relpath: video_relpath.to_string_lossy().replace('\\', "/"),
            group_name,
            clip_color: String::new(),
            color_space: bucket.color_space().to_string(),
            source: doc.source_detection.source_tag,
        });
    }

    rows.sort_by(|a, b| a.relpath.cmp(&b.relpath));

    // Group set in row order (first seen after the sort) drives the
    // dynamic-pool allocation deterministically.
    let mut groups: Vec<String> = Vec::new();
    for row in &rows {
        if !groups.contains(&row.group_name) {
            groups.push(row.group_name.clone());
        }
    }
    let colors = palette::assign_colors(&groups);

    for row in &mut rows {
        if let Some(color) = colors.get(&row.group_name) {
            row.clip_color = color.clone();
        }
    }

    Ok(MetadataCsv {
        rows,
        colors,
        csv_path: project_root.join(FINAL_DIR).join("metadata.csv"),
    })
}

impl MetadataCsv {
    /// Per-group file counts, sorted by group key, for the run summary.
    pub fn group_counts(&self) -> Vec<(String, String, usize)> {
        let mut keys: Vec<&String> = self.colors.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|group| {
                let count = self.rows.iter().filter(|r| &r.group_name == group).count();
                let color = self.colors.get(group).cloned().unwrap_or_default();
                (group.clone(), color, count)
            })
            .collect()
    }

    /// Write the CSV with its header row.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.csv_path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        tracing::info!("Wrote {} row(s) to {}", self.rows.len(), self.csv_path.display());
        Ok(())
    }
}
