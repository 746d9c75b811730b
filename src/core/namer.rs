//! Naming and layout planning: canonical filenames under a
//! date-bucketed, type-bucketed output tree.

use crate::models::config::OrganizeConfig;
use crate::models::media::{MediaFile, SourceClass, TimestampResolution};
use chrono::Datelike;
use std::path::PathBuf;

/// Sentinel bucket for files whose capture date could not be resolved.
pub const INVALID_DATE_BUCKET: &str = "date_non_valide";

/// Where one file lands in the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedName {
    /// Bucket path relative to the output root, e.g. "video/2025-08-21".
    pub bucket: PathBuf,
    /// Target filename within the bucket (pre collision-suffixing).
    pub filename: String,
    /// A real capture date backs this placement.
    pub dated: bool,
    /// The mtime-rescue policy for brand-tagged files fired.
    pub kept_via_mtime: bool,
}

/// Strip temporal runs from a filename stem: 8-digit dates, dashed
/// dates, standalone 6-digit runs, and H:M:S-shaped runs; then collapse
/// the separators left behind. A `_stabilized` marker survives cleaning
/// and is re-appended at the end.
pub fn clean_stem(stem: &str, generic: &str) -> String {
    let (base, stabilized) = crate::core::scanner::split_stabilized(stem);

    let mut cleaned = base.to_string();
    for pattern in [
        r"\d{4}-\d{2}-\d{2}",
        r"\d{8}",
        r"\d{1,2}[:_-]\d{2}[:_-]\d{2}",
        r"\d{6}",
    ] {
        if let Ok(re) = regex::Regex::new(pattern) {
            cleaned = re.replace_all(&cleaned, "").to_string();
        }
    }
    if let Ok(re) = regex::Regex::new(r"[_\-]{2,}") {
        cleaned = re.replace_all(&cleaned, "_").to_string();
    }
    let mut cleaned = cleaned
        .trim_matches(&['_', '-', ' ', '.'][..])
        .to_string();

    if cleaned.is_empty() {
        cleaned = generic.to_string();
    }
    if stabilized {
        cleaned.push_str("_stabilized");
    }
    cleaned
}

/// Plan the destination for one file from its resolved timestamp.
///
/// Resolved files get `{type}/{YYYY-MM-DD}/{HHhMMmSSs}_{source}_{stem}{ext}`.
/// Unresolved files land in the invalid-date bucket under their original
/// name prefixed with the source folder, with one policy exception: a
/// filename carrying a known drone brand token ("dji") plus a sane
/// mtime is placed by that mtime instead of being discarded. The rescue
/// is deliberately narrow, one brand token, nothing inferred.
pub fn plan(
    file: &MediaFile,
    source: &SourceClass,
    resolution: &TimestampResolution,
    config: &OrganizeConfig,
) -> PlannedName {
    let type_root = file.media_type.bucket_root();
    let stem = file
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file.filename);
    let ext = if file.extension.is_empty() {
        String::new()
    } else {
        format!(".{}", file.extension)
    };

    if let Some(resolved) = resolution.as_resolved() {
        let cleaned = clean_stem(stem, file.media_type.generic_stem());
        return PlannedName {
            bucket: PathBuf::from(type_root).join(resolved.date_string()),
            filename: format!(
                "{}_{}_{}{}",
                resolved.time_string(),
                source.raw_folder,
                cleaned,
                ext
            ),
            dated: true,
            kept_via_mtime: false,
        };
    }

    // Mtime rescue for brand-tagged files.
    let mtime = config
        .adjustments
        .adjust(file.modified, &source.source_tag);
    if file.filename.to_lowercase().contains("dji")
        && config.date_year_range.contains(&mtime.year())
    {
        tracing::info!(
            "Using mtime for {} (brand token in name, no metadata found)",
            file.filename
        );
        let cleaned = clean_stem(stem, file.media_type.generic_stem());
        return PlannedName {
            bucket: PathBuf::from(type_root).join(mtime.format("%Y-%m-%d").to_string()),
            filename: format!(
                "{}_{}_{}{}",
                mtime.format("%Hh%Mm%Ss"),
                source.raw_folder,
                cleaned,
                ext
            ),
            dated: true,
            kept_via_mtime: true,
        };
    }

    tracing::warn!("No usable date for {} - placed in {}", file.filename, INVALID_DATE_BUCKET);
    PlannedName {
        bucket: PathBuf::from(type_root).join(INVALID_DATE_BUCKET),
        filename: format!("{}_{}", source.raw_folder, file.filename),
        dated: false,
        kept_via_mtime: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{
        MediaType, ResolvedTimestamp, SourceClass, TimeProvenance,
    };
    use crate::models::media::DeviceCategory;
    use chrono::NaiveDate;
    use std::path::Path;

    fn media_file(name: &str) -> MediaFile {
        let path = Path::new("/proj/Footage_raw/cell_blain").join(name);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        MediaFile {
            filename: name.to_string(),
            size: 1024,
            modified: NaiveDate::from_ymd_opt(2025, 8, 21)
                .unwrap()
                .and_hms_opt(5, 17, 28)
                .unwrap(),
            media_type: MediaType::from_extension(&extension).unwrap_or(MediaType::Video),
            extension,
            path,
        }
    }

    fn cell_source() -> SourceClass {
        SourceClass {
            source_tag: "CELL-BLAIN".to_string(),
            raw_folder: "cell_blain".to_string(),
            device_category: DeviceCategory::Mobile,
            is_drone: false,
            is_cell: true,
        }
    }

    fn resolved_at(h: u32, m: u32, s: u32) -> TimestampResolution {
        TimestampResolution::Resolved(ResolvedTimestamp {
            local: NaiveDate::from_ymd_opt(2025, 8, 21)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
            utc_reference: None,
            provenance: TimeProvenance::FilenamePattern,
            time_diff_minutes: None,
        })
    }

    #[test]
    fn test_clean_stem_strips_temporal_runs() {
        assert_eq!(clean_stem("20250821_051728_IMG", "video"), "IMG");
        assert_eq!(clean_stem("shot 2023-11-05 sunset", "video"), "shot  sunset");
        assert_eq!(clean_stem("clip_12:34:56_take2", "video"), "clip_take2");
        assert_eq!(clean_stem("20250821_051728", "video"), "video");
    }

    #[test]
    fn test_clean_stem_preserves_stabilized() {
        assert_eq!(
            clean_stem("DJI_0042_20250821_stabilized", "video"),
            "DJI_0042_stabilized"
        );
        assert_eq!(clean_stem("20250821_051728_stabilized", "video"), "video_stabilized");
    }

    #[test]
    fn test_plan_resolved_canonical_name() {
        let plan = plan(
            &media_file("20250821_051728_IMG.mp4"),
            &cell_source(),
            &resolved_at(5, 17, 28),
            &OrganizeConfig::default(),
        );
        assert_eq!(plan.bucket, PathBuf::from("video/2025-08-21"));
        assert_eq!(plan.filename, "05h17m28s_cell_blain_IMG.mp4");
        assert!(plan.dated);
    }

    #[test]
    fn test_plan_unresolved_goes_to_invalid_bucket() {
        let plan = plan(
            &media_file("clip.mp4"),
            &cell_source(),
            &TimestampResolution::Unresolved,
            &OrganizeConfig::default(),
        );
        assert_eq!(plan.bucket, PathBuf::from("video/date_non_valide"));
        assert_eq!(plan.filename, "cell_blain_clip.mp4");
        assert!(!plan.dated);
    }

    #[test]
    fn test_plan_dji_rescue_uses_mtime() {
        let plan = plan(
            &media_file("DJI_0042.MP4"),
            &cell_source(),
            &TimestampResolution::Unresolved,
            &OrganizeConfig::default(),
        );
        assert_eq!(plan.bucket, PathBuf::from("video/2025-08-21"));
        assert_eq!(plan.filename, "05h17m28s_cell_blain_DJI_0042.mp4");
        assert!(plan.kept_via_mtime);
    }
}
