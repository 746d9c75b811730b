//! Media-related data models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default video extensions (case-insensitive, without dot).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "mts", "m2ts", "wmv", "3gp", "mpg", "mpeg", "insv", "360",
    "mod", "tod",
];

/// Default photo extensions (case-insensitive, without dot).
pub const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "tif", "raw", "cr2", "cr3", "nef", "arw", "dng", "heic", "heif",
];

/// Media type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Photo,
}

impl MediaType {
    /// Classify an extension (any case, no dot) into a media type.
    /// Pure function of extension set membership.
    pub fn from_extension(ext: &str) -> Option<MediaType> {
        let ext = ext.to_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaType::Video)
        } else if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaType::Photo)
        } else {
            None
        }
    }

    /// Name of the type-specific output bucket root ("video" / "photo").
    pub fn bucket_root(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Photo => "photo",
        }
    }

    /// Placeholder stem used when filename cleaning empties a stem.
    pub fn generic_stem(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Photo => "photo",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Video => write!(f, "video"),
            MediaType::Photo => write!(f, "photo"),
        }
    }
}

/// A media file discovered under the raw footage root.
///
/// Immutable once discovered; the only entity that physically exists at
/// resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without path.
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
    /// Last modified time, as the local wall clock saw it.
    pub modified: NaiveDateTime,
    /// Lowercase extension without dot.
    pub extension: String,
    /// Video or photo, by extension membership.
    pub media_type: MediaType,
}

/// Device category inferred from the source folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceCategory {
    Aerial,
    Mobile,
    ActionCamera,
    Camera,
    Other,
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceCategory::Aerial => write!(f, "Aerial"),
            DeviceCategory::Mobile => write!(f, "Mobile"),
            DeviceCategory::ActionCamera => write!(f, "Action Camera"),
            DeviceCategory::Camera => write!(f, "Photo/Video Camera"),
            DeviceCategory::Other => write!(f, "Other"),
        }
    }
}

/// Source classification computed from a file's location in the raw tree.
///
/// Pure function of path; no persisted identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceClass {
    /// Canonical uppercase tag, underscores replaced with hyphens
    /// (e.g. "CELL-BLAIN").
    pub source_tag: String,
    /// Raw first path segment under the footage root, as found on disk.
    pub raw_folder: String,
    /// Device category from folder-name rules.
    pub device_category: DeviceCategory,
    /// Folder matches the drone allow-list (triggers UTC-aware handling).
    pub is_drone: bool,
    /// Folder name starts with "cell".
    pub is_cell: bool,
}

/// Provenance of a resolved timestamp, tracking which evidence source won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeProvenance {
    /// Container metadata time matched mtime closely; mtime used verbatim.
    MtimeMetadataLocal,
    /// Container metadata interpreted as true UTC and converted.
    ConvertedUtc { field: String },
    /// Date/time parsed from the filename itself.
    FilenamePattern,
    /// Sidecar tool's primary capture-time field.
    SidecarPrimary,
    /// One of the sidecar tool's documented fallback fields.
    SidecarFallback { field: String },
    /// Filesystem modification time, last resort.
    FilesystemMtime,
}

impl std::fmt::Display for TimeProvenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeProvenance::MtimeMetadataLocal => {
                write!(f, "mtime (metadata appears to be local time)")
            }
            TimeProvenance::ConvertedUtc { field } => write!(f, "converted UTC from {}", field),
            TimeProvenance::FilenamePattern => write!(f, "filename pattern"),
            TimeProvenance::SidecarPrimary => write!(f, "exiftool QuickTime:DateTimeOriginal"),
            TimeProvenance::SidecarFallback { field } => write!(f, "exiftool {} (fallback)", field),
            TimeProvenance::FilesystemMtime => write!(f, "filesystem mtime"),
        }
    }
}

/// The resolver's authoritative output for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTimestamp {
    /// Local civil date+time after all corrections and adjustments.
    pub local: NaiveDateTime,
    /// UTC reference, when one could be established.
    pub utc_reference: Option<DateTime<Utc>>,
    /// Which evidence source won.
    pub provenance: TimeProvenance,
    /// For drone files: |metadata - mtime| in minutes, the heuristic input.
    pub time_diff_minutes: Option<f64>,
}

impl ResolvedTimestamp {
    /// Date bucket name, "YYYY-MM-DD".
    pub fn date_string(&self) -> String {
        self.local.format("%Y-%m-%d").to_string()
    }

    /// Canonical time prefix, "HHhMMmSSs".
    pub fn time_string(&self) -> String {
        self.local.format("%Hh%Mm%Ss").to_string()
    }
}

/// Outcome of timestamp resolution: one authoritative value, or a
/// well-defined "unresolved" routed to the invalid-date bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TimestampResolution {
    Resolved(ResolvedTimestamp),
    Unresolved,
}

impl TimestampResolution {
    pub fn as_resolved(&self) -> Option<&ResolvedTimestamp> {
        match self {
            TimestampResolution::Resolved(ts) => Some(ts),
            TimestampResolution::Unresolved => None,
        }
    }
}

/// SDR/LOG bucket suffix used in group keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileBucket {
    Log,
    Sdr,
}

impl ProfileBucket {
    /// Group-key suffix ("LOG" / "709").
    pub fn suffix(&self) -> &'static str {
        match self {
            ProfileBucket::Log => "LOG",
            ProfileBucket::Sdr => "709",
        }
    }

    /// Color-space column value for metadata.csv.
    pub fn color_space(&self) -> &'static str {
        match self {
            ProfileBucket::Log => "Log",
            ProfileBucket::Sdr => "Rec709",
        }
    }

    /// Grep-friendly HDR tag written into placeholders.
    pub fn hdr_tag(&self) -> &'static str {
        match self {
            ProfileBucket::Log => "HDR/LOG",
            ProfileBucket::Sdr => "SDR",
        }
    }

    pub fn from_hdr_tag(tag: &str) -> ProfileBucket {
        if tag.contains("HDR") || tag.contains("LOG") {
            ProfileBucket::Log
        } else {
            ProfileBucket::Sdr
        }
    }
}

/// Color/encoding classification of a clip, derived once from technical
/// stream metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Any HDR/LOG signal fired.
    pub is_hdr_log: bool,
    /// Human-readable justification, one entry per matching signal.
    pub justification: Vec<String>,
    pub color_space: Option<String>,
    pub color_transfer: Option<String>,
    pub color_primaries: Option<String>,
    pub pixel_format: Option<String>,
}

impl ColorProfile {
    pub fn bucket(&self) -> ProfileBucket {
        if self.is_hdr_log {
            ProfileBucket::Log
        } else {
            ProfileBucket::Sdr
        }
    }

    /// Display string matching the placeholder "Is Log/HDR" line.
    pub fn summary(&self) -> String {
        if self.is_hdr_log {
            format!("YES - HDR/Log detected ({})", self.justification.join(", "))
        } else {
            "No (Standard SDR)".to_string()
        }
    }
}

/// Render the unit of color assignment, "{SOURCE}_{LOG|709}".
pub fn group_key(source_tag: &str, bucket: ProfileBucket) -> String {
    format!("{}_{}", source_tag, bucket.suffix())
}

/// Split a group key back into (source, bucket suffix). The source is
/// everything before the final underscore.
pub fn split_group_key(key: &str) -> (&str, &str) {
    match key.rsplit_once('_') {
        Some((source, suffix)) => (source, suffix),
        None => (key, ""),
    }
}
