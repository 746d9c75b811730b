//! Durable record models: the placeholder document written per file and
//! the metadata.csv row.

use crate::models::media::{ColorProfile, MediaFile, SourceClass};
use crate::services::ffprobe::TechnicalMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder document format version.
pub const PLACEHOLDER_FORMAT_VERSION: &str = "1.0";

/// Basic facts about the original file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub created_at: String,
    pub original_filename: String,
    pub original_path: String,
    pub original_size_bytes: u64,
    pub placeholder_format_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub mtime: String,
    pub mtime_readable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDetection {
    pub source_type: String,
    pub source_tag: String,
    pub device_category: String,
    pub is_drone_path: bool,
    pub is_cell_path: bool,
}

/// Drone-specific timestamp decision trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneTimestamps {
    pub utc_iso: Option<String>,
    pub local_iso: String,
    pub source_tag: String,
    pub time_diff_minutes: Option<f64>,
    pub decision_info: Option<String>,
}

/// Every timestamp evidence value gathered for a file, not just the
/// winning one. Kept for later debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampEvidence {
    /// Time parsed from the filename, "HH:MM:SS", when present.
    pub filename_time: Option<String>,
    /// Sidecar tool result: value and status message.
    pub exiftool_datetime: Option<String>,
    pub exiftool_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone: Option<DroneTimestamps>,
    /// The resolver's final verdict for this file.
    pub resolved_local: Option<String>,
    pub resolved_provenance: Option<String>,
}

/// Transfer phase annotation written back into the placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInfo {
    pub transferred_at: String,
    pub new_location: String,
}

/// The complete placeholder document. One per organized file; the single
/// source of truth for anything after placeholder creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderDoc {
    pub placeholder_info: PlaceholderInfo,
    pub file_info: FileInfo,
    pub source_detection: SourceDetection,
    pub timestamps: TimestampEvidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<VideoMetadataSection>,
    pub raw_metadata: RawMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_info: Option<TransferInfo>,
}

/// Technical video stream attributes plus the HDR/LOG verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadataSection {
    pub resolution: Option<String>,
    pub frame_rate: Option<String>,
    pub codec: Option<String>,
    pub pixel_format: Option<String>,
    pub color_space: Option<String>,
    pub color_transfer: Option<String>,
    pub color_primaries: Option<String>,
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    pub is_log: String,
    pub hdr_tag: String,
}

impl VideoMetadataSection {
    pub fn from_parts(tech: &TechnicalMetadata, profile: &ColorProfile) -> VideoMetadataSection {
        VideoMetadataSection {
            resolution: tech.resolution.clone(),
            frame_rate: tech.frame_rate.clone(),
            codec: tech.codec.clone(),
            pixel_format: tech.pixel_format.clone(),
            color_space: tech.color_space.clone(),
            color_transfer: tech.color_transfer.clone(),
            color_primaries: tech.color_primaries.clone(),
            format_name: tech.format_name.clone(),
            duration: tech.duration.clone(),
            bit_rate: tech.bit_rate.clone(),
            is_log: profile.summary(),
            hdr_tag: profile.bucket().hdr_tag().to_string(),
        }
    }
}

/// Full tool dumps for debugging; `{"error": reason}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMetadata {
    pub ffprobe: Value,
    pub exiftool: Value,
}

impl PlaceholderDoc {
    /// Build the immutable sections from a discovered file and its
    /// classification.
    pub fn identity_sections(
        file: &MediaFile,
        source: &SourceClass,
        created_at: chrono::NaiveDateTime,
    ) -> (PlaceholderInfo, FileInfo, SourceDetection) {
        let info = PlaceholderInfo {
            created_at: created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            original_filename: file.filename.clone(),
            original_path: file.path.display().to_string(),
            original_size_bytes: file.size,
            placeholder_format_version: PLACEHOLDER_FORMAT_VERSION.to_string(),
        };
        let file_info = FileInfo {
            name: file.filename.clone(),
            extension: format!(".{}", file.extension),
            size_bytes: file.size,
            size_mb: (file.size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            mtime: file.modified.format("%Y-%m-%dT%H:%M:%S").to_string(),
            mtime_readable: file.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let detection = SourceDetection {
            source_type: source.raw_folder.clone(),
            source_tag: source.source_tag.clone(),
            device_category: source.device_category.to_string(),
            is_drone_path: source.is_drone,
            is_cell_path: source.is_cell,
        };
        (info, file_info, detection)
    }

    /// The HDR tag, defaulting to SDR when no video metadata was read.
    pub fn hdr_tag(&self) -> &str {
        self.video_metadata
            .as_ref()
            .map(|v| v.hdr_tag.as_str())
            .unwrap_or("SDR")
    }

    /// Color-space column value for metadata.csv.
    pub fn color_space_label(&self) -> &str {
        if self.hdr_tag().contains("HDR") || self.hdr_tag().contains("LOG") {
            "Log"
        } else {
            "Rec709"
        }
    }

    /// Current on-disk location of the real file: the transfer target if
    /// reconciliation ran, otherwise the original path.
    pub fn current_location(&self) -> &str {
        self.transfer_info
            .as_ref()
            .map(|t| t.new_location.as_str())
            .unwrap_or(&self.placeholder_info.original_path)
    }
}

/// One metadata.csv row. Column order is the external contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub filename: String,
    pub relpath: String,
    pub group_name: String,
    pub clip_color: String,
    pub color_space: String,
    pub source: String,
}
