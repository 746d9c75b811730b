//! Grep-friendly delimited text placeholder codec.
//!
//! Line-oriented `Key: value` fields under delimited section headers,
//! plus two starred tag lines (`*** SOURCE TAG ***`, `*** HDR TAG ***`)
//! meant for shell greps. Absent optional values simply omit the line;
//! the reader treats a missing line as a missing value.

use crate::models::record::{
    FileInfo, PlaceholderDoc, PlaceholderInfo, RawMetadata, SourceDetection, TimestampEvidence,
    TransferInfo, VideoMetadataSection, PLACEHOLDER_FORMAT_VERSION,
};
use crate::placeholder::PlaceholderCodec;
use crate::{Error, Result};
use chrono::Local;
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;

pub struct TextCodec;

fn push_line(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}: {}", key, value);
}

fn push_opt(out: &mut String, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        push_line(out, key, value);
    }
}

impl PlaceholderCodec for TextCodec {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(&self, path: &Path, doc: &PlaceholderDoc) -> Result<()> {
        let mut out = String::new();
        push_line(&mut out, "PLACEHOLDER FOR", &doc.placeholder_info.original_filename);
        push_line(&mut out, "Created", &doc.placeholder_info.created_at);
        push_line(&mut out, "Original path", &doc.placeholder_info.original_path);
        push_line(
            &mut out,
            "Original size",
            &format!(
                "{} bytes ({} MB)",
                doc.placeholder_info.original_size_bytes, doc.file_info.size_mb
            ),
        );
        push_line(
            &mut out,
            "Format version",
            &doc.placeholder_info.placeholder_format_version,
        );

        out.push_str("\n=== SOURCE INFO ===\n");
        push_line(&mut out, "Source folder", &doc.source_detection.source_type);
        let _ = writeln!(out, "*** SOURCE TAG: {} ***", doc.source_detection.source_tag);
        push_line(&mut out, "Device category", &doc.source_detection.device_category);
        push_line(&mut out, "Is drone path", &doc.source_detection.is_drone_path.to_string());
        push_line(&mut out, "Is cell path", &doc.source_detection.is_cell_path.to_string());

        out.push_str("\n=== TIME DEBUG INFO ===\n");
        push_line(&mut out, "Mtime", &doc.file_info.mtime);
        push_opt(&mut out, "Filename time", &doc.timestamps.filename_time);
        push_opt(&mut out, "Exiftool datetime", &doc.timestamps.exiftool_datetime);
        push_line(&mut out, "Exiftool status", &doc.timestamps.exiftool_status);
        if let Some(drone) = &doc.timestamps.drone {
            push_opt(&mut out, "Drone container UTC", &drone.utc_iso);
            push_line(&mut out, "Drone local time", &drone.local_iso);
            if let Some(diff) = drone.time_diff_minutes {
                push_line(&mut out, "Time diff minutes", &format!("{:.1}", diff));
            }
            push_opt(&mut out, "Drone decision", &drone.decision_info);
        }
        push_opt(&mut out, "Resolved local", &doc.timestamps.resolved_local);
        push_opt(&mut out, "Resolved provenance", &doc.timestamps.resolved_provenance);

        if let Some(video) = &doc.video_metadata {
            out.push_str("\n=== VIDEO TECHNICAL INFO ===\n");
            push_opt(&mut out, "Resolution", &video.resolution);
            push_opt(&mut out, "Frame rate", &video.frame_rate);
            push_opt(&mut out, "Codec", &video.codec);
            push_opt(&mut out, "Pixel format", &video.pixel_format);
            push_opt(&mut out, "Color space", &video.color_space);
            push_opt(&mut out, "Color transfer", &video.color_transfer);
            push_opt(&mut out, "Color primaries", &video.color_primaries);
            push_opt(&mut out, "Format name", &video.format_name);
            push_opt(&mut out, "Duration", &video.duration);
            push_opt(&mut out, "Bit rate", &video.bit_rate);
            push_line(&mut out, "Is Log/HDR", &video.is_log);
            let _ = writeln!(out, "*** HDR TAG: {} ***", video.hdr_tag);
        }

        if let Some(transfer) = &doc.transfer_info {
            out.push_str("\n=== TRANSFER INFO ===\n");
            push_line(&mut out, "Transferred on", &transfer.transferred_at);
            push_line(&mut out, "New location", &transfer.new_location);
        }

        std::fs::write(path, out)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<PlaceholderDoc> {
        let content = std::fs::read_to_string(path)?;
        parse(path, &content)
    }

    fn set_location(&self, path: &Path, new_location: &str) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        for line in &mut lines {
            if line.starts_with("Original path: ") {
                *line = format!("Original path: {}", new_location);
                break;
            }
        }

        let mut out = lines.join("\n");
        out.push_str("\n\n=== TRANSFER INFO ===\n");
        let _ = writeln!(
            out,
            "Transferred on: {}",
            Local::now().naive_local().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "New location: {}", new_location);

        std::fs::write(path, out)?;
        Ok(())
    }
}

fn field(content: &str, key: &str) -> Option<String> {
    let prefix = format!("{}: ", key);
    content
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|v| v.trim().to_string())
}

/// Last occurrence wins; the transfer phase appends rather than edits.
fn field_last(content: &str, key: &str) -> Option<String> {
    let prefix = format!("{}: ", key);
    content
        .lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .last()
        .map(|v| v.trim().to_string())
}

fn starred_tag(content: &str, key: &str) -> Option<String> {
    let prefix = format!("*** {}: ", key);
    content.lines().find_map(|line| {
        line.strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(" ***"))
            .map(|v| v.trim().to_string())
    })
}

fn parse(path: &Path, content: &str) -> Result<PlaceholderDoc> {
    let original_filename =
        field(content, "PLACEHOLDER FOR").ok_or_else(|| Error::InvalidPlaceholder {
            path: path.display().to_string(),
            reason: "missing PLACEHOLDER FOR header".to_string(),
        })?;
    let original_path =
        field(content, "Original path").ok_or_else(|| Error::InvalidPlaceholder {
            path: path.display().to_string(),
            reason: "missing Original path".to_string(),
        })?;

    let size_bytes = field(content, "Original size")
        .and_then(|s| s.split_whitespace().next().map(String::from))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);

    let extension = Path::new(&original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let mtime = field(content, "Mtime").unwrap_or_default();

    let video_metadata = starred_tag(content, "HDR TAG").map(|hdr_tag| VideoMetadataSection {
        resolution: field(content, "Resolution"),
        frame_rate: field(content, "Frame rate"),
        codec: field(content, "Codec"),
        pixel_format: field(content, "Pixel format"),
        color_space: field(content, "Color space"),
        color_transfer: field(content, "Color transfer"),
        color_primaries: field(content, "Color primaries"),
        format_name: field(content, "Format name"),
        duration: field(content, "Duration"),
        bit_rate: field(content, "Bit rate"),
        is_log: field(content, "Is Log/HDR").unwrap_or_default(),
        hdr_tag,
    });

    let transfer_info = field_last(content, "New location").map(|new_location| TransferInfo {
        transferred_at: field_last(content, "Transferred on").unwrap_or_default(),
        new_location,
    });

    Ok(PlaceholderDoc {
        placeholder_info: PlaceholderInfo {
            created_at: field(content, "Created").unwrap_or_default(),
            original_filename: original_filename.clone(),
            original_path,
            original_size_bytes: size_bytes,
            placeholder_format_version: field(content, "Format version")
                .unwrap_or_else(|| PLACEHOLDER_FORMAT_VERSION.to_string()),
        },
        file_info: FileInfo {
            name: original_filename,
            extension,
            size_bytes,
            size_mb: (size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            mtime_readable: mtime.replace('T', " "),
            mtime,
        },
        source_detection: SourceDetection {
            source_type: field(content, "Source folder").unwrap_or_default(),
            source_tag: starred_tag(content, "SOURCE TAG").unwrap_or_else(|| "UNKNOWN".to_string()),
            device_category: field(content, "Device category").unwrap_or_default(),
            is_drone_path: field(content, "Is drone path").as_deref() == Some("true"),
            is_cell_path: field(content, "Is cell path").as_deref() == Some("true"),
        },
        timestamps: TimestampEvidence {
            filename_time: field(content, "Filename time"),
            exiftool_datetime: field(content, "Exiftool datetime"),
            exiftool_status: field(content, "Exiftool status").unwrap_or_default(),
            drone: None,
            resolved_local: field(content, "Resolved local"),
            resolved_provenance: field(content, "Resolved provenance"),
        },
        video_metadata,
        raw_metadata: RawMetadata {
            ffprobe: json!({}),
            exiftool: json!({}),
        },
        transfer_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::DroneTimestamps;

    fn sample_doc() -> PlaceholderDoc {
        PlaceholderDoc {
            placeholder_info: PlaceholderInfo {
                created_at: "2025-08-21T12:00:00".to_string(),
                original_filename: "DJI_0042.MP4".to_string(),
                original_path: "/proj/Footage_raw/drone/DJI_0042.MP4".to_string(),
                original_size_bytes: 2048,
                placeholder_format_version: PLACEHOLDER_FORMAT_VERSION.to_string(),
            },
            file_info: FileInfo {
                name: "DJI_0042.MP4".to_string(),
                extension: ".mp4".to_string(),
                size_bytes: 2048,
                size_mb: 0.0,
                mtime: "2025-08-21T08:00:00".to_string(),
                mtime_readable: "2025-08-21 08:00:00".to_string(),
            },
            source_detection: SourceDetection {
                source_type: "drone".to_string(),
                source_tag: "DRONE".to_string(),
                device_category: "Aerial".to_string(),
                is_drone_path: true,
                is_cell_path: false,
            },
            timestamps: TimestampEvidence {
                filename_time: None,
                exiftool_datetime: None,
                exiftool_status: "not consulted".to_string(),
                drone: Some(DroneTimestamps {
                    utc_iso: Some("2025-08-21T12:00:00Z".to_string()),
                    local_iso: "2025-08-21T08:00:00".to_string(),
                    source_tag: "DRONE".to_string(),
                    time_diff_minutes: Some(240.0),
                    decision_info: Some("treated as UTC".to_string()),
                }),
                resolved_local: Some("2025-08-21T08:00:00".to_string()),
                resolved_provenance: Some("converted UTC".to_string()),
            },
            video_metadata: Some(VideoMetadataSection {
                resolution: Some("3840x2160".to_string()),
                frame_rate: Some("29.97 fps".to_string()),
                codec: Some("hevc".to_string()),
                pixel_format: Some("yuv420p10le".to_string()),
                color_space: None,
                color_transfer: Some("arib-std-b67".to_string()),
                color_primaries: None,
                format_name: None,
                duration: None,
                bit_rate: None,
                is_log: "YES - HDR/Log detected (transfer function: arib-std-b67)".to_string(),
                hdr_tag: "HDR/LOG".to_string(),
            }),
            raw_metadata: RawMetadata {
                ffprobe: json!({}),
                exiftool: json!({}),
            },
            transfer_info: None,
        }
    }

    #[test]
    fn test_grep_tags_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        TextCodec.write(&path, &sample_doc()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("PLACEHOLDER FOR: DJI_0042.MP4"));
        assert!(content.contains("*** SOURCE TAG: DRONE ***"));
        assert!(content.contains("*** HDR TAG: HDR/LOG ***"));
        assert!(content.contains("=== SOURCE INFO ==="));
        assert!(content.contains("=== TIME DEBUG INFO ==="));
        assert!(content.contains("=== VIDEO TECHNICAL INFO ==="));
    }

    #[test]
    fn test_read_back_key_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        TextCodec.write(&path, &sample_doc()).unwrap();

        let doc = TextCodec.read(&path).unwrap();
        assert_eq!(doc.placeholder_info.original_filename, "DJI_0042.MP4");
        assert_eq!(
            doc.placeholder_info.original_path,
            "/proj/Footage_raw/drone/DJI_0042.MP4"
        );
        assert_eq!(doc.placeholder_info.original_size_bytes, 2048);
        assert_eq!(doc.source_detection.source_tag, "DRONE");
        assert!(doc.source_detection.is_drone_path);
        assert_eq!(doc.hdr_tag(), "HDR/LOG");
        assert_eq!(doc.color_space_label(), "Log");
    }

    #[test]
    fn test_set_location_updates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        TextCodec.write(&path, &sample_doc()).unwrap();

        TextCodec
            .set_location(&path, "/proj/Footage/video/2025-08-21/DJI_0042.mp4")
            .unwrap();

        let doc = TextCodec.read(&path).unwrap();
        assert_eq!(
            doc.placeholder_info.original_path,
            "/proj/Footage/video/2025-08-21/DJI_0042.mp4"
        );
        assert_eq!(
            doc.current_location(),
            "/proj/Footage/video/2025-08-21/DJI_0042.mp4"
        );
        assert_eq!(
            doc.transfer_info.as_ref().unwrap().new_location,
            "/proj/Footage/video/2025-08-21/DJI_0042.mp4"
        );
        // Identity fields untouched by the rewrite.
        assert_eq!(doc.source_detection.source_tag, "DRONE");
        assert_eq!(doc.hdr_tag(), "HDR/LOG");
    }

    #[test]
    fn test_photo_placeholder_has_no_hdr_tag() {
        let mut doc = sample_doc();
        doc.video_metadata = None;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.txt");
        TextCodec.write(&path, &doc).unwrap();

        let read_back = TextCodec.read(&path).unwrap();
        assert!(read_back.video_metadata.is_none());
        assert_eq!(read_back.hdr_tag(), "SDR");
    }

    #[test]
    fn test_read_rejects_arbitrary_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "shopping list\nmilk\neggs\n").unwrap();
        assert!(TextCodec.read(&path).is_err());
    }
}
