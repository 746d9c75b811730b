//! Integration tests for the placeholder codecs.
//!
//! Tests cover:
//! - JSON and text round trips through the shared trait
//! - Extension-based dispatch (read_any / set_location_any)
//! - Location rewrite preserving everything else

use footage_organizer::models::record::{
    FileInfo, PlaceholderDoc, PlaceholderInfo, RawMetadata, SourceDetection, TimestampEvidence,
    VideoMetadataSection, PLACEHOLDER_FORMAT_VERSION,
};
use footage_organizer::placeholder::{
    self, read_any, set_location_any, PlaceholderCodec, PlaceholderFormat,
};
use serde_json::json;
use tempfile::TempDir;

fn sample_doc(original_path: &str) -> PlaceholderDoc {
    PlaceholderDoc {
        placeholder_info: PlaceholderInfo {
            created_at: "2025-08-21T12:00:00".to_string(),
            original_filename: "IMG_20250821_051728.mp4".to_string(),
            original_path: original_path.to_string(),
            original_size_bytes: 1024,
            placeholder_format_version: PLACEHOLDER_FORMAT_VERSION.to_string(),
        },
        file_info: FileInfo {
            name: "IMG_20250821_051728.mp4".to_string(),
            extension: ".mp4".to_string(),
            size_bytes: 1024,
            size_mb: 0.0,
            mtime: "2025-08-21T05:17:28".to_string(),
            mtime_readable: "2025-08-21 05:17:28".to_string(),
        },
        source_detection: SourceDetection {
            source_type: "cell_blain".to_string(),
            source_tag: "CELL-BLAIN".to_string(),
            device_category: "Mobile".to_string(),
            is_drone_path: false,
            is_cell_path: true,
        },
        timestamps: TimestampEvidence {
            filename_time: Some("05:17:28".to_string()),
            exiftool_datetime: None,
            exiftool_status: "not consulted".to_string(),
            drone: None,
            resolved_local: Some("2025-08-21T05:17:28".to_string()),
            resolved_provenance: Some("filename pattern".to_string()),
        },
        video_metadata: Some(VideoMetadataSection {
            resolution: Some("1920x1080".to_string()),
            frame_rate: Some("30.00 fps".to_string()),
            codec: Some("h264".to_string()),
            pixel_format: Some("yuv420p".to_string()),
            color_space: Some("bt709".to_string()),
            color_transfer: Some("bt709".to_string()),
            color_primaries: Some("bt709".to_string()),
            format_name: None,
            duration: None,
            bit_rate: None,
            is_log: "No (Standard SDR)".to_string(),
            hdr_tag: "SDR".to_string(),
        }),
        raw_metadata: RawMetadata {
            ffprobe: json!({}),
            exiftool: json!({}),
        },
        transfer_info: None,
    }
}

#[test]
fn test_json_round_trip_through_trait() {
    let temp_dir = TempDir::new().unwrap();
    let codec = PlaceholderFormat::Json.codec();
    let path = temp_dir
        .path()
        .join("clip")
        .with_extension(codec.extension());

    codec.write(&path, &sample_doc("/proj/raw/clip.mp4")).unwrap();
    let doc = codec.read(&path).unwrap();

    assert_eq!(doc.placeholder_info.original_filename, "IMG_20250821_051728.mp4");
    assert_eq!(doc.source_detection.source_tag, "CELL-BLAIN");
    assert_eq!(doc.timestamps.resolved_provenance.as_deref(), Some("filename pattern"));
    assert_eq!(doc.hdr_tag(), "SDR");
    assert_eq!(doc.color_space_label(), "Rec709");
}

#[test]
fn test_text_round_trip_through_trait() {
    let temp_dir = TempDir::new().unwrap();
    let codec = PlaceholderFormat::Text.codec();
    let path = temp_dir
        .path()
        .join("clip")
        .with_extension(codec.extension());

    codec.write(&path, &sample_doc("/proj/raw/clip.mp4")).unwrap();
    let doc = codec.read(&path).unwrap();

    assert_eq!(doc.placeholder_info.original_filename, "IMG_20250821_051728.mp4");
    assert_eq!(doc.source_detection.source_tag, "CELL-BLAIN");
    assert_eq!(doc.hdr_tag(), "SDR");
}

#[test]
fn test_read_any_dispatches_on_extension() {
    let temp_dir = TempDir::new().unwrap();
    let doc = sample_doc("/proj/raw/clip.mp4");

    let json_path = temp_dir.path().join("clip.json");
    let text_path = temp_dir.path().join("clip.txt");
    PlaceholderFormat::Json.codec().write(&json_path, &doc).unwrap();
    PlaceholderFormat::Text.codec().write(&text_path, &doc).unwrap();

    let from_json = read_any(&json_path).unwrap();
    let from_text = read_any(&text_path).unwrap();

    assert_eq!(
        from_json.placeholder_info.original_path,
        from_text.placeholder_info.original_path
    );
    assert_eq!(
        from_json.source_detection.source_tag,
        from_text.source_detection.source_tag
    );
}

#[test]
fn test_read_any_rejects_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clip.xml");
    std::fs::write(&path, "<clip/>").unwrap();

    assert!(read_any(&path).is_err());
    assert!(!placeholder::is_placeholder(&path));
}

#[test]
fn test_set_location_any_both_codecs() {
    let temp_dir = TempDir::new().unwrap();
    let doc = sample_doc("/proj/raw/clip.mp4");
    let new_location = "/proj/Footage/video/2025-08-21/clip.mp4";

    for format in [PlaceholderFormat::Json, PlaceholderFormat::Text] {
        let codec = format.codec();
        let path = temp_dir
            .path()
            .join("clip")
            .with_extension(codec.extension());
        codec.write(&path, &doc).unwrap();

        set_location_any(&path, new_location).unwrap();

        let updated = read_any(&path).unwrap();
        assert_eq!(updated.current_location(), new_location);
        assert_eq!(
            updated.transfer_info.as_ref().map(|t| t.new_location.as_str()),
            Some(new_location)
        );
        // Everything outside the location fields is preserved.
        assert_eq!(updated.source_detection.source_tag, "CELL-BLAIN");
        assert_eq!(updated.hdr_tag(), "SDR");
    }
}

#[test]
fn test_format_parsing() {
    assert_eq!("json".parse::<PlaceholderFormat>().unwrap(), PlaceholderFormat::Json);
    assert_eq!("text".parse::<PlaceholderFormat>().unwrap(), PlaceholderFormat::Text);
    assert_eq!("TXT".parse::<PlaceholderFormat>().unwrap(), PlaceholderFormat::Text);
    assert!("yaml".parse::<PlaceholderFormat>().is_err());
}
