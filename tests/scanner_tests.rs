//! Integration tests for the scanner module.
//!
//! Tests cover:
//! - Directory scanning with video and photo files
//! - Stabilized version preference
//! - Error handling for non-existent paths

use footage_organizer::core::scanner::{scan, MediaFilter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_scan_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    assert_eq!(files.len(), 0);
}

#[test]
fn test_scan_finds_videos_by_default() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clip.mp4"), "fake video").unwrap();
    fs::write(temp_dir.path().join("photo.jpg"), "fake photo").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not media").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "clip.mp4");
}

#[test]
fn test_scan_with_photos_enabled() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clip.mp4"), "fake video").unwrap();
    fs::write(temp_dir.path().join("photo.jpg"), "fake photo").unwrap();

    let filter = MediaFilter {
        videos: true,
        photos: true,
    };
    let files = scan(temp_dir.path(), filter).unwrap();

    assert_eq!(files.len(), 2);
}

#[test]
fn test_scan_photos_only() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clip.mp4"), "fake video").unwrap();
    fs::write(temp_dir.path().join("photo.jpg"), "fake photo").unwrap();

    let filter = MediaFilter {
        videos: false,
        photos: true,
    };
    let files = scan(temp_dir.path(), filter).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "photo.jpg");
}

#[test]
fn test_scan_prefers_stabilized_version() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("DJI_0012.mp4"), "original").unwrap();
    fs::write(temp_dir.path().join("DJI_0012_stabilized.mp4"), "stabilized").unwrap();
    fs::write(temp_dir.path().join("DJI_0013.mp4"), "lone original").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["DJI_0012_stabilized.mp4", "DJI_0013.mp4"]);
}

#[test]
fn test_scan_stabilized_without_original() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clip_stabilized.mp4"), "stabilized").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "clip_stabilized.mp4");
}

#[test]
fn test_scan_stabilized_in_different_directory_not_grouped() {
    let temp_dir = TempDir::new().unwrap();
    let sub = temp_dir.path().join("renders");
    fs::create_dir(&sub).unwrap();
    fs::write(temp_dir.path().join("clip.mp4"), "original").unwrap();
    fs::write(sub.join("clip_stabilized.mp4"), "stabilized elsewhere").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    // Versions only pair up inside the same directory.
    assert_eq!(files.len(), 2);
}

#[test]
fn test_scan_skips_hidden_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".hidden.mp4"), "hidden").unwrap();
    fs::write(temp_dir.path().join("visible.mp4"), "visible").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "visible.mp4");
}

#[test]
fn test_scan_nested_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("drone").join("flight_01");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("DJI_0042.mp4"), "fake").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "DJI_0042.mp4");
}

#[test]
fn test_scan_nonexistent_path() {
    let result = scan(Path::new("/nonexistent/path"), MediaFilter::default());
    assert!(result.is_err());
}

#[test]
fn test_scan_rejects_file_as_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("clip.mp4");
    fs::write(&file, b"x").unwrap();
    assert!(scan(&file, MediaFilter::default()).is_err());
}

#[test]
fn test_scan_results_are_sorted() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b.mp4"), "fake").unwrap();
    fs::write(temp_dir.path().join("a.mp4"), "fake").unwrap();
    fs::write(temp_dir.path().join("c.mov"), "fake").unwrap();

    let files = scan(temp_dir.path(), MediaFilter::default()).unwrap();

    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mov"]);
}
