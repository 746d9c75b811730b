//! Source and device-category classification from a file's location in
//! the raw footage tree.
//!
//! Pure, non-failing: every path classifies to something, "root" when
//! the file sits directly under the raw root.

use crate::models::media::{DeviceCategory, SourceClass};
use std::path::Path;

/// Folder-name prefixes that mark aerial-capture origin and trigger
/// UTC-aware timestamp handling.
pub const DRONE_PREFIXES: &[&str] = &["drone", "dji", "mini4", "mavic", "avata"];

/// Does this folder name mark a drone source?
pub fn is_drone_folder(folder: &str) -> bool {
    let lower = folder.to_lowercase();
    DRONE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// First path segment under the raw root, or "root" if the file sits
/// directly at the root (or outside it).
fn source_folder(raw_root: &Path, path: &Path) -> String {
    path.strip_prefix(raw_root)
        .ok()
        .and_then(|rel| {
            let mut components = rel.components();
            let first = components.next()?;
            // A lone file name means the file is directly at the root.
            components.next()?;
            Some(first.as_os_str().to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "root".to_string())
}

/// Ordered substring/prefix rules; first match wins, so "dronecam"
/// classifies Aerial even though it also contains "cam".
fn device_category(folder: &str) -> DeviceCategory {
    let lower = folder.to_lowercase();
    if is_drone_folder(&lower) || lower.contains("videos") {
        DeviceCategory::Aerial
    } else if lower.starts_with("cell") {
        DeviceCategory::Mobile
    } else if lower.contains("gopro") {
        DeviceCategory::ActionCamera
    } else if lower.contains("camera") || lower.contains("cam") {
        DeviceCategory::Camera
    } else {
        DeviceCategory::Other
    }
}

/// Classify a file by its first folder segment under the raw root.
pub fn classify(raw_root: &Path, path: &Path) -> SourceClass {
    let raw_folder = source_folder(raw_root, path);
    let lower = raw_folder.to_lowercase();

    SourceClass {
        source_tag: raw_folder.to_uppercase().replace('_', "-"),
        device_category: device_category(&raw_folder),
        is_drone: is_drone_folder(&lower),
        is_cell: lower.starts_with("cell"),
        raw_folder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classify_under(folder: &str) -> SourceClass {
        let root = PathBuf::from("/proj/Footage_raw");
        classify(&root, &root.join(folder).join("clip.mp4"))
    }

    #[test]
    fn test_source_tag_normalization() {
        let class = classify_under("cell_blain");
        assert_eq!(class.source_tag, "CELL-BLAIN");
        assert_eq!(class.raw_folder, "cell_blain");
        assert!(class.is_cell);
        assert!(!class.is_drone);
        assert_eq!(class.device_category, DeviceCategory::Mobile);
    }

    #[test]
    fn test_drone_allow_list() {
        for folder in ["drone", "DJI_Mini", "mini4pro", "mavic3", "avata2"] {
            assert!(classify_under(folder).is_drone, "{} should be drone", folder);
        }
        assert!(!classify_under("gopro11").is_drone);
    }

    #[test]
    fn test_category_rule_order() {
        // "dronecam" contains "cam" but the aerial rule comes first.
        assert_eq!(classify_under("dronecam").device_category, DeviceCategory::Aerial);
        assert_eq!(classify_under("gopro11").device_category, DeviceCategory::ActionCamera);
        assert_eq!(classify_under("canon_camera").device_category, DeviceCategory::Camera);
        assert_eq!(classify_under("misc").device_category, DeviceCategory::Other);
    }

    #[test]
    fn test_file_at_root_classifies_as_root() {
        let root = PathBuf::from("/proj/Footage_raw");
        let class = classify(&root, &root.join("clip.mp4"));
        assert_eq!(class.raw_folder, "root");
        assert_eq!(class.source_tag, "ROOT");
        assert!(!class.is_drone);
        assert_eq!(class.device_category, DeviceCategory::Other);
    }

    #[test]
    fn test_nested_file_uses_first_segment() {
        let root = PathBuf::from("/proj/Footage_raw");
        let class = classify(&root, &root.join("drone/flight_2024/DJI_0012.MP4"));
        assert_eq!(class.raw_folder, "drone");
        assert!(class.is_drone);
    }
}
