//! HDR/LOG detection from technical stream attributes.
//!
//! Four independent signals, any one sufficient; a missing attribute is
//! a signal absence, never an error.

use crate::models::media::ColorProfile;
use crate::services::ffprobe::TechnicalMetadata;

/// Transfer-function substrings denoting log or HDR curves.
const LOG_TRANSFER_KEYWORDS: &[&str] = &["log", "pq", "smpte2084", "hlg", "arib-std-b67"];

/// Wide-gamut broadcast standard substrings.
const WIDE_GAMUT_KEYWORDS: &[&str] = &["bt2020", "rec2020"];

/// Pixel-format substrings indicating 10-bit-or-higher sample depth.
const DEEP_PIXEL_KEYWORDS: &[&str] = &["10le", "12le", "16le", "p010", "p016"];

fn matches_any(value: Option<&str>, keywords: &[&str]) -> Option<String> {
    let value = value?.to_lowercase();
    keywords
        .iter()
        .find(|k| value.contains(*k))
        .map(|_| value)
}

/// Classify a clip as HDR/LOG or SDR, recording every matching signal
/// as justification (not just the first).
pub fn detect(tech: &TechnicalMetadata) -> ColorProfile {
    let mut justification = Vec::new();

    if let Some(transfer) = matches_any(tech.color_transfer.as_deref(), LOG_TRANSFER_KEYWORDS) {
        justification.push(format!("transfer function: {}", transfer));
    }
    if let Some(space) = matches_any(tech.color_space.as_deref(), WIDE_GAMUT_KEYWORDS) {
        justification.push(format!("color space: {}", space));
    }
    if let Some(primaries) = matches_any(tech.color_primaries.as_deref(), WIDE_GAMUT_KEYWORDS) {
        justification.push(format!("color primaries: {}", primaries));
    }
    if let Some(pix) = matches_any(tech.pixel_format.as_deref(), DEEP_PIXEL_KEYWORDS) {
        justification.push(format!("high bit depth: {}", pix));
    }

    ColorProfile {
        is_hdr_log: !justification.is_empty(),
        justification,
        color_space: tech.color_space.clone(),
        color_transfer: tech.color_transfer.clone(),
        color_primaries: tech.color_primaries.clone(),
        pixel_format: tech.pixel_format.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::ProfileBucket;

    fn tech(
        transfer: Option<&str>,
        space: Option<&str>,
        primaries: Option<&str>,
        pix_fmt: Option<&str>,
    ) -> TechnicalMetadata {
        TechnicalMetadata {
            color_transfer: transfer.map(String::from),
            color_space: space.map(String::from),
            color_primaries: primaries.map(String::from),
            pixel_format: pix_fmt.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_sdr_when_no_signal() {
        let profile = detect(&tech(Some("bt709"), Some("bt709"), Some("bt709"), Some("yuv420p")));
        assert!(!profile.is_hdr_log);
        assert!(profile.justification.is_empty());
        assert_eq!(profile.bucket(), ProfileBucket::Sdr);
    }

    #[test]
    fn test_missing_attributes_are_signal_absent() {
        let profile = detect(&TechnicalMetadata::default());
        assert!(!profile.is_hdr_log);
    }

    #[test]
    fn test_each_signal_fires_alone() {
        assert!(detect(&tech(Some("arib-std-b67"), None, None, None)).is_hdr_log);
        assert!(detect(&tech(None, Some("bt2020nc"), None, None)).is_hdr_log);
        assert!(detect(&tech(None, None, Some("bt2020"), None)).is_hdr_log);
        assert!(detect(&tech(None, None, None, Some("yuv420p10le"))).is_hdr_log);
    }

    #[test]
    fn test_all_matching_signals_recorded() {
        let profile = detect(&tech(
            Some("smpte2084"),
            Some("bt2020nc"),
            Some("bt2020"),
            Some("yuv422p10le"),
        ));
        assert!(profile.is_hdr_log);
        assert_eq!(profile.justification.len(), 4);
        assert_eq!(profile.bucket(), ProfileBucket::Log);
    }

    #[test]
    fn test_dlog_transfer_detected() {
        let profile = detect(&tech(Some("d-log"), None, None, Some("yuv420p")));
        assert!(profile.is_hdr_log);
        assert_eq!(profile.justification.len(), 1);
    }
}
