//! The timestamp resolver: a layered fallback chain over unreliable
//! evidence sources, with a drone-specific trust asymmetry.
//!
//! Drone containers are consulted before the filename (drone filenames
//! are sequence numbers); the container value is then either taken as
//! mislabeled local time or converted from true UTC, depending on its
//! proximity to the file's own mtime. A drone time recovered from the
//! sidecar tool instead goes through the same comparison. Non-drone
//! files trust the filename first, then the sidecar tool, then mtime.
//!
//! Every parse failure at any step demotes to "this step yielded
//! nothing" and the chain continues. The only terminal outcome is
//! `Unresolved`, routed by the namer to the invalid-date bucket.

use crate::core::scanner::stabilized_original;
use crate::models::config::OrganizeConfig;
use crate::models::media::{
    MediaFile, ResolvedTimestamp, SourceClass, TimeProvenance, TimestampResolution,
};
use crate::services::exiftool::{self, SidecarOutcome, PRIMARY_FIELD};
use crate::services::ffprobe::{self, ContainerTimeOutcome};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Drone container decision trail, kept for the placeholder's debug
/// section.
#[derive(Debug, Clone)]
pub struct DroneDecision {
    pub container_iso: Option<String>,
    pub utc_reference: Option<DateTime<Utc>>,
    pub time_diff_minutes: Option<f64>,
    pub decision: String,
}

/// Everything the resolver observed for one file, not just the winner.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub resolution: TimestampResolution,
    /// Path the evidence was actually read from (the sibling original
    /// for stabilized files, the file itself otherwise).
    pub effective_path: PathBuf,
    /// Time parsed from the filename, "HH:MM:SS", when one was present.
    pub filename_time: Option<String>,
    /// Sidecar tool outcome, when it was consulted.
    pub sidecar: Option<SidecarOutcome>,
    /// Drone container decision trail, when the drone branch ran.
    pub drone: Option<DroneDecision>,
}

/// A date/time parsed out of a filename.
struct FilenameHit {
    datetime: NaiveDateTime,
    has_time: bool,
}

fn parse_ymd(year: i32, month: u32, day: u32, config: &OrganizeConfig) -> Option<NaiveDate> {
    if !config.date_year_range.contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_compact(digits: &str, config: &OrganizeConfig) -> Option<NaiveDate> {
    let year = digits.get(0..4)?.parse().ok()?;
    let month = digits.get(4..6)?.parse().ok()?;
    let day = digits.get(6..8)?.parse().ok()?;
    parse_ymd(year, month, day, config)
}

fn parse_hms(digits: &str) -> Option<(u32, u32, u32)> {
    let hour: u32 = digits.get(0..2)?.parse().ok()?;
    let minute: u32 = digits.get(2..4)?.parse().ok()?;
    let second: u32 = digits.get(4..6)?.parse().ok()?;
    (hour <= 23 && minute <= 59 && second <= 59).then_some((hour, minute, second))
}

/// Parse a date (and time when present) from a filename stem.
///
/// Patterns, most specific first: `YYYYMMDD_HHMMSS`, 14 contiguous
/// digits, `YYYY-MM-DD`, bare 8 digits. Validation happens through real
/// date construction plus the configured year range; a pattern that
/// matches but fails validation is discarded and the next is tried.
fn parse_filename_datetime(stem: &str, config: &OrganizeConfig) -> Option<FilenameHit> {
    if let Ok(re) = regex::Regex::new(r"(\d{8})_(\d{6})") {
        for caps in re.captures_iter(stem) {
            if let (Some(date), Some((h, m, s))) =
                (parse_compact(&caps[1], config), parse_hms(&caps[2]))
            {
                if let Some(dt) = date.and_hms_opt(h, m, s) {
                    return Some(FilenameHit {
                        datetime: dt,
                        has_time: true,
                    });
                }
            }
        }
    }

    if let Ok(re) = regex::Regex::new(r"(\d{14})") {
        for caps in re.captures_iter(stem) {
            let digits = &caps[1];
            if let (Some(date), Some((h, m, s))) =
                (parse_compact(&digits[..8], config), parse_hms(&digits[8..]))
            {
                if let Some(dt) = date.and_hms_opt(h, m, s) {
                    return Some(FilenameHit {
                        datetime: dt,
                        has_time: true,
                    });
                }
            }
        }
    }

    if let Ok(re) = regex::Regex::new(r"(\d{4})-(\d{2})-(\d{2})") {
        for caps in re.captures_iter(stem) {
            let parsed = caps[1]
                .parse()
                .ok()
                .zip(caps[2].parse().ok())
                .zip(caps[3].parse().ok());
            if let Some(((year, month), day)) = parsed {
                if let Some(date) = parse_ymd(year, month, day, config) {
                    if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                        return Some(FilenameHit {
                            datetime: dt,
                            has_time: false,
                        });
                    }
                }
            }
        }
    }

    if let Ok(re) = regex::Regex::new(r"(\d{8})") {
        for caps in re.captures_iter(stem) {
            if let Some(date) = parse_compact(&caps[1], config) {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return Some(FilenameHit {
                        datetime: dt,
                        has_time: false,
                    });
                }
            }
        }
    }

    None
}

/// Parse an ISO datetime string leniently: RFC 3339 first, then a bare
/// `%Y-%m-%dT%H:%M:%S` with optional fraction. Returns the clock value
/// as written plus the UTC instant when the string carried a zone.
fn parse_iso(iso: &str) -> Option<(NaiveDateTime, Option<DateTime<Utc>>)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some((dt.naive_local(), Some(dt.with_timezone(&Utc))));
    }
    let trimmed = iso.trim_end_matches('Z');
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            let utc = iso
                .ends_with('Z')
                .then(|| Utc.from_utc_datetime(&naive));
            return Some((naive, utc));
        }
    }
    None
}

/// The drone trust decision over an already-fetched metadata time.
///
/// A metadata clock within the tolerance of the file's own mtime is
/// taken to be mislabeled local time and the mtime wins verbatim;
/// anything further apart is treated as true UTC and converted to the
/// configured zone. The tolerance boundary is inclusive. Compared
/// naively, no timezone math on the mtime side.
fn judge_drone_time(
    iso: &str,
    naive_meta: NaiveDateTime,
    parsed_utc: Option<DateTime<Utc>>,
    field: &str,
    mtime: NaiveDateTime,
    config: &OrganizeConfig,
) -> (ResolvedTimestamp, DroneDecision) {
    let diff_secs = (naive_meta - mtime).num_seconds().abs();
    let diff_minutes = diff_secs as f64 / 60.0;

    if diff_secs <= config.drone_tolerance_secs {
        let resolved = ResolvedTimestamp {
            local: mtime,
            utc_reference: Some(Utc.from_utc_datetime(&mtime)),
            provenance: TimeProvenance::MtimeMetadataLocal,
            time_diff_minutes: Some(diff_minutes),
        };
        let decision = DroneDecision {
            container_iso: Some(iso.to_string()),
            utc_reference: resolved.utc_reference,
            time_diff_minutes: Some(diff_minutes),
            decision: format!(
                "metadata within {:.1} min of mtime: treated as local, mtime used",
                diff_minutes
            ),
        };
        (resolved, decision)
    } else {
        let utc = parsed_utc.unwrap_or_else(|| Utc.from_utc_datetime(&naive_meta));
        let local = utc.with_timezone(&config.timezone).naive_local();
        let resolved = ResolvedTimestamp {
            local,
            utc_reference: Some(utc),
            provenance: TimeProvenance::ConvertedUtc {
                field: field.to_string(),
            },
            time_diff_minutes: Some(diff_minutes),
        };
        let decision = DroneDecision {
            container_iso: Some(iso.to_string()),
            utc_reference: Some(utc),
            time_diff_minutes: Some(diff_minutes),
            decision: format!(
                "metadata {:.1} min from mtime: treated as UTC, converted to {}",
                diff_minutes, config.timezone
            ),
        };
        (resolved, decision)
    }
}

/// The drone container heuristic. Returns a resolution when the
/// container yielded a usable value, plus the decision trail either way.
async fn resolve_drone_container(
    path: &Path,
    mtime: NaiveDateTime,
    config: &OrganizeConfig,
) -> (Option<ResolvedTimestamp>, DroneDecision) {
    let outcome = ffprobe::creation_time(path).await;

    let (iso, field) = match outcome {
        ContainerTimeOutcome::Found { iso, field } => (iso, field),
        ContainerTimeOutcome::Absent => {
            return (
                None,
                DroneDecision {
                    container_iso: None,
                    utc_reference: None,
                    time_diff_minutes: None,
                    decision: "container has no creation_time".to_string(),
                },
            )
        }
        ContainerTimeOutcome::Failed(f) => {
            tracing::debug!("Container time query failed: {}", f);
            return (
                None,
                DroneDecision {
                    container_iso: None,
                    utc_reference: None,
                    time_diff_minutes: None,
                    decision: format!("container query failed: {}", f),
                },
            )
        }
    };

    let (naive_meta, parsed_utc) = match parse_iso(&iso) {
        Some(pair) => pair,
        None => {
            return (
                None,
                DroneDecision {
                    container_iso: Some(iso.clone()),
                    utc_reference: None,
                    time_diff_minutes: None,
                    decision: format!("unparseable creation_time '{}'", iso),
                },
            )
        }
    };

    let (resolved, decision) = judge_drone_time(&iso, naive_meta, parsed_utc, field, mtime, config);
    (Some(resolved), decision)
}

/// Resolve one file's authoritative local capture time.
///
/// Evidence is read from the effective source file: the same-directory
/// sibling original for `_stabilized` files (single hop), the file
/// itself otherwise. The result is always attributed to `file`.
pub async fn resolve(
    file: &MediaFile,
    source: &SourceClass,
    config: &OrganizeConfig,
) -> ResolutionOutcome {
    let effective_path = match stabilized_original(&file.path) {
        Some(original) => {
            tracing::info!(
                "Using original file metadata for stabilized file: {} -> {}",
                original.display(),
                file.filename
            );
            original
        }
        None => file.path.clone(),
    };

    // mtime of the evidence file; the stabilized copy's own mtime is a
    // render time, not a capture time.
    let mtime = std::fs::metadata(&effective_path)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(|t| DateTime::<chrono::Local>::from(t).naive_local())
        .unwrap_or(file.modified);

    let effective_stem = effective_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file.filename)
        .to_string();

    let mut outcome = ResolutionOutcome {
        resolution: TimestampResolution::Unresolved,
        effective_path: effective_path.clone(),
        filename_time: None,
        sidecar: None,
        drone: None,
    };

    // Filename evidence is recorded regardless of which step wins.
    let filename_hit = parse_filename_datetime(&effective_stem, config);
    if let Some(hit) = &filename_hit {
        if hit.has_time {
            outcome.filename_time = Some(hit.datetime.format("%H:%M:%S").to_string());
        }
    }

    if source.is_drone {
        let (resolved, decision) =
            resolve_drone_container(&effective_path, mtime, config).await;
        outcome.drone = Some(decision);
        if let Some(resolved) = resolved {
            return finish(outcome, resolved, source, config);
        }
    }

    if let Some(hit) = filename_hit {
        let resolved = ResolvedTimestamp {
            local: hit.datetime,
            utc_reference: None,
            provenance: TimeProvenance::FilenamePattern,
            time_diff_minutes: None,
        };
        return finish(outcome, resolved, source, config);
    }

    let sidecar = exiftool::capture_datetime(&effective_path).await;
    let resolved_from_sidecar = match &sidecar {
        SidecarOutcome::Found { value, field } => parse_iso(value).map(|(naive, utc)| {
            if source.is_drone {
                // A drone time is suspect wherever it came from; the
                // sidecar value goes through the same mtime comparison
                // as the container value.
                let (resolved, decision) =
                    judge_drone_time(value, naive, utc, field, mtime, config);
                (resolved, Some(decision))
            } else {
                let resolved = ResolvedTimestamp {
                    local: naive,
                    utc_reference: None,
                    provenance: if field == PRIMARY_FIELD {
                        TimeProvenance::SidecarPrimary
                    } else {
                        TimeProvenance::SidecarFallback {
                            field: field.clone(),
                        }
                    },
                    time_diff_minutes: None,
                };
                (resolved, None)
            }
        }),
        _ => None,
    };
    outcome.sidecar = Some(sidecar);
    if let Some((resolved, decision)) = resolved_from_sidecar {
        if decision.is_some() {
            outcome.drone = decision;
        }
        return finish(outcome, resolved, source, config);
    }

    // Last resort: the filesystem mtime, gated on the year looking sane.
    let year = mtime.year();
    if config.mtime_year_range.contains(&year) && config.date_year_range.contains(&year) {
        let resolved = ResolvedTimestamp {
            local: mtime,
            utc_reference: None,
            provenance: TimeProvenance::FilesystemMtime,
            time_diff_minutes: None,
        };
        return finish(outcome, resolved, source, config);
    }

    outcome
}

/// Apply the per-group clock correction and seal the outcome.
fn finish(
    mut outcome: ResolutionOutcome,
    mut resolved: ResolvedTimestamp,
    source: &SourceClass,
    config: &OrganizeConfig,
) -> ResolutionOutcome {
    resolved.local = config.adjustments.adjust(resolved.local, &source.source_tag);
    outcome.resolution = TimestampResolution::Resolved(resolved);
    outcome
}
