//! Run configuration: timezone, heuristic thresholds, per-group time
//! adjustments.

use crate::{Error, Result};
use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

/// File name of the per-group time-adjustment config, looked up in the
/// project root.
pub const TIME_ADJUST_CONFIG: &str = "specific_group_time_adjust.json";

/// Default timezone for drone UTC conversion.
pub const DEFAULT_TIMEZONE: &str = "America/Montreal";

/// A signed day+seconds delta parsed from the legacy 16-character
/// `[+|-]YYYYMMDD_HHMMSS` format.
///
/// The date portion uses the legacy approximation (year = 365 days,
/// month = 30 days); the time portion is exact. That approximation is
/// the documented contract of the format, not an implementation
/// shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDelta {
    pub days: i64,
    pub seconds: i64,
}

impl TimeDelta {
    /// Parse a delta string such as `+00010000_000000` (add 1 day) or
    /// `-00000000_020000` (subtract 2 hours).
    pub fn parse(delta_str: &str) -> Result<TimeDelta> {
        let bytes = delta_str.as_bytes();
        if bytes.len() != 16
            || !delta_str.is_ascii()
            || (bytes[0] != b'+' && bytes[0] != b'-')
            || bytes[9] != b'_'
        {
            return Err(Error::InvalidTimeDelta(delta_str.to_string()));
        }

        let digits = |range: std::ops::Range<usize>| -> Result<i64> {
            delta_str[range]
                .parse::<i64>()
                .map_err(|_| Error::InvalidTimeDelta(delta_str.to_string()))
        };

        let sign: i64 = if bytes[0] == b'+' { 1 } else { -1 };
        let year = digits(1..5)?;
        let month = digits(5..7)?;
        let day = digits(7..9)?;
        let hour = digits(10..12)?;
        let minute = digits(12..14)?;
        let second = digits(14..16)?;

        Ok(TimeDelta {
            days: sign * (year * 365 + month * 30 + day),
            seconds: sign * (hour * 3600 + minute * 60 + second),
        })
    }

    /// Apply this delta using true calendar arithmetic (carries across
    /// month/day boundaries).
    pub fn apply(&self, dt: NaiveDateTime) -> NaiveDateTime {
        dt + Duration::days(self.days) + Duration::seconds(self.seconds)
    }
}

/// Per-source-tag time adjustments, keyed case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TimeAdjustments {
    deltas: HashMap<String, TimeDelta>,
}

impl TimeAdjustments {
    /// Load adjustments from a JSON map of source tag to delta string.
    /// A missing file is not an error: no device needs correcting.
    pub fn load(config_path: &Path) -> Result<TimeAdjustments> {
        if !config_path.exists() {
            tracing::debug!("No time adjustment config at {}", config_path.display());
            return Ok(TimeAdjustments::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)?;

        let mut deltas = HashMap::new();
        for (group, delta_str) in raw {
            deltas.insert(group.to_lowercase(), TimeDelta::parse(&delta_str)?);
        }

        tracing::info!(
            "Loaded time adjustments for {} group(s) from {}",
            deltas.len(),
            config_path.display()
        );
        Ok(TimeAdjustments { deltas })
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Apply the configured adjustment for a group, if any. Returns the
    /// input unchanged for groups without a delta.
    pub fn adjust(&self, dt: NaiveDateTime, group: &str) -> NaiveDateTime {
        match self.deltas.get(&group.to_lowercase()) {
            Some(delta) => {
                let adjusted = delta.apply(dt);
                tracing::debug!(
                    "Applied time adjustment to group '{}': {} -> {}",
                    group,
                    dt.format("%Y-%m-%d %H:%M:%S"),
                    adjusted.format("%Y-%m-%d %H:%M:%S")
                );
                adjusted
            }
            None => dt,
        }
    }
}

/// Configuration for one organize run.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Target timezone for drone UTC conversion.
    pub timezone: Tz,
    /// Drone heuristic: metadata within this many seconds of mtime is
    /// taken to already be local time.
    pub drone_tolerance_secs: i64,
    /// Acceptable year range for dates parsed from filenames (and for
    /// the final date bucket).
    pub date_year_range: RangeInclusive<i32>,
    /// Wider year range accepted for mtime as a time-of-day source.
    pub mtime_year_range: RangeInclusive<i32>,
    /// Per-group clock corrections.
    pub adjustments: TimeAdjustments,
    /// Compute everything, write nothing.
    pub simulate: bool,
}

impl OrganizeConfig {
    pub fn new(tz_name: &str) -> Result<OrganizeConfig> {
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| Error::UnknownTimezone(tz_name.to_string()))?;
        Ok(OrganizeConfig {
            timezone,
            drone_tolerance_secs: 5 * 60,
            date_year_range: 1990..=2030,
            mtime_year_range: 1990..=2300,
            adjustments: TimeAdjustments::default(),
            simulate: false,
        })
    }
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        OrganizeConfig::new(DEFAULT_TIMEZONE).expect("default timezone is valid")
    }
}
