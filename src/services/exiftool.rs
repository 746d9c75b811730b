//! ExifTool wrappers: the sidecar capture-time chain for phone-origin
//! containers, and the raw full dump.

use crate::services::{run_tool, ToolFailure, DUMP_TIMEOUT_SECS, QUICK_TIMEOUT_SECS};
use serde_json::{json, Value};
use std::path::Path;

/// Primary capture-time field for phone/Apple containers.
pub const PRIMARY_FIELD: &str = "QuickTime:DateTimeOriginal";
/// Documented fallback fields, consulted in this fixed order.
pub const FALLBACK_FIELDS: &[&str] = &["DateTimeOriginal", "QuickTime:CreationDate"];

/// Outcome of the sidecar capture-time chain.
#[derive(Debug, Clone)]
pub enum SidecarOutcome {
    /// A field yielded a datetime, formatted `%Y-%m-%dT%H:%M:%S`.
    Found { value: String, field: String },
    /// The tool ran on every field and none carried a value.
    Absent,
    /// The tool could not be consulted.
    Failed(ToolFailure),
}

impl SidecarOutcome {
    /// Human-readable status line stored in placeholders.
    pub fn status(&self) -> String {
        match self {
            SidecarOutcome::Found { value, field } if field == PRIMARY_FIELD => {
                format!("SUCCESS: {}", value)
            }
            SidecarOutcome::Found { value, field } => {
                format!("SUCCESS ({} fallback): {}", field, value)
            }
            SidecarOutcome::Absent => format!(
                "No {}, {} found",
                PRIMARY_FIELD,
                FALLBACK_FIELDS.join(", or ")
            ),
            SidecarOutcome::Failed(f) => format!("FAILED: {}", f),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            SidecarOutcome::Found { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Query one tag with `-d %Y-%m-%dT%H:%M:%S -s3`. ExifTool prints "-"
/// or nothing when the tag is absent.
async fn query_field(path: &Path, field: &str) -> Result<Option<String>, ToolFailure> {
    let tag_arg = format!("-{}", field);
    let output = run_tool(
        "exiftool",
        [
            tag_arg.as_ref(),
            "-d".as_ref(),
            "%Y-%m-%dT%H:%M:%S".as_ref(),
            "-s3".as_ref(),
            path.as_os_str(),
        ],
        QUICK_TIMEOUT_SECS,
    )
    .await?;

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() || value == "-" {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Walk the capture-time field chain: primary first, then the fallback
/// fields in fixed order. Stops at the first field carrying a value.
pub async fn capture_datetime(path: &Path) -> SidecarOutcome {
    match query_field(path, PRIMARY_FIELD).await {
        Ok(Some(value)) => {
            return SidecarOutcome::Found {
                value,
                field: PRIMARY_FIELD.to_string(),
            }
        }
        Ok(None) => {}
        Err(f) => return SidecarOutcome::Failed(f),
    }

    for field in FALLBACK_FIELDS {
        match query_field(path, field).await {
            Ok(Some(value)) => {
                return SidecarOutcome::Found {
                    value,
                    field: field.to_string(),
                }
            }
            Ok(None) => {}
            Err(f) => return SidecarOutcome::Failed(f),
        }
    }

    SidecarOutcome::Absent
}

/// Full `-j -G -a` dump for the placeholder's raw debugging section.
/// Failures degrade to `{"error": reason}`.
pub async fn raw_dump(path: &Path) -> Value {
    let output = match run_tool(
        "exiftool",
        [
            "-j".as_ref(),
            "-G".as_ref(),
            "-a".as_ref(),
            path.as_os_str(),
        ],
        DUMP_TIMEOUT_SECS,
    )
    .await
    {
        Ok(o) => o,
        Err(f) => return json!({ "error": f.to_string() }),
    };

    // exiftool emits an array with one element per input file
    match serde_json::from_slice::<Value>(&output.stdout) {
        Ok(Value::Array(mut arr)) if !arr.is_empty() => arr.remove(0),
        Ok(_) => json!({}),
        Err(e) => json!({ "error": format!("exiftool returned malformed output: {}", e) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages_name_the_field() {
        let primary = SidecarOutcome::Found {
            value: "2024-05-01T10:00:00".to_string(),
            field: PRIMARY_FIELD.to_string(),
        };
        assert_eq!(primary.status(), "SUCCESS: 2024-05-01T10:00:00");

        let fallback = SidecarOutcome::Found {
            value: "2024-05-01T10:00:00".to_string(),
            field: "DateTimeOriginal".to_string(),
        };
        assert!(fallback.status().contains("DateTimeOriginal fallback"));

        let failed = SidecarOutcome::Failed(ToolFailure::NotInstalled { tool: "exiftool" });
        assert!(failed.status().contains("not installed"));
    }
}
