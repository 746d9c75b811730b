//! External tool wrappers (ffprobe, exiftool).
//!
//! Every invocation carries an explicit timeout; a tool that is not
//! installed, times out, or produces unparseable output yields a
//! [`ToolFailure`] that callers demote to "no evidence" for that step.

pub mod exiftool;
pub mod ffprobe;

use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Timeout for quick single-field queries.
pub const QUICK_TIMEOUT_SECS: u64 = 10;
/// Timeout for full metadata dumps.
pub const DUMP_TIMEOUT_SECS: u64 = 30;

/// Why an external tool call produced no usable output.
///
/// Not installed, timed out, and malformed output are kept
/// distinguishable; `Failed` covers a nonzero exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    NotInstalled { tool: &'static str },
    TimedOut { tool: &'static str, secs: u64 },
    Failed { tool: &'static str, stderr: String },
    MalformedOutput { tool: &'static str, reason: String },
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolFailure::NotInstalled { tool } => write!(f, "{} not installed", tool),
            ToolFailure::TimedOut { tool, secs } => {
                write!(f, "{} timed out (>{} seconds)", tool, secs)
            }
            ToolFailure::Failed { tool, stderr } => {
                if stderr.is_empty() {
                    write!(f, "{} failed", tool)
                } else {
                    write!(f, "{} failed: {}", tool, stderr)
                }
            }
            ToolFailure::MalformedOutput { tool, reason } => {
                write!(f, "{} returned malformed output: {}", tool, reason)
            }
        }
    }
}

/// Run an external tool with a hard timeout, mapping spawn/timeout
/// failures into [`ToolFailure`]. A nonzero exit status is returned as
/// `Failed` with captured stderr.
pub(crate) async fn run_tool<I, S>(
    tool: &'static str,
    args: I,
    timeout_secs: u64,
) -> Result<Output, ToolFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(tool);
    cmd.args(args).kill_on_drop(true);

    let fut = cmd.output();
    let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), fut).await {
        Err(_) => {
            return Err(ToolFailure::TimedOut {
                tool,
                secs: timeout_secs,
            })
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ToolFailure::NotInstalled { tool })
        }
        Ok(Err(e)) => {
            return Err(ToolFailure::Failed {
                tool,
                stderr: e.to_string(),
            })
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(ToolFailure::Failed {
            tool,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
