//! FFprobe wrappers: container creation time, technical stream
//! attributes, and the raw full dump.

use crate::services::{run_tool, ToolFailure, DUMP_TIMEOUT_SECS, QUICK_TIMEOUT_SECS};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

/// Outcome of the container creation-time query.
#[derive(Debug, Clone)]
pub enum ContainerTimeOutcome {
    /// A creation_time tag was present; `field` names where it came from.
    Found { iso: String, field: &'static str },
    /// The tool ran cleanly but the container carries no creation_time.
    Absent,
    /// The tool could not be consulted.
    Failed(ToolFailure),
}

#[derive(Debug, Deserialize)]
struct TagsOnly {
    #[serde(default)]
    tags: Option<CreationTags>,
}

#[derive(Debug, Deserialize)]
struct CreationTags {
    creation_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreationTimeDoc {
    #[serde(default)]
    format: Option<TagsOnly>,
    #[serde(default)]
    streams: Vec<TagsOnly>,
}

/// Query the container's embedded creation_time. The format-level tag
/// wins over the first stream's tag.
pub async fn creation_time(path: &Path) -> ContainerTimeOutcome {
    let output = match run_tool(
        "ffprobe",
        [
            "-v".as_ref(),
            "error".as_ref(),
            "-print_format".as_ref(),
            "json".as_ref(),
            "-show_entries".as_ref(),
            "format_tags=creation_time:stream_tags=creation_time".as_ref(),
            path.as_os_str(),
        ],
        QUICK_TIMEOUT_SECS,
    )
    .await
    {
        Ok(o) => o,
        Err(f) => return ContainerTimeOutcome::Failed(f),
    };

    let doc: CreationTimeDoc = match serde_json::from_slice(&output.stdout) {
        Ok(doc) => doc,
        Err(e) => {
            return ContainerTimeOutcome::Failed(ToolFailure::MalformedOutput {
                tool: "ffprobe",
                reason: e.to_string(),
            })
        }
    };

    if let Some(iso) = doc
        .format
        .and_then(|f| f.tags)
        .and_then(|t| t.creation_time)
    {
        return ContainerTimeOutcome::Found {
            iso,
            field: "format.tags.creation_time",
        };
    }

    if let Some(iso) = doc
        .streams
        .into_iter()
        .next()
        .and_then(|s| s.tags)
        .and_then(|t| t.creation_time)
    {
        return ContainerTimeOutcome::Found {
            iso,
            field: "streams[0].tags.creation_time",
        };
    }

    ContainerTimeOutcome::Absent
}

/// Technical stream attributes used by the HDR/LOG detector and written
/// into placeholders. Every field is optional: an absent attribute is a
/// signal absence, never an error.
#[derive(Debug, Clone, Default)]
pub struct TechnicalMetadata {
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
}

#[derive(Debug, Deserialize)]
struct TechDoc {
    #[serde(default)]
    streams: Vec<TechStream>,
    #[serde(default)]
    format: Option<TechFormat>,
}

#[derive(Debug, Deserialize)]
struct TechStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    pix_fmt: Option<String>,
    color_space: Option<String>,
    color_transfer: Option<String>,
    color_primaries: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TechFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
    format_name: Option<String>,
}

/// Extract technical stream attributes for the first video stream.
pub async fn technical_metadata(path: &Path) -> Result<TechnicalMetadata, ToolFailure> {
    let output = run_tool(
        "ffprobe",
        [
            "-v".as_ref(),
            "error".as_ref(),
            "-print_format".as_ref(),
            "json".as_ref(),
            "-show_entries".as_ref(),
            "stream=codec_type,width,height,r_frame_rate,codec_name,pix_fmt,color_space,color_transfer,color_primaries:format=duration,bit_rate,format_name".as_ref(),
            path.as_os_str(),
        ],
        QUICK_TIMEOUT_SECS,
    )
    .await?;

    let doc: TechDoc =
        serde_json::from_slice(&output.stdout).map_err(|e| ToolFailure::MalformedOutput {
            tool: "ffprobe",
            reason: e.to_string(),
        })?;

    let mut meta = TechnicalMetadata::default();

    if let Some(format) = doc.format {
        meta.duration = format.duration;
        meta.bit_rate = format.bit_rate;
        meta.format_name = format.format_name;
    }

    // First video stream: explicit codec_type, or a stream carrying
    // dimensions when the probe omits the type.
    let video = doc.streams.into_iter().find(|s| {
        s.codec_type.as_deref() == Some("video") || (s.width.is_some() && s.height.is_some())
    });

    if let Some(stream) = video {
        if let (Some(w), Some(h)) = (stream.width, stream.height) {
            meta.resolution = Some(format!("{}x{}", w, h));
        }
        meta.frame_rate = stream.r_frame_rate.as_deref().and_then(format_frame_rate);
        meta.codec = stream.codec_name;
        meta.pixel_format = stream.pix_fmt;
        meta.color_space = stream.color_space;
        meta.color_transfer = stream.color_transfer;
        meta.color_primaries = stream.color_primaries;
    }

    Ok(meta)
}

/// Evaluate a "num/den" frame rate to two decimals.
fn format_frame_rate(rate: &str) -> Option<String> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        return Some(rate.to_string());
    }
    Some(format!("{:.2} fps", num / den))
}

/// Full `-show_format -show_streams` dump for the placeholder's raw
/// debugging section. Failures degrade to `{"error": reason}`.
pub async fn raw_dump(path: &Path) -> Value {
    let output = match run_tool(
        "ffprobe",
        [
            "-v".as_ref(),
            "error".as_ref(),
            "-print_format".as_ref(),
            "json".as_ref(),
            "-show_format".as_ref(),
            "-show_streams".as_ref(),
            path.as_os_str(),
        ],
        DUMP_TIMEOUT_SECS,
    )
    .await
    {
        Ok(o) => o,
        Err(f) => return json!({ "error": f.to_string() }),
    };

    match serde_json::from_slice(&output.stdout) {
        Ok(v) => v,
        Err(e) => json!({ "error": format!("ffprobe returned malformed output: {}", e) }),
    }
}
