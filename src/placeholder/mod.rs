//! Placeholder encodings.
//!
//! One organizer, two interchangeable codecs behind a common trait: a
//! structured JSON document and a grep-friendly delimited text file. A
//! reader dispatches on extension and must accept either, including
//! after the transfer phase rewrites the location fields.

pub mod json;
pub mod text;

use crate::models::record::PlaceholderDoc;
use crate::{Error, Result};
use std::path::Path;

pub use json::JsonCodec;
pub use text::TextCodec;

/// A placeholder encoding: writes one durable record per organized
/// file, reads it back, and rewrites its location after transfer.
pub trait PlaceholderCodec {
    /// File extension this codec produces, without dot.
    fn extension(&self) -> &'static str;

    fn write(&self, path: &Path, doc: &PlaceholderDoc) -> Result<()>;

    fn read(&self, path: &Path) -> Result<PlaceholderDoc>;

    /// Point the record at the file's post-transfer location. Only the
    /// path fields change; everything else is preserved.
    fn set_location(&self, path: &Path, new_location: &str) -> Result<()>;
}

/// Which codec a run writes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderFormat {
    #[default]
    Json,
    Text,
}

impl PlaceholderFormat {
    pub fn codec(&self) -> &'static dyn PlaceholderCodec {
        match self {
            PlaceholderFormat::Json => &JsonCodec,
            PlaceholderFormat::Text => &TextCodec,
        }
    }
}

impl std::str::FromStr for PlaceholderFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(PlaceholderFormat::Json),
            "text" | "txt" => Ok(PlaceholderFormat::Text),
            other => Err(Error::other(format!(
                "Unknown placeholder format '{}' (expected json or text)",
                other
            ))),
        }
    }
}

/// Is this file a placeholder either codec can read?
pub fn is_placeholder(path: &Path) -> bool {
    codec_for(path).is_some()
}

fn codec_for(path: &Path) -> Option<&'static dyn PlaceholderCodec> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(&JsonCodec),
        Some("txt") => Some(&TextCodec),
        _ => None,
    }
}

/// Read a placeholder in whichever encoding its extension declares.
pub fn read_any(path: &Path) -> Result<PlaceholderDoc> {
    match codec_for(path) {
        Some(codec) => codec.read(path),
        None => Err(Error::InvalidPlaceholder {
            path: path.display().to_string(),
            reason: "unrecognized extension".to_string(),
        }),
    }
}

/// Rewrite a placeholder's location in place, dispatching on extension.
pub fn set_location_any(path: &Path, new_location: &str) -> Result<()> {
    match codec_for(path) {
        Some(codec) => codec.set_location(path, new_location),
        None => Err(Error::InvalidPlaceholder {
            path: path.display().to_string(),
            reason: "unrecognized extension".to_string(),
        }),
    }
}
