//! Structured JSON placeholder codec.

use crate::models::record::{PlaceholderDoc, TransferInfo};
use crate::placeholder::PlaceholderCodec;
use crate::{Error, Result};
use chrono::Local;
use std::path::Path;

pub struct JsonCodec;

impl PlaceholderCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, path: &Path, doc: &PlaceholderDoc) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<PlaceholderDoc> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::InvalidPlaceholder {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn set_location(&self, path: &Path, new_location: &str) -> Result<()> {
        let mut doc = self.read(path)?;
        doc.placeholder_info.original_path = new_location.to_string();
        doc.transfer_info = Some(TransferInfo {
            transferred_at: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
            new_location: new_location.to_string(),
        });
        self.write(path, &doc)
    }
}
