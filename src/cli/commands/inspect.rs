//! Inspect command implementation.
//!
//! Debug surface: shows every piece of metadata evidence for one file
//! the way the resolver sees it, including the raw tool dumps.

use crate::core::{classifier, colorprofile, resolver, scanner};
use crate::models::config::OrganizeConfig;
use crate::models::media::{MediaFile, MediaType, TimestampResolution};
use crate::services::{exiftool, ffprobe};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Walk ancestors looking for the raw footage root, falling back to the
/// file's own directory (which classifies the file as "root").
fn infer_raw_root(file: &Path) -> PathBuf {
    for ancestor in file.ancestors() {
        if ancestor.file_name().and_then(|n| n.to_str()) == Some(crate::core::organizer::RAW_DIR) {
            return ancestor.to_path_buf();
        }
    }
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub async fn inspect(
    file: &Path,
    raw_root: Option<&Path>,
    tz: &str,
    as_json: bool,
) -> Result<()> {
    if !file.is_file() {
        return Err(Error::PathNotFound(file.display().to_string()));
    }

    let config = OrganizeConfig::new(tz)?;
    let raw_root = raw_root
        .map(Path::to_path_buf)
        .unwrap_or_else(|| infer_raw_root(file));

    let metadata = std::fs::metadata(file)?;
    let modified: DateTime<Local> = metadata.modified()?.into();
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let media_type = MediaType::from_extension(&extension).ok_or_else(|| {
        Error::other(format!("Not a recognized media extension: .{}", extension))
    })?;

    let media_file = MediaFile {
        path: file.to_path_buf(),
        filename: file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        size: metadata.len(),
        modified: modified.naive_local(),
        extension,
        media_type,
    };

    let source = classifier::classify(&raw_root, file);
    let outcome = resolver::resolve(&media_file, &source, &config).await;
    let tech = ffprobe::technical_metadata(&outcome.effective_path)
        .await
        .unwrap_or_default();
    let profile = colorprofile::detect(&tech);

    if as_json {
        let resolution = match &outcome.resolution {
            TimestampResolution::Resolved(ts) => json!({
                "local": ts.local.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "utc_reference": ts.utc_reference.map(|u| u.to_rfc3339()),
                "provenance": ts.provenance.to_string(),
                "time_diff_minutes": ts.time_diff_minutes,
            }),
            TimestampResolution::Unresolved => json!("unresolved"),
        };
        let doc = json!({
            "file": media_file.path.display().to_string(),
            "media_type": media_file.media_type.to_string(),
            "size_bytes": media_file.size,
            "mtime": media_file.modified.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "source": {
                "source_tag": source.source_tag,
                "raw_folder": source.raw_folder,
                "device_category": source.device_category.to_string(),
                "is_drone": source.is_drone,
                "is_cell": source.is_cell,
            },
            "resolution": resolution,
            "evidence": {
                "effective_path": outcome.effective_path.display().to_string(),
                "filename_time": outcome.filename_time,
                "exiftool": outcome.sidecar.as_ref().map(|s| s.status()),
                "drone": outcome.drone.as_ref().map(|d| json!({
                    "container_iso": d.container_iso,
                    "time_diff_minutes": d.time_diff_minutes,
                    "decision": d.decision,
                })),
            },
            "color_profile": {
                "is_hdr_log": profile.is_hdr_log,
                "hdr_tag": profile.bucket().hdr_tag(),
                "justification": profile.justification,
            },
            "raw": {
                "ffprobe": ffprobe::raw_dump(&outcome.effective_path).await,
                "exiftool": exiftool::raw_dump(&outcome.effective_path).await,
            },
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", format!("[INSPECT] {}", media_file.filename).bold().cyan());
    println!();

    println!("{}", "[File]".bold());
    println!("  Path:      {}", media_file.path.display());
    println!("  Type:      {}", media_file.media_type);
    println!("  Size:      {} bytes", media_file.size);
    println!("  Mtime:     {}", media_file.modified.format("%Y-%m-%d %H:%M:%S"));
    if outcome.effective_path != media_file.path {
        println!(
            "  {} {}",
            "Evidence from:".yellow(),
            outcome.effective_path.display()
        );
    }
    println!();

    println!("{}", "[Source]".bold());
    println!("  Folder:    {}", source.raw_folder);
    println!("  Tag:       {}", source.source_tag);
    println!("  Category:  {}", source.device_category);
    println!("  Drone:     {}", source.is_drone);
    println!("  Cell:      {}", source.is_cell);
    println!();

    println!("{}", "[Timestamp evidence]".bold());
    println!(
        "  Filename time:     {}",
        outcome.filename_time.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Exiftool:          {}",
        outcome
            .sidecar
            .as_ref()
            .map(|s| s.status())
            .unwrap_or_else(|| "not consulted".to_string())
    );
    if let Some(drone) = &outcome.drone {
        println!(
            "  Container time:    {}",
            drone.container_iso.as_deref().unwrap_or("(none)")
        );
        if let Some(diff) = drone.time_diff_minutes {
            println!("  Diff vs mtime:     {:.1} min", diff);
        }
        println!("  Drone decision:    {}", drone.decision);
    }
    match &outcome.resolution {
        TimestampResolution::Resolved(ts) => {
            println!(
                "  {} {} ({})",
                "Resolved:".green(),
                ts.local.format("%Y-%m-%d %H:%M:%S"),
                ts.provenance
            );
        }
        TimestampResolution::Unresolved => {
            println!("  {}", "Resolved:          UNRESOLVED (invalid-date bucket)".red());
        }
    }
    println!();

    if media_file.media_type == MediaType::Video {
        println!("{}", "[Color profile]".bold());
        println!("  Resolution:        {}", tech.resolution.as_deref().unwrap_or("?"));
        println!("  Frame rate:        {}", tech.frame_rate.as_deref().unwrap_or("?"));
        println!("  Codec:             {}", tech.codec.as_deref().unwrap_or("?"));
        println!("  Pixel format:      {}", tech.pixel_format.as_deref().unwrap_or("?"));
        println!("  Color transfer:    {}", tech.color_transfer.as_deref().unwrap_or("?"));
        println!("  HDR tag:           {}", profile.bucket().hdr_tag());
        println!("  Analysis:          {}", profile.summary());
    }

    // The scanner's stabilized preference, made visible for debugging.
    if scanner::stabilized_original(file).is_some() {
        println!();
        println!(
            "{}",
            "[Note] This is a stabilized derivative; its sibling original provided the evidence."
                .yellow()
        );
    }

    Ok(())
}
