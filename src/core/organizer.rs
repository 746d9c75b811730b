//! Phase-1 orchestration: scan, classify, resolve, name, and write one
//! placeholder per media file.
//!
//! The two-phase batch contract lives here: every file is fully
//! resolved and grouped before any color assignment happens (colors are
//! a later pass over the complete group set, see the metadata command).
//! Progress display belongs to the caller; this module only reports
//! through the `progress` hook.

use crate::core::{classifier, colorprofile, namer, resolver, scanner};
use crate::models::config::OrganizeConfig;
use crate::models::media::{MediaFile, MediaType, TimestampResolution};
use crate::models::record::{
    DroneTimestamps, PlaceholderDoc, RawMetadata, TimestampEvidence, VideoMetadataSection,
};
use crate::placeholder::PlaceholderFormat;
use crate::services::{exiftool, ffprobe};
use crate::utils::fs::unique_path;
use crate::{Error, Result};
use chrono::Local;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Fixed folder names of the project layout.
pub const RAW_DIR: &str = "Footage_raw";
pub const SORTED_DIR: &str = "Footage_metadata_sorted";
pub const FINAL_DIR: &str = "Footage";

/// Aggregate counts printed at the end of every run, simulate included.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizeSummary {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub invalid_date: usize,
    pub kept_via_mtime: usize,
}

/// One planned placement, reported back to the caller for display.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub original: PathBuf,
    pub placeholder: PathBuf,
    pub dated: bool,
    pub kept_via_mtime: bool,
}

pub struct Organizer {
    pub project_root: PathBuf,
    pub output_root: PathBuf,
    pub config: OrganizeConfig,
    pub filter: scanner::MediaFilter,
    pub format: PlaceholderFormat,
}

impl Organizer {
    /// Validate the project layout and locate the raw root; a missing
    /// `Footage_raw` is the one fatal precondition of the phase.
    pub fn raw_root(&self) -> Result<PathBuf> {
        let raw = self.project_root.join(RAW_DIR);
        if !raw.is_dir() {
            return Err(Error::FootageRawMissing(
                self.project_root.display().to_string(),
            ));
        }
        Ok(raw)
    }

    /// Run the placeholder-creation phase.
    ///
    /// `progress` is called before each file with (index, total,
    /// filename); the caller renders it however it likes.
    pub async fn run(
        &self,
        mut progress: impl FnMut(usize, usize, &str),
    ) -> Result<(OrganizeSummary, Vec<PlannedFile>)> {
        let raw_root = self.raw_root()?;
        let files = scanner::scan(&raw_root, self.filter)?;

        let mut summary = OrganizeSummary {
            total: files.len(),
            ..Default::default()
        };
        let mut planned = Vec::with_capacity(files.len());

        for (idx, file) in files.iter().enumerate() {
            progress(idx, files.len(), &file.filename);

            match self.process_file(&raw_root, file).await {
                Ok(plan) => {
                    summary.created += 1;
                    if !plan.dated {
                        summary.invalid_date += 1;
                    }
                    if plan.kept_via_mtime {
                        summary.kept_via_mtime += 1;
                    }
                    planned.push(plan);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Failed to organize {}: {}", file.filename, e);
                }
            }
        }

        Ok((summary, planned))
    }

    async fn process_file(&self, raw_root: &Path, file: &MediaFile) -> Result<PlannedFile> {
        let source = classifier::classify(raw_root, &file.path);
        let outcome = resolver::resolve(file, &source, &self.config).await;

        // Technical metadata and raw dumps come from the evidence file,
        // so stabilized clips inherit their original's stream data.
        let (video_metadata, raw_metadata) = match file.media_type {
            MediaType::Video => {
                let tech = match ffprobe::technical_metadata(&outcome.effective_path).await {
                    Ok(tech) => tech,
                    Err(f) => {
                        tracing::warn!("No technical metadata for {}: {}", file.filename, f);
                        Default::default()
                    }
                };
                let profile = colorprofile::detect(&tech);
                let raw = RawMetadata {
                    ffprobe: ffprobe::raw_dump(&outcome.effective_path).await,
                    exiftool: exiftool::raw_dump(&outcome.effective_path).await,
                };
                (Some(VideoMetadataSection::from_parts(&tech, &profile)), raw)
            }
            MediaType::Photo => (
                None,
                RawMetadata {
                    ffprobe: json!({}),
                    exiftool: exiftool::raw_dump(&outcome.effective_path).await,
                },
            ),
        };

        let plan = namer::plan(file, &source, &outcome.resolution, &self.config);

        let codec = self.format.codec();
        let placeholder_name = Path::new(&plan.filename)
            .with_extension(codec.extension())
            .to_string_lossy()
            .to_string();
        let bucket_dir = self.output_root.join(&plan.bucket);
        let placeholder_path = unique_path(&bucket_dir.join(&placeholder_name));

        let doc = build_doc(file, &source, &outcome, video_metadata, raw_metadata);

        if self.config.simulate {
            tracing::info!(
                "[SIMULATE] {} -> {}",
                file.filename,
                placeholder_path.display()
            );
        } else {
            std::fs::create_dir_all(&bucket_dir)?;
            codec.write(&placeholder_path, &doc)?;
            tracing::debug!("{} -> {}", file.filename, placeholder_path.display());
        }

        Ok(PlannedFile {
            original: file.path.clone(),
            placeholder: placeholder_path,
            dated: plan.dated,
            kept_via_mtime: plan.kept_via_mtime,
        })
    }
}

fn build_doc(
    file: &MediaFile,
    source: &crate::models::media::SourceClass,
    outcome: &resolver::ResolutionOutcome,
    video_metadata: Option<VideoMetadataSection>,
    raw_metadata: RawMetadata,
) -> PlaceholderDoc {
    let (placeholder_info, file_info, source_detection) =
        PlaceholderDoc::identity_sections(file, source, Local::now().naive_local());

    let (resolved_local, resolved_provenance) = match &outcome.resolution {
        TimestampResolution::Resolved(ts) => (
            Some(ts.local.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Some(ts.provenance.to_string()),
        ),
        TimestampResolution::Unresolved => (None, None),
    };

    let drone = outcome.drone.as_ref().map(|d| DroneTimestamps {
        utc_iso: d
            .utc_reference
            .map(|utc| utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        local_iso: resolved_local.clone().unwrap_or_default(),
        source_tag: source.source_tag.clone(),
        time_diff_minutes: d.time_diff_minutes,
        decision_info: Some(d.decision.clone()),
    });

    let (exiftool_datetime, exiftool_status) = match &outcome.sidecar {
        Some(sidecar) => (
            sidecar.value().map(String::from),
            sidecar.status(),
        ),
        None => (None, "not consulted".to_string()),
    };

    PlaceholderDoc {
        placeholder_info,
        file_info,
        source_detection,
        timestamps: TimestampEvidence {
            filename_time: outcome.filename_time.clone(),
            exiftool_datetime,
            exiftool_status,
            drone,
            resolved_local,
            resolved_provenance,
        },
        video_metadata,
        raw_metadata,
        transfer_info: None,
    }
}
