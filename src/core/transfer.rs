//! Phase-2 reconciliation: copy/move real media files into the final
//! layout declared by the placeholders.
//!
//! Copies are size-verified; a mismatch deletes the partial destination
//! and fails that file only. Move mode deletes originals strictly after
//! the whole batch copied cleanly: one failed copy anywhere and nothing
//! is deleted.

use crate::core::organizer::{FINAL_DIR, SORTED_DIR};
use crate::placeholder::{self, set_location_any};
use crate::utils::fs::{copy_with_verification, unique_path};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

#[derive(Debug, Default)]
pub struct TransferSummary {
    pub total: usize,
    pub transferred: usize,
    pub failed: usize,
    /// Originals the placeholders point at that no longer exist.
    pub missing: Vec<PathBuf>,
    pub deleted: usize,
}

impl TransferSummary {
    /// The exit-code contract: non-zero when any transfer failed.
    pub fn into_result(self) -> Result<TransferSummary> {
        if self.failed > 0 {
            Err(Error::TransferIncomplete {
                failed: self.failed,
                total: self.total,
            })
        } else {
            Ok(self)
        }
    }
}

/// One placeholder with its reconciled source and destination.
struct TransferItem {
    placeholder: PathBuf,
    original: PathBuf,
    dest: PathBuf,
}

pub struct Reconciler {
    pub project_root: PathBuf,
    pub mode: TransferMode,
}

impl Reconciler {
    fn sorted_dir(&self) -> Result<PathBuf> {
        let dir = self.project_root.join(SORTED_DIR);
        if !dir.is_dir() {
            return Err(Error::SortedDirMissing(
                self.project_root.display().to_string(),
            ));
        }
        Ok(dir)
    }

    fn find_placeholders(&self, sorted_dir: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for entry in WalkDir::new(sorted_dir).into_iter().flatten() {
            if entry.file_type().is_file() && placeholder::is_placeholder(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        found
    }

    /// Reconcile every placeholder against the filesystem: which
    /// originals still exist and where each file will land. No writes.
    fn analyze(&self) -> Result<(Vec<TransferItem>, Vec<PathBuf>)> {
        let sorted_dir = self.sorted_dir()?;
        let output_dir = self.project_root.join(FINAL_DIR);

        let mut items = Vec::new();
        let mut missing = Vec::new();

        for placeholder_path in self.find_placeholders(&sorted_dir) {
            let doc = match placeholder::read_any(&placeholder_path) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Skipping unreadable placeholder: {}", e);
                    continue;
                }
            };

            let original = PathBuf::from(doc.current_location());
            if !original.exists() {
                tracing::warn!("Original missing for {}: {}", placeholder_path.display(), original.display());
                missing.push(original);
                continue;
            }

            // Same relative layout as the placeholder tree, with the
            // placeholder extension swapped back to the media one.
            let relpath = placeholder_path
                .strip_prefix(&sorted_dir)
                .unwrap_or(&placeholder_path)
                .to_path_buf();
            let mut dest = output_dir.join(relpath);
            if let Some(ext) = original.extension() {
                dest.set_extension(ext);
            }

            items.push(TransferItem {
                placeholder: placeholder_path,
                original,
                dest,
            });
        }

        Ok((items, missing))
    }

    /// Report what a transfer would do, without writing anything.
    pub fn verify(&self) -> Result<TransferSummary> {
        let (items, missing) = self.analyze()?;
        Ok(TransferSummary {
            total: items.len() + missing.len(),
            transferred: items.len(),
            failed: 0,
            missing,
            deleted: 0,
        })
    }

    /// Run the transfer. `progress` is called before each copy with
    /// (index, total, filename).
    pub fn run(&self, mut progress: impl FnMut(usize, usize, &str)) -> Result<TransferSummary> {
        let (items, missing) = self.analyze()?;

        let mut summary = TransferSummary {
            total: items.len() + missing.len(),
            missing,
            ..Default::default()
        };
        let mut copied: Vec<TransferItem> = Vec::new();

        for (idx, mut item) in items.into_iter().enumerate() {
            let name = item
                .original
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress(idx, summary.total, &name);

            item.dest = unique_path(&item.dest);
            match copy_with_verification(&item.original, &item.dest) {
                Ok(_) => {
                    if let Err(e) = set_location_any(&item.placeholder, &item.dest.display().to_string()) {
                        tracing::warn!("Could not update placeholder {}: {}", item.placeholder.display(), e);
                    }
                    summary.transferred += 1;
                    copied.push(item);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Transfer failed for {}: {}", item.original.display(), e);
                }
            }
        }

        if self.mode == TransferMode::Move {
            if summary.failed == 0 {
                for item in &copied {
                    // Re-verify before the destructive step.
                    let sizes_match = match (
                        std::fs::metadata(&item.original),
                        std::fs::metadata(&item.dest),
                    ) {
                        (Ok(src), Ok(dest)) => src.len() == dest.len(),
                        _ => false,
                    };
                    if !sizes_match {
                        tracing::error!(
                            "Skipping deletion of {}: destination no longer verifies",
                            item.original.display()
                        );
                        continue;
                    }
                    match std::fs::remove_file(&item.original) {
                        Ok(()) => summary.deleted += 1,
                        Err(e) => tracing::error!(
                            "Could not delete {}: {}",
                            item.original.display(),
                            e
                        ),
                    }
                }
            } else {
                tracing::warn!(
                    "{} transfer(s) failed: keeping every original (all-or-nothing deletion)",
                    summary.failed
                );
            }
        }

        Ok(summary)
    }
}
