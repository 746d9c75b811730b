//! Transfer command implementation.
//!
//! Phase 2 of the pipeline: reconciles the placeholders against the
//! real filesystem and copies (or moves) the media files into the
//! final Footage/ layout.

use crate::core::transfer::{Reconciler, TransferMode, TransferSummary};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

pub fn transfer(project_root: &Path, copy: bool, verify_only: bool) -> Result<()> {
    let mode = if copy {
        TransferMode::Copy
    } else {
        TransferMode::Move
    };

    println!("{}", "[TRANSFER] Reconciling placeholders...".bold().cyan());
    println!("  {} {}", "Project root:".bold(), project_root.display());
    println!(
        "  {} {}",
        "Mode:".bold(),
        if copy { "copy (originals kept)" } else { "move (originals deleted after full success)" }
    );
    println!();

    let reconciler = Reconciler {
        project_root: project_root.to_path_buf(),
        mode,
    };

    if verify_only {
        let summary = reconciler.verify()?;
        print_summary(&summary, true);
        return Ok(());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let summary = reconciler.run(|idx, total, name| {
        if idx == 0 {
            pb.set_length(total as u64);
        }
        pb.set_position(idx as u64);
        pb.set_message(name.to_string());
    })?;
    pb.finish_and_clear();

    print_summary(&summary, false);

    // Exit non-zero when anything failed.
    summary.into_result()?;
    Ok(())
}

fn print_summary(summary: &TransferSummary, verify_only: bool) {
    println!("{}", "[Summary]".bold());
    println!("  Total placeholders: {}", summary.total);
    if verify_only {
        println!("  Ready to transfer:  {}", summary.transferred);
    } else {
        println!("  {} {}", "Transferred:".green(), summary.transferred);
        if summary.failed > 0 {
            println!("  {} {}", "Failed:".red(), summary.failed);
        }
        if summary.deleted > 0 {
            println!("  Originals deleted:  {}", summary.deleted);
        }
    }
    if !summary.missing.is_empty() {
        println!();
        println!("{}", "[Missing originals]".bold().yellow());
        for path in &summary.missing {
            println!("  {}", path.display());
        }
    }
}
