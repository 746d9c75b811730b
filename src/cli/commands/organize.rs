//! Organize command implementation.
//!
//! Phase 1 of the pipeline: resolves, classifies, and names every file
//! under Footage_raw, writing one placeholder per file into the sorted
//! tree.

use crate::core::organizer::{Organizer, SORTED_DIR};
use crate::core::scanner::MediaFilter;
use crate::models::config::{OrganizeConfig, TimeAdjustments, TIME_ADJUST_CONFIG};
use crate::placeholder::PlaceholderFormat;
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub async fn organize(
    project_root: &Path,
    output: Option<&Path>,
    tz: &str,
    simulate: bool,
    format: &str,
    include_photos: bool,
    photos_only: bool,
) -> Result<()> {
    println!("{}", "[ORGANIZE] Creating placeholders...".bold().cyan());
    println!();

    let mut config = OrganizeConfig::new(tz)?;
    config.simulate = simulate;
    config.adjustments = TimeAdjustments::load(&project_root.join(TIME_ADJUST_CONFIG))?;

    let format: PlaceholderFormat = format.parse()?;
    let filter = MediaFilter {
        videos: !photos_only,
        photos: include_photos || photos_only,
    };

    let organizer = Organizer {
        project_root: project_root.to_path_buf(),
        output_root: output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(SORTED_DIR)),
        config,
        filter,
        format,
    };

    println!("  {} {}", "Project root:".bold(), project_root.display());
    println!("  {} {}", "Output:".bold(), organizer.output_root.display());
    println!("  {} {}", "Timezone:".bold(), tz);
    if simulate {
        println!("  {}", "[SIMULATE] No changes will be written".yellow());
    }
    println!();

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let (summary, planned) = organizer
        .run(|idx, total, name| {
            if idx == 0 {
                pb.set_length(total as u64);
            }
            pb.set_position(idx as u64);
            pb.set_message(name.to_string());
        })
        .await?;
    pb.finish_and_clear();

    println!("{}", "[Summary]".bold());
    println!("  Total files:      {}", summary.total);
    println!("  {} {}", "Created:".green(), summary.created);
    if summary.failed > 0 {
        println!("  {} {}", "Failed:".red(), summary.failed);
    } else {
        println!("  Failed:           0");
    }
    println!("  Invalid date:     {}", summary.invalid_date);
    if summary.kept_via_mtime > 0 {
        println!("  Kept via mtime:   {}", summary.kept_via_mtime);
    }

    if summary.invalid_date > 0 {
        println!();
        println!("{}", "[Invalid date bucket]".bold().yellow());
        for plan in planned.iter().filter(|p| !p.dated) {
            println!("  {}", plan.placeholder.display());
        }
    }

    if simulate {
        println!();
        println!(
            "{}",
            "[SIMULATE] No changes were written. Re-run without --simulate to apply.".yellow()
        );
    }

    Ok(())
}
