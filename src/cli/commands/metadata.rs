//! Metadata command implementation.
//!
//! Builds Footage/metadata.csv from the video placeholders in the
//! sorted tree, assigning clip colors over the complete group set.

use crate::generators::csv;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub fn metadata(project_root: &Path, dry_run: bool) -> Result<()> {
    println!("{}", "[METADATA] Generating metadata.csv...".bold().cyan());
    println!();

    let built = csv::build(project_root)?;

    println!("{}", "[Groups]".bold());
    for (group, color, count) in built.group_counts() {
        println!("  {}: {} file(s) -> {}", group.bold(), count, color.green());
    }
    println!();

    if dry_run {
        println!("  Total rows: {}", built.rows.len());
        println!(
            "{}",
            format!("[DRY RUN] Would write to: {}", built.csv_path.display()).yellow()
        );
        return Ok(());
    }

    built.write()?;
    println!(
        "{} {} row(s) -> {}",
        "[OK]".bold().green(),
        built.rows.len(),
        built.csv_path.display()
    );

    Ok(())
}
