//! Footage Organizer CLI
//!
//! A command-line tool for organizing raw footage archives (drone, phone,
//! camera) by capture date and source, via lightweight placeholder records.

use clap::Parser;
use footage_organizer::cli::{
    args::{Cli, Commands},
    commands::{inspect, metadata, organize, timezones, transfer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run the appropriate command
    match cli.command {
        Commands::Organize {
            project_root,
            output,
            tz,
            simulate,
            format,
            include_photos,
            photos_only,
        } => {
            organize::organize(
                &project_root,
                output.as_deref(),
                &tz,
                simulate,
                &format,
                include_photos,
                photos_only,
            )
            .await?;
        }

        Commands::Metadata { project_root, dry_run } => {
            metadata::metadata(&project_root, dry_run)?;
        }

        Commands::Transfer { project_root, copy, verify_only } => {
            transfer::transfer(&project_root, copy, verify_only)?;
        }

        Commands::Inspect { file, raw_root, tz, json } => {
            inspect::inspect(&file, raw_root.as_deref(), &tz, json).await?;
        }

        Commands::Timezones => {
            timezones::timezones()?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("footage_organizer=debug")
    } else {
        EnvFilter::new("footage_organizer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
