//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Footage Organizer - Organize raw footage archives by capture date and source
#[derive(Parser, Debug)]
#[command(name = "footage-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create placeholder records for every media file under Footage_raw
    Organize {
        /// Project root folder containing Footage_raw/
        #[arg(value_name = "PROJECT_ROOT")]
        project_root: PathBuf,

        /// Where to create the organized placeholders
        /// (default: Footage_metadata_sorted in the project root)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Target timezone for drone UTC conversion (IANA identifier)
        #[arg(long, default_value = "America/Montreal")]
        tz: String,

        /// Compute every decision without writing anything
        #[arg(long)]
        simulate: bool,

        /// Placeholder encoding: json or text
        #[arg(long, default_value = "json")]
        format: String,

        /// Process photos as well as videos
        #[arg(long)]
        include_photos: bool,

        /// Process photos only
        #[arg(long, conflicts_with = "include_photos")]
        photos_only: bool,
    },

    /// Generate Footage/metadata.csv from the organized placeholders
    Metadata {
        /// Project root folder containing Footage_metadata_sorted/
        #[arg(value_name = "PROJECT_ROOT")]
        project_root: PathBuf,

        /// Show the per-group summary without writing the CSV
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy or move the real files into the final Footage/ layout
    Transfer {
        /// Project root folder containing Footage_metadata_sorted/
        #[arg(value_name = "PROJECT_ROOT")]
        project_root: PathBuf,

        /// Copy instead of move (originals are kept)
        #[arg(long)]
        copy: bool,

        /// Analyze and report without transferring anything
        #[arg(long)]
        verify_only: bool,
    },

    /// Show every piece of metadata evidence for one file
    Inspect {
        /// Media file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Raw footage root used for source classification
        #[arg(long, value_name = "DIR")]
        raw_root: Option<PathBuf>,

        /// Target timezone for drone UTC conversion (IANA identifier)
        #[arg(long, default_value = "America/Montreal")]
        tz: String,

        /// Emit the full evidence as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available IANA timezone identifiers
    Timezones,
}
