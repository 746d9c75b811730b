//! Timezones command implementation.

use crate::Result;
use chrono_tz::TZ_VARIANTS;
use colored::Colorize;

/// Print every IANA timezone identifier accepted by `organize --tz`.
pub fn timezones() -> Result<()> {
    println!("{}", "[Timezones] Available IANA identifiers".bold().cyan());
    println!();
    for tz in TZ_VARIANTS {
        println!("  {}", tz.name());
    }
    println!();
    println!("Total: {}", TZ_VARIANTS.len());
    Ok(())
}
