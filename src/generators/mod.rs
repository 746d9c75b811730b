//! Output file generators.

pub mod csv;
