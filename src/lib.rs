//! Footage Organizer Library
//!
//! A library for organizing a raw media archive (drone, phone, action
//! camera footage) by inferred capture date and device source, using
//! lightweight placeholder files instead of moving the real media.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod placeholder;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
