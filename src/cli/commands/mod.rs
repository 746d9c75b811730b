//! CLI command implementations.

pub mod inspect;
pub mod metadata;
pub mod organize;
pub mod timezones;
pub mod transfer;
