//! Core business logic: discovery, classification, timestamp
//! resolution, naming, color assignment, and the two batch phases.

pub mod classifier;
pub mod colorprofile;
pub mod namer;
pub mod organizer;
pub mod palette;
pub mod resolver;
pub mod scanner;
pub mod transfer;
