//! News Feed Sync Library
//!
//! An offline-first cache and sync engine for a categorized news feed. Fetches
//! the category index, the articles of each followed category and their images,
//! and keeps everything on disk so a reader works without a network.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
