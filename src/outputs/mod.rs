//! Export of the final result set.
//!
//! # Submodules
//!
//! - [`json`]: Writes a `SearchSnapshot` to a dated JSON file
//! - [`markdown`]: Converts the view to a Markdown document
//!
//! Exports are written once, after the last search has settled. A failed
//! export is logged and does not change the exit status.

pub mod json;
pub mod markdown;
