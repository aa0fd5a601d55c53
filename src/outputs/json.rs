//! JSON export of the results on screen.
//!
//! # Output Structure
//!
//! Files are organized by date, named after the selection and the time of day:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── general-083000.json
//!     └── technology-open-source-141502.json
//! ```

use crate::models::SearchSnapshot;
use crate::utils::slugify;
use crate::view::SearchState;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Copy the current selection and results into a [`SearchSnapshot`].
pub fn snapshot(state: &SearchState, now: DateTime<Local>) -> SearchSnapshot {
    SearchSnapshot {
        local_date: now.format("%Y-%m-%d").to_string(),
        local_time: now.format("%H:%M:%S").to_string(),
        category: state.category.clone(),
        query: state.query.clone(),
        results: state.results.clone(),
    }
}

/// File name for a snapshot: `{category}[-{query}]-{HHMMSS}.json`.
pub fn snapshot_filename(snapshot: &SearchSnapshot) -> String {
    let mut stem = slugify(&snapshot.category);
    let query = slugify(&snapshot.query);
    if !query.is_empty() {
        stem.push('-');
        stem.push_str(&query);
    }
    format!("{}-{}.json", stem, snapshot.local_time.replace(':', ""))
}

/// Write a [`SearchSnapshot`] to a JSON file with date-based directory structure.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &SearchSnapshot,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(&snapshot.local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = full_json_dir.join(snapshot_filename(snapshot));
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename.display(),
        count = snapshot.results.len(),
        "Wrote JSON snapshot"
    );

    Ok(output_json_filename)
}
