//! Command-line interface definitions for News Search.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags left unset fall back to the config file, then to built-in defaults
//! (see [`crate::config`]).

use crate::view::ApplyPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Search application.
///
/// # Examples
///
/// ```sh
/// # Show the default front page (category "general", no query)
/// news_search
///
/// # One-off search, saved as JSON
/// news_search -c technology -q "open source" --json-output-dir ./json
///
/// # Interactive session against a remote backend
/// news_search -i --api-url http://news.internal:8000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the News API
    #[arg(long, env = "NEWS_API_URL")]
    pub api_url: Option<String>,

    /// Category to search first
    #[arg(short, long)]
    pub category: Option<String>,

    /// Free-text query to search first
    #[arg(short, long)]
    pub query: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep reading commands from stdin after the first search
    #[arg(short, long)]
    pub interactive: bool,

    /// How search responses that arrive out of order are applied
    #[arg(long, value_enum)]
    pub policy: Option<ApplyPolicy>,

    /// Retry each failed request up to N times
    #[arg(long)]
    pub retries: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// chrono format string for publish dates
    #[arg(long)]
    pub date_format: Option<String>,

    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,

    /// Write the final results as JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Write the final results as Markdown to this file
    #[arg(short, long)]
    pub markdown_output: Option<String>,

    /// Print the backend's welcome banner and exit
    #[arg(long)]
    pub check: bool,
}
