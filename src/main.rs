//! # News Search
//!
//! A terminal client for a summarizing News API. The backend fetches headlines,
//! summarizes each article and labels its sentiment; this client picks the
//! category and query, fetches the enriched articles and renders them as cards.
//!
//! ## Features
//!
//! - Category selector populated from the backend, free-text query
//! - Cards with title, source, publish date, sentiment badge, summary and link
//! - One-shot mode (print and exit) or an interactive session
//! - Opt-in retry with exponential backoff, per-request timeout
//! - Choice between last-response-wins and latest-request-wins ordering
//! - JSON and Markdown export of the final result set
//!
//! ## Usage
//!
//! ```sh
//! news_search -c technology -q "open source"
//! news_search -i --api-url http://localhost:8000
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: defaults, optional YAML file, CLI flags
//! 2. **Mount**: load categories and run the first search concurrently
//! 3. **Interaction**: apply responses as they arrive (interactive mode only)
//! 4. **Output**: render to stdout, optionally export JSON and Markdown

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod render;
mod repl;
#[cfg(test)]
mod test_support;
mod utils;
mod view;

use api::{HttpNewsApi, NewsApi, RetryNewsApi};
use cli::Cli;
use config::AppConfig;
use outputs::{json, markdown};
use render::TextRenderer;
use utils::ensure_writable_dir;
use view::NewsSearchView;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = AppConfig::resolve(&args).await?;
    let http = HttpNewsApi::new(&config.api_url, config.timeout())?;
    let api = RetryNewsApi::new(http, config.retries, StdDuration::from_secs(1));

    if args.check {
        let welcome = api.welcome().await?;
        println!("{}", welcome.message);
        return Ok(());
    }

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let renderer = TextRenderer::new(config.color, config.date_format.clone());
    let mut view = NewsSearchView::new(api, config.policy);
    view.set_category(&config.default_category);
    if let Some(query) = &args.query {
        view.set_query(query);
    }

    info!(
        api_url = %view.api().inner().base_url(),
        policy = ?view.policy(),
        retries = config.retries,
        "news_search starting up"
    );

    view.mount();

    if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout().lock();
        repl::run(&mut view, &renderer, stdin, &mut stdout).await?;
    } else {
        view.settle().await;
        print!("{}", renderer.render_view(view.state()));
    }

    // ---- Exports ----
    if let Some(dir) = &args.json_output_dir {
        let snapshot = json::snapshot(view.state(), Local::now());
        if let Err(e) = json::write_snapshot(&snapshot, dir).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    if let Some(path) = &args.markdown_output {
        let md = markdown::state_to_markdown(view.state(), &config.date_format);
        if let Err(e) = markdown::write_markdown(path, &md).await {
            error!(path = %path, error = %e, "Failed writing Markdown");
        }
    }

    if view.state().results.is_empty() {
        warn!("No articles to show");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = view.state().results.len(),
        "Execution complete"
    );

    Ok(())
}
