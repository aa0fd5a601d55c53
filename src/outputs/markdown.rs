//! Markdown export of the results on screen.
//!
//! Uses the same card view models as the terminal renderer, so a badge that is
//! green on screen is marked positive in the document too.

use crate::render::{BadgeTone, TITLE, cards, category_options};
use crate::utils::upcase;
use crate::view::SearchState;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

pub fn state_to_markdown(state: &SearchState, date_format: &str) -> String {
    let mut md = String::new();
    writeln!(md, "# {}\n", TITLE).unwrap();

    let label = category_options(&state.categories)
        .into_iter()
        .find(|opt| opt.value == state.category)
        .map(|opt| opt.label)
        .unwrap_or_else(|| upcase(&state.category));
    write!(md, "**Category:** {}", label).unwrap();
    if !state.query.is_empty() {
        write!(md, " · **Search Query:** {}", state.query).unwrap();
    }
    writeln!(md, "\n").unwrap();

    let cards = cards(state, date_format);
    if cards.is_empty() {
        writeln!(md, "_No articles._").unwrap();
        return md;
    }

    for card in cards {
        let marker = match card.badge.tone {
            BadgeTone::Affirmative => "🟢",
            BadgeTone::Negative => "🔴",
        };
        writeln!(md, "## {}\n", card.title).unwrap();
        writeln!(md, "{} `{}`\n", marker, card.badge.label).unwrap();
        writeln!(
            md,
            "_Source: {} | Published: {}_\n",
            card.source, card.published
        )
        .unwrap();
        writeln!(md, "**Summary:** {}\n", card.summary).unwrap();
        writeln!(md, "[Read Full Article]({})\n", card.url).unwrap();
    }
    md
}

#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn write_markdown(path: &str, markdown: &str) -> Result<(), Box<dyn Error>> {
    fs::write(path, markdown).await?;
    info!(bytes = markdown.len(), "Wrote Markdown");
    Ok(())
}
