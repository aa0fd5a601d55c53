//! Turning [`SearchState`] into something a person can read.
//!
//! Rendering happens in two steps: the state is first mapped to small view
//! models ([`CategoryOption`], [`ArticleCard`], [`Badge`]) that carry every
//! display decision, then [`TextRenderer`] lays those out for the terminal.
//! The Markdown exporter in [`crate::outputs::markdown`] reuses the same view
//! models.

use crate::models::{ArticleResult, Sentiment};
use crate::utils::upcase;
use crate::view::SearchState;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use crossterm::style::Stylize;
use std::fmt::{self, Write};

pub const TITLE: &str = "News Summarizer & Sentiment Analysis";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const RULE_WIDTH: usize = 72;

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Selector entries in backend order, labels with an upper-cased first letter.
pub fn category_options(categories: &[String]) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|category| CategoryOption {
            value: category.clone(),
            label: upcase(category),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

impl Badge {
    /// `"positive"` is affirmative; every other label, known or not, is negative.
    pub fn for_sentiment(sentiment: &Sentiment) -> Self {
        let tone = if sentiment.is_positive() {
            BadgeTone::Affirmative
        } else {
            BadgeTone::Negative
        };
        Self {
            label: sentiment.label().to_string(),
            tone,
        }
    }
}

/// Display-ready fields of one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub title: String,
    pub source: String,
    pub published: String,
    pub badge: Badge,
    pub summary: String,
    pub url: String,
}

impl ArticleCard {
    pub fn from_result(result: &ArticleResult, date_format: &str) -> Self {
        Self {
            title: result.article.title.clone(),
            source: result.article.source.clone(),
            published: format_published(&result.article.published_at, date_format),
            badge: Badge::for_sentiment(&result.sentiment),
            summary: result.summary.clone(),
            url: result.article.url.clone(),
        }
    }
}

/// One card per result, in result order.
pub fn cards(state: &SearchState, date_format: &str) -> Vec<ArticleCard> {
    state
        .results
        .iter()
        .map(|result| ArticleCard::from_result(result, date_format))
        .collect()
}

/// Format a publish timestamp as a local calendar date.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` timestamp or a bare date.
/// Anything else, or a format string chrono cannot render, is shown as received.
pub fn format_published(raw: &str, date_format: &str) -> String {
    format_published_in(raw, date_format, &Local)
}

/// [`format_published`] with the offset timestamps are converted to.
pub fn format_published_in<Tz>(raw: &str, date_format: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let written = if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        write!(out, "{}", ts.with_timezone(tz).format(date_format))
    } else if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        write!(out, "{}", ts.format(date_format))
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        write!(out, "{}", date.format(date_format))
    } else {
        return raw.to_string();
    };

    match written {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}

/// Plain-text layout of the whole view, optionally with ANSI colours.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub color: bool,
    pub date_format: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            color: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl TextRenderer {
    pub fn new(color: bool, date_format: impl Into<String>) -> Self {
        Self {
            color,
            date_format: date_format.into(),
        }
    }

    pub fn render_view(&self, state: &SearchState) -> String {
        let mut out = String::new();
        writeln!(out, "{}", self.heading(TITLE)).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "{}", self.render_controls(state)).unwrap();

        for card in cards(state, &self.date_format) {
            writeln!(out).unwrap();
            out.push_str(&self.render_card(&card));
        }
        out
    }

    /// Category selector, query field and search control.
    pub fn render_controls(&self, state: &SearchState) -> String {
        let options = category_options(&state.categories);
        let selector = if options.is_empty() {
            format!("Category: {}", upcase(&state.category))
        } else {
            let entries: Vec<String> = options
                .iter()
                .map(|opt| {
                    if opt.value == state.category {
                        format!("[{}]", opt.label)
                    } else {
                        opt.label.clone()
                    }
                })
                .collect();
            format!("Category: {}", entries.join("  "))
        };

        let query = if state.query.is_empty() {
            "Search Query: (none)".to_string()
        } else {
            format!("Search Query: {}", state.query)
        };

        let control = if state.loading {
            "[ Searching… ]"
        } else {
            "[ Search ]"
        };

        format!("{}\n{}\n{}", selector, query, control)
    }

    pub fn render_card(&self, card: &ArticleCard) -> String {
        let mut out = String::new();
        writeln!(out, "{}", "─".repeat(RULE_WIDTH)).unwrap();
        writeln!(out, "{}  {}", self.heading(&card.title), self.badge(&card.badge)).unwrap();
        writeln!(
            out,
            "Source: {} | Published: {}",
            card.source, card.published
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Summary: {}", card.summary).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Read Full Article: {}", card.url).unwrap();
        out
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn badge(&self, badge: &Badge) -> String {
        let text = format!("[{}]", badge.label);
        if !self.color {
            return text;
        }
        match badge.tone {
            BadgeTone::Affirmative => text.green().to_string(),
            BadgeTone::Negative => text.red().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::result;

    fn plain() -> TextRenderer {
        TextRenderer::new(false, DEFAULT_DATE_FORMAT)
    }

    #[test]
    fn test_category_options_are_capitalized() {
        let options = category_options(&["general".to_string(), "tech".to_string()]);
        assert_eq!(
            options,
            vec![
                CategoryOption {
                    value: "general".to_string(),
                    label: "General".to_string()
                },
                CategoryOption {
                    value: "tech".to_string(),
                    label: "Tech".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_badge_mapping_is_binary() {
        assert_eq!(
            Badge::for_sentiment(&Sentiment::Positive).tone,
            BadgeTone::Affirmative
        );
        assert_eq!(
            Badge::for_sentiment(&Sentiment::Negative).tone,
            BadgeTone::Negative
        );
        let neutral = Badge::for_sentiment(&Sentiment::from("neutral"));
        assert_eq!(neutral.tone, BadgeTone::Negative);
        assert_eq!(neutral.label, "neutral");
    }

    #[test]
    fn test_two_results_render_two_cards_in_order() {
        let state = SearchState {
            results: vec![result("Alpha", "positive"), result("Beta", "negative")],
            ..SearchState::default()
        };

        let cards = cards(&state, DEFAULT_DATE_FORMAT);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Alpha");
        assert_eq!(cards[1].title, "Beta");

        let text = plain().render_view(&state);
        assert_eq!(text.matches("Read Full Article:").count(), 2);
        assert!(text.find("Alpha").unwrap() < text.find("Beta").unwrap());
    }

    #[test]
    fn test_card_fields() {
        let card = ArticleCard::from_result(&result("Alpha", "positive"), DEFAULT_DATE_FORMAT);
        let text = plain().render_card(&card);
        assert!(text.contains("Alpha  [positive]"));
        let local_date = DateTime::parse_from_rfc3339("2025-05-06T12:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .format(DEFAULT_DATE_FORMAT)
            .to_string();
        assert!(text.contains(&format!(
            "Source: Example Times | Published: {}",
            local_date
        )));
        assert!(text.contains("Summary: Summary of Alpha"));
        assert!(text.contains("Read Full Article: https://example.com/alpha"));
    }

    #[test]
    fn test_controls_mark_selection_and_loading() {
        let state = SearchState {
            categories: vec!["general".to_string(), "tech".to_string()],
            category: "tech".to_string(),
            loading: true,
            ..SearchState::default()
        };
        let controls = plain().render_controls(&state);
        assert!(controls.contains("Category: General  [Tech]"));
        assert!(controls.contains("Search Query: (none)"));
        assert!(controls.contains("[ Searching… ]"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let state = SearchState {
            results: vec![result("Alpha", "negative")],
            ..SearchState::default()
        };
        assert!(!plain().render_view(&state).contains('\u{1b}'));
    }

    #[test]
    fn test_colored_badges_differ_by_tone() {
        let renderer = TextRenderer::default();
        let good = renderer.badge(&Badge::for_sentiment(&Sentiment::Positive));
        let bad = renderer.badge(&Badge::for_sentiment(&Sentiment::from("neutral")));
        assert!(good.contains('\u{1b}'));
        assert_ne!(
            good.replace("positive", ""),
            bad.replace("neutral", "")
        );
    }

    #[test]
    fn test_format_published() {
        assert_eq!(
            format_published_in("2025-05-06T12:00:00Z", "%Y-%m-%d", &chrono::Utc),
            "2025-05-06"
        );
        assert_eq!(
            format_published("2025-05-06T12:00:00", "%d/%m/%Y"),
            "06/05/2025"
        );
        assert_eq!(format_published("2025-05-06", "%Y-%m-%d"), "2025-05-06");
        assert_eq!(format_published("yesterday", "%Y-%m-%d"), "yesterday");
    }

    #[test]
    fn test_format_published_converts_offset() {
        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            format_published_in("2025-05-06T20:00:00Z", "%Y-%m-%d", &tokyo),
            "2025-05-07"
        );
        let honolulu = chrono::FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(
            format_published_in("2025-05-06T05:00:00+00:00", "%d/%m/%Y", &honolulu),
            "05/05/2025"
        );
    }

    #[test]
    fn test_unrenderable_format_shows_raw_value() {
        assert_eq!(
            format_published_in("2025-05-06T12:00:00Z", "%Q", &chrono::Utc),
            "2025-05-06T12:00:00Z"
        );
    }
}
