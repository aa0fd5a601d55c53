//! Data models for the News API wire format and the view built on top of it.
//!
//! This module defines the structures exchanged with the backend:
//! - [`Article`]: A news item as reported by the backend
//! - [`ArticleResult`]: An article paired with its generated summary and sentiment
//! - [`Sentiment`]: The coarse classification label attached by the backend
//! - Envelopes: [`CategoriesResponse`], [`Welcome`]
//! - [`SearchSnapshot`]: Exported copy of a result set
//!
//! Field names are snake_case on the wire, so no renaming is needed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A news item as returned inside every search result.
///
/// `description` and `content` are optional on the backend and may arrive as
/// `null`; the remaining fields are always present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// The article title/headline.
    pub title: String,
    /// Short description supplied by the publisher.
    #[serde(default)]
    pub description: Option<String>,
    /// Truncated body text supplied by the publisher.
    #[serde(default)]
    pub content: Option<String>,
    /// Link to the full article on the publisher's site.
    pub url: String,
    /// Publisher name (e.g. "BBC News").
    pub source: String,
    /// Publication timestamp, usually RFC 3339 (e.g. `2025-05-06T14:30:00Z`).
    pub published_at: String,
}

/// One element of the `/api/news` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleResult {
    /// The underlying article.
    pub article: Article,
    /// Backend-generated summary of the article content.
    pub summary: String,
    /// Backend-generated sentiment label.
    pub sentiment: Sentiment,
}

/// Sentiment label attached to an article by the backend.
///
/// The backend currently emits `"positive"` or `"negative"`. Any other label is
/// kept verbatim in [`Sentiment::Other`] so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Other(String),
}

impl Sentiment {
    /// Only an exact `"positive"` counts as positive.
    pub fn is_positive(&self) -> bool {
        matches!(self, Sentiment::Positive)
    }

    /// The label as the backend sent it.
    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Other(label) => label,
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Other(label),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(label: &str) -> Self {
        Sentiment::from(label.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.label().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Body of `GET /`, the backend's banner.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Welcome {
    pub message: String,
}

/// Parameters of a single `/api/news` request.
///
/// Captured when the request is issued so a late response can still be
/// attributed to the selection that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    pub category: String,
    pub query: String,
}

impl SearchParams {
    pub fn new(category: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            query: query.into(),
        }
    }
}

/// A saved copy of the results on screen, as written by the JSON exporter.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchSnapshot {
    /// Local date the snapshot was taken, `YYYY-MM-DD`.
    pub local_date: String,
    /// Local time the snapshot was taken, `HH:MM:SS`.
    pub local_time: String,
    pub category: String,
    pub query: String,
    pub results: Vec<ArticleResult>,
}
