//! The News Search View: selection state, in-flight requests and how their
//! responses are applied.
//!
//! All requests are polled on the task that owns the view, so the state is
//! only ever mutated from one place. Issuing a request never blocks; the
//! caller drives completions with [`NewsSearchView::next_completion`] and
//! [`NewsSearchView::apply`], or drains everything with
//! [`NewsSearchView::settle`].
//!
//! # Ordering
//!
//! Searches are not mutually exclusive. Under [`ApplyPolicy::LastResponse`]
//! every successful response is applied in arrival order, so the final state
//! belongs to whichever response arrived last. Under
//! [`ApplyPolicy::LatestRequest`] each search gets an increasing id and a
//! response older than the last applied one is dropped.
//!
//! `loading` is set when a search is issued. Under `LastResponse` any settled
//! search clears it, even while another search is still in flight. Under
//! `LatestRequest` only the most recently issued search clears it.

use crate::api::{NewsApi, NewsApiError};
use crate::models::{ArticleResult, SearchParams};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Category selected before the user picks one, and whenever the selection is cleared.
pub const DEFAULT_CATEGORY: &str = "general";

/// How search responses that arrive out of order are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyPolicy {
    /// Apply every response in arrival order.
    #[default]
    LastResponse,
    /// Apply a response only if no newer search has been applied.
    LatestRequest,
}

/// Everything the renderer needs to draw the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    /// Selected category.
    pub category: String,
    /// Free-text query, may be empty.
    pub query: String,
    /// Categories offered by the backend, de-duplicated, in backend order.
    pub categories: Vec<String>,
    /// Results of the last applied search, in backend order.
    pub results: Vec<ArticleResult>,
    /// Set when a search is issued, cleared when a search settles.
    pub loading: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            query: String::new(),
            categories: Vec::new(),
            results: Vec::new(),
            loading: false,
        }
    }
}

impl SearchState {
    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.category.clone(), self.query.clone())
    }
}

pub type RequestId = u64;

/// The settled outcome of one in-flight request.
#[derive(Debug)]
pub enum Completion {
    Categories(Result<Vec<String>, NewsApiError>),
    Search {
        id: RequestId,
        params: SearchParams,
        outcome: Result<Vec<ArticleResult>, NewsApiError>,
    },
}

/// What [`NewsSearchView::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Categories { count: usize },
    CategoriesFailed,
    Results { id: RequestId, count: usize },
    SearchFailed { id: RequestId },
    Stale { id: RequestId },
}

pub struct NewsSearchView<A> {
    api: Rc<A>,
    state: SearchState,
    policy: ApplyPolicy,
    pending: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
    next_id: RequestId,
    newest_applied: Option<RequestId>,
}

impl<A> NewsSearchView<A>
where
    A: NewsApi + 'static,
{
    pub fn new(api: A, policy: ApplyPolicy) -> Self {
        Self {
            api: Rc::new(api),
            state: SearchState::default(),
            policy,
            pending: FuturesUnordered::new(),
            next_id: 1,
            newest_applied: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    /// Select a category. An empty selection falls back to [`DEFAULT_CATEGORY`].
    pub fn set_category(&mut self, category: &str) {
        let category = category.trim();
        self.state.category = if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.to_string()
        };
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.query = query.to_string();
    }

    /// Initial display: load categories and run the first search.
    pub fn mount(&mut self) {
        info!(category = %self.state.category, query = %self.state.query, "Mounting news search view");
        self.load_categories();
        self.search();
    }

    /// Issue `GET /api/categories`.
    pub fn load_categories(&mut self) {
        let api = Rc::clone(&self.api);
        self.pending
            .push(async move { Completion::Categories(api.categories().await) }.boxed_local());
    }

    /// Issue a search for the current selection and mark the view as loading.
    pub fn search(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        let params = self.state.params();
        debug!(id, category = %params.category, query = %params.query, "Issuing search");

        self.state.loading = true;

        let api = Rc::clone(&self.api);
        self.pending.push(
            async move {
                let outcome = api.search(&params).await;
                Completion::Search {
                    id,
                    params,
                    outcome,
                }
            }
            .boxed_local(),
        );
        id
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Wait for the next request to settle. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.pending.next().await
    }

    /// Fold one completion into the state.
    ///
    /// Failures never touch categories or results; they are logged and dropped.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        match completion {
            Completion::Categories(Ok(categories)) => {
                self.state.categories = categories.into_iter().unique().collect();
                info!(count = self.state.categories.len(), "Loaded categories");
                Applied::Categories {
                    count: self.state.categories.len(),
                }
            }
            Completion::Categories(Err(e)) => {
                warn!(error = %e, "Error fetching categories");
                Applied::CategoriesFailed
            }
            Completion::Search {
                id,
                params,
                outcome,
            } => {
                let latest = self.policy == ApplyPolicy::LatestRequest;
                if !latest || id + 1 == self.next_id {
                    self.state.loading = false;
                }

                let stale = latest && self.newest_applied.is_some_and(|newest| id < newest);

                match outcome {
                    Ok(_) if stale => {
                        debug!(id, category = %params.category, query = %params.query, "Dropping stale search response");
                        Applied::Stale { id }
                    }
                    Ok(results) => {
                        let count = results.len();
                        self.state.results = results;
                        self.newest_applied = Some(id);
                        info!(id, count, category = %params.category, query = %params.query, "Applied search results");
                        Applied::Results { id, count }
                    }
                    Err(e) => {
                        warn!(id, error = %e, category = %params.category, query = %params.query, "Error fetching news");
                        Applied::SearchFailed { id }
                    }
                }
            }
        }
    }

    /// Apply completions in arrival order until nothing is in flight.
    #[instrument(level = "debug", skip_all)]
    pub async fn settle(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(completion) = self.next_completion().await {
            applied.push(self.apply(completion));
        }
        applied
    }

    /// Search for the current selection and wait for every outstanding request.
    #[cfg(test)]
    pub async fn search_and_settle(&mut self) -> Vec<Applied> {
        self.search();
        self.settle().await
    }
}
