//! Test doubles shared by the unit tests.
//!
//! - [`StubServer`]: a loopback `axum` server answering canned JSON per path
//! - [`ScriptedApi`]: an in-process [`NewsApi`] whose responses are released by the test

use crate::api::{NewsApi, NewsApiError};
use crate::models::{ArticleResult, SearchParams, Welcome};
use axum::Router;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::routing::get;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Loopback `axum` server bound to `127.0.0.1` on an ephemeral port.
///
/// Each route answers `GET` with a fixed status and JSON body. Unknown paths
/// get axum's 404. Every request target, including its query string, is recorded.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&'static str, u16, String)>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let mut app = Router::new();
        for (path, status, body) in routes {
            let status = StatusCode::from_u16(status).unwrap();
            app = app.route(
                path,
                get(move || {
                    let body = body.clone();
                    async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
                }),
            );
        }

        let recorded = Arc::clone(&requests);
        let app = app.layer(middleware::from_fn(move |req: Request, next: Next| {
            let recorded = Arc::clone(&recorded);
            async move {
                let target = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.to_string())
                    .unwrap_or_else(|| req.uri().path().to_string());
                recorded.lock().unwrap().push(target);
                next.run(req).await
            }
        }));

        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Request targets in the order they were received.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

type SearchReply = Result<Vec<ArticleResult>, NewsApiError>;
type CategoriesReply = Result<Vec<String>, NewsApiError>;

/// A [`NewsApi`] whose search responses are held back until the test releases them.
///
/// [`ScriptedApi::expect_search`] prepares a reply channel for a query before the
/// search is issued; the search parks on it until the test sends a reply. This
/// lets a test choose the order in which concurrent responses arrive.
#[derive(Default)]
pub struct ScriptedApi {
    categories: RefCell<Vec<CategoriesReply>>,
    replies: RefCell<HashMap<String, Vec<oneshot::Receiver<SearchReply>>>>,
    calls: RefCell<Vec<SearchParams>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next `categories` call.
    pub fn push_categories(&self, reply: CategoriesReply) {
        self.categories.borrow_mut().push(reply);
    }

    /// Prepare the next search for `query`; send on the returned channel to complete it.
    pub fn expect_search(&self, query: &str) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .borrow_mut()
            .entry(query.to_string())
            .or_default()
            .push(rx);
        tx
    }

    pub fn search_calls(&self) -> Vec<SearchParams> {
        self.calls.borrow().clone()
    }
}

impl NewsApi for ScriptedApi {
    async fn welcome(&self) -> Result<Welcome, NewsApiError> {
        Ok(Welcome {
            message: "scripted".to_string(),
        })
    }

    async fn categories(&self) -> Result<Vec<String>, NewsApiError> {
        let mut queued = self.categories.borrow_mut();
        if queued.is_empty() {
            return Ok(Vec::new());
        }
        queued.remove(0)
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<ArticleResult>, NewsApiError> {
        self.calls.borrow_mut().push(params.clone());
        let rx = {
            let mut replies = self.replies.borrow_mut();
            match replies.get_mut(&params.query) {
                Some(waiting) if !waiting.is_empty() => waiting.remove(0),
                _ => return Err(request_failed()),
            }
        };
        rx.await.unwrap_or_else(|_| Err(request_failed()))
    }
}

/// A failure value for scripted replies.
pub fn request_failed() -> NewsApiError {
    NewsApiError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        url: "http://stub/api/news".to_string(),
    }
}
