//! In-memory collaborators for driving a session without a backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{Result, SearchError};
use crate::settings::ALL_VERTICALS;
use crate::task::TaskStatus;
use crate::transport::{
    SearchFuture, SearchRequest, SearchResponse, SearchTransport, UniversalSearchResponse,
};
use crate::vertical::VerticalDisplay;

/// Answers immediately with a canned response per vertical key.
#[derive(Debug, Default)]
pub struct StaticTransport {
    responses: HashMap<String, SearchResponse>,
    failure: Option<(u16, String)>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to requests for `vertical_key` with `response`.
    #[must_use]
    pub fn with_response(mut self, vertical_key: &str, response: SearchResponse) -> Self {
        self.responses.insert(vertical_key.to_string(), response);
        self
    }

    /// Fail every request with a backend error.
    #[must_use]
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }
}

impl SearchTransport for StaticTransport {
    fn search(&self, request: SearchRequest) -> SearchFuture {
        let outcome = match &self.failure {
            Some((status, message)) => Err(SearchError::Backend {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(self
                .responses
                .get(&request.vertical_key)
                .cloned()
                .unwrap_or_else(|| {
                    SearchResponse::Universal(UniversalSearchResponse::default())
                })),
        };
        self.requests.lock().push(request);
        Box::pin(async move { outcome })
    }
}

type Gate = oneshot::Sender<Result<SearchResponse>>;

/// Holds every request open until the test resolves it, in any order.
#[derive(Debug, Default)]
pub struct GatedTransport {
    gates: Mutex<Vec<Option<Gate>>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl GatedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Resolve the `index`-th request (0-based, in call order).
    pub fn resolve(&self, index: usize, outcome: Result<SearchResponse>) {
        let gate = self
            .gates
            .lock()
            .get_mut(index)
            .and_then(Option::take)
            .expect("request not issued or already resolved");
        // The receiver is gone when the fetch was dropped; nothing to deliver.
        let _ = gate.send(outcome);
    }
}

impl SearchTransport for GatedTransport {
    fn search(&self, request: SearchRequest) -> SearchFuture {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push(Some(tx));
        self.requests.lock().push(request);
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(SearchError::SearchFailed("request abandoned".to_string())))
        })
    }
}

/// Calls observed by a [`RecordingDisplay`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayLog {
    pub keys: Vec<String>,
    pub fetches: Vec<String>,
    pub syncs: usize,
}

/// Vertical display that only records what the session asks of it.
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    key: String,
    log: Arc<Mutex<DisplayLog>>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: ALL_VERTICALS.to_string(),
            log: Arc::new(Mutex::new(DisplayLog::default())),
        }
    }

    /// Shared view of the calls; stays valid after the display is boxed.
    #[must_use]
    pub fn log(&self) -> Arc<Mutex<DisplayLog>> {
        Arc::clone(&self.log)
    }
}

impl VerticalDisplay for RecordingDisplay {
    fn set_vertical_key(&mut self, key: &str) {
        key.clone_into(&mut self.key);
        self.log.lock().keys.push(key.to_string());
    }

    fn vertical_key(&self) -> &str {
        &self.key
    }

    fn run_fetch(&mut self) {
        self.log.lock().fetches.push(self.key.clone());
    }

    fn sync(&mut self) {
        self.log.lock().syncs += 1;
    }

    fn status(&self) -> TaskStatus<Arc<SearchResponse>, SearchError> {
        TaskStatus::Idle
    }
}
