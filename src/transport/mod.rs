//! Transport to the remote search backend.

pub mod http;
pub mod types;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::{ALL_VERTICALS, SearchSettings};

pub use http::HttpTransport;
pub use types::{
    Module, SearchEnvelope, SearchResponse, SearchResult, UniversalSearchResponse,
    VerticalSearchResponse,
};

/// One query against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// `"all"` for a universal query, otherwise the vertical to query.
    pub vertical_key: String,
    pub input: String,
    pub offset: u32,
    pub limit: Option<u32>,
}

impl SearchRequest {
    /// Request for `vertical_key` using the query intent in `settings`.
    #[must_use]
    pub fn from_settings(vertical_key: &str, settings: &SearchSettings) -> Self {
        Self {
            vertical_key: vertical_key.to_string(),
            input: settings.input.clone(),
            offset: settings.offset,
            limit: settings.limit,
        }
    }

    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.vertical_key == ALL_VERTICALS
    }
}

/// Owned, spawnable search future. Holds no borrow of the transport.
pub type SearchFuture = Pin<Box<dyn Future<Output = Result<SearchResponse>> + Send + 'static>>;

/// Async search backend.
///
/// The request is issued when `search` is called; the returned future only
/// waits for the answer.
pub trait SearchTransport: Send + Sync + 'static {
    fn search(&self, request: SearchRequest) -> SearchFuture;
}
