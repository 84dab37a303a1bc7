use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::SearchError;
use crate::reactive::RenderSignal;
use crate::settings::{ALL_VERTICALS, SettingsStore};
use crate::task::{FetchTask, TaskStatus};
use crate::transport::{SearchRequest, SearchResponse, SearchTransport};

/// Child element that renders one vertical's full result list.
///
/// It owns a fetch lifecycle independent of the universal session.
pub trait VerticalDisplay: Send {
    fn set_vertical_key(&mut self, key: &str);

    fn vertical_key(&self) -> &str;

    /// Start this display's own fetch.
    fn run_fetch(&mut self);

    /// Fetch if the vertical key changed since the last execution.
    fn sync(&mut self);

    fn status(&self) -> TaskStatus<Arc<SearchResponse>, SearchError>;
}

pub struct VerticalPanel<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
    vertical_key: String,
    fetch: FetchTask<String, Arc<SearchResponse>, SearchError>,
}

impl<S, T> VerticalPanel<S, T>
where
    S: SettingsStore + 'static,
    T: SearchTransport,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, signal: RenderSignal) -> Self {
        Self {
            store,
            transport,
            vertical_key: ALL_VERTICALS.to_string(),
            fetch: FetchTask::new(signal),
        }
    }

    /// The request reads the persisted settings, as the session saves before
    /// asking this panel to fetch.
    fn request(&self) -> SearchRequest {
        let settings = self.store.load().unwrap_or_else(|err| {
            warn!(error = %err, "vertical panel falling back to default settings");
            self.store.defaults()
        });
        SearchRequest::from_settings(&self.vertical_key, &settings)
    }

    pub async fn settled(&mut self) {
        self.fetch.settled().await;
    }
}

impl<S, T> VerticalDisplay for VerticalPanel<S, T>
where
    S: SettingsStore + 'static,
    T: SearchTransport,
{
    fn set_vertical_key(&mut self, key: &str) {
        key.clone_into(&mut self.vertical_key);
    }

    fn vertical_key(&self) -> &str {
        &self.vertical_key
    }

    fn run_fetch(&mut self) {
        let request = self.request();
        debug!(vertical = %self.vertical_key, "vertical panel fetch");
        let search = self.transport.search(request);
        self.fetch
            .run_with(self.vertical_key.clone(), async move { search.await.map(Arc::new) });
    }

    fn sync(&mut self) {
        if self.vertical_key == ALL_VERTICALS {
            return;
        }
        let request = self.request();
        let transport = Arc::clone(&self.transport);
        self.fetch.sync(self.vertical_key.clone(), move || {
            let search = transport.search(request);
            async move { search.await.map(Arc::new) }
        });
    }

    fn status(&self) -> TaskStatus<Arc<SearchResponse>, SearchError> {
        self.fetch.status()
    }
}
