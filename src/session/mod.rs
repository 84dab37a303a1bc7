//! The search session controller.
//!
//! Owns the mutable [`SearchSettings`], keeps them in step with the settings
//! store and drives the single observable fetch. Every handler tolerates
//! being called before [`SearchSession::initialize`]; such calls are no-ops.

pub mod controls;
pub mod view;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::breakpoint::{BreakpointObserver, FixedBreakpoint, LayoutMode};
use crate::config::Config;
use crate::error::SearchError;
use crate::modal::{ControlId, KeyOutcome, KeyPress, ModalFocusTrap, ScrollFlag, ScrollLock};
use crate::reactive::{RenderSignal, Tracked};
use crate::settings::{ALL_VERTICALS, SearchSettings, SettingsStore};
use crate::task::{FetchTask, TaskStatus};
use crate::transport::{SearchRequest, SearchResponse, SearchResult, SearchTransport};
use crate::vertical::{ActiveVertical, VerticalDisplay, VerticalNav, VerticalPanel};

pub use view::{
    Fragment, FormView, MainView, ModalView, NavEntry, NavView, ResultsView, SearchView,
    SectionView, SuggestionView, VerticalResultsView,
};

pub type ResponseStatus = TaskStatus<Arc<SearchResponse>, SearchError>;

/// Dependency snapshot of the universal fetch: the displayed entity set.
pub type EntityKey = Option<Vec<String>>;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Input longer than this many characters asks for suggestions.
    pub suggestion_min_chars: usize,
    /// Results shown per group in the universal view.
    pub preview_results: usize,
    pub show_errors: bool,
    pub focus_delay: Duration,
    /// Page size a host applies with [`SearchSession::set_page_size`].
    pub page_size: Option<u32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            suggestion_min_chars: 3,
            preview_results: 3,
            show_errors: false,
            focus_delay: Duration::from_millis(300),
            page_size: None,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            suggestion_min_chars: config.session.suggestion_min_chars,
            preview_results: config.display.preview_results,
            show_errors: config.display.show_errors,
            focus_delay: config.session.focus_delay(),
            page_size: config.session.page_size,
        }
    }
}

/// Stand-in for a native form event whose default action can be cancelled.
#[derive(Debug, Clone, Default)]
pub struct FormEvent {
    value: Option<String>,
    default_prevented: bool,
}

impl FormEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A submit carrying the text field's current value.
    pub fn submit(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Where keyboard focus went when it left the text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedFocus {
    Nothing,
    InsideForm,
    OutsideForm,
}

pub struct SearchSession<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
    breakpoints: Arc<dyn BreakpointObserver>,
    vertical_display: Box<dyn VerticalDisplay>,
    options: SessionOptions,
    signal: RenderSignal,
    settings: Option<SearchSettings>,
    initialized: bool,
    display_results: bool,
    vertical_key: String,
    entities: EntityKey,
    nav: VerticalNav,
    suggestions: Tracked<Vec<SearchResult>>,
    is_focus: Tracked<bool>,
    suggestion_request: Option<String>,
    fetch: FetchTask<EntityKey, Arc<SearchResponse>, SearchError>,
    modal: ModalFocusTrap,
}

impl<S, T> SearchSession<S, T>
where
    S: SettingsStore + 'static,
    T: SearchTransport,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, options: SessionOptions) -> Self {
        let signal = RenderSignal::new();
        let panel = VerticalPanel::new(Arc::clone(&store), Arc::clone(&transport), signal.clone());
        let modal = ModalFocusTrap::new(
            Box::new(ScrollFlag::new()),
            ControlId::from(controls::CLOSE_MODAL),
            options.focus_delay,
        );
        Self {
            store,
            transport,
            breakpoints: Arc::new(FixedBreakpoint(1)),
            vertical_display: Box::new(panel),
            options,
            nav: VerticalNav::new(&signal),
            suggestions: Tracked::new(Vec::new(), signal.clone()),
            is_focus: Tracked::new(false, signal.clone()),
            fetch: FetchTask::new(signal.clone()),
            signal,
            settings: None,
            initialized: false,
            display_results: false,
            vertical_key: ALL_VERTICALS.to_string(),
            entities: None,
            suggestion_request: None,
            modal,
        }
    }

    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: Arc<dyn BreakpointObserver>) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    #[must_use]
    pub fn with_vertical_display(mut self, display: Box<dyn VerticalDisplay>) -> Self {
        self.vertical_display = display;
        self
    }

    #[must_use]
    pub fn with_scroll_lock(mut self, scroll: Box<dyn ScrollLock>) -> Self {
        self.modal = ModalFocusTrap::new(
            scroll,
            ControlId::from(controls::CLOSE_MODAL),
            self.options.focus_delay,
        );
        self
    }

    /// Seed settings from the store. Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("session already initialized");
            return;
        }
        self.initialized = true;

        if let Err(err) = self.store.sync() {
            warn!(error = %err, "settings store sync failed");
        }
        let stored = self.store.load().unwrap_or_else(|err| {
            warn!(error = %err, "loading settings failed; using defaults");
            self.store.defaults()
        });
        self.settings = Some(SearchSettings {
            active_vertical: ALL_VERTICALS.to_string(),
            limit: None,
            ..stored
        });
        self.persist();
        self.display_results = self.settings.as_ref().is_some_and(|s| !s.input.is_empty());
        self.signal.request();
        debug!(display_results = self.display_results, "session initialized");
    }

    /// Submit the query form.
    pub fn submit_query(&mut self, event: &mut FormEvent) {
        event.prevent_default();
        self.clean_suggestions();

        let Some(current) = self.settings.as_ref() else {
            debug!("submit ignored: settings not initialized");
            return;
        };
        let input = event
            .value()
            .map_or_else(|| current.input.clone(), str::to_string);
        self.settings = Some(SearchSettings::with_input(input));
        self.persist();

        self.nav.set_active(ActiveVertical::All);
        self.display_results = self.settings.as_ref().is_some_and(|s| !s.input.is_empty());
        self.signal.request();
        self.run_fetch();
    }

    /// Clear the query and every filter.
    pub fn reset_query(&mut self, event: &mut FormEvent) {
        event.prevent_default();
        self.settings = Some(self.store.defaults());
        self.persist();
        self.clean_suggestions();
        self.signal.request();
        self.run_fetch();
    }

    /// Text field changed. Typing alone never fetches.
    pub fn update_input(&mut self, text: &str) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        text.clone_into(&mut settings.input);
        if text.chars().count() > self.options.suggestion_min_chars {
            // Suggestions are supplied later through `provide_suggestions`.
            self.suggestion_request = Some(text.to_string());
        } else {
            self.suggestion_request = None;
            self.clean_suggestions();
        }
        self.signal.request();
    }

    /// Query awaiting suggestions from an external provider, if any.
    #[must_use]
    pub fn suggestion_request(&self) -> Option<&str> {
        self.suggestion_request.as_deref()
    }

    /// Accept suggestions for `query`. Stale answers are ignored.
    pub fn provide_suggestions(&mut self, query: &str, suggestions: Vec<SearchResult>) -> bool {
        if self.suggestion_request.as_deref() != Some(query) {
            debug!(query, "dropping suggestions for a superseded query");
            return false;
        }
        self.suggestions.set(suggestions);
        true
    }

    pub fn focus_in(&mut self) {
        let Some(settings) = self.settings.as_ref() else {
            return;
        };
        if settings.input.chars().count() > self.options.suggestion_min_chars
            && !self.suggestions.get().is_empty()
        {
            self.is_focus.set(true);
        }
    }

    pub fn focus_out(&mut self, related: RelatedFocus) {
        if related != RelatedFocus::InsideForm {
            self.is_focus.set(false);
        }
    }

    /// Set the result limit used for paging. Persists; does not fetch.
    pub fn set_page_size(&mut self, limit: Option<u32>) {
        let Some(settings) = self.settings.as_mut() else {
            debug!("page size ignored: settings not initialized");
            return;
        };
        settings.limit = limit;
        debug!(?limit, "page size set");
        self.persist();
        self.signal.request();
    }

    /// Handle a pagination click carrying a `current-page` attribute.
    pub fn change_page(&mut self, current_page: Option<&str>) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        let Some(page) = current_page.and_then(parse_page) else {
            debug!(?current_page, "ignoring non-numeric page");
            return;
        };
        settings.offset = settings.offset_for_page(page);
        debug!(page, offset = settings.offset, "page changed");
        self.persist();
        self.run_fetch();
    }

    pub fn select_suggestion(&mut self, suggestion: &SearchResult) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        suggestion.value.clone_into(&mut settings.input);
        self.persist();
        self.run_fetch();
        self.clean_suggestions();
    }

    /// Switch the active vertical and hand it to the child display.
    pub fn set_active_vertical(&mut self, id: &str) {
        let Some(settings) = self.settings.as_ref() else {
            return;
        };
        let vertical = ActiveVertical::parse(id);
        self.nav.set_active(vertical.clone());

        if !vertical.is_all() {
            self.vertical_display.set_vertical_key(id);
        }
        self.nav.close_dropdown();

        self.settings = Some(SearchSettings {
            input: settings.input.clone(),
            active_vertical: id.to_string(),
            ..settings.clone()
        });
        self.persist();

        debug!(vertical = %vertical, "active vertical changed");
        self.vertical_display.run_fetch();
        self.refresh_modal_controls();
    }

    pub fn toggle_dropdown(&mut self) {
        self.nav.toggle_dropdown();
        self.refresh_modal_controls();
    }

    /// Open or close the filters modal. On close, returns the control that
    /// should get focus back.
    pub fn toggle_filter_modal(&mut self, now: Instant) -> Option<ControlId> {
        let open = !self.nav.modal_filters_open();
        self.nav.set_modal_filters_open(open);
        if open {
            let controls = self.modal_controls();
            self.modal
                .open(ControlId::from(controls::OPEN_MODAL), controls, now);
            None
        } else {
            self.modal.close()
        }
    }

    #[must_use]
    pub fn modal_key(&self, press: KeyPress, active: Option<&ControlId>) -> KeyOutcome {
        self.modal.handle_key(press, active)
    }

    /// Advance timers; returns a control to focus when one is due.
    pub fn tick(&mut self, now: Instant) -> Option<ControlId> {
        self.modal.tick(now)
    }

    /// Update the displayed entity set; the fetch re-runs on the next sync.
    pub fn set_displayed_entities(&mut self, entities: Option<Vec<String>>) {
        self.entities = entities;
        self.signal.request();
    }

    /// Host update hook: re-run fetches whose dependencies changed.
    pub fn sync(&mut self) {
        let request = self.request();
        let transport = Arc::clone(&self.transport);
        self.fetch.sync(self.entities.clone(), move || {
            let search = transport.search(request);
            async move { search.await.map(Arc::new) }
        });
        if !self.nav.active().is_all() {
            self.vertical_display.sync();
        }
    }

    /// Wait for the latest universal fetch to resolve.
    pub async fn fetch_settled(&mut self) {
        self.fetch.settled().await;
    }

    /// Wait for the child display's running fetch to resolve.
    ///
    /// Returns at once when the child has nothing in flight.
    pub async fn vertical_settled(&self) {
        while matches!(self.vertical_display.status(), TaskStatus::Pending) {
            self.signal.requested().await;
        }
    }

    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub const fn settings(&self) -> Option<&SearchSettings> {
        self.settings.as_ref()
    }

    #[must_use]
    pub const fn display_results(&self) -> bool {
        self.display_results
    }

    #[must_use]
    pub const fn active_vertical(&self) -> &ActiveVertical {
        self.nav.active()
    }

    #[must_use]
    pub const fn nav(&self) -> &VerticalNav {
        &self.nav
    }

    #[must_use]
    pub fn suggestions(&self) -> &[SearchResult] {
        self.suggestions.get()
    }

    #[must_use]
    pub const fn is_focus(&self) -> bool {
        *self.is_focus.get()
    }

    #[must_use]
    pub const fn signal(&self) -> &RenderSignal {
        &self.signal
    }

    #[must_use]
    pub fn fetch_status(&self) -> ResponseStatus {
        self.fetch.status()
    }

    /// Number of universal fetches started so far.
    #[must_use]
    pub fn fetch_generation(&self) -> u64 {
        self.fetch.generation()
    }

    #[must_use]
    pub fn vertical_display(&self) -> &dyn VerticalDisplay {
        self.vertical_display.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> LayoutMode {
        LayoutMode::from_range(self.breakpoints.current_breakpoint_range())
    }

    #[must_use]
    pub const fn modal(&self) -> &ModalFocusTrap {
        &self.modal
    }

    /// Total results across the last universal response.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.fetch
            .value()
            .and_then(|response| response.as_universal().map(|u| u.total_results()))
    }

    fn request(&self) -> SearchRequest {
        match self.settings.as_ref() {
            Some(settings) => SearchRequest::from_settings(&self.vertical_key, settings),
            None => SearchRequest::from_settings(&self.vertical_key, &self.store.defaults()),
        }
    }

    fn run_fetch(&mut self) {
        let search = self.transport.search(self.request());
        self.fetch.run(async move { search.await.map(Arc::new) });
    }

    fn persist(&self) {
        let Some(settings) = self.settings.as_ref() else {
            return;
        };
        if let Err(err) = self.store.save(settings) {
            warn!(error = %err, "saving settings failed");
        }
    }

    fn clean_suggestions(&mut self) {
        self.suggestions.set(Vec::new());
        self.is_focus.set(false);
    }

    fn refresh_modal_controls(&mut self) {
        if self.modal.is_open() {
            let controls = self.modal_controls();
            self.modal.set_controls(controls);
        }
    }

    /// Focus cycle of the filters modal, in tab order.
    fn modal_controls(&self) -> Vec<ControlId> {
        let mut ids = vec![
            ControlId::from(controls::CLOSE_MODAL),
            ControlId::from(controls::DROPDOWN),
        ];
        if self.nav.dropdown_open() {
            ids.push(controls::nav(ALL_VERTICALS));
            if let Some(response) = self.fetch.value() {
                if let Some(universal) = response.as_universal() {
                    ids.extend(
                        universal
                            .modules
                            .iter()
                            .map(|module| controls::nav(&module.vertical_config_id)),
                    );
                }
            }
        }
        ids.push(ControlId::from(controls::RESET));
        ids.push(ControlId::from(controls::CLOSE_MODAL_MOBILE));
        ids
    }
}

fn parse_page(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // An empty attribute is not a page, even though it coerces to 0.
        return None;
    }
    let page = trimmed.parse::<f64>().ok()?;
    // Fractional and out-of-range pages have no offset to map to.
    if !page.is_finite() || page.fract() != 0.0 || page > f64::from(u32::MAX) {
        return None;
    }
    // Pages below 1 clamp to the first page.
    Some(page.max(1.0) as u32)
}
