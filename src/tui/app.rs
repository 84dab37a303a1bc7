use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::breakpoint::WidthBreakpoints;
use crate::error::Result;
use crate::modal::{ControlId, Key, KeyOutcome, KeyPress, ScrollFlag};
use crate::session::controls;
use crate::session::{
    FormEvent, Fragment, MainView, RelatedFocus, ResultsView, SearchSession, SearchView,
};
use crate::settings::{ALL_VERTICALS, SettingsStore};
use crate::teaser::display_teaser;
use crate::transport::{SearchResult, SearchTransport, UniversalSearchResponse};
use crate::tui::ui;

/// Text field state.
#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    /// Cursor position in characters.
    pub cursor_pos: usize,
}

impl InputState {
    fn set(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.cursor_pos = text.chars().count();
    }

    fn insert(&mut self, ch: char) {
        let byte = self.byte_index();
        self.text.insert(byte, ch);
        self.cursor_pos += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        self.cursor_pos -= 1;
        let byte = self.byte_index();
        self.text.remove(byte);
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor_pos)
            .map_or(self.text.len(), |(idx, _)| idx)
    }
}

pub struct SearchTui<S, T> {
    pub session: SearchSession<S, T>,
    pub breakpoints: Arc<WidthBreakpoints>,
    pub scroll: ScrollFlag,
    pub input: InputState,
    pub focus: ControlId,
    /// Highlighted entry of the suggestion list.
    pub suggestion_index: Option<usize>,
    /// Last rendered view, with "no change" fragments resolved.
    pub view: Option<SearchView>,
    pub results_scroll: u16,
    pub page: u32,
    pub status_message: String,
    suggestion_limit: usize,
    answered_query: Option<String>,
    pub should_quit: bool,
}

impl<S, T> SearchTui<S, T>
where
    S: SettingsStore + 'static,
    T: SearchTransport,
{
    pub fn new(
        session: SearchSession<S, T>,
        breakpoints: Arc<WidthBreakpoints>,
        scroll: ScrollFlag,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            session,
            breakpoints,
            scroll,
            input: InputState::default(),
            focus: ControlId::from(controls::INPUT),
            suggestion_index: None,
            view: None,
            results_scroll: 0,
            page: 1,
            status_message: "Type a query and press Enter".to_string(),
            suggestion_limit,
            answered_query: None,
            should_quit: false,
        }
    }

    /// Initialize the session and optionally submit a first query.
    pub fn start(&mut self, query: Option<&str>) {
        self.session.initialize();
        self.apply_page_size();
        let stored = self
            .session
            .settings()
            .map(|settings| settings.input.clone())
            .unwrap_or_default();
        self.input.set(query.unwrap_or(&stored));
        if query.is_some() || !stored.is_empty() {
            self.submit();
        }
        self.refresh_view();
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            if self.session.signal().take() {
                self.refresh_view();
            }
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(width, _) => {
                        self.breakpoints.set_width(width);
                        self.session.signal().request();
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.on_tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Timers, suggestion answers and dependency-driven refetches.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(target) = self.session.tick(now) {
            debug!(%target, "delayed focus");
            self.focus = target;
        }
        self.answer_suggestions();
        self.session.sync();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => self.move_focus(KeyPress::tab()),
            KeyCode::BackTab => self.move_focus(KeyPress::shift_tab()),
            KeyCode::Esc => self.escape(),
            KeyCode::Enter => self.activate(),
            _ if self.focus.as_str() == controls::INPUT => self.edit_input(key),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_results(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_results(-1),
            KeyCode::Right | KeyCode::Char(']') => self.turn_page(1),
            KeyCode::Left | KeyCode::Char('[') => self.turn_page(-1),
            _ => {}
        }
    }

    /// Controls reachable with Tab, in order.
    #[must_use]
    pub fn focus_ring(&self) -> Vec<ControlId> {
        if self.session.modal().is_open() {
            return self.session.modal().controls().to_vec();
        }
        let mut ring = vec![
            ControlId::from(controls::INPUT),
            ControlId::from(controls::SUBMIT),
        ];
        let Some(view) = self.view.as_ref() else {
            return ring;
        };
        if let Fragment::Content(nav) = &view.nav {
            if nav.layout.is_mobile() {
                ring.push(ControlId::from(controls::OPEN_MODAL));
            } else {
                ring.extend(nav.entries.iter().map(|entry| controls::nav(&entry.id)));
            }
        }
        if let MainView::All {
            results: Fragment::Content(ResultsView::Sections { sections }),
        } = &view.main
        {
            ring.extend(
                sections
                    .iter()
                    .map(|section| controls::view_all(&section.vertical_id)),
            );
        }
        ring.push(ControlId::from(controls::RESET));
        ring
    }

    fn move_focus(&mut self, press: KeyPress) {
        let target = match self.session.modal_key(press, Some(&self.focus)) {
            KeyOutcome::MoveFocus(target) => target,
            KeyOutcome::Default => {
                let ring = self.focus_ring();
                let Some(first) = ring.first() else {
                    return;
                };
                let position = ring.iter().position(|id| *id == self.focus);
                let next = match (position, press.shift) {
                    (None, _) => 0,
                    (Some(0), true) => ring.len() - 1,
                    (Some(idx), true) => idx - 1,
                    (Some(idx), false) => (idx + 1) % ring.len(),
                };
                ring.get(next).unwrap_or(first).clone()
            }
        };
        self.set_focus(target);
    }

    fn set_focus(&mut self, target: ControlId) {
        let was_input = self.focus.as_str() == controls::INPUT;
        let to_input = target.as_str() == controls::INPUT;
        if was_input && !to_input {
            let related = if target.as_str() == controls::SUBMIT {
                RelatedFocus::InsideForm
            } else {
                RelatedFocus::OutsideForm
            };
            self.session.focus_out(related);
        } else if to_input && !was_input {
            self.session.focus_in();
        }
        self.focus = target;
    }

    fn escape(&mut self) {
        if self.session.modal().is_open() {
            let press = KeyPress {
                key: Key::Escape,
                shift: false,
            };
            // The trap only rules Tab; Escape falls through to closing.
            if self.session.modal_key(press, Some(&self.focus)) == KeyOutcome::Default {
                self.toggle_modal();
            }
        } else if self.session.is_focus() {
            self.session.focus_out(RelatedFocus::OutsideForm);
            self.suggestion_index = None;
        } else {
            self.should_quit = true;
        }
    }

    fn activate(&mut self) {
        let focus = self.focus.clone();
        match focus.as_str() {
            controls::INPUT => {
                let picked = self
                    .suggestion_index
                    .and_then(|idx| self.session.suggestions().get(idx).cloned());
                match picked {
                    Some(suggestion) => self.select_suggestion(&suggestion),
                    None => self.submit(),
                }
            }
            controls::SUBMIT => self.submit(),
            controls::RESET => self.reset(),
            controls::DROPDOWN => self.session.toggle_dropdown(),
            controls::OPEN_MODAL | controls::CLOSE_MODAL | controls::CLOSE_MODAL_MOBILE => {
                self.toggle_modal();
            }
            _ => {
                if let Some(vertical) = controls::vertical_target(&focus) {
                    let vertical = vertical.to_string();
                    self.select_vertical(&vertical);
                }
            }
        }
    }

    fn edit_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) => {
                self.input.insert(ch);
                self.input_changed();
            }
            KeyCode::Backspace => {
                self.input.backspace();
                self.input_changed();
            }
            KeyCode::Left => self.input.cursor_pos = self.input.cursor_pos.saturating_sub(1),
            KeyCode::Right => {
                self.input.cursor_pos = (self.input.cursor_pos + 1).min(self.input.text.chars().count());
            }
            KeyCode::Down => {
                let count = self.session.suggestions().len();
                if count > 0 {
                    self.suggestion_index = Some(self.suggestion_index.map_or(0, |idx| (idx + 1) % count));
                }
            }
            KeyCode::Up => {
                self.suggestion_index = match self.suggestion_index {
                    Some(0) | None => None,
                    Some(idx) => Some(idx - 1),
                };
            }
            _ => {}
        }
    }

    fn input_changed(&mut self) {
        self.suggestion_index = None;
        let text = self.input.text.clone();
        self.session.update_input(&text);
    }

    /// Serve suggestion requests from the last universal response.
    fn answer_suggestions(&mut self) {
        let Some(query) = self.session.suggestion_request().map(str::to_string) else {
            self.answered_query = None;
            return;
        };
        if self.answered_query.as_deref() == Some(query.as_str()) {
            return;
        }
        let status = self.session.fetch_status();
        let Some(universal) = status.complete().and_then(|response| response.as_universal())
        else {
            return;
        };
        let suggestions = local_suggestions(universal, &query, self.suggestion_limit);
        self.session.provide_suggestions(&query, suggestions);
        self.session.focus_in();
        self.answered_query = Some(query);
    }

    fn submit(&mut self) {
        let mut event = FormEvent::submit(self.input.text.clone());
        self.session.submit_query(&mut event);
        self.after_new_query();
        self.status_message = format!("Searching for \"{}\"", self.input.text);
    }

    fn select_suggestion(&mut self, suggestion: &SearchResult) {
        self.input.set(&suggestion.value);
        self.session.select_suggestion(suggestion);
        self.after_new_query();
        self.status_message = format!("Searching for \"{}\"", suggestion.value);
    }

    fn reset(&mut self) {
        let mut event = FormEvent::new();
        self.session.reset_query(&mut event);
        self.input.set("");
        self.after_new_query();
        self.status_message = "Search cleared".to_string();
    }

    fn after_new_query(&mut self) {
        self.suggestion_index = None;
        self.results_scroll = 0;
        self.page = 1;
        self.answered_query = None;
        // A new query starts from default settings, which carry no limit.
        self.apply_page_size();
    }

    fn apply_page_size(&mut self) {
        if let Some(size) = self.session.options().page_size {
            self.session.set_page_size(Some(size));
        }
    }

    fn select_vertical(&mut self, vertical: &str) {
        self.session.set_active_vertical(vertical);
        self.results_scroll = 0;
        self.page = 1;
        self.status_message = if vertical == ALL_VERTICALS {
            "Showing all verticals".to_string()
        } else {
            format!("Showing {vertical}")
        };
    }

    fn toggle_modal(&mut self) {
        if let Some(opener) = self.session.toggle_filter_modal(Instant::now()) {
            self.focus = opener;
        }
    }

    fn scroll_results(&mut self, delta: i16) {
        if self.scroll.is_locked() {
            return;
        }
        self.results_scroll = self.results_scroll.saturating_add_signed(delta);
    }

    fn turn_page(&mut self, delta: i32) {
        let next = self.page.saturating_add_signed(delta).max(1);
        self.page = next;
        let raw = next.to_string();
        self.session.change_page(Some(&raw));
        self.status_message = format!("Page {next}");
    }

    /// Render the session and resolve "no change" fragments against the
    /// previous view.
    pub fn refresh_view(&mut self) {
        let mut next = self.session.render();
        if let Some(previous) = self.view.take() {
            next.nav = keep_previous(next.nav, previous.nav);
            if let (MainView::All { results }, MainView::All { results: old }) =
                (&mut next.main, previous.main)
            {
                let current = std::mem::replace(results, Fragment::NoChange);
                *results = keep_previous(current, old);
            }
        }
        self.view = Some(next);
    }
}

fn keep_previous<T>(next: Fragment<T>, previous: Fragment<T>) -> Fragment<T> {
    match next {
        Fragment::NoChange => previous,
        other => other,
    }
}

/// Result titles containing `query`, case-insensitively, without repeats.
#[must_use]
pub fn local_suggestions(
    response: &UniversalSearchResponse,
    query: &str,
    limit: usize,
) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    let mut seen = Vec::<String>::new();
    for module in &response.modules {
        for result in &module.results {
            let title = display_teaser(&module.vertical_config_id, result).title;
            if title.to_lowercase().contains(&needle) && !seen.contains(&title) {
                seen.push(title);
            }
        }
    }
    seen.into_iter().take(limit).map(SearchResult::new).collect()
}
