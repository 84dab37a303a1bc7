//! View model produced by one render pass of the session.
//!
//! The presentation layer (terminal UI, plain text, JSON) only consumes
//! these types; it never reaches into the controller's state directly.

use serde::Serialize;
use tracing::trace;

use crate::breakpoint::LayoutMode;
use crate::highlight::{Highlighter, Segment};
use crate::settings::{ALL_VERTICALS, SettingsStore};
use crate::teaser::{Teaser, display_teaser};
use crate::transport::{Module, SearchResponse, SearchTransport, UniversalSearchResponse};
use crate::vertical::vertical_title;

use super::SearchSession;

pub const NAV_HEADING: &str = "Refine Your Search";
pub const NO_RESULTS_HEADING: &str = "Sorry, we couldn't find anything";
pub const NO_RESULTS_COPY: &str = "We couldn't find any matches for your search. Try checking your \
spelling, refining your search terms, using synonyms, or expanding your search criteria.";

/// Output of one render callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum Fragment<T> {
    /// Keep whatever was rendered before.
    NoChange,
    /// Show the loading indicator.
    Pending,
    /// Render nothing.
    Empty,
    Content(T),
    Error(String),
}

impl<T> Fragment<T> {
    #[must_use]
    pub const fn content(&self) -> Option<&T> {
        match self {
            Self::Content(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub form: Option<FormView>,
    pub layout: LayoutMode,
    /// Results wrapper is shown once a non-empty query was submitted.
    pub is_visible: bool,
    pub nav: Fragment<NavView>,
    pub main: MainView,
    pub modal: Option<ModalView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub input: String,
    pub layout_class: &'static str,
    pub suggestions_open: bool,
    pub suggestions: Vec<SuggestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionView {
    pub value: String,
    pub markup: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavView {
    pub heading: &'static str,
    pub layout: LayoutMode,
    pub dropdown_open: bool,
    pub current_title: String,
    pub entries: Vec<NavEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MainView {
    All { results: Fragment<ResultsView> },
    Vertical {
        key: String,
        results: Fragment<VerticalResultsView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsView {
    NoResults {
        heading: &'static str,
        copy: &'static str,
    },
    Sections { sections: Vec<SectionView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub vertical_id: String,
    pub title: String,
    pub results: Vec<Teaser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerticalResultsView {
    pub vertical_id: String,
    pub title: String,
    pub results_count: u64,
    pub results: Vec<Teaser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub close_control: String,
    pub reset_label: &'static str,
    pub show_results_label: String,
}

impl<S, T> SearchSession<S, T>
where
    S: SettingsStore + 'static,
    T: SearchTransport,
{
    /// Produce the view for the current state.
    #[must_use]
    pub fn render(&self) -> SearchView {
        let layout = self.layout();
        trace!(?layout, generation = self.fetch_generation(), "render pass");

        let main = if self.active_vertical().is_all() {
            MainView::All {
                results: self.response_fragment(|universal| self.display_all(universal)),
            }
        } else {
            MainView::Vertical {
                key: self.active_vertical().as_str().to_string(),
                results: self.vertical_fragment(),
            }
        };

        SearchView {
            form: self.form_view(layout),
            layout,
            is_visible: self.display_results(),
            nav: self.response_fragment(|universal| self.nav_view(universal, layout)),
            main,
            modal: self.modal_view(),
        }
    }

    fn form_view(&self, layout: LayoutMode) -> Option<FormView> {
        let settings = self.settings()?;
        let highlighter = Highlighter::literal(&settings.input).ok();
        let suggestions = self
            .suggestions()
            .iter()
            .map(|suggestion| SuggestionView {
                value: suggestion.value.clone(),
                markup: highlighter
                    .as_ref()
                    .map_or_else(|| suggestion.value.clone(), |h| h.markup(&suggestion.value)),
                segments: highlighter
                    .as_ref()
                    .map(|h| h.segments(&suggestion.value))
                    .unwrap_or_default(),
            })
            .collect();
        Some(FormView {
            input: settings.input.clone(),
            layout_class: layout.class_name(),
            suggestions_open: self.is_focus(),
            suggestions,
        })
    }

    /// Apply the universal render contract to the session's fetch.
    fn response_fragment<R>(
        &self,
        complete: impl FnOnce(&UniversalSearchResponse) -> Fragment<R>,
    ) -> Fragment<R> {
        let has_previous = self.fetch.value().is_some();
        self.fetch_status().render(
            || {
                if has_previous {
                    Fragment::Pending
                } else {
                    Fragment::NoChange
                }
            },
            |response| match response.as_ref() {
                SearchResponse::Universal(universal) => complete(universal),
                SearchResponse::Vertical(_) => Fragment::Empty,
            },
            |err| self.error_fragment(err),
        )
    }

    fn vertical_fragment(&self) -> Fragment<VerticalResultsView> {
        self.vertical_display().status().render(
            || Fragment::Pending,
            |response| match response.as_vertical() {
                Some(vertical) => Fragment::Content(VerticalResultsView {
                    vertical_id: vertical.vertical_config_id.clone(),
                    title: vertical_title(&vertical.vertical_config_id),
                    results_count: vertical.results_count,
                    results: vertical
                        .results
                        .iter()
                        .map(|result| display_teaser(&vertical.vertical_config_id, result))
                        .collect(),
                }),
                None => Fragment::Empty,
            },
            |err| self.error_fragment(err),
        )
    }

    fn error_fragment<R>(&self, err: &crate::error::SearchError) -> Fragment<R> {
        if self.options.show_errors {
            Fragment::Error(err.to_string())
        } else {
            Fragment::Empty
        }
    }

    fn display_all(&self, response: &UniversalSearchResponse) -> Fragment<ResultsView> {
        if response.modules.is_empty() {
            return Fragment::Content(ResultsView::NoResults {
                heading: NO_RESULTS_HEADING,
                copy: NO_RESULTS_COPY,
            });
        }
        Fragment::Content(ResultsView::Sections {
            sections: response
                .modules
                .iter()
                .map(|module| self.section_view(module))
                .collect(),
        })
    }

    fn section_view(&self, module: &Module) -> SectionView {
        SectionView {
            vertical_id: module.vertical_config_id.clone(),
            title: vertical_title(&module.vertical_config_id),
            results: module
                .results
                .iter()
                .take(self.options.preview_results)
                .map(|result| display_teaser(&module.vertical_config_id, result))
                .collect(),
        }
    }

    fn nav_view(&self, response: &UniversalSearchResponse, layout: LayoutMode) -> Fragment<NavView> {
        if response.modules.is_empty() {
            return Fragment::Empty;
        }
        let active = self.active_vertical().as_str();
        let mut entries = vec![NavEntry {
            id: ALL_VERTICALS.to_string(),
            title: "All".to_string(),
            active: active == ALL_VERTICALS,
        }];
        entries.extend(response.modules.iter().map(|module| NavEntry {
            id: module.vertical_config_id.clone(),
            title: vertical_title(&module.vertical_config_id),
            active: active == module.vertical_config_id,
        }));
        Fragment::Content(NavView {
            heading: NAV_HEADING,
            layout,
            dropdown_open: layout.is_mobile() && self.nav().dropdown_open(),
            current_title: vertical_title(active),
            entries,
        })
    }

    fn modal_view(&self) -> Option<ModalView> {
        if !self.nav().modal_filters_open() {
            return None;
        }
        let count = self
            .total_count()
            .map(|count| count.to_string())
            .unwrap_or_default();
        Some(ModalView {
            close_control: super::controls::CLOSE_MODAL.to_string(),
            reset_label: "Clear",
            show_results_label: format!("Show {count} results"),
        })
    }
}
