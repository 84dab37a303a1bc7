//! Vertical navigation: which content category is active, and the child
//! display that renders a single vertical's full result list.

mod panel;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::reactive::{RenderSignal, Tracked};
use crate::settings::ALL_VERTICALS;

pub use panel::{VerticalDisplay, VerticalPanel};

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("static regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveVertical {
    #[default]
    All,
    Vertical(String),
}

impl ActiveVertical {
    #[must_use]
    pub fn parse(id: &str) -> Self {
        if id == ALL_VERTICALS {
            Self::All
        } else {
            Self::Vertical(id.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_VERTICALS,
            Self::Vertical(id) => id,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for ActiveVertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human title for a vertical id.
///
/// `locationsearch` is special-cased; everything else has underscores turned
/// into spaces and each word's first character uppercased.
#[must_use]
pub fn vertical_title(id: &str) -> String {
    if id == "locationsearch" {
        return "Location".to_string();
    }
    let spaced = id.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Transient navigation state. None of it is persisted.
#[derive(Debug, Clone)]
pub struct VerticalNav {
    active: Tracked<ActiveVertical>,
    dropdown_open: Tracked<bool>,
    modal_filters_open: Tracked<bool>,
}

impl VerticalNav {
    #[must_use]
    pub fn new(signal: &RenderSignal) -> Self {
        Self {
            active: Tracked::new(ActiveVertical::All, signal.clone()),
            dropdown_open: Tracked::new(false, signal.clone()),
            modal_filters_open: Tracked::new(false, signal.clone()),
        }
    }

    #[must_use]
    pub const fn active(&self) -> &ActiveVertical {
        self.active.get()
    }

    pub fn set_active(&mut self, vertical: ActiveVertical) {
        self.active.set(vertical);
    }

    #[must_use]
    pub const fn dropdown_open(&self) -> bool {
        *self.dropdown_open.get()
    }

    pub fn toggle_dropdown(&mut self) {
        let open = !self.dropdown_open();
        self.dropdown_open.set(open);
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open.set(false);
    }

    #[must_use]
    pub const fn modal_filters_open(&self) -> bool {
        *self.modal_filters_open.get()
    }

    pub fn set_modal_filters_open(&mut self, open: bool) {
        self.modal_filters_open.set(open);
    }
}
