//! Marks query matches inside suggestion text.
//!
//! Matching is a case-insensitive, global substring search. By default the
//! query is matched literally; [`Highlighter::pattern`] keeps the query as a
//! regular expression for callers that rely on pattern syntax.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::Result;

pub const HIGHLIGHT_OPEN: &str = r#"<span class="suggestion-highlight">"#;
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// A run of text that is either a match or plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    regex: Regex,
}

impl Highlighter {
    /// Match `query` literally; special characters have no meaning.
    pub fn literal(query: &str) -> Result<Self> {
        Self::pattern(&regex::escape(query))
    }

    /// Match `pattern` as a regular expression.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// Wrap every match in the highlight markers.
    #[must_use]
    pub fn markup(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0])
            })
            .into_owned()
    }

    /// Split `text` into plain and matched runs, in order.
    ///
    /// Empty matches (an empty query matches every position) are kept as
    /// empty highlighted segments.
    #[must_use]
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;
        for found in self.regex.find_iter(text) {
            if found.start() > last {
                segments.push(Segment::plain(&text[last..found.start()]));
            }
            segments.push(Segment::matched(found.as_str()));
            last = found.end();
        }
        if last < text.len() {
            segments.push(Segment::plain(&text[last..]));
        }
        segments
    }
}

/// Highlight every case-insensitive literal occurrence of `query` in `text`.
#[must_use]
pub fn highlight_word(text: &str, query: &str) -> String {
    match Highlighter::literal(query) {
        Ok(highlighter) => highlighter.markup(text),
        // Only reachable when the escaped query exceeds the regex size limit.
        Err(_) => text.to_string(),
    }
}

/// Highlight matches of `pattern` used as a raw regular expression.
pub fn highlight_pattern(text: &str, pattern: &str) -> Result<String> {
    Ok(Highlighter::pattern(pattern)?.markup(text))
}
