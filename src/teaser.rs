//! Result teaser cards.

use serde::Serialize;

use crate::transport::SearchResult;

/// Display fields pulled from a result for one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teaser {
    pub title: String,
    pub subtitle: Option<String>,
    pub url: Option<String>,
}

/// Build the teaser for a result of `vertical_id`.
#[must_use]
pub fn display_teaser(vertical_id: &str, result: &SearchResult) -> Teaser {
    let title = result
        .data_str("name")
        .or_else(|| result.data_str("title"))
        .unwrap_or(&result.value)
        .to_string();

    let subtitle = match vertical_id {
        "locations" | "locationsearch" => result
            .data
            .get("address")
            .and_then(|address| address.get("line1"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => result
            .data_str("description")
            .or_else(|| result.data_str("answer"))
            .map(str::to_string),
    };

    let url = result
        .data_str("landingPageUrl")
        .or_else(|| result.data_str("websiteUrl"))
        .map(str::to_string);

    Teaser {
        title,
        subtitle,
        url,
    }
}
