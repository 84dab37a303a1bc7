use std::sync::Arc;

use proptest::prelude::*;

use unisearch::highlight::Highlighter;
use unisearch::session::{SearchSession, SessionOptions};
use unisearch::settings::{MemorySettingsStore, SearchSettings};
use unisearch::test_utils::doubles::StaticTransport;

proptest! {
    #[test]
    fn test_segments_rebuild_the_text(text in ".{0,64}", query in ".{0,8}") {
        let highlighter = Highlighter::literal(&query).unwrap();
        let rebuilt: String = highlighter
            .segments(&text)
            .into_iter()
            .map(|segment| segment.text)
            .collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_highlighted_runs_equal_query_ignoring_case(
        text in "[a-zA-Z ]{0,40}",
        query in "[a-z]{1,5}",
    ) {
        let highlighter = Highlighter::literal(&query).unwrap();
        for segment in highlighter.segments(&text) {
            if segment.highlighted {
                prop_assert_eq!(segment.text.to_lowercase(), query.clone());
            }
        }
    }

    #[test]
    fn test_offset_is_a_page_multiple(page in 1u32..10_000, limit in 1u32..500) {
        let settings = SearchSettings {
            limit: Some(limit),
            ..SearchSettings::default()
        };
        let offset = settings.offset_for_page(page);
        prop_assert_eq!(offset % limit, 0);
        prop_assert_eq!(offset / limit, page - 1);
    }

    #[test]
    fn test_offset_without_limit_is_zero(page in any::<u32>()) {
        prop_assert_eq!(SearchSettings::default().offset_for_page(page), 0);
    }

    #[test]
    fn test_non_numeric_pages_never_fetch(page in "[a-z]{1,8}") {
        let store = Arc::new(MemorySettingsStore::with_settings(SearchSettings::with_input("coffee")));
        let transport = Arc::new(StaticTransport::new());
        let mut session = SearchSession::new(store, Arc::clone(&transport), SessionOptions::default());
        session.initialize();

        session.change_page(Some(&page));

        prop_assert_eq!(session.fetch_generation(), 0);
        prop_assert!(transport.requests().is_empty());
    }
}
