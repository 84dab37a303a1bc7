//! Ids of the session's focusable controls.

use crate::modal::ControlId;

pub const INPUT: &str = "edit-search-api-fulltext";
pub const SUBMIT: &str = "edit-submit";
pub const OPEN_MODAL: &str = "openModal";
pub const CLOSE_MODAL: &str = "closeModal";
pub const CLOSE_MODAL_MOBILE: &str = "close-modal-mobile";
pub const RESET: &str = "reset-search";
pub const DROPDOWN: &str = "vertical-dropdown";

const NAV_PREFIX: &str = "nav:";
const VIEW_ALL_PREFIX: &str = "view-all:";

/// Vertical navigation entry for `vertical_id`.
#[must_use]
pub fn nav(vertical_id: &str) -> ControlId {
    ControlId::new(format!("{NAV_PREFIX}{vertical_id}"))
}

/// "View All" button of a result group.
#[must_use]
pub fn view_all(vertical_id: &str) -> ControlId {
    ControlId::new(format!("{VIEW_ALL_PREFIX}{vertical_id}"))
}

/// Vertical id behind a nav or "View All" control.
#[must_use]
pub fn vertical_target(control: &ControlId) -> Option<&str> {
    let id = control.as_str();
    id.strip_prefix(NAV_PREFIX)
        .or_else(|| id.strip_prefix(VIEW_ALL_PREFIX))
}
