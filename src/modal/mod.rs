//! Keyboard focus trap for the mobile filters modal.
//!
//! While the modal is open, `Tab` cycles through an ordered list of control
//! ids captured at open time. Closing hands focus back to the opener.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

/// Page scroll capability injected into the trap.
pub trait ScrollLock: Send {
    fn lock_scroll(&mut self);
    fn unlock_scroll(&mut self);
}

/// Scroll lock backed by a shared flag the renderer reads.
#[derive(Debug, Clone, Default)]
pub struct ScrollFlag {
    locked: Arc<AtomicBool>,
}

impl ScrollFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

impl ScrollLock for ScrollFlag {
    fn lock_scroll(&mut self) {
        self.locked.store(true, Ordering::Release);
    }

    fn unlock_scroll(&mut self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// Identifier of a focusable control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    #[must_use]
    pub const fn tab() -> Self {
        Self {
            key: Key::Tab,
            shift: false,
        }
    }

    #[must_use]
    pub const fn shift_tab() -> Self {
        Self {
            key: Key::Tab,
            shift: true,
        }
    }
}

/// What the host should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the default tab order apply.
    Default,
    /// Suppress the default and focus this control.
    MoveFocus(ControlId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TrapState {
    Closed,
    Open {
        opener: ControlId,
        controls: Vec<ControlId>,
    },
}

#[derive(Debug, Clone)]
struct ScheduledFocus {
    due: Instant,
    target: ControlId,
}

pub struct ModalFocusTrap {
    state: TrapState,
    scroll: Box<dyn ScrollLock>,
    listening: bool,
    pending_focus: Option<ScheduledFocus>,
    close_control: ControlId,
    focus_delay: Duration,
}

impl ModalFocusTrap {
    pub fn new(
        scroll: Box<dyn ScrollLock>,
        close_control: ControlId,
        focus_delay: Duration,
    ) -> Self {
        Self {
            state: TrapState::Closed,
            scroll,
            listening: false,
            pending_focus: None,
            close_control,
            focus_delay,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, TrapState::Open { .. })
    }

    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    /// Controls cycled while open, first to last.
    #[must_use]
    pub fn controls(&self) -> &[ControlId] {
        match &self.state {
            TrapState::Open { controls, .. } => controls,
            TrapState::Closed => &[],
        }
    }

    /// Open the modal. Focus moves to the close control once `focus_delay`
    /// has elapsed (see [`Self::tick`]).
    pub fn open(&mut self, opener: ControlId, controls: Vec<ControlId>, now: Instant) {
        self.scroll.lock_scroll();
        self.listening = true;
        debug!(%opener, controls = controls.len(), "modal opened");
        self.state = TrapState::Open { opener, controls };
        // Replaces any earlier schedule; only the latest one fires.
        self.pending_focus = Some(ScheduledFocus {
            due: now + self.focus_delay,
            target: self.close_control.clone(),
        });
    }

    /// Close the modal, returning the control that should regain focus.
    pub fn close(&mut self) -> Option<ControlId> {
        let TrapState::Open { opener, .. } = std::mem::replace(&mut self.state, TrapState::Closed)
        else {
            return None;
        };
        self.scroll.unlock_scroll();
        self.listening = false;
        self.pending_focus = None;
        debug!(%opener, "modal closed");
        Some(opener)
    }

    /// Replace the focus cycle of an open modal (e.g. after a re-render).
    pub fn set_controls(&mut self, controls: Vec<ControlId>) {
        if let TrapState::Open { controls: current, .. } = &mut self.state {
            *current = controls;
        }
    }

    /// Fire the delayed focus move if it is due.
    pub fn tick(&mut self, now: Instant) -> Option<ControlId> {
        let due = self.pending_focus.as_ref()?.due;
        if now < due || !self.is_open() {
            return None;
        }
        self.pending_focus.take().map(|scheduled| scheduled.target)
    }

    /// Apply the cyclic tab rule for the control that currently has focus.
    #[must_use]
    pub fn handle_key(&self, press: KeyPress, active: Option<&ControlId>) -> KeyOutcome {
        if !self.listening || press.key != Key::Tab {
            return KeyOutcome::Default;
        }
        let controls = self.controls();
        let (Some(first), Some(last)) = (controls.first(), controls.last()) else {
            return KeyOutcome::Default;
        };
        let Some(active) = active else {
            return KeyOutcome::Default;
        };

        if press.shift {
            if active == last {
                return KeyOutcome::Default;
            }
            if active == first {
                return KeyOutcome::MoveFocus(last.clone());
            }
        }
        if active == last {
            return KeyOutcome::MoveFocus(first.clone());
        }
        KeyOutcome::Default
    }
}
