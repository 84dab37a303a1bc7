//! Responsive layout detection.

use std::sync::atomic::{AtomicU16, Ordering};

use serde::Serialize;

/// Reports the active responsive range; `0` is the mobile layout.
pub trait BreakpointObserver: Send + Sync {
    fn current_breakpoint_range(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Mobile,
    Desktop,
}

impl LayoutMode {
    #[must_use]
    pub const fn from_range(range: usize) -> Self {
        if range == 0 { Self::Mobile } else { Self::Desktop }
    }

    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }

    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Mobile => "is-mobile",
            Self::Desktop => "is-desktop",
        }
    }
}

/// Breakpoints over a viewport width, updated by the host on resize.
#[derive(Debug)]
pub struct WidthBreakpoints {
    /// Ascending widths; the range is how many of them the width reaches.
    thresholds: Vec<u16>,
    width: AtomicU16,
}

impl WidthBreakpoints {
    #[must_use]
    pub fn new(mut thresholds: Vec<u16>, width: u16) -> Self {
        thresholds.sort_unstable();
        Self {
            thresholds,
            width: AtomicU16::new(width),
        }
    }

    pub fn set_width(&self, width: u16) {
        self.width.store(width, Ordering::Relaxed);
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width.load(Ordering::Relaxed)
    }
}

impl BreakpointObserver for WidthBreakpoints {
    fn current_breakpoint_range(&self) -> usize {
        let width = self.width();
        self.thresholds
            .iter()
            .take_while(|threshold| width >= **threshold)
            .count()
    }
}

/// Always reports the same range.
#[derive(Debug, Clone, Copy)]
pub struct FixedBreakpoint(pub usize);

impl BreakpointObserver for FixedBreakpoint {
    fn current_breakpoint_range(&self) -> usize {
        self.0
    }
}
