//! Viewport metrics and breakpoint classification.

use serde::{Deserialize, Serialize};

/// Default width (px) at which the page switches to its desktop layout
pub const DEFAULT_DESKTOP_BREAKPOINT: f64 = 768.0;

/// Live viewport metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// `window.innerWidth`
    pub width: f64,
    /// `window.innerHeight`
    pub height: f64,
    /// `document.documentElement.clientWidth` (excludes the scrollbar)
    pub client_width: f64,
}

impl Viewport {
    /// Viewport without a scrollbar
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            client_width: width,
        }
    }

    /// Set the client width separately from the window width
    #[must_use]
    pub const fn with_client_width(mut self, client_width: f64) -> Self {
        self.client_width = client_width;
        self
    }

    /// Classify this viewport against a breakpoint
    #[must_use]
    pub fn class(&self, breakpoint: f64) -> ViewportClass {
        ViewportClass::classify(self.width, breakpoint)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Layout class the page branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportClass {
    /// Narrower than the breakpoint
    Mobile,
    /// At or above the breakpoint
    Desktop,
}

impl ViewportClass {
    /// Map a window width to its class.
    ///
    /// The breakpoint itself counts as desktop. Non-finite widths are mobile.
    #[must_use]
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width.is_finite() && width >= breakpoint {
            Self::Desktop
        } else {
            Self::Mobile
        }
    }

    /// Whether this is the desktop class
    #[must_use]
    pub const fn is_desktop(self) -> bool {
        matches!(self, Self::Desktop)
    }
}

impl std::fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Desktop => write!(f, "desktop"),
        }
    }
}
