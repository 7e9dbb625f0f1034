//! Page Animator: scroll-driven motion for a single portfolio page
//!
//! A WebAssembly runtime that animates a one-page portfolio: the nav bar
//! turns glassy on scroll, the hero plays an entrance sequence, sections
//! reveal as they enter the viewport, the project row scrolls sideways while
//! its section is pinned, testimonials rotate, and the contact form is
//! validated on the client with toast feedback.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Page Animator Architecture                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ web        │    │ Page       │    │ Stage      │            │
//! │   │ (rAF,      │───►│ Animator   │───►│ (motion +  │            │
//! │   │  events)   │    │ + timers   │    │  triggers) │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                    │
//! │                                       ┌────────────┐            │
//! │                                       │ dyn Dom    │            │
//! │                                       │ (web-sys / │            │
//! │                                       │  MockDom)  │            │
//! │                                       └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above the [`dom::Dom`] trait is plain Rust and runs natively;
//! the browser binding is behind the `wasm` feature.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp))]

mod animator;
pub mod clock;
pub mod config;
pub mod dom;
pub mod handle;
pub mod logging;
pub mod motion;
pub mod page;
mod result;
pub mod scroll;
pub mod stage;
pub mod viewport;

/// Browser entry points (`start`, `startWithConfig`)
#[cfg(feature = "wasm")]
pub mod web;

pub use animator::{PageAnimator, Task};
pub use result::{AnimatorError, AnimatorResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::animator::{PageAnimator, Task};
    pub use super::clock::{TimerId, TimerQueue};
    pub use super::config::{AnimatorConfig, SelectorConfig, ToastTimings};
    pub use super::dom::{Dom, MockDom, MockNode, NodeRef, Rect, ToastKind};
    pub use super::handle::{Owned, Release};
    pub use super::motion::{
        Ease, EaseDirection, MotionEngine, PlaybackAction, Position, Start, Timeline,
        TimelineBuilder, TweenDefaults, TweenSpec, TweenVars,
    };
    pub use super::page::{
        validate, Carousel, ContactError, ContactSubmission, NavBehavior, ValidContact,
    };
    pub use super::result::{AnimatorError, AnimatorResult};
    pub use super::scroll::{
        ScrollPosition, ToggleActions, TriggerConfig, TriggerEvent, TriggerId, TriggerState,
    };
    pub use super::stage::{Stage, TriggerAction};
    pub use super::viewport::{Viewport, ViewportClass};

    #[cfg(feature = "wasm")]
    pub use super::dom::BrowserDom;
}
