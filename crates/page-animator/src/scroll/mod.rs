//! Scroll-driven triggers.
//!
//! [`ScrollPosition`] describes where a trigger starts and ends,
//! [`ScrollTrigger`] turns a moving scroll offset into boundary crossings
//! and [`TriggerRegistry`] keeps every live trigger measured against the
//! current layout.

mod position;
mod registry;
mod trigger;

pub use position::{Anchor, ScrollPosition};
pub use registry::{Pin, ScrollSource, TriggerConfig, TriggerId, TriggerRegistry};
pub use trigger::{ScrollTrigger, ToggleActions, TriggerBounds, TriggerEvent, TriggerState};
