//! Tweening engine.
//!
//! Eases, tweens and timelines describe motion; [`MotionEngine`] plays it
//! back and writes the resulting styles to the document.

mod ease;
mod engine;
mod playhead;
mod timeline;
mod tween;

pub use ease::{sample_ease, Ease, EaseDirection, Keyframe};
pub use engine::{Animation, AnimationId, MotionEngine, Start};
pub use playhead::{Direction, PlaybackAction, Playhead};
pub use timeline::{Position, Timeline, TimelineBuilder};
pub use tween::{css_number, StyleState, Tween, TweenDefaults, TweenKind, TweenSpec, TweenVars};
