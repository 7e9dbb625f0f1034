//! Timelines: tweens placed at relative start offsets.

use super::tween::{Tween, TweenDefaults, TweenSpec, TweenVars, StyleState};
use crate::dom::NodeRef;
use crate::result::{AnimatorError, AnimatorResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a child starts within its timeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Seconds from the start of the timeline
    Absolute(f64),
    /// Offset from the current end of the timeline (`"+=0.5"`, `"-=0.8"`)
    FromEnd(f64),
    /// Offset from the start of the previous child (`"<"`, `"<0.2"`)
    WithPrevious(f64),
    /// Offset from the end of the previous child (`">"`, `">-0.1"`)
    AfterPrevious(f64),
}

impl Default for Position {
    fn default() -> Self {
        Self::FromEnd(0.0)
    }
}

impl FromStr for Position {
    type Err = AnimatorError;

    fn from_str(s: &str) -> AnimatorResult<Self> {
        let input = s.trim();
        let invalid = || AnimatorError::InvalidTimelinePosition {
            input: input.to_string(),
        };
        let number = |text: &str| -> AnimatorResult<f64> {
            if text.is_empty() {
                return Ok(0.0);
            }
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };

        if let Some(rest) = input.strip_prefix("+=") {
            Ok(Self::FromEnd(number(rest)?))
        } else if let Some(rest) = input.strip_prefix("-=") {
            Ok(Self::FromEnd(-number(rest)?))
        } else if let Some(rest) = input.strip_prefix('<') {
            Ok(Self::WithPrevious(number(rest)?))
        } else if let Some(rest) = input.strip_prefix('>') {
            Ok(Self::AfterPrevious(number(rest)?))
        } else if input.is_empty() {
            Err(invalid())
        } else {
            Ok(Self::Absolute(number(input)?.max(0.0)))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Child {
    label: String,
    start: f64,
    tween: Option<Tween>,
    duration: f64,
}

/// Timeline under construction.
///
/// Children whose targets are absent still occupy their slot so the rest of
/// the sequence keeps its timing.
#[derive(Debug)]
pub struct TimelineBuilder<F> {
    defaults: TweenDefaults,
    current: F,
    children: Vec<Child>,
    end: f64,
}

impl<F> TimelineBuilder<F>
where
    F: Fn(NodeRef) -> StyleState,
{
    /// Start a timeline whose tweens resolve against `current`
    pub fn new(defaults: TweenDefaults, current: F) -> Self {
        Self {
            defaults,
            current,
            children: Vec::new(),
            end: 0.0,
        }
    }

    /// Append a tween at `position`. An empty target list still consumes
    /// its duration.
    #[must_use]
    pub fn add(mut self, label: &str, spec: &TweenSpec, position: Position) -> Self {
        let duration = spec.total_duration(&self.defaults);
        let start = self.start_for(position);
        let tween = if spec.targets.is_empty() {
            None
        } else {
            Some(spec.resolve(&self.defaults, &self.current))
        };
        self.end = self.end.max(start + duration);
        self.children.push(Child {
            label: label.to_string(),
            start,
            tween,
            duration,
        });
        self
    }

    fn start_for(&self, position: Position) -> f64 {
        let prev = self.children.last();
        let start = match position {
            Position::Absolute(t) => t,
            Position::FromEnd(offset) => self.end + offset,
            Position::WithPrevious(offset) => prev.map_or(0.0, |c| c.start) + offset,
            Position::AfterPrevious(offset) => {
                prev.map_or(0.0, |c| c.start + c.duration) + offset
            }
        };
        start.max(0.0)
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Timeline {
        Timeline {
            children: self.children,
            duration: self.end,
        }
    }
}

/// A built timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    children: Vec<Child>,
    duration: f64,
}

impl Timeline {
    /// Total length in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of children, including ones with no targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether nothing was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Start time of the child with `label`
    #[must_use]
    pub fn start_of(&self, label: &str) -> Option<f64> {
        self.children
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.start)
    }

    /// Start times in insertion order
    #[must_use]
    pub fn starts(&self) -> Vec<f64> {
        self.children.iter().map(|c| c.start).collect()
    }

    /// Nodes animated by any child
    pub fn targets(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.children
            .iter()
            .filter_map(|c| c.tween.as_ref())
            .flat_map(Tween::targets)
    }

    /// Property values of every target at `time`. Children that have not
    /// started yet render their starting state.
    pub fn sample(&self, time: f64, out: &mut Vec<(NodeRef, TweenVars)>) {
        for child in &self.children {
            if let Some(tween) = &child.tween {
                tween.sample(time - child.start, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ease::Ease;

    fn identity(_: NodeRef) -> StyleState {
        StyleState::IDENTITY
    }

    fn fade(node: usize) -> TweenSpec {
        TweenSpec::from(vec![NodeRef::new(node)], TweenVars::new().opacity(0.0))
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!("-=.8".parse::<Position>().unwrap(), Position::FromEnd(-0.8));
        assert_eq!("+=0.5".parse::<Position>().unwrap(), Position::FromEnd(0.5));
        assert_eq!("<".parse::<Position>().unwrap(), Position::WithPrevious(0.0));
        assert_eq!("<0.2".parse::<Position>().unwrap(), Position::WithPrevious(0.2));
        assert_eq!(">".parse::<Position>().unwrap(), Position::AfterPrevious(0.0));
        assert_eq!("1.5".parse::<Position>().unwrap(), Position::Absolute(1.5));
        assert!("".parse::<Position>().is_err());
        assert!("-=abc".parse::<Position>().is_err());
    }

    #[test]
    fn test_relative_offsets_use_timeline_end() {
        let defaults = TweenDefaults {
            ease: Ease::POWER4_OUT,
            duration: 1.2,
        };
        let tl = TimelineBuilder::new(defaults, identity)
            .add("header", &fade(1).duration(1.5), Position::default())
            .add("title", &fade(2), "-=.8".parse().unwrap())
            .add("subtitle", &fade(3), "-=.9".parse().unwrap())
            .add("button", &fade(4), "-=.9".parse().unwrap())
            .add("bg", &fade(5).duration(2.0), "-=1.2".parse().unwrap())
            .build();

        let expected = [0.0, 0.7, 1.0, 1.3, 1.3];
        for (got, want) in tl.starts().iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert!((tl.duration() - 3.3).abs() < 1e-9);
        assert_eq!(tl.len(), 5);
    }

    #[test]
    fn test_missing_targets_keep_their_slot() {
        let empty = TweenSpec::from(Vec::new(), TweenVars::new().opacity(0.0)).duration(1.0);
        let tl = TimelineBuilder::new(TweenDefaults::default(), identity)
            .add("ghost", &empty, Position::default())
            .add("real", &fade(1).duration(1.0), Position::default())
            .build();
        assert_eq!(tl.start_of("real"), Some(1.0));
        assert_eq!(tl.targets().count(), 1);
    }

    #[test]
    fn test_previous_anchors() {
        let tl = TimelineBuilder::new(TweenDefaults::default(), identity)
            .add("a", &fade(1).duration(1.0), Position::Absolute(0.5))
            .add("b", &fade(2).duration(1.0), Position::WithPrevious(0.0))
            .add("c", &fade(3).duration(1.0), Position::AfterPrevious(0.25))
            .build();
        assert_eq!(tl.start_of("b"), Some(0.5));
        assert_eq!(tl.start_of("c"), Some(1.75));
    }

    #[test]
    fn test_negative_start_clamped() {
        let tl = TimelineBuilder::new(TweenDefaults::default(), identity)
            .add("a", &fade(1).duration(0.5), "-=2".parse().unwrap())
            .build();
        assert_eq!(tl.start_of("a"), Some(0.0));
    }

    #[test]
    fn test_unstarted_children_render_from_state() {
        let tl = TimelineBuilder::new(TweenDefaults::default(), identity)
            .add("a", &fade(1).duration(1.0), Position::default())
            .add("b", &fade(2).duration(1.0), Position::default())
            .build();
        let mut out = Vec::new();
        tl.sample(0.5, &mut out);
        let b = out.iter().find(|(n, _)| *n == NodeRef::new(2)).unwrap();
        assert_eq!(b.1.opacity, Some(0.0));
    }
}
