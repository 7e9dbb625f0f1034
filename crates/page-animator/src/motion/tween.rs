//! Tween descriptions and their resolved, sampleable form.

use super::ease::Ease;
use crate::dom::NodeRef;
use serde::{Deserialize, Serialize};

/// Full animatable state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleState {
    /// Horizontal translation (px)
    pub x: f64,
    /// Vertical translation (px)
    pub y: f64,
    /// Uniform scale
    pub scale: f64,
    /// Opacity (0.0-1.0)
    pub opacity: f64,
}

impl Default for StyleState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl StyleState {
    /// Untransformed, fully opaque
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// CSS `transform` value
    #[must_use]
    pub fn transform_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0px) scale({})",
            css_number(self.x),
            css_number(self.y),
            css_number(self.scale)
        )
    }

    /// CSS `opacity` value
    #[must_use]
    pub fn opacity_css(&self) -> String {
        css_number(self.opacity.clamp(0.0, 1.0))
    }
}

/// Format a number for CSS with at most three decimals and no `-0`.
#[must_use]
pub fn css_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// A partial set of property values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TweenVars {
    /// Horizontal translation (px)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical translation (px)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Uniform scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Opacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl TweenVars {
    /// No properties
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: None,
            y: None,
            scale: None,
            opacity: None,
        }
    }

    /// Set x
    #[must_use]
    pub const fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Set y
    #[must_use]
    pub const fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Set scale
    #[must_use]
    pub const fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set opacity
    #[must_use]
    pub const fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Whether no property is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.scale.is_none() && self.opacity.is_none()
    }

    /// `base` with every set property overridden
    #[must_use]
    pub fn apply_to(&self, base: StyleState) -> StyleState {
        StyleState {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            scale: self.scale.unwrap_or(base.scale),
            opacity: self.opacity.unwrap_or(base.opacity),
        }
    }

    /// Values of `state` restricted to the properties set here
    #[must_use]
    pub fn project(&self, state: StyleState) -> Self {
        Self {
            x: self.x.map(|_| state.x),
            y: self.y.map(|_| state.y),
            scale: self.scale.map(|_| state.scale),
            opacity: self.opacity.map(|_| state.opacity),
        }
    }
}

/// Which end of the tween the vars describe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenKind {
    /// Vars are the starting state; the tween ends at the current state
    From,
    /// Vars are the destination; the tween starts from the current state
    To,
}

/// Ease and duration applied to tweens that do not set their own
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TweenDefaults {
    /// Default ease
    pub ease: Ease,
    /// Default duration in seconds
    pub duration: f64,
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            ease: Ease::POWER4_OUT,
            duration: 1.2,
        }
    }
}

/// Unresolved tween: what to animate, before current styles are known.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenSpec {
    /// Nodes animated, in stagger order
    pub targets: Vec<NodeRef>,
    /// From or to
    pub kind: TweenKind,
    /// Property values
    pub vars: TweenVars,
    /// Seconds; `None` takes the default
    pub duration: Option<f64>,
    /// `None` takes the default
    pub ease: Option<Ease>,
    /// Delay between consecutive targets (seconds)
    pub stagger: f64,
}

impl TweenSpec {
    /// Animate `targets` from `vars` to their current state
    #[must_use]
    pub fn from(targets: impl Into<Vec<NodeRef>>, vars: TweenVars) -> Self {
        Self::new(targets.into(), TweenKind::From, vars)
    }

    /// Animate `targets` from their current state to `vars`
    #[must_use]
    pub fn to(targets: impl Into<Vec<NodeRef>>, vars: TweenVars) -> Self {
        Self::new(targets.into(), TweenKind::To, vars)
    }

    fn new(targets: Vec<NodeRef>, kind: TweenKind, vars: TweenVars) -> Self {
        Self {
            targets,
            kind,
            vars,
            duration: None,
            ease: None,
            stagger: 0.0,
        }
    }

    /// Override the duration
    #[must_use]
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds.max(0.0));
        self
    }

    /// Override the ease
    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Offset each target's start by `seconds` times its index
    #[must_use]
    pub fn stagger(mut self, seconds: f64) -> Self {
        self.stagger = seconds.max(0.0);
        self
    }

    /// Duration including stagger, once defaults are applied
    #[must_use]
    pub fn total_duration(&self, defaults: &TweenDefaults) -> f64 {
        let per_target = self.duration.unwrap_or(defaults.duration);
        let spread = self.stagger * self.targets.len().saturating_sub(1) as f64;
        per_target + spread
    }

    /// Fix endpoints against the current style of each target.
    #[must_use]
    pub fn resolve(
        &self,
        defaults: &TweenDefaults,
        current: impl Fn(NodeRef) -> StyleState,
    ) -> Tween {
        let tracks = self
            .targets
            .iter()
            .map(|&node| {
                let now = current(node);
                let (start, end) = match self.kind {
                    TweenKind::From => (self.vars.apply_to(now), now),
                    TweenKind::To => (now, self.vars.apply_to(now)),
                };
                Track { node, start, end }
            })
            .collect();

        Tween {
            tracks,
            vars: self.vars,
            kind: self.kind,
            duration: self.duration.unwrap_or(defaults.duration),
            ease: self.ease.unwrap_or(defaults.ease),
            stagger: self.stagger,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Track {
    node: NodeRef,
    start: StyleState,
    end: StyleState,
}

/// Resolved tween with fixed per-target endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    tracks: Vec<Track>,
    vars: TweenVars,
    kind: TweenKind,
    duration: f64,
    ease: Ease,
    stagger: f64,
}

impl Tween {
    /// Length in seconds including stagger
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.duration + self.stagger * self.tracks.len().saturating_sub(1) as f64
    }

    /// Per-target duration
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Curve used
    #[must_use]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Animated nodes
    pub fn targets(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.tracks.iter().map(|t| t.node)
    }

    /// Whether `node` is one of the targets
    #[must_use]
    pub fn animates(&self, node: NodeRef) -> bool {
        self.tracks.iter().any(|t| t.node == node)
    }

    /// Properties this tween writes
    #[must_use]
    pub fn vars(&self) -> TweenVars {
        self.vars
    }

    /// Change the destination of a to-tween (or the origin of a
    /// from-tween) while keeping the other end fixed.
    pub fn retarget(&mut self, vars: TweenVars) {
        self.vars = vars;
        for track in &mut self.tracks {
            match self.kind {
                TweenKind::To => track.end = vars.apply_to(track.start),
                TweenKind::From => track.start = vars.apply_to(track.end),
            }
        }
    }

    /// Property values of every target at `time` seconds into the tween.
    pub fn sample(&self, time: f64, out: &mut Vec<(NodeRef, TweenVars)>) {
        for (i, track) in self.tracks.iter().enumerate() {
            let local = time - self.stagger * i as f64;
            let progress = if self.duration <= 0.0 {
                if local >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                (local / self.duration).clamp(0.0, 1.0)
            };
            let eased = self.ease.evaluate(progress);
            let state = lerp_state(track.start, track.end, eased);
            out.push((track.node, self.vars.project(state)));
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_state(a: StyleState, b: StyleState, t: f64) -> StyleState {
    StyleState {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        scale: lerp(a.scale, b.scale, t),
        opacity: lerp(a.opacity, b.opacity, t),
    }
}
