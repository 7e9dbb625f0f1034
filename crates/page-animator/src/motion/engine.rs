//! Animation playback and style output.
//!
//! The engine owns every live animation, advances playheads on each frame,
//! merges the sampled values per node and writes `transform`/`opacity`
//! inline styles. Nodes only get the style properties some animation has
//! actually touched.

use super::playhead::{PlaybackAction, Playhead};
use super::timeline::Timeline;
use super::tween::{StyleState, Tween, TweenDefaults, TweenSpec, TweenVars};
use crate::dom::{Dom, NodeRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Identifier of an animation owned by a [`MotionEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(u64);

/// Something the engine can play
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Single tween
    Tween(Tween),
    /// Sequence of tweens
    Timeline(Timeline),
}

impl Animation {
    /// Length in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Self::Tween(t) => t.total_duration(),
            Self::Timeline(t) => t.duration(),
        }
    }

    /// Nodes animated
    #[must_use]
    pub fn targets(&self) -> BTreeSet<NodeRef> {
        match self {
            Self::Tween(t) => t.targets().collect(),
            Self::Timeline(t) => t.targets().collect(),
        }
    }

    fn sample(&self, time: f64, out: &mut Vec<(NodeRef, TweenVars)>) {
        match self {
            Self::Tween(t) => t.sample(time, out),
            Self::Timeline(t) => t.sample(time, out),
        }
    }
}

/// Whether a new animation starts running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Playing forward from the start
    Playing,
    /// Paused at the start (waiting for a trigger)
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifetime {
    /// Lives until killed
    Retained,
    /// Dropped once it completes
    Ephemeral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scrub {
    target: f64,
    lag: f64,
}

#[derive(Debug, Clone)]
struct Slot {
    animation: Animation,
    playhead: Playhead,
    lifetime: Lifetime,
    scrub: Option<Scrub>,
}

#[derive(Debug, Clone, Copy, Default)]
struct NodeStyle {
    state: StyleState,
    transform: bool,
    opacity: bool,
}

/// Owner of every live animation and the rendered style of each node.
#[derive(Debug, Default)]
pub struct MotionEngine {
    slots: BTreeMap<AnimationId, Slot>,
    styles: HashMap<NodeRef, NodeStyle>,
    instant: bool,
    next_id: u64,
}

impl MotionEngine {
    /// Empty engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// In instant mode every playhead jumps straight to its destination
    pub fn set_instant(&mut self, instant: bool) {
        self.instant = instant;
    }

    /// Whether instant mode is on
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.instant
    }

    /// Number of live animations
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is animating
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the animation is still live
    #[must_use]
    pub fn contains(&self, id: AnimationId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Playback state of an animation
    #[must_use]
    pub fn playhead(&self, id: AnimationId) -> Option<Playhead> {
        self.slots.get(&id).map(|s| s.playhead)
    }

    /// The animation itself
    #[must_use]
    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.slots.get(&id).map(|s| &s.animation)
    }

    /// Last rendered style of a node
    #[must_use]
    pub fn style_of(&self, node: NodeRef) -> StyleState {
        self.styles.get(&node).map(|s| s.state).unwrap_or_default()
    }

    /// Add a retained tween and render its first frame immediately.
    pub fn add_tween(
        &mut self,
        dom: &mut dyn Dom,
        spec: &TweenSpec,
        defaults: &TweenDefaults,
        start: Start,
    ) -> AnimationId {
        let tween = spec.resolve(defaults, |n| self.style_of(n));
        self.insert(dom, Animation::Tween(tween), start, Lifetime::Retained)
    }

    /// Add a tween that is dropped when it completes. Earlier fire-and-forget
    /// tweens on the same nodes are killed where they stand.
    pub fn add_ephemeral(
        &mut self,
        dom: &mut dyn Dom,
        spec: &TweenSpec,
        defaults: &TweenDefaults,
    ) -> AnimationId {
        let overwritten: Vec<AnimationId> = self
            .slots
            .iter()
            .filter(|(_, slot)| {
                slot.lifetime == Lifetime::Ephemeral
                    && spec
                        .targets
                        .iter()
                        .any(|n| slot.animation.targets().contains(n))
            })
            .map(|(id, _)| *id)
            .collect();
        for id in overwritten {
            self.kill(id);
        }

        let tween = spec.resolve(defaults, |n| self.style_of(n));
        self.insert(dom, Animation::Tween(tween), Start::Playing, Lifetime::Ephemeral)
    }

    /// Add a retained timeline
    pub fn add_timeline(&mut self, dom: &mut dyn Dom, timeline: Timeline, start: Start) -> AnimationId {
        self.insert(dom, Animation::Timeline(timeline), start, Lifetime::Retained)
    }

    fn insert(
        &mut self,
        dom: &mut dyn Dom,
        animation: Animation,
        start: Start,
        lifetime: Lifetime,
    ) -> AnimationId {
        self.next_id += 1;
        let id = AnimationId(self.next_id);
        let duration = animation.duration();
        let mut playhead = match start {
            Start::Playing => Playhead::playing(duration),
            Start::Paused => Playhead::paused(duration),
        };
        if self.instant {
            playhead.finish();
        }
        tracing::trace!(?id, duration, ?start, "animation added");
        self.slots.insert(
            id,
            Slot {
                animation,
                playhead,
                lifetime,
                scrub: None,
            },
        );
        self.render(dom, &[id]);
        id
    }

    /// Apply a trigger action to an animation
    pub fn control(&mut self, dom: &mut dyn Dom, id: AnimationId, action: PlaybackAction) {
        let instant = self.instant;
        let Some(slot) = self.slots.get_mut(&id) else {
            return;
        };
        let before = slot.playhead.progress();
        slot.playhead.apply(action);
        if instant {
            slot.playhead.finish();
        }
        if (slot.playhead.progress() - before).abs() > f64::EPSILON {
            self.render(dom, &[id]);
        }
    }

    /// Drive an animation's progress from outside. With `lag > 0` the
    /// progress eases toward `target` over roughly `lag` seconds of frames.
    pub fn scrub_to(&mut self, dom: &mut dyn Dom, id: AnimationId, target: f64, lag: f64) {
        let instant = self.instant;
        let Some(slot) = self.slots.get_mut(&id) else {
            return;
        };
        let target = target.clamp(0.0, 1.0);
        slot.playhead.apply(PlaybackAction::Pause);
        if lag <= 0.0 || instant {
            slot.scrub = None;
            slot.playhead.seek_progress(target);
            self.render(dom, &[id]);
        } else {
            slot.scrub = Some(Scrub { target, lag });
        }
    }

    /// Point a tween at new values and re-render it at its current progress
    pub fn retarget(&mut self, dom: &mut dyn Dom, id: AnimationId, vars: TweenVars) {
        if let Some(Slot {
            animation: Animation::Tween(tween),
            ..
        }) = self.slots.get_mut(&id)
        {
            tween.retarget(vars);
            self.render(dom, &[id]);
        }
    }

    /// Drop an animation, leaving its nodes as last rendered
    pub fn kill(&mut self, id: AnimationId) -> bool {
        let removed = self.slots.remove(&id).is_some();
        if removed {
            tracing::trace!(?id, "animation killed");
        }
        removed
    }

    /// Drop an animation and strip the inline styles it wrote
    pub fn revert(&mut self, dom: &mut dyn Dom, id: AnimationId) {
        if let Some(slot) = self.slots.remove(&id) {
            for node in slot.animation.targets() {
                self.clear_node(dom, node);
            }
        }
    }

    /// Forget a node's rendered style and remove its inline styles
    pub fn clear_node(&mut self, dom: &mut dyn Dom, node: NodeRef) {
        if let Some(style) = self.styles.remove(&node) {
            if style.transform {
                dom.set_style(node, "transform", "");
            }
            if style.opacity {
                dom.set_style(node, "opacity", "");
            }
        }
    }

    /// Forget a node that has left the document: kill the ephemeral tweens
    /// targeting it and drop its rendered style without writing to it
    pub fn forget_node(&mut self, node: NodeRef) {
        let stale: Vec<AnimationId> = self
            .slots
            .iter()
            .filter(|(_, slot)| {
                slot.lifetime == Lifetime::Ephemeral && slot.animation.targets().contains(&node)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.kill(id);
        }
        self.styles.remove(&node);
    }

    /// Set a node's vertical offset directly (used for pinning)
    pub fn set_offset_y(&mut self, dom: &mut dyn Dom, node: NodeRef, y: f64) {
        let style = self.styles.entry(node).or_default();
        if style.transform && (style.state.y - y).abs() < f64::EPSILON {
            return;
        }
        style.state.y = y;
        style.transform = true;
        let css = style.state.transform_css();
        dom.set_style(node, "transform", &css);
    }

    /// Advance every playing animation by `dt` seconds and write the
    /// changed styles.
    pub fn tick(&mut self, dom: &mut dyn Dom, dt: f64) {
        let instant = self.instant;
        let mut changed = Vec::new();
        let mut finished = Vec::new();

        for (id, slot) in &mut self.slots {
            let moved = match slot.scrub {
                Some(scrub) => {
                    let current = slot.playhead.progress();
                    let diff = scrub.target - current;
                    let next = if instant || diff.abs() < 1e-4 {
                        slot.scrub = None;
                        scrub.target
                    } else {
                        let alpha = 1.0 - (-dt.max(0.0) * 4.0 / scrub.lag).exp();
                        current + diff * alpha
                    };
                    slot.playhead.seek_progress(next);
                    (next - current).abs() > f64::EPSILON
                }
                None if instant => slot.playhead.finish(),
                None => slot.playhead.advance(dt),
            };
            if moved {
                changed.push(*id);
            }
            if slot.lifetime == Lifetime::Ephemeral && slot.playhead.is_complete() {
                finished.push(*id);
            }
        }

        self.render(dom, &changed);
        for id in finished {
            self.slots.remove(&id);
        }
    }

    fn render(&mut self, dom: &mut dyn Dom, ids: &[AnimationId]) {
        let mut samples = Vec::new();
        for id in ids {
            if let Some(slot) = self.slots.get(id) {
                slot.animation.sample(slot.playhead.time(), &mut samples);
            }
        }

        let mut touched: BTreeMap<NodeRef, (bool, bool)> = BTreeMap::new();
        for (node, vars) in samples {
            let style = self.styles.entry(node).or_default();
            style.state = vars.apply_to(style.state);
            let entry = touched.entry(node).or_default();
            if vars.x.is_some() || vars.y.is_some() || vars.scale.is_some() {
                style.transform = true;
                entry.0 = true;
            }
            if vars.opacity.is_some() {
                style.opacity = true;
                entry.1 = true;
            }
        }

        for (node, (transform, opacity)) in touched {
            let state = self.style_of(node);
            if transform {
                dom.set_style(node, "transform", &state.transform_css());
            }
            if opacity {
                dom.set_style(node, "opacity", &state.opacity_css());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockNode};
    use crate::motion::ease::Ease;
    use crate::motion::timeline::{Position, TimelineBuilder};

    fn setup() -> (MockDom, NodeRef) {
        let mut dom = MockDom::default();
        let node = dom.insert(MockNode::new("div").with_class("card"));
        (dom, node)
    }

    fn linear() -> TweenDefaults {
        TweenDefaults {
            ease: Ease::Linear,
            duration: 1.0,
        }
    }

    #[test]
    fn test_paused_from_tween_renders_start_state() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::from(vec![node], TweenVars::new().y(60.0).opacity(0.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);

        assert_eq!(dom.opacity(node), Some(0.0));
        assert_eq!(
            dom.style(node, "transform"),
            Some("translate3d(0px, 60px, 0px) scale(1)")
        );
        engine.tick(&mut dom, 0.5);
        assert_eq!(dom.opacity(node), Some(0.0));
        assert!(engine.playhead(id).unwrap().is_paused());
    }

    #[test]
    fn test_play_then_reverse() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::from(vec![node], TweenVars::new().opacity(0.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);

        engine.control(&mut dom, id, PlaybackAction::Play);
        engine.tick(&mut dom, 0.5);
        assert_eq!(dom.opacity(node), Some(0.5));
        engine.tick(&mut dom, 0.5);
        assert_eq!(dom.opacity(node), Some(1.0));

        engine.control(&mut dom, id, PlaybackAction::Reverse);
        engine.tick(&mut dom, 1.0);
        assert_eq!(dom.opacity(node), Some(0.0));
        assert!(engine.contains(id));
    }

    #[test]
    fn test_untouched_properties_not_written() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-100.0));
        engine.add_ephemeral(&mut dom, &spec, &linear());
        engine.tick(&mut dom, 1.0);
        assert_eq!(dom.style(node, "opacity"), None);
        assert_eq!(engine.style_of(node).x, -100.0);
    }

    #[test]
    fn test_ephemeral_dropped_on_completion() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-100.0));
        let id = engine.add_ephemeral(&mut dom, &spec, &linear());
        engine.tick(&mut dom, 0.5);
        assert!(engine.contains(id));
        engine.tick(&mut dom, 0.5);
        assert!(!engine.contains(id));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_ephemeral_overwrites_previous_on_same_node() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let first = engine.add_ephemeral(
            &mut dom,
            &TweenSpec::to(vec![node], TweenVars::new().x(-100.0)),
            &linear(),
        );
        engine.tick(&mut dom, 0.5);
        let second = engine.add_ephemeral(
            &mut dom,
            &TweenSpec::to(vec![node], TweenVars::new().x(-200.0)),
            &linear(),
        );
        assert!(!engine.contains(first));
        assert!(engine.contains(second));
        // continues from where the first one stopped
        engine.tick(&mut dom, 0.5);
        assert_eq!(engine.style_of(node).x, -125.0);
    }

    #[test]
    fn test_scrub_eases_toward_target() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-1000.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);

        engine.scrub_to(&mut dom, id, 0.5, 1.0);
        engine.tick(&mut dom, 1.0 / 60.0);
        let early = engine.playhead(id).unwrap().progress();
        assert!(early > 0.0 && early < 0.5);

        for _ in 0..240 {
            engine.tick(&mut dom, 1.0 / 60.0);
        }
        assert!((engine.playhead(id).unwrap().progress() - 0.5).abs() < 1e-3);
        assert!((engine.style_of(node).x + 500.0).abs() < 1.0);
    }

    #[test]
    fn test_scrub_without_lag_snaps() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-1000.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);
        engine.scrub_to(&mut dom, id, 0.25, 0.0);
        assert_eq!(engine.style_of(node).x, -250.0);
    }

    #[test]
    fn test_instant_mode_jumps_to_end() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        engine.set_instant(true);
        let spec = TweenSpec::from(vec![node], TweenVars::new().opacity(0.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Playing);
        assert_eq!(dom.opacity(node), Some(1.0));

        engine.control(&mut dom, id, PlaybackAction::Reverse);
        assert_eq!(dom.opacity(node), Some(0.0));
    }

    #[test]
    fn test_revert_strips_styles() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::from(vec![node], TweenVars::new().y(100.0).opacity(0.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);
        engine.revert(&mut dom, id);
        assert_eq!(dom.style(node, "opacity"), None);
        assert_eq!(dom.style(node, "transform"), None);
        assert!(!engine.contains(id));
    }

    #[test]
    fn test_retarget_rerenders() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-100.0));
        let id = engine.add_tween(&mut dom, &spec, &linear(), Start::Paused);
        engine.scrub_to(&mut dom, id, 1.0, 0.0);
        engine.retarget(&mut dom, id, TweenVars::new().x(-300.0));
        assert_eq!(engine.style_of(node).x, -300.0);
    }

    #[test]
    fn test_offset_y_keeps_other_transform_parts() {
        let (mut dom, node) = setup();
        let mut engine = MotionEngine::new();
        let spec = TweenSpec::to(vec![node], TweenVars::new().x(-40.0)).duration(0.0);
        engine.add_ephemeral(&mut dom, &spec, &linear());
        engine.set_offset_y(&mut dom, node, 120.0);
        assert_eq!(
            dom.style(node, "transform"),
            Some("translate3d(-40px, 120px, 0px) scale(1)")
        );
    }

    #[test]
    fn test_timeline_playback() {
        let mut dom = MockDom::default();
        let a = dom.insert(MockNode::new("header"));
        let b = dom.insert(MockNode::new("h1"));
        let mut engine = MotionEngine::new();
        let timeline = TimelineBuilder::new(linear(), |n| engine.style_of(n))
            .add("a", &TweenSpec::from(vec![a], TweenVars::new().opacity(0.0)), Position::default())
            .add("b", &TweenSpec::from(vec![b], TweenVars::new().opacity(0.0)), Position::default())
            .build();
        let id = engine.add_timeline(&mut dom, timeline, Start::Playing);

        assert_eq!(dom.opacity(b), Some(0.0));
        engine.tick(&mut dom, 1.5);
        assert_eq!(dom.opacity(a), Some(1.0));
        assert_eq!(dom.opacity(b), Some(0.5));
        engine.tick(&mut dom, 1.0);
        assert!(engine.playhead(id).unwrap().is_complete());
        assert_eq!(dom.opacity(b), Some(1.0));
    }
}
