//! Live scroll triggers, their measured ranges and pins.
//!
//! Ranges are measured from untransformed layout. Page triggers are laid
//! out along the vertical page scroll; container triggers along the
//! horizontal travel of an animated container. A pinned trigger holds its
//! element in place for the length of its range, which pushes every later
//! page trigger down by the same distance.

use super::position::ScrollPosition;
use super::trigger::{ScrollTrigger, TriggerBounds, TriggerEvent, TriggerState};
use crate::dom::{Dom, NodeRef, Rect};
use crate::motion::AnimationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a registered trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(u64);

/// What moves a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    /// Vertical page scroll
    Page,
    /// Horizontal travel of `container`, driven by `animation`
    Container {
        /// Animation moving the container
        animation: AnimationId,
        /// Node whose `x` the animation changes
        container: NodeRef,
    },
}

/// How to build a trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerConfig {
    /// Element the positions refer to
    pub trigger: NodeRef,
    /// Start position
    pub start: ScrollPosition,
    /// End position
    pub end: ScrollPosition,
    /// What moves it
    pub source: ScrollSource,
    /// Hold the element in place while active
    pub pin: bool,
}

impl TriggerConfig {
    /// Page trigger from `start` to `bottom top`
    #[must_use]
    pub fn new(trigger: NodeRef, start: ScrollPosition) -> Self {
        Self {
            trigger,
            start,
            end: ScrollPosition::BOTTOM_TOP,
            source: ScrollSource::Page,
            pin: false,
        }
    }

    /// Set the end
    #[must_use]
    pub fn end(mut self, end: ScrollPosition) -> Self {
        self.end = end;
        self
    }

    /// Pin the trigger element
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    /// Drive the trigger from a container animation
    #[must_use]
    pub fn within(mut self, animation: AnimationId, container: NodeRef) -> Self {
        self.source = ScrollSource::Container {
            animation,
            container,
        };
        self
    }
}

/// A pinned element and the range it stays put for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Owning trigger
    pub id: TriggerId,
    /// Pinned element
    pub node: NodeRef,
    /// Range the element is held over
    pub bounds: TriggerBounds,
}

impl Pin {
    /// Vertical offset that keeps the element in place at `scroll`
    #[must_use]
    pub fn offset(&self, scroll: f64) -> f64 {
        (scroll - self.bounds.start).clamp(0.0, self.bounds.distance())
    }

    /// Extra space the pin adds below the element
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.bounds.distance()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    config: TriggerConfig,
    trigger: ScrollTrigger,
}

/// All live triggers.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    entries: BTreeMap<TriggerId, Entry>,
    next_id: u64,
}

impl TriggerRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live triggers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no trigger is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the trigger is live
    #[must_use]
    pub fn contains(&self, id: TriggerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Live trigger IDs in creation order
    pub fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.entries.keys().copied()
    }

    /// Configuration a trigger was created with
    #[must_use]
    pub fn config(&self, id: TriggerId) -> Option<&TriggerConfig> {
        self.entries.get(&id).map(|e| &e.config)
    }

    /// Measured range
    #[must_use]
    pub fn bounds(&self, id: TriggerId) -> Option<TriggerBounds> {
        self.entries.get(&id).map(|e| e.trigger.bounds())
    }

    /// Current state
    #[must_use]
    pub fn state(&self, id: TriggerId) -> Option<TriggerState> {
        self.entries.get(&id).map(|e| e.trigger.state())
    }

    /// Progress through the range at `position`
    #[must_use]
    pub fn progress(&self, id: TriggerId, position: f64) -> Option<f64> {
        self.bounds(id).map(|b| b.progress(position))
    }

    /// Measure and register a trigger, then evaluate it against the
    /// source's current `position`. Returns the crossings that implies.
    pub fn create(
        &mut self,
        dom: &dyn Dom,
        config: TriggerConfig,
        position: f64,
    ) -> (TriggerId, Vec<TriggerEvent>) {
        let pins = self.pin_layout(dom);
        let bounds = measure(dom, &config, &pins);
        let mut trigger = ScrollTrigger::new(bounds);
        let mut events = Vec::new();
        trigger.update(position, &mut events);

        self.next_id += 1;
        let id = TriggerId(self.next_id);
        tracing::debug!(
            ?id,
            start = bounds.start,
            end = bounds.end,
            pin = config.pin,
            "scroll trigger created"
        );
        self.entries.insert(id, Entry { config, trigger });
        (id, events)
    }

    /// Remove a trigger
    pub fn kill(&mut self, id: TriggerId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            tracing::debug!(?id, "scroll trigger killed");
        }
        removed
    }

    /// Change a trigger's end; takes effect on the next refresh
    pub fn set_end(&mut self, id: TriggerId, end: ScrollPosition) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.config.end = end;
        }
    }

    /// Re-measure every trigger from current layout. Pins are measured
    /// first, in document order, so later triggers include their spacing.
    /// No events are emitted; the next update reports any crossing.
    pub fn refresh(&mut self, dom: &dyn Dom) {
        let mut pinned: Vec<(TriggerId, Rect)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.config.pin)
            .map(|(id, e)| (*id, dom.layout_box(e.config.trigger)))
            .collect();
        pinned.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));

        let mut pins: Vec<(Rect, f64)> = Vec::with_capacity(pinned.len());
        for (id, rect) in pinned {
            if let Some(entry) = self.entries.get_mut(&id) {
                let bounds = measure(dom, &entry.config, &pins);
                entry.trigger.set_bounds(bounds);
                pins.push((rect, bounds.distance()));
            }
        }

        for entry in self.entries.values_mut().filter(|e| !e.config.pin) {
            entry.trigger.set_bounds(measure(dom, &entry.config, &pins));
        }
        tracing::debug!(triggers = self.entries.len(), "scroll triggers refreshed");
    }

    /// Feed the page scroll offset to every page trigger
    pub fn update_page(&mut self, scroll: f64) -> Vec<(TriggerId, TriggerEvent)> {
        self.update_where(scroll, |source| matches!(source, ScrollSource::Page))
    }

    /// Feed a container's horizontal travel to the triggers it drives
    pub fn update_container(
        &mut self,
        animation: AnimationId,
        travel: f64,
    ) -> Vec<(TriggerId, TriggerEvent)> {
        self.update_where(travel, |source| {
            matches!(source, ScrollSource::Container { animation: a, .. } if a == animation)
        })
    }

    fn update_where(
        &mut self,
        position: f64,
        selects: impl Fn(ScrollSource) -> bool,
    ) -> Vec<(TriggerId, TriggerEvent)> {
        let mut fired = Vec::new();
        let mut events = Vec::new();
        for (id, entry) in &mut self.entries {
            if !selects(entry.config.source) {
                continue;
            }
            entry.trigger.update(position, &mut events);
            fired.extend(events.drain(..).map(|event| (*id, event)));
        }
        fired
    }

    /// Distinct container sources, in creation order
    #[must_use]
    pub fn container_sources(&self) -> Vec<(AnimationId, NodeRef)> {
        let mut sources: Vec<(AnimationId, NodeRef)> = Vec::new();
        for entry in self.entries.values() {
            if let ScrollSource::Container {
                animation,
                container,
            } = entry.config.source
            {
                if !sources.iter().any(|(a, _)| *a == animation) {
                    sources.push((animation, container));
                }
            }
        }
        sources
    }

    /// Every pinned trigger
    #[must_use]
    pub fn pins(&self) -> Vec<Pin> {
        self.entries
            .iter()
            .filter(|(_, e)| e.config.pin)
            .map(|(id, e)| Pin {
                id: *id,
                node: e.config.trigger,
                bounds: e.trigger.bounds(),
            })
            .collect()
    }

    fn pin_layout(&self, dom: &dyn Dom) -> Vec<(Rect, f64)> {
        self.entries
            .values()
            .filter(|e| e.config.pin)
            .map(|e| (dom.layout_box(e.config.trigger), e.trigger.bounds().distance()))
            .collect()
    }
}

/// Range of a trigger given the pins laid out so far
fn measure(dom: &dyn Dom, config: &TriggerConfig, pins: &[(Rect, f64)]) -> TriggerBounds {
    let rect = dom.layout_box(config.trigger);
    let viewport = dom.viewport();
    let (element_start, element_size, viewport_size) = match config.source {
        ScrollSource::Page => {
            let spacing: f64 = pins
                .iter()
                .filter(|(pin, _)| pin.bottom() <= rect.top)
                .map(|(_, distance)| distance)
                .sum();
            (rect.top + spacing, rect.height, viewport.height)
        }
        ScrollSource::Container { container, .. } => {
            let origin = dom.layout_box(container).left;
            (rect.left - origin, rect.width, viewport.client_width)
        }
    };
    let start = config
        .start
        .resolve(element_start, element_size, viewport_size, 0.0);
    let end = config
        .end
        .resolve(element_start, element_size, viewport_size, start);
    TriggerBounds::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockNode};
    use crate::motion::MotionEngine;
    use crate::viewport::Viewport;

    fn pos(s: &str) -> ScrollPosition {
        s.parse().unwrap()
    }

    fn page() -> MockDom {
        let mut dom = MockDom::new(Viewport::new(1280.0, 800.0).with_client_width(1265.0));
        dom.set_document_height(6000.0);
        dom
    }

    #[test]
    fn test_create_measures_and_evaluates() {
        let mut dom = page();
        let title = dom.insert(MockNode::new("h2").with_layout(Rect::new(0.0, 2000.0, 1280.0, 100.0)));
        let mut registry = TriggerRegistry::new();

        let (id, events) = registry.create(&dom, TriggerConfig::new(title, pos("top 85%")), 0.0);
        assert!(events.is_empty());
        let bounds = registry.bounds(id).unwrap();
        assert!((bounds.start - 1320.0).abs() < 1e-9);
        assert_eq!(bounds.end, 2100.0);

        // created while already scrolled past the start
        let (_, events) =
            registry.create(&dom, TriggerConfig::new(title, pos("top 85%")), 1500.0);
        assert_eq!(events, vec![TriggerEvent::Enter]);
    }

    #[test]
    fn test_update_page_reports_crossings() {
        let mut dom = page();
        let body = dom.body().unwrap();
        let mut registry = TriggerRegistry::new();
        let (id, _) = registry.create(&dom, TriggerConfig::new(body, pos("top -50px")), 0.0);

        assert!(registry.update_page(30.0).is_empty());
        assert_eq!(registry.update_page(60.0), vec![(id, TriggerEvent::Enter)]);
        assert_eq!(registry.update_page(10.0), vec![(id, TriggerEvent::LeaveBack)]);
    }

    #[test]
    fn test_pin_pushes_later_triggers() {
        let mut dom = page();
        let projects = dom.insert(MockNode::new("section").with_layout(Rect::new(0.0, 1000.0, 1280.0, 800.0)));
        let footer = dom.insert(MockNode::new("footer").with_layout(Rect::new(0.0, 3000.0, 1280.0, 200.0)));
        let header = dom.insert(MockNode::new("header").with_layout(Rect::new(0.0, 0.0, 1280.0, 80.0)));

        let mut registry = TriggerRegistry::new();
        let (pin, _) = registry.create(
            &dom,
            TriggerConfig::new(projects, ScrollPosition::TOP_TOP)
                .end(pos("+=1500"))
                .pinned(),
            0.0,
        );
        let (late, _) = registry.create(&dom, TriggerConfig::new(footer, pos("top 85%")), 0.0);
        let (early, _) = registry.create(&dom, TriggerConfig::new(header, pos("top 85%")), 0.0);

        assert_eq!(registry.bounds(pin).unwrap(), TriggerBounds::new(1000.0, 2500.0));
        assert!((registry.bounds(late).unwrap().start - (3000.0 + 1500.0 - 680.0)).abs() < 1e-9);
        assert!((registry.bounds(early).unwrap().start + 680.0).abs() < 1e-9);

        let pins = registry.pins();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].node, projects);
        assert_eq!(pins[0].offset(500.0), 0.0);
        assert_eq!(pins[0].offset(1600.0), 600.0);
        assert_eq!(pins[0].offset(9000.0), 1500.0);
    }

    #[test]
    fn test_refresh_picks_up_new_layout_and_end() {
        let mut dom = page();
        let projects = dom.insert(MockNode::new("section").with_layout(Rect::new(0.0, 1000.0, 1280.0, 800.0)));
        let footer = dom.insert(MockNode::new("footer").with_layout(Rect::new(0.0, 3000.0, 1280.0, 200.0)));
        let mut registry = TriggerRegistry::new();
        let (pin, _) = registry.create(
            &dom,
            TriggerConfig::new(projects, ScrollPosition::TOP_TOP)
                .end(pos("+=1500"))
                .pinned(),
            0.0,
        );
        let (late, _) = registry.create(&dom, TriggerConfig::new(footer, ScrollPosition::TOP_TOP), 0.0);

        dom.set_layout(projects, Rect::new(0.0, 1200.0, 1280.0, 800.0));
        registry.set_end(pin, pos("+=500"));
        registry.refresh(&dom);

        assert_eq!(registry.bounds(pin).unwrap(), TriggerBounds::new(1200.0, 1700.0));
        assert_eq!(registry.bounds(late).unwrap().start, 3500.0);
    }

    #[test]
    fn test_container_source_measures_horizontally() {
        let mut dom = page();
        let container = dom.insert(MockNode::new("div").with_layout(Rect::new(100.0, 1000.0, 1165.0, 600.0)));
        let card = dom.insert(MockNode::new("article").with_layout(Rect::new(2100.0, 1000.0, 400.0, 600.0)));
        let mut engine = MotionEngine::new();
        let animation = engine.add_tween(
            &mut dom,
            &crate::motion::TweenSpec::to(vec![container], crate::motion::TweenVars::new().x(-2000.0)),
            &crate::motion::TweenDefaults::default(),
            crate::motion::Start::Paused,
        );

        let mut registry = TriggerRegistry::new();
        let (id, _) = registry.create(
            &dom,
            TriggerConfig::new(card, pos("left 90%")).within(animation, container),
            0.0,
        );
        // 2000 from the container's left edge, minus 90% of 1265
        let bounds = registry.bounds(id).unwrap();
        assert!((bounds.start - (2000.0 - 1138.5)).abs() < 1e-9);

        assert!(registry.update_page(5000.0).is_empty());
        assert!(registry.update_container(animation, 500.0).is_empty());
        assert_eq!(
            registry.update_container(animation, 900.0),
            vec![(id, TriggerEvent::Enter)]
        );
        assert_eq!(registry.container_sources(), vec![(animation, container)]);
    }

    #[test]
    fn test_kill_removes_trigger() {
        let dom = page();
        let mut registry = TriggerRegistry::new();
        let (id, _) = registry.create(&dom, TriggerConfig::new(NodeRef::new(0), ScrollPosition::TOP_TOP), 0.0);
        assert!(registry.kill(id));
        assert!(!registry.kill(id));
        assert!(registry.is_empty());
        assert!(registry.update_page(100.0).is_empty());
    }
}
