//! Triggers bound to animations.
//!
//! A [`Stage`] owns the motion engine and the trigger registry and routes
//! every boundary crossing to the [`TriggerAction`] it was bound with.

use crate::dom::{Dom, NodeRef};
use crate::handle::Release;
use crate::motion::{AnimationId, MotionEngine};
use crate::scroll::{
    ScrollSource, ToggleActions, TriggerConfig, TriggerEvent, TriggerId, TriggerRegistry,
};
use std::collections::{BTreeMap, HashMap};

/// What a trigger does when it fires
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerAction {
    /// Add `class` once the start is crossed, remove it when scrolling back
    /// above the start
    ClassAfterStart {
        /// Element to toggle
        node: NodeRef,
        /// Class name
        class: String,
    },
    /// Control an animation per crossing
    Play {
        /// Controlled animation
        animation: AnimationId,
        /// Action per crossing
        actions: ToggleActions,
    },
    /// Tie an animation's progress to the trigger's progress
    Scrub {
        /// Scrubbed animation
        animation: AnimationId,
        /// Smoothing in seconds; zero follows exactly
        lag: f64,
    },
    /// Nothing beyond measuring (pins, container sources)
    None,
}

/// Motion engine plus triggers.
#[derive(Debug, Default)]
pub struct Stage {
    motion: MotionEngine,
    triggers: TriggerRegistry,
    bindings: HashMap<TriggerId, TriggerAction>,
    spacers: BTreeMap<NodeRef, f64>,
}

impl Stage {
    /// Empty stage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine
    #[must_use]
    pub fn motion(&self) -> &MotionEngine {
        &self.motion
    }

    /// The engine, mutably
    pub fn motion_mut(&mut self) -> &mut MotionEngine {
        &mut self.motion
    }

    /// The triggers
    #[must_use]
    pub fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }

    /// Action bound to a trigger
    #[must_use]
    pub fn binding(&self, id: TriggerId) -> Option<&TriggerAction> {
        self.bindings.get(&id)
    }

    /// Create a trigger and bind `action` to it. Crossings implied by the
    /// current scroll position are applied immediately.
    pub fn bind(
        &mut self,
        dom: &mut dyn Dom,
        config: TriggerConfig,
        action: TriggerAction,
    ) -> TriggerId {
        let position = self.position_of(&*dom, config.source);
        let (id, events) = if config.pin {
            self.strip_spacers(dom);
            let created = self.triggers.create(&*dom, config, position);
            self.apply_spacers(dom);
            created
        } else {
            self.triggers.create(&*dom, config, position)
        };

        if let TriggerAction::Scrub { animation, .. } = action {
            if let Some(progress) = self.triggers.progress(id, position) {
                self.motion.scrub_to(dom, animation, progress, 0.0);
            }
        }
        self.bindings.insert(id, action);
        for event in events {
            self.dispatch(dom, id, event);
        }
        id
    }

    /// Remove a trigger and its binding. The bound animation is left alone.
    pub fn kill_trigger(&mut self, id: TriggerId) -> bool {
        self.bindings.remove(&id);
        self.triggers.kill(id)
    }

    /// Remove a trigger and undo its pin: the spacer and the pin offset are
    /// stripped from the pinned element.
    pub fn detach(&mut self, dom: &mut dyn Dom, id: TriggerId) {
        let pinned = self
            .triggers
            .config(id)
            .filter(|c| c.pin)
            .map(|c| c.trigger);
        self.kill_trigger(id);
        if let Some(node) = pinned {
            if self.spacers.remove(&node).is_some() {
                dom.set_style(node, "margin-bottom", "");
            }
            self.motion.clear_node(dom, node);
        }
    }

    /// Change a trigger's end; applied on the next [`refresh`](Self::refresh)
    pub fn set_trigger_end(&mut self, id: TriggerId, end: crate::scroll::ScrollPosition) {
        self.triggers.set_end(id, end);
    }

    /// Re-measure every trigger against the current layout.
    pub fn refresh(&mut self, dom: &mut dyn Dom) {
        self.strip_spacers(dom);
        self.triggers.refresh(&*dom);
        self.apply_spacers(dom);
    }

    /// One animation frame: feed scroll to the triggers, advance animations
    /// by `dt` seconds, then feed container travel to container triggers.
    pub fn frame(&mut self, dom: &mut dyn Dom, dt: f64) {
        let scroll = dom.scroll_y();
        for (id, event) in self.triggers.update_page(scroll) {
            self.dispatch(dom, id, event);
        }

        let scrubs: Vec<(TriggerId, AnimationId, f64)> = self
            .bindings
            .iter()
            .filter_map(|(id, action)| match action {
                TriggerAction::Scrub { animation, lag } => Some((*id, *animation, *lag)),
                _ => None,
            })
            .collect();
        for (id, animation, lag) in scrubs {
            let Some(config) = self.triggers.config(id) else {
                continue;
            };
            let position = self.position_of(&*dom, config.source);
            if let Some(progress) = self.triggers.progress(id, position) {
                self.motion.scrub_to(dom, animation, progress, lag);
            }
        }

        for pin in self.triggers.pins() {
            self.motion.set_offset_y(dom, pin.node, pin.offset(scroll));
        }

        self.motion.tick(dom, dt);

        for (animation, container) in self.triggers.container_sources() {
            let travel = -self.motion.style_of(container).x;
            for (id, event) in self.triggers.update_container(animation, travel) {
                self.dispatch(dom, id, event);
            }
        }
    }

    fn position_of(&self, dom: &dyn Dom, source: ScrollSource) -> f64 {
        match source {
            ScrollSource::Page => dom.scroll_y(),
            ScrollSource::Container { container, .. } => -self.motion.style_of(container).x,
        }
    }

    fn dispatch(&mut self, dom: &mut dyn Dom, id: TriggerId, event: TriggerEvent) {
        let Some(action) = self.bindings.get(&id) else {
            return;
        };
        tracing::trace!(?id, ?event, "trigger fired");
        match action {
            TriggerAction::ClassAfterStart { node, class } => match event {
                TriggerEvent::Enter => dom.add_class(*node, class),
                TriggerEvent::LeaveBack => dom.remove_class(*node, class),
                TriggerEvent::Leave | TriggerEvent::EnterBack => {}
            },
            TriggerAction::Play { animation, actions } => {
                let animation = *animation;
                let playback = actions.action_for(event);
                self.motion.control(dom, animation, playback);
            }
            TriggerAction::Scrub { .. } | TriggerAction::None => {}
        }
    }

    fn strip_spacers(&mut self, dom: &mut dyn Dom) {
        for node in std::mem::take(&mut self.spacers).into_keys() {
            dom.set_style(node, "margin-bottom", "");
        }
    }

    fn apply_spacers(&mut self, dom: &mut dyn Dom) {
        for pin in self.triggers.pins() {
            let spacing = pin.spacing();
            if spacing > 0.0 {
                dom.set_style(pin.node, "margin-bottom", &format!("{}px", crate::motion::css_number(spacing)));
                self.spacers.insert(pin.node, spacing);
            }
        }
    }
}

impl Release<Stage> for TriggerId {
    fn release(self, ctx: &mut Stage) {
        ctx.kill_trigger(self);
    }
}

impl Release<Stage> for AnimationId {
    fn release(self, ctx: &mut Stage) {
        ctx.motion.kill(self);
    }
}
