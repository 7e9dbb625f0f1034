//! Horizontal project scroller.
//!
//! On desktop the projects section is pinned while vertical scrolling moves
//! the project row sideways across its overflow. Each card reveals itself
//! as it reaches 90% of the viewport width during that pass.

use super::reveal::Reveal;
use crate::config::AnimatorConfig;
use crate::dom::{Dom, NodeRef};
use crate::motion::{AnimationId, Ease, Start, TweenSpec, TweenVars};
use crate::scroll::{ScrollPosition, ToggleActions, TriggerConfig, TriggerId};
use crate::stage::{Stage, TriggerAction};

#[derive(Debug)]
struct Scroller {
    section: NodeRef,
    container: NodeRef,
    travel: AnimationId,
    pin: TriggerId,
    cards: Vec<Reveal>,
    total: f64,
}

/// Controller for the pinned horizontal project row.
#[derive(Debug, Default)]
pub struct ProjectScroller {
    active: Option<Scroller>,
}

/// Horizontal overflow of `container` beyond the client width
#[must_use]
pub fn overflow(dom: &dyn Dom, container: NodeRef) -> f64 {
    (dom.scroll_width(container) - dom.viewport().client_width).max(0.0)
}

impl ProjectScroller {
    /// Inactive scroller
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the scroller is built
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Distance the row travels (px), if built
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.active.as_ref().map(|s| s.total)
    }

    /// Pin trigger, if built
    #[must_use]
    pub fn pin(&self) -> Option<TriggerId> {
        self.active.as_ref().map(|s| s.pin)
    }

    /// Animation moving the row, if built
    #[must_use]
    pub fn travel(&self) -> Option<AnimationId> {
        self.active.as_ref().map(|s| s.travel)
    }

    /// Card reveals, empty unless built
    #[must_use]
    pub fn cards(&self) -> &[Reveal] {
        match &self.active {
            Some(scroller) => &scroller.cards,
            None => &[],
        }
    }

    /// Build on desktop, tear down on mobile. Does nothing when the
    /// current state already matches the viewport.
    pub fn sync(&mut self, dom: &mut dyn Dom, stage: &mut Stage, config: &AnimatorConfig) {
        let desktop = dom.viewport().class(config.desktop_breakpoint).is_desktop();
        match (desktop, self.active.is_some()) {
            (true, false) => self.build(dom, stage, config),
            (false, true) => self.teardown(dom, stage),
            _ => {}
        }
    }

    /// Re-measure the overflow and stretch the row tween and the pin to
    /// match. Takes effect on the next trigger refresh.
    pub fn refresh(&mut self, dom: &mut dyn Dom, stage: &mut Stage) {
        let Some(scroller) = self.active.as_mut() else {
            return;
        };
        let total = overflow(&*dom, scroller.container);
        if (total - scroller.total).abs() > f64::EPSILON {
            tracing::debug!(from = scroller.total, to = total, "project overflow changed");
        }
        scroller.total = total;
        stage
            .motion_mut()
            .retarget(dom, scroller.travel, TweenVars::new().x(-total));
        stage.set_trigger_end(scroller.pin, ScrollPosition::AfterStart(total));
    }

    fn build(&mut self, dom: &mut dyn Dom, stage: &mut Stage, config: &AnimatorConfig) {
        let s = &config.selectors;
        let Some(container) = dom.query(&s.projects_container) else {
            return;
        };
        let Some(section) = dom.query(&s.projects) else {
            return;
        };
        let cards = dom.query_all(&s.project_cards);
        let total = overflow(&*dom, container);

        let travel = stage.motion_mut().add_tween(
            dom,
            &TweenSpec::to(vec![container], TweenVars::new().x(-total))
                .ease(Ease::Linear)
                .duration(1.0),
            &config.tween_defaults(),
            Start::Paused,
        );
        let pin = stage.bind(
            dom,
            TriggerConfig::new(section, ScrollPosition::TOP_TOP)
                .end(ScrollPosition::AfterStart(total))
                .pinned(),
            TriggerAction::Scrub {
                animation: travel,
                lag: config.projects_scrub_lag,
            },
        );

        let cards = cards
            .into_iter()
            .map(|card| {
                let animation = stage.motion_mut().add_tween(
                    dom,
                    &TweenSpec::from(vec![card], TweenVars::new().y(100.0).opacity(0.0)),
                    &config.tween_defaults(),
                    Start::Paused,
                );
                let trigger = stage.bind(
                    dom,
                    TriggerConfig::new(card, config.card_start).within(travel, container),
                    TriggerAction::Play {
                        animation,
                        actions: ToggleActions::PLAY_REVERSE,
                    },
                );
                Reveal { animation, trigger }
            })
            .collect::<Vec<_>>();

        tracing::info!(total, cards = cards.len(), "project scroller built");
        self.active = Some(Scroller {
            section,
            container,
            travel,
            pin,
            cards,
            total,
        });
    }

    /// Kill every trigger and tween and strip the styles they wrote
    pub fn teardown(&mut self, dom: &mut dyn Dom, stage: &mut Stage) {
        let Some(scroller) = self.active.take() else {
            return;
        };
        for card in &scroller.cards {
            stage.kill_trigger(card.trigger);
            stage.motion_mut().revert(dom, card.animation);
        }
        stage.detach(dom, scroller.pin);
        stage.motion_mut().revert(dom, scroller.travel);
        tracing::info!(section = scroller.section.index(), "project scroller torn down");
    }
}
