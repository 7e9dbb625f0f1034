//! Scroll reveals: elements animate in from an offset state as they enter
//! the viewport, and rewind when the page scrolls back above them.

use crate::config::AnimatorConfig;
use crate::dom::{Dom, NodeRef};
use crate::motion::{AnimationId, Start, TweenSpec, TweenVars};
use crate::scroll::{ScrollPosition, ToggleActions, TriggerConfig, TriggerId};
use crate::stage::{Stage, TriggerAction};

/// What to reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTarget<'a> {
    /// Every element matching a selector; the first one triggers
    Selector(&'a str),
    /// A single element
    Node(NodeRef),
}

/// A registered reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    /// The from-tween
    pub animation: AnimationId,
    /// The trigger playing it
    pub trigger: TriggerId,
}

/// Bind a from-tween to a trigger at the configured reveal start. Returns
/// `None` without touching anything when the target is absent.
pub fn reveal(
    dom: &mut dyn Dom,
    stage: &mut Stage,
    config: &AnimatorConfig,
    target: RevealTarget<'_>,
    vars: TweenVars,
) -> Option<Reveal> {
    let targets = match target {
        RevealTarget::Selector(selector) => dom.query_all(selector),
        RevealTarget::Node(node) => vec![node],
    };
    let trigger = *targets.first()?;
    Some(bind_reveal(
        dom,
        stage,
        TweenSpec::from(targets, vars),
        trigger,
        config.reveal_start,
        config,
    ))
}

/// Reveal a group one after another. `targets` animate with `stagger`
/// seconds between them once `trigger` crosses the stagger start.
pub fn reveal_staggered(
    dom: &mut dyn Dom,
    stage: &mut Stage,
    config: &AnimatorConfig,
    targets: &str,
    trigger: &str,
    vars: TweenVars,
    duration: f64,
    stagger: f64,
) -> Option<Reveal> {
    let nodes = dom.query_all(targets);
    if nodes.is_empty() {
        return None;
    }
    let trigger = dom.query(trigger)?;
    let spec = TweenSpec::from(nodes, vars)
        .duration(duration)
        .stagger(stagger);
    Some(bind_reveal(dom, stage, spec, trigger, config.stagger_start, config))
}

fn bind_reveal(
    dom: &mut dyn Dom,
    stage: &mut Stage,
    spec: TweenSpec,
    trigger: NodeRef,
    start: ScrollPosition,
    config: &AnimatorConfig,
) -> Reveal {
    let animation = stage
        .motion_mut()
        .add_tween(dom, &spec, &config.tween_defaults(), Start::Paused);
    let trigger = stage.bind(
        dom,
        TriggerConfig::new(trigger, start),
        TriggerAction::Play {
            animation,
            actions: ToggleActions::PLAY_REVERSE,
        },
    );
    Reveal { animation, trigger }
}

/// Register every reveal on the page except the project cards, which
/// belong to the horizontal scroller.
pub fn register_page_reveals(
    dom: &mut dyn Dom,
    stage: &mut Stage,
    config: &AnimatorConfig,
) -> Vec<Reveal> {
    let s = &config.selectors;
    let rise = |y: f64| TweenVars::new().y(y).opacity(0.0);
    let mut reveals = Vec::new();

    for title in dom.query_all(&s.section_titles) {
        reveals.extend(reveal(dom, stage, config, RevealTarget::Node(title), rise(60.0)));
    }
    reveals.extend(reveal(
        dom,
        stage,
        config,
        RevealTarget::Selector(&s.about_image),
        TweenVars::new().x(-100.0).opacity(0.0),
    ));
    reveals.extend(reveal(
        dom,
        stage,
        config,
        RevealTarget::Selector(&s.about_data),
        TweenVars::new().x(100.0).opacity(0.0),
    ));
    reveals.extend(reveal_staggered(
        dom,
        stage,
        config,
        &s.skills_cards,
        &s.skills_container,
        rise(60.0),
        config.default_duration - 0.4,
        0.1,
    ));
    reveals.extend(reveal(
        dom,
        stage,
        config,
        RevealTarget::Selector(&s.testimonials_container),
        rise(100.0),
    ));
    reveals.extend(reveal(
        dom,
        stage,
        config,
        RevealTarget::Selector(&s.contact_content),
        rise(100.0),
    ));
    reveals.extend(reveal_staggered(
        dom,
        stage,
        config,
        &s.contact_fields,
        &s.contact_form,
        rise(60.0),
        config.default_duration - 0.2,
        0.15,
    ));
    reveals.extend(reveal(
        dom,
        stage,
        config,
        RevealTarget::Selector(&s.footer),
        rise(50.0),
    ));

    tracing::debug!(count = reveals.len(), "scroll reveals registered");
    reveals
}
