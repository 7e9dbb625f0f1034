//! Hero entrance sequence.

use crate::config::AnimatorConfig;
use crate::dom::Dom;
use crate::motion::{AnimationId, Position, Start, Timeline, TimelineBuilder, TweenSpec, TweenVars};
use crate::stage::Stage;

/// Build the entrance timeline. Selectors that match nothing keep their
/// slot so the rest of the sequence keeps its timing.
pub fn intro_timeline(dom: &mut dyn Dom, stage: &Stage, config: &AnimatorConfig) -> Timeline {
    let s = &config.selectors;
    let header = dom.query_all(&s.header);
    let title = dom.query_all(&s.hero_title);
    let subtitle = dom.query_all(&s.hero_subtitle);
    let button = dom.query_all(&s.hero_button);
    let background = dom.query_all(&s.hero_bg);

    let rise = TweenVars::new().y(80.0).opacity(0.0);
    TimelineBuilder::new(config.tween_defaults(), |n| stage.motion().style_of(n))
        .add(
            "header",
            &TweenSpec::from(header, TweenVars::new().y(-100.0).opacity(0.0)).duration(1.5),
            Position::Absolute(0.0),
        )
        .add("title", &TweenSpec::from(title, rise), Position::FromEnd(-0.8))
        .add("subtitle", &TweenSpec::from(subtitle, rise), Position::FromEnd(-0.9))
        .add("button", &TweenSpec::from(button, rise), Position::FromEnd(-0.9))
        .add(
            "background",
            &TweenSpec::from(background, TweenVars::new().scale(1.2).opacity(0.0)).duration(2.0),
            Position::FromEnd(-1.2),
        )
        .build()
}

/// Start the entrance sequence. It plays once and is not bound to scroll.
pub fn play_intro(dom: &mut dyn Dom, stage: &mut Stage, config: &AnimatorConfig) -> AnimationId {
    let timeline = intro_timeline(dom, stage, config);
    tracing::debug!(duration = timeline.duration(), "intro timeline started");
    stage.motion_mut().add_timeline(dom, timeline, Start::Playing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockNode, NodeRef};

    fn hero() -> (MockDom, Vec<NodeRef>) {
        let mut dom = MockDom::default();
        let nodes = ["header", "hero__title", "hero__subtitle", "hero__button", "hero__bg"]
            .iter()
            .map(|class| dom.insert(MockNode::new("div").with_class(class)))
            .collect();
        (dom, nodes)
    }

    #[test]
    fn test_child_start_times() {
        let (mut dom, _) = hero();
        let stage = Stage::new();
        let timeline = intro_timeline(&mut dom, &stage, &AnimatorConfig::default());
        let starts = timeline.starts();
        let expected = [0.0, 0.7, 1.0, 1.3, 1.3];
        assert_eq!(starts.len(), expected.len());
        for (got, want) in starts.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert!((timeline.duration() - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_missing_elements_keep_timing() {
        let mut dom = MockDom::default();
        dom.insert(MockNode::new("div").with_class("hero__bg"));
        let stage = Stage::new();
        let timeline = intro_timeline(&mut dom, &stage, &AnimatorConfig::default());
        assert_eq!(timeline.start_of("background").map(|t| (t * 10.0).round()), Some(13.0));
        assert_eq!(timeline.targets().count(), 1);
    }

    #[test]
    fn test_play_hides_then_reveals() {
        let (mut dom, nodes) = hero();
        let mut stage = Stage::new();
        let id = play_intro(&mut dom, &mut stage, &AnimatorConfig::default());

        for node in &nodes {
            assert_eq!(dom.opacity(*node), Some(0.0));
        }
        assert_eq!(
            dom.style(nodes[4], "transform"),
            Some("translate3d(0px, 0px, 0px) scale(1.2)")
        );

        stage.frame(&mut dom, 3.3);
        for node in &nodes {
            assert_eq!(dom.opacity(*node), Some(1.0));
        }
        assert!(stage.motion().playhead(id).unwrap().is_complete());
    }

    #[test]
    fn test_reduced_motion_completes_immediately() {
        let (mut dom, nodes) = hero();
        let mut stage = Stage::new();
        stage.motion_mut().set_instant(true);
        play_intro(&mut dom, &mut stage, &AnimatorConfig::default());
        assert!(nodes.iter().all(|n| dom.opacity(*n) == Some(1.0)));
    }
}
