//! Navigation bar glass effect.
//!
//! On desktop the nav turns glassy once the page has scrolled past a small
//! offset and clears again when scrolled back to the top. On mobile it is
//! always glassy.

use crate::config::AnimatorConfig;
use crate::dom::{Dom, NodeRef};
use crate::handle::Owned;
use crate::scroll::{Anchor, ScrollPosition, TriggerConfig, TriggerId};
use crate::stage::{Stage, TriggerAction};

/// What currently drives the nav class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBehavior {
    /// A scroll trigger toggles the class
    Watcher(TriggerId),
    /// The class is applied permanently
    Static,
    /// Not set up, or there is no nav
    None,
}

/// Controller for the nav glass class.
#[derive(Debug)]
pub struct NavGlass {
    nav: Option<NodeRef>,
    class: String,
    offset: f64,
    breakpoint: f64,
    watcher: Owned<TriggerId>,
    is_static: bool,
}

impl NavGlass {
    /// Look up the nav element
    pub fn new(dom: &mut dyn Dom, config: &AnimatorConfig) -> Self {
        let nav = dom.query(&config.selectors.nav);
        if nav.is_none() {
            tracing::debug!(selector = %config.selectors.nav, "no nav element");
        }
        Self {
            nav,
            class: config.nav_glass_class.clone(),
            offset: config.nav_scroll_offset,
            breakpoint: config.desktop_breakpoint,
            watcher: Owned::new(),
            is_static: false,
        }
    }

    /// Current behavior
    #[must_use]
    pub fn behavior(&self) -> NavBehavior {
        match self.watcher.get() {
            Some(id) => NavBehavior::Watcher(*id),
            None if self.is_static => NavBehavior::Static,
            None => NavBehavior::None,
        }
    }

    /// Derive the behavior from the current viewport. Any previous watcher
    /// is killed and the class removed before the new behavior is applied.
    pub fn setup(&mut self, dom: &mut dyn Dom, stage: &mut Stage) {
        let Some(nav) = self.nav else {
            return;
        };
        self.watcher.clear(stage);
        self.is_static = false;
        dom.remove_class(nav, &self.class);

        let class = dom.viewport().class(self.breakpoint);
        if class.is_desktop() {
            let Some(body) = dom.body() else {
                tracing::warn!("document has no body; nav watcher not attached");
                return;
            };
            let start = ScrollPosition::Edges {
                element: Anchor::Ratio(0.0),
                viewport: Anchor::Pixels(-self.offset),
            };
            let action = TriggerAction::ClassAfterStart {
                node: nav,
                class: self.class.clone(),
            };
            self.watcher.replace_with(stage, |stage| {
                Some(stage.bind(
                    dom,
                    TriggerConfig::new(body, start).end(ScrollPosition::BOTTOM_TOP),
                    action,
                ))
            });
        } else {
            dom.add_class(nav, &self.class);
            self.is_static = true;
        }
        tracing::debug!(%class, behavior = ?self.behavior(), "nav glass set up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockNode};
    use crate::viewport::Viewport;

    fn page(width: f64) -> (MockDom, NodeRef) {
        let mut dom = MockDom::new(Viewport::new(width, 800.0));
        dom.set_document_height(5000.0);
        let nav = dom.insert(MockNode::new("nav").with_class("nav"));
        (dom, nav)
    }

    #[test]
    fn test_desktop_attaches_watcher() {
        let (mut dom, nav) = page(1280.0);
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        glass.setup(&mut dom, &mut stage);

        assert!(matches!(glass.behavior(), NavBehavior::Watcher(_)));
        assert!(!dom.has_class(nav, "glass-effect"));
        dom.set_scroll_y(60.0);
        stage.frame(&mut dom, 0.016);
        assert!(dom.has_class(nav, "glass-effect"));
        dom.set_scroll_y(40.0);
        stage.frame(&mut dom, 0.016);
        assert!(!dom.has_class(nav, "glass-effect"));
    }

    #[test]
    fn test_mobile_is_static() {
        let (mut dom, nav) = page(375.0);
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        glass.setup(&mut dom, &mut stage);

        assert_eq!(glass.behavior(), NavBehavior::Static);
        assert!(dom.has_class(nav, "glass-effect"));
        assert!(stage.triggers().is_empty());
    }

    #[test]
    fn test_repeated_setup_keeps_one_watcher() {
        let (mut dom, _) = page(1280.0);
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        for _ in 0..4 {
            glass.setup(&mut dom, &mut stage);
        }
        assert_eq!(stage.triggers().len(), 1);
    }

    #[test]
    fn test_crossing_breakpoint_swaps_behavior() {
        let (mut dom, nav) = page(1280.0);
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        glass.setup(&mut dom, &mut stage);

        dom.set_viewport(Viewport::new(600.0, 800.0));
        glass.setup(&mut dom, &mut stage);
        assert_eq!(glass.behavior(), NavBehavior::Static);
        assert!(stage.triggers().is_empty());

        dom.set_viewport(Viewport::new(1024.0, 800.0));
        glass.setup(&mut dom, &mut stage);
        assert!(matches!(glass.behavior(), NavBehavior::Watcher(_)));
        assert!(!dom.has_class(nav, "glass-effect"));
        assert_eq!(stage.triggers().len(), 1);
    }

    #[test]
    fn test_setup_while_scrolled_applies_class() {
        let (mut dom, nav) = page(1280.0);
        dom.set_scroll_y(400.0);
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        glass.setup(&mut dom, &mut stage);
        assert!(dom.has_class(nav, "glass-effect"));
    }

    #[test]
    fn test_missing_nav_is_noop() {
        let mut dom = MockDom::default();
        let mut stage = Stage::new();
        let mut glass = NavGlass::new(&mut dom, &AnimatorConfig::default());
        glass.setup(&mut dom, &mut stage);
        assert_eq!(glass.behavior(), NavBehavior::None);
        assert!(stage.triggers().is_empty());
    }
}
