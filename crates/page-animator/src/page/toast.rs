//! Transient status notifications.
//!
//! A toast is appended to `<body>` transparent, fades in, stays for a while,
//! fades out and is removed. Each toast runs on its own timers, so several
//! can be on screen at once.

use crate::animator::Task;
use crate::clock::TimerQueue;
use crate::config::ToastTimings;
use crate::dom::{Dom, NodeRef, ToastKind};
use crate::motion::{Ease, TweenDefaults, TweenSpec, TweenVars};
use crate::result::AnimatorResult;
use crate::stage::Stage;

/// Phase of a toast's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Fade-in
    Show,
    /// Fade-out
    Hide,
    /// Removal
    Remove,
}

/// Toasts currently in the document.
#[derive(Debug, Default)]
pub struct ToastStack {
    live: Vec<NodeRef>,
}

impl ToastStack {
    /// No toasts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts on screen, oldest first
    #[must_use]
    pub fn live(&self) -> &[NodeRef] {
        &self.live
    }

    /// Append a toast and schedule its lifecycle.
    pub fn show(
        &mut self,
        dom: &mut dyn Dom,
        stage: &mut Stage,
        timers: &mut TimerQueue<Task>,
        timings: &ToastTimings,
        message: &str,
        kind: ToastKind,
    ) -> AnimatorResult<NodeRef> {
        let node = dom.create_element("div")?;
        dom.set_attribute(node, "class", &format!("toast toast--{}", kind.as_str()));
        dom.set_attribute(node, "role", "status");
        dom.set_attribute(node, "aria-live", "polite");
        dom.set_text(node, message);
        fade(dom, stage, node, 0.0, 0);
        dom.append_to_body(node)?;

        timers.set_timeout(timings.show_delay_ms, Task::Toast(node, ToastPhase::Show));
        timers.set_timeout(timings.fade_out_at(), Task::Toast(node, ToastPhase::Hide));
        timers.set_timeout(timings.lifetime(), Task::Toast(node, ToastPhase::Remove));
        self.live.push(node);
        tracing::debug!(kind = kind.as_str(), message, "toast shown");
        Ok(node)
    }

    /// Run a scheduled lifecycle step
    pub fn advance(
        &mut self,
        dom: &mut dyn Dom,
        stage: &mut Stage,
        timings: &ToastTimings,
        node: NodeRef,
        phase: ToastPhase,
    ) {
        if !self.live.contains(&node) {
            return;
        }
        match phase {
            ToastPhase::Show => fade(dom, stage, node, 1.0, timings.fade_in_ms),
            ToastPhase::Hide => fade(dom, stage, node, 0.0, timings.fade_out_ms),
            ToastPhase::Remove => {
                dom.remove(node);
                stage.motion_mut().forget_node(node);
                self.live.retain(|n| *n != node);
            }
        }
    }
}

fn fade(dom: &mut dyn Dom, stage: &mut Stage, node: NodeRef, opacity: f64, millis: u64) {
    let defaults = TweenDefaults {
        ease: Ease::Linear,
        duration: millis as f64 / 1000.0,
    };
    stage.motion_mut().add_ephemeral(
        dom,
        &TweenSpec::to(vec![node], TweenVars::new().opacity(opacity)),
        &defaults,
    );
}
