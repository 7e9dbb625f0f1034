//! The page runtime.
//!
//! [`PageAnimator`] owns the document, the stage and the timer queue, and
//! routes the three kinds of input the page receives: animation frames,
//! resizes and contact form submissions. All time is passed in by the
//! caller as milliseconds, so the same code runs off `performance.now()` in
//! the browser and off a hand-driven clock in tests.

use crate::clock::{TimerId, TimerQueue};
use crate::config::AnimatorConfig;
use crate::dom::{Dom, NodeRef};
use crate::handle::Owned;
use crate::motion::AnimationId;
use crate::page::{
    play_intro, register_page_reveals, ContactForm, NavGlass, ProjectScroller, Reveal,
    SubmitOutcome, TestimonialSlider, ToastPhase, ToastStack,
};
use crate::result::AnimatorResult;
use crate::stage::Stage;

/// Deferred work scheduled on the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// The resize debounce expired
    ResizeSettled,
    /// Re-measure the testimonial slider after a resize
    TestimonialResize,
    /// Advance the testimonial slider
    NextSlide,
    /// Step a toast through its lifecycle
    Toast(NodeRef, ToastPhase),
}

/// Animation runtime for one page.
#[derive(Debug)]
pub struct PageAnimator<D: Dom> {
    dom: D,
    config: AnimatorConfig,
    stage: Stage,
    timers: TimerQueue<Task>,
    nav: NavGlass,
    slider: TestimonialSlider,
    projects: ProjectScroller,
    contact: ContactForm,
    toasts: ToastStack,
    intro: Option<AnimationId>,
    reveals: Vec<Reveal>,
    resize_timer: Owned<TimerId>,
    testimonial_timer: Owned<TimerId>,
    last_frame_ms: Option<u64>,
    started: bool,
}

impl<D: Dom> PageAnimator<D> {
    /// Validate `config` and look up the page's fixed elements.
    ///
    /// Nothing is animated until [`start`](Self::start).
    pub fn new(mut dom: D, config: AnimatorConfig) -> AnimatorResult<Self> {
        config.validate()?;
        let nav = NavGlass::new(&mut dom, &config);
        let slider = TestimonialSlider::new(&mut dom, &config);
        let contact = ContactForm::new(&mut dom, &config.selectors.contact_form);
        Ok(Self {
            dom,
            config,
            stage: Stage::new(),
            timers: TimerQueue::new(0),
            nav,
            slider,
            projects: ProjectScroller::new(),
            contact,
            toasts: ToastStack::new(),
            intro: None,
            reveals: Vec::new(),
            resize_timer: Owned::new(),
            testimonial_timer: Owned::new(),
            last_frame_ms: None,
            started: false,
        })
    }

    /// Wire up every section. Runs once; later calls are ignored.
    pub fn start(&mut self, now_ms: u64) {
        if self.started {
            tracing::debug!("page animator already started");
            return;
        }
        self.started = true;
        self.timers.advance_to(now_ms);
        self.last_frame_ms = Some(now_ms);

        let reduced = self.config.respect_reduced_motion && self.dom.prefers_reduced_motion();
        self.stage.motion_mut().set_instant(reduced);

        let dom = &mut self.dom;
        self.nav.setup(dom, &mut self.stage);
        self.intro = Some(play_intro(dom, &mut self.stage, &self.config));
        self.reveals = register_page_reveals(dom, &mut self.stage, &self.config);
        self.projects.sync(dom, &mut self.stage, &self.config);
        self.slider
            .setup(dom, &mut self.stage, &mut self.timers, &self.config);
        self.stage.refresh(dom);

        tracing::info!(
            viewport = %self.dom.viewport().class(self.config.desktop_breakpoint),
            reveals = self.reveals.len(),
            triggers = self.stage.triggers().len(),
            reduced_motion = reduced,
            "page animator started"
        );
    }

    /// The window was resized. Layout-dependent work is debounced: the nav,
    /// the project scroller and every trigger after the resize delay, the
    /// testimonial slider after its own shorter delay.
    pub fn resize(&mut self, now_ms: u64) {
        self.run_due(now_ms);
        let debounce = self.config.resize_debounce_ms;
        self.resize_timer.replace_with(&mut self.timers, |timers| {
            Some(timers.set_timeout(debounce, Task::ResizeSettled))
        });
        let delay = self.config.testimonial_resize_delay_ms;
        self.testimonial_timer.replace_with(&mut self.timers, |timers| {
            Some(timers.set_timeout(delay, Task::TestimonialResize))
        });
    }

    /// One animation frame at `now_ms`: fire due timers, then advance
    /// triggers and animations by the time since the previous frame.
    pub fn frame(&mut self, now_ms: u64) {
        self.run_due(now_ms);
        let dt = self
            .last_frame_ms
            .map_or(0, |last| now_ms.saturating_sub(last)) as f64
            / 1000.0;
        self.last_frame_ms = Some(now_ms);
        self.stage.frame(&mut self.dom, dt);
    }

    /// The contact form was submitted. Shows the outcome as a toast.
    /// Returns `None` when the page has no contact form.
    pub fn submit_contact(&mut self, now_ms: u64) -> AnimatorResult<Option<SubmitOutcome>> {
        self.run_due(now_ms);
        let Some(outcome) = self.contact.submit(&mut self.dom) else {
            return Ok(None);
        };
        self.toasts.show(
            &mut self.dom,
            &mut self.stage,
            &mut self.timers,
            &self.config.toast,
            &outcome.message(),
            outcome.kind(),
        )?;
        Ok(Some(outcome))
    }

    /// The document
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The document, mutably
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Active configuration
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Animations and triggers
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Nav glass controller
    pub fn nav(&self) -> &NavGlass {
        &self.nav
    }

    /// Testimonial slider
    pub fn slider(&self) -> &TestimonialSlider {
        &self.slider
    }

    /// Project scroller
    pub fn projects(&self) -> &ProjectScroller {
        &self.projects
    }

    /// Live toasts
    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    /// Pending timers
    pub fn timers(&self) -> &TimerQueue<Task> {
        &self.timers
    }

    /// Intro timeline, once started
    pub fn intro(&self) -> Option<AnimationId> {
        self.intro
    }

    /// Registered scroll reveals
    pub fn reveals(&self) -> &[Reveal] {
        &self.reveals
    }

    fn run_due(&mut self, now_ms: u64) {
        let collapsed = self.timers.coalesce_missed(now_ms);
        if collapsed > 0 {
            tracing::debug!(collapsed, now_ms, "skipped missed interval ticks");
        }
        while let Some((_, task)) = self.timers.pop_due(now_ms) {
            self.run(task);
        }
        self.timers.advance_to(now_ms);
    }

    fn run(&mut self, task: Task) {
        let dom = &mut self.dom;
        match task {
            Task::ResizeSettled => {
                self.nav.setup(dom, &mut self.stage);
                self.projects.sync(dom, &mut self.stage, &self.config);
                self.projects.refresh(dom, &mut self.stage);
                self.stage.refresh(dom);
                tracing::info!(
                    viewport = %dom.viewport().class(self.config.desktop_breakpoint),
                    nav = ?self.nav.behavior(),
                    "layout refreshed after resize"
                );
            }
            Task::TestimonialResize => {
                self.slider
                    .setup(dom, &mut self.stage, &mut self.timers, &self.config);
            }
            Task::NextSlide => self.slider.next_slide(dom, &mut self.stage, &self.config),
            Task::Toast(node, phase) => {
                self.toasts
                    .advance(dom, &mut self.stage, &self.config.toast, node, phase);
            }
        }
    }
}
