//! Testimonial slider.

use crate::animator::Task;
use crate::clock::{TimerId, TimerQueue};
use crate::config::AnimatorConfig;
use crate::dom::{Dom, NodeRef};
use crate::handle::Owned;
use crate::motion::{TweenSpec, TweenVars};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Slide index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carousel {
    index: usize,
    count: usize,
    width: f64,
}

impl Carousel {
    /// Carousel at the first of `count` slides, each `width` px wide
    #[must_use]
    pub fn new(count: usize, width: f64) -> Self {
        Self {
            index: 0,
            count,
            width,
        }
    }

    /// Current slide
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of slides
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Slide width (px)
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Change the slide width, keeping the index
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Horizontal offset of the strip for the current slide
    #[must_use]
    pub fn offset(&self) -> f64 {
        -(self.index as f64) * self.width
    }

    /// Move to the next slide, wrapping after the last. Returns the new
    /// offset.
    pub fn advance(&mut self) -> f64 {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
        self.offset()
    }
}

/// Auto-advancing testimonial strip.
#[derive(Debug)]
pub struct TestimonialSlider {
    wrapper: Option<NodeRef>,
    slides: Vec<NodeRef>,
    carousel: Option<Carousel>,
    interval: Owned<TimerId>,
}

impl TestimonialSlider {
    /// Look up the strip and its slides
    pub fn new(dom: &mut dyn Dom, config: &AnimatorConfig) -> Self {
        Self {
            wrapper: dom.query(&config.selectors.testimonials_wrapper),
            slides: dom.query_all(&config.selectors.testimonial_slides),
            carousel: None,
            interval: Owned::new(),
        }
    }

    /// Current position, once set up
    #[must_use]
    pub fn carousel(&self) -> Option<Carousel> {
        self.carousel
    }

    /// Pending interval timer
    #[must_use]
    pub fn interval(&self) -> Option<TimerId> {
        self.interval.get().copied()
    }

    /// Measure the slide width and (re)start the interval. The old interval
    /// is cleared first. When re-run after a resize the strip keeps its slide
    /// and snaps to it at the new width.
    pub fn setup(
        &mut self,
        dom: &mut dyn Dom,
        stage: &mut Stage,
        timers: &mut TimerQueue<Task>,
        config: &AnimatorConfig,
    ) {
        let Some(wrapper) = self.wrapper else {
            return;
        };
        let Some(&first) = self.slides.first() else {
            return;
        };
        let width = dom.offset_width(first);

        match self.carousel.as_mut() {
            Some(carousel) => {
                carousel.set_width(width);
                if carousel.index() > 0 {
                    let spec = TweenSpec::to(vec![wrapper], TweenVars::new().x(carousel.offset()))
                        .duration(0.0);
                    stage
                        .motion_mut()
                        .add_ephemeral(dom, &spec, &config.tween_defaults());
                }
            }
            None => self.carousel = Some(Carousel::new(self.slides.len(), width)),
        }

        let period = config.slide_interval_ms;
        self.interval
            .replace_with(timers, |timers| Some(timers.set_interval(period, Task::NextSlide)));
        tracing::debug!(width, slides = self.slides.len(), "testimonial slider set up");
    }

    /// Advance one slide and animate the strip there
    pub fn next_slide(&mut self, dom: &mut dyn Dom, stage: &mut Stage, config: &AnimatorConfig) {
        let (Some(wrapper), Some(carousel)) = (self.wrapper, self.carousel.as_mut()) else {
            return;
        };
        let offset = carousel.advance();
        let spec = TweenSpec::to(vec![wrapper], TweenVars::new().x(offset))
            .duration(config.slide_duration)
            .ease(config.slide_ease);
        stage
            .motion_mut()
            .add_ephemeral(dom, &spec, &config.tween_defaults());
    }

    /// Stop the interval
    pub fn stop(&mut self, timers: &mut TimerQueue<Task>) {
        self.interval.clear(timers);
    }
}
