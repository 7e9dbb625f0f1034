//! Animator configuration.
//!
//! Every field has a default matching the page markup and its motion
//! design, so an empty JSON object is a valid configuration.

use crate::motion::{Ease, TweenDefaults};
use crate::result::{AnimatorError, AnimatorResult};
use crate::scroll::ScrollPosition;
use crate::viewport::DEFAULT_DESKTOP_BREAKPOINT;
use serde::{Deserialize, Serialize};

/// Page animator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// Viewport width at which the desktop layout starts (px)
    #[serde(default = "default_breakpoint")]
    pub desktop_breakpoint: f64,

    /// Scroll distance after which the nav turns glassy on desktop (px)
    #[serde(default = "default_nav_offset")]
    pub nav_scroll_offset: f64,

    /// Class applied to the nav
    #[serde(default = "default_nav_class")]
    pub nav_glass_class: String,

    /// Quiet period before a resize rebuilds the nav and re-measures
    /// triggers (ms)
    #[serde(default = "default_resize_debounce")]
    pub resize_debounce_ms: u64,

    /// Quiet period before a resize re-measures the testimonial slider (ms)
    #[serde(default = "default_testimonial_delay")]
    pub testimonial_resize_delay_ms: u64,

    /// Ease for tweens that do not name one
    #[serde(default = "default_ease")]
    pub default_ease: Ease,

    /// Duration for tweens that do not set one (s)
    #[serde(default = "default_duration")]
    pub default_duration: f64,

    /// Trigger start for single-element reveals
    #[serde(default = "default_reveal_start")]
    pub reveal_start: ScrollPosition,

    /// Trigger start for staggered group reveals
    #[serde(default = "default_stagger_start")]
    pub stagger_start: ScrollPosition,

    /// Trigger start for project cards along the horizontal pass
    #[serde(default = "default_card_start")]
    pub card_start: ScrollPosition,

    /// Time between testimonial slides (ms)
    #[serde(default = "default_slide_interval")]
    pub slide_interval_ms: u64,

    /// Length of one slide transition (s)
    #[serde(default = "default_slide_duration")]
    pub slide_duration: f64,

    /// Ease of a slide transition
    #[serde(default = "default_slide_ease")]
    pub slide_ease: Ease,

    /// Seconds the horizontal project scroll lags behind the page scroll
    #[serde(default = "default_scrub_lag")]
    pub projects_scrub_lag: f64,

    /// Toast lifecycle
    #[serde(default)]
    pub toast: ToastTimings,

    /// Run every animation instantly when the user prefers reduced motion
    #[serde(default = "default_true")]
    pub respect_reduced_motion: bool,

    /// Selector contracts with the page markup
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            desktop_breakpoint: default_breakpoint(),
            nav_scroll_offset: default_nav_offset(),
            nav_glass_class: default_nav_class(),
            resize_debounce_ms: default_resize_debounce(),
            testimonial_resize_delay_ms: default_testimonial_delay(),
            default_ease: default_ease(),
            default_duration: default_duration(),
            reveal_start: default_reveal_start(),
            stagger_start: default_stagger_start(),
            card_start: default_card_start(),
            slide_interval_ms: default_slide_interval(),
            slide_duration: default_slide_duration(),
            slide_ease: default_slide_ease(),
            projects_scrub_lag: default_scrub_lag(),
            toast: ToastTimings::default(),
            respect_reduced_motion: true,
            selectors: SelectorConfig::default(),
        }
    }
}

fn default_breakpoint() -> f64 {
    DEFAULT_DESKTOP_BREAKPOINT
}
fn default_nav_offset() -> f64 {
    50.0
}
fn default_nav_class() -> String {
    "glass-effect".to_string()
}
fn default_resize_debounce() -> u64 {
    150
}
fn default_testimonial_delay() -> u64 {
    120
}
fn default_ease() -> Ease {
    Ease::POWER4_OUT
}
fn default_duration() -> f64 {
    1.2
}
fn default_reveal_start() -> ScrollPosition {
    ScrollPosition::Edges {
        element: crate::scroll::Anchor::Ratio(0.0),
        viewport: crate::scroll::Anchor::Ratio(0.85),
    }
}
fn default_stagger_start() -> ScrollPosition {
    ScrollPosition::Edges {
        element: crate::scroll::Anchor::Ratio(0.0),
        viewport: crate::scroll::Anchor::Ratio(0.8),
    }
}
fn default_card_start() -> ScrollPosition {
    ScrollPosition::Edges {
        element: crate::scroll::Anchor::Ratio(0.0),
        viewport: crate::scroll::Anchor::Ratio(0.9),
    }
}
fn default_slide_interval() -> u64 {
    5000
}
fn default_slide_duration() -> f64 {
    1.2
}
fn default_slide_ease() -> Ease {
    Ease::POWER3_IN_OUT
}
fn default_scrub_lag() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

impl AnimatorConfig {
    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> AnimatorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> AnimatorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ease and duration for tweens that set neither
    #[must_use]
    pub fn tween_defaults(&self) -> TweenDefaults {
        TweenDefaults {
            ease: self.default_ease,
            duration: self.default_duration,
        }
    }

    /// Reject values the animator cannot work with.
    pub fn validate(&self) -> AnimatorResult<()> {
        let invalid = |message: String| Err(AnimatorError::InvalidConfig { message });

        if !(self.desktop_breakpoint.is_finite() && self.desktop_breakpoint > 0.0) {
            return invalid(format!(
                "desktop_breakpoint must be positive, got {}",
                self.desktop_breakpoint
            ));
        }
        if !self.nav_scroll_offset.is_finite() {
            return invalid("nav_scroll_offset must be finite".to_string());
        }
        if self.nav_glass_class.trim().is_empty()
            || self.nav_glass_class.contains(char::is_whitespace)
        {
            return invalid(format!(
                "nav_glass_class must be a single class name, got '{}'",
                self.nav_glass_class
            ));
        }
        for (name, seconds) in [
            ("default_duration", self.default_duration),
            ("slide_duration", self.slide_duration),
            ("projects_scrub_lag", self.projects_scrub_lag),
        ] {
            if !(seconds.is_finite() && seconds >= 0.0) {
                return invalid(format!("{name} must be a non-negative number of seconds"));
            }
        }
        if self.slide_interval_ms == 0 {
            return invalid("slide_interval_ms must be at least 1".to_string());
        }
        self.toast.validate()?;
        self.selectors.validate()
    }
}

/// Toast lifecycle in milliseconds from creation.
///
/// A toast is created transparent, fades in after `show_delay_ms`, stays
/// fully visible for `hold_ms`, then fades out and is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastTimings {
    /// Delay before the fade-in starts
    pub show_delay_ms: u64,
    /// Fade-in length
    pub fade_in_ms: u64,
    /// Time fully visible
    pub hold_ms: u64,
    /// Fade-out length
    pub fade_out_ms: u64,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            show_delay_ms: 10,
            fade_in_ms: 90,
            hold_ms: 3500,
            fade_out_ms: 400,
        }
    }
}

impl ToastTimings {
    /// When the fade-out starts
    #[must_use]
    pub fn fade_out_at(&self) -> u64 {
        self.show_delay_ms + self.fade_in_ms + self.hold_ms
    }

    /// When the node is removed
    #[must_use]
    pub fn lifetime(&self) -> u64 {
        self.fade_out_at() + self.fade_out_ms
    }

    fn validate(&self) -> AnimatorResult<()> {
        if self.hold_ms == 0 {
            return Err(AnimatorError::InvalidConfig {
                message: "toast.hold_ms must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// CSS selectors the animator binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Navigation bar
    pub nav: String,
    /// Page header
    pub header: String,
    /// Hero heading
    pub hero_title: String,
    /// Hero subheading
    pub hero_subtitle: String,
    /// Hero call to action
    pub hero_button: String,
    /// Hero background
    pub hero_bg: String,
    /// Every section heading
    pub section_titles: String,
    /// About image
    pub about_image: String,
    /// About text
    pub about_data: String,
    /// Skills grid (trigger for the cards)
    pub skills_container: String,
    /// Skill cards
    pub skills_cards: String,
    /// Projects section (pinned)
    pub projects: String,
    /// Horizontally scrolled project row
    pub projects_container: String,
    /// Project cards
    pub project_cards: String,
    /// Testimonials block
    pub testimonials_container: String,
    /// Sliding testimonial strip
    pub testimonials_wrapper: String,
    /// One testimonial
    pub testimonial_slides: String,
    /// Contact intro
    pub contact_content: String,
    /// Contact form
    pub contact_form: String,
    /// Contact form field groups
    pub contact_fields: String,
    /// Footer
    pub footer: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            nav: s(".nav"),
            header: s(".header"),
            hero_title: s(".hero__title"),
            hero_subtitle: s(".hero__subtitle"),
            hero_button: s(".hero__button"),
            hero_bg: s(".hero__bg"),
            section_titles: s(".section__title"),
            about_image: s(".about__image"),
            about_data: s(".about__data"),
            skills_container: s(".skills__container"),
            skills_cards: s(".skills__card"),
            projects: s(".projects"),
            projects_container: s(".projects__container"),
            project_cards: s(".projects__card"),
            testimonials_container: s(".testimonials__container"),
            testimonials_wrapper: s(".testimonials__wrapper"),
            testimonial_slides: s(".testimonials__slide"),
            contact_content: s(".contact__content"),
            contact_form: s(".contact__form"),
            contact_fields: s(".contact__form-div"),
            footer: s(".footer__container"),
        }
    }
}

impl SelectorConfig {
    fn validate(&self) -> AnimatorResult<()> {
        let fields = [
            ("nav", &self.nav),
            ("header", &self.header),
            ("hero_title", &self.hero_title),
            ("hero_subtitle", &self.hero_subtitle),
            ("hero_button", &self.hero_button),
            ("hero_bg", &self.hero_bg),
            ("section_titles", &self.section_titles),
            ("about_image", &self.about_image),
            ("about_data", &self.about_data),
            ("skills_container", &self.skills_container),
            ("skills_cards", &self.skills_cards),
            ("projects", &self.projects),
            ("projects_container", &self.projects_container),
            ("project_cards", &self.project_cards),
            ("testimonials_container", &self.testimonials_container),
            ("testimonials_wrapper", &self.testimonials_wrapper),
            ("testimonial_slides", &self.testimonial_slides),
            ("contact_content", &self.contact_content),
            ("contact_form", &self.contact_form),
            ("contact_fields", &self.contact_fields),
            ("footer", &self.footer),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(AnimatorError::InvalidConfig {
                message: format!("selectors.{name} must not be empty"),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnimatorConfig::default();
        assert_eq!(config.desktop_breakpoint, 768.0);
        assert_eq!(config.resize_debounce_ms, 150);
        assert_eq!(config.slide_interval_ms, 5000);
        assert_eq!(config.default_ease, Ease::POWER4_OUT);
        assert_eq!(config.reveal_start, "top 85%".parse().unwrap());
        assert_eq!(config.card_start, "left 90%".parse().unwrap());
        assert_eq!(config.selectors.testimonial_slides, ".testimonials__slide");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = AnimatorConfig::from_json("{}").unwrap();
        assert_eq!(config, AnimatorConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r##"{
            "desktop_breakpoint": 1024,
            "slide_ease": "sine.inOut",
            "reveal_start": "top 90%",
            "toast": { "hold_ms": 2000 },
            "selectors": { "nav": "#site-nav" }
        }"##;
        let config = AnimatorConfig::from_json(json).unwrap();
        assert_eq!(config.desktop_breakpoint, 1024.0);
        assert_eq!(config.slide_ease.name(), "sine.inOut");
        assert_eq!(config.toast.hold_ms, 2000);
        assert_eq!(config.toast.fade_out_ms, 400);
        assert_eq!(config.selectors.nav, "#site-nav");
        assert_eq!(config.selectors.header, ".header");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AnimatorConfig::from_json(r#"{"slide_ease": "wobbly"}"#),
            Err(AnimatorError::Json(_))
        ));
        assert!(matches!(
            AnimatorConfig::from_json(r#"{"desktop_breakpoint": -1}"#),
            Err(AnimatorError::InvalidConfig { .. })
        ));
        assert!(AnimatorConfig::from_json(r#"{"nav_glass_class": "a b"}"#).is_err());
        assert!(AnimatorConfig::from_json(r#"{"slide_interval_ms": 0}"#).is_err());
        assert!(AnimatorConfig::from_json(r#"{"selectors": {"footer": " "}}"#).is_err());
    }

    #[test]
    fn test_toast_lifetime() {
        let timings = ToastTimings::default();
        assert_eq!(timings.fade_out_at(), 3600);
        assert_eq!(timings.lifetime(), 4000);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AnimatorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(AnimatorConfig::from_json(&json).unwrap(), config);
    }
}
