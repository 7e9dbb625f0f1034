//! Page sections wired to the motion and scroll engines.

pub mod contact;
pub mod intro;
pub mod nav;
pub mod projects;
pub mod reveal;
pub mod testimonials;
pub mod toast;

pub use contact::{
    is_valid_email, validate, ContactError, ContactForm, ContactSubmission, SubmitOutcome,
    ValidContact, SUCCESS_MESSAGE,
};
pub use intro::{intro_timeline, play_intro};
pub use nav::{NavBehavior, NavGlass};
pub use projects::{overflow, ProjectScroller};
pub use reveal::{register_page_reveals, reveal, reveal_staggered, Reveal, RevealTarget};
pub use testimonials::{Carousel, TestimonialSlider};
pub use toast::{ToastPhase, ToastStack};
