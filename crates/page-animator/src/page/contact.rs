//! Contact form validation.
//!
//! Submissions are checked on the client only. Nothing is sent anywhere:
//! a valid submission is handed back to the caller and the form is reset.

use crate::dom::{Dom, NodeRef, ToastKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// Shown after a valid submission
pub const SUCCESS_MESSAGE: &str = "Message sent — I will get back to you!";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Raw form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
}

impl ContactSubmission {
    /// Build from values
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Read the `name`, `email` and `message` controls of a form. Missing
    /// controls read as empty.
    pub fn read(dom: &dyn Dom, form: NodeRef) -> Self {
        let field = |name: &str| dom.form_value(form, name).unwrap_or_default();
        Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        }
    }
}

/// A submission that passed validation, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidContact {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
}

/// Why a submission was rejected. The display text is what the user sees.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContactError {
    /// A field is empty after trimming
    #[error("Please complete all fields.")]
    MissingFields,
    /// The email does not look like an address
    #[error("Enter a valid email address.")]
    InvalidEmail,
}

/// Whether `email` looks like `local@domain.tld`
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Validate a submission. Empty fields are reported before a bad email.
pub fn validate(submission: &ContactSubmission) -> Result<ValidContact, ContactError> {
    let name = submission.name.trim();
    let email = submission.email.trim();
    let message = submission.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ContactError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(ValidContact {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

/// Result of a submission: what to toast and whether to reset the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Validation result
    pub result: Result<ValidContact, ContactError>,
}

impl SubmitOutcome {
    /// Toast text
    #[must_use]
    pub fn message(&self) -> String {
        match &self.result {
            Ok(_) => SUCCESS_MESSAGE.to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// Toast severity
    #[must_use]
    pub fn kind(&self) -> ToastKind {
        if self.result.is_ok() {
            ToastKind::Success
        } else {
            ToastKind::Error
        }
    }
}

/// The contact form element.
#[derive(Debug, Clone, Copy)]
pub struct ContactForm {
    form: Option<NodeRef>,
}

impl ContactForm {
    /// Look up the form
    pub fn new(dom: &mut dyn Dom, selector: &str) -> Self {
        Self {
            form: dom.query(selector),
        }
    }

    /// The form element, if present
    #[must_use]
    pub fn node(&self) -> Option<NodeRef> {
        self.form
    }

    /// Validate the current values. A valid submission resets the form.
    /// Returns `None` when there is no form.
    pub fn submit(&self, dom: &mut dyn Dom) -> Option<SubmitOutcome> {
        let form = self.form?;
        let result = validate(&ContactSubmission::read(&*dom, form));
        match &result {
            Ok(contact) => {
                tracing::info!(email = %contact.email, "contact form accepted");
                dom.reset_form(form);
            }
            Err(reason) => tracing::debug!(%reason, "contact form rejected"),
        }
        Some(SubmitOutcome { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MockDom, MockNode};

    #[test]
    fn test_missing_fields_after_trim() {
        for (name, email, message) in [
            ("", "a@b.com", "hi"),
            ("A", "   ", "hi"),
            ("A", "a@b.com", "\n\t"),
        ] {
            assert_eq!(
                validate(&ContactSubmission::new(name, email, message)),
                Err(ContactError::MissingFields)
            );
        }
    }

    #[test]
    fn test_missing_fields_reported_before_bad_email() {
        assert_eq!(
            validate(&ContactSubmission::new("", "nope", "")),
            Err(ContactError::MissingFields)
        );
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(
            validate(&ContactSubmission::new("A", "a@b", "hi")),
            Err(ContactError::InvalidEmail)
        );
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn test_valid_submission_trimmed() {
        let contact = validate(&ContactSubmission::new(" A ", " a@b.com ", " hi ")).unwrap();
        assert_eq!(contact.name, "A");
        assert_eq!(contact.email, "a@b.com");
        assert_eq!(contact.message, "hi");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ContactError::MissingFields.to_string(), "Please complete all fields.");
        assert_eq!(ContactError::InvalidEmail.to_string(), "Enter a valid email address.");
    }

    fn form(name: &str, email: &str, message: &str) -> (MockDom, NodeRef) {
        let mut dom = MockDom::default();
        let node = dom.insert(
            MockNode::new("form")
                .with_class("contact__form")
                .with_field("name", name)
                .with_field("email", email)
                .with_field("message", message),
        );
        (dom, node)
    }

    #[test]
    fn test_submit_success_resets() {
        let (mut dom, node) = form("A", "a@b.com", "hi");
        let contact = ContactForm::new(&mut dom, ".contact__form");
        let outcome = contact.submit(&mut dom).unwrap();
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.kind(), ToastKind::Success);
        assert_eq!(outcome.message(), SUCCESS_MESSAGE);
        assert_eq!(dom.form_value(node, "name").as_deref(), Some(""));
        assert_eq!(dom.form_value(node, "message").as_deref(), Some(""));
    }

    #[test]
    fn test_submit_failure_keeps_values() {
        let (mut dom, node) = form("A", "a@b", "hi");
        let contact = ContactForm::new(&mut dom, ".contact__form");
        let outcome = contact.submit(&mut dom).unwrap();
        assert_eq!(outcome.kind(), ToastKind::Error);
        assert_eq!(outcome.message(), "Enter a valid email address.");
        assert_eq!(dom.form_value(node, "email").as_deref(), Some("a@b"));
    }

    #[test]
    fn test_missing_controls_read_empty() {
        let mut dom = MockDom::default();
        dom.insert(MockNode::new("form").with_class("contact__form"));
        let contact = ContactForm::new(&mut dom, ".contact__form");
        let outcome = contact.submit(&mut dom).unwrap();
        assert_eq!(outcome.result, Err(ContactError::MissingFields));
    }

    #[test]
    fn test_no_form() {
        let mut dom = MockDom::default();
        let contact = ContactForm::new(&mut dom, ".contact__form");
        assert!(contact.submit(&mut dom).is_none());
    }
}
