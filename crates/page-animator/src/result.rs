//! Result and error types for the page animator.

use thiserror::Error;

/// Result type for page animator operations
pub type AnimatorResult<T> = Result<T, AnimatorError>;

/// Errors that can occur while configuring or driving the page
#[derive(Debug, Error)]
pub enum AnimatorError {
    /// Easing name not recognised
    #[error("Unknown ease: {name}")]
    UnknownEase {
        /// The rejected ease name
        name: String,
    },

    /// Scroll trigger start/end could not be parsed
    #[error("Invalid scroll position '{input}': {message}")]
    InvalidScrollPosition {
        /// Raw position string
        input: String,
        /// What was wrong with it
        message: String,
    },

    /// Timeline position parameter could not be parsed
    #[error("Invalid timeline position '{input}'")]
    InvalidTimelinePosition {
        /// Raw position string
        input: String,
    },

    /// Toggle actions string could not be parsed
    #[error("Invalid toggle actions '{input}'")]
    InvalidToggleActions {
        /// Raw toggle actions string
        input: String,
    },

    /// Configuration value out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// A browser global (window, document, body) is unavailable
    #[error("Browser global unavailable: {name}")]
    MissingGlobal {
        /// Name of the missing global
        name: &'static str,
    },

    /// A DOM call failed
    #[error("DOM operation '{operation}' failed: {message}")]
    Dom {
        /// Operation that failed
        operation: &'static str,
        /// Error message reported by the host
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnimatorError {
    /// Shorthand for a scroll position parse failure
    pub(crate) fn scroll_position(input: &str, message: impl Into<String>) -> Self {
        Self::InvalidScrollPosition {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnimatorError::UnknownEase {
            name: "power9.out".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown ease: power9.out");

        let err = AnimatorError::scroll_position("top", "missing viewport edge");
        assert_eq!(
            err.to_string(),
            "Invalid scroll position 'top': missing viewport edge"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AnimatorError = json_err.into();
        assert!(matches!(err, AnimatorError::Json(_)));
    }
}
