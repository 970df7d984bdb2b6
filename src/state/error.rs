//! State management-specific error types.

/// Errors that can occur during wizard state transitions.
///
/// Validation failures are values, not panics: the caller surfaces the
/// message next to the field and the transition is a no-op.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A step failed validation and the transition was refused
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// A submission is already in flight
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The wizard has already completed
    #[error("The quote request has already been submitted")]
    AlreadySubmitted,
}

impl StateError {
    /// Build a validation error for the given field.
    ///
    pub fn validation(field: &str, message: &str) -> StateError {
        StateError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::validation("contactEmail", "Email is required");
        assert!(error.to_string().contains("contactEmail"));
        assert!(error.to_string().contains("Email is required"));

        let error = StateError::SubmissionInFlight;
        assert!(error.to_string().contains("already in progress"));

        let error = StateError::AlreadySubmitted;
        assert!(error.to_string().contains("already been submitted"));
    }
}
