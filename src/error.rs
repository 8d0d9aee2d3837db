// ⚠️ Error taxonomy
// Validation → caught before any external call
// Transport  → intake endpoint unreachable / non-2xx / non-JSON
// Auth       → credential mismatch, deliberately vague

use serde::Serialize;
use std::fmt;

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(context: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: context.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every problem found in one pass over a form, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Returns `None` when there is nothing to report
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(ValidationErrors(errors))
        }
    }

    pub fn single(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub type ValidationResult = Result<(), ValidationErrors>;

// ============================================================================
// ENUMERATION PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEnumError {
    #[error("unknown college: {0}")]
    UnknownCollege(String),
    #[error("unknown branch: {0}")]
    UnknownBranch(String),
}

// ============================================================================
// REGISTRY MUTATIONS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("another change is still being saved")]
    Busy,
    #[error("club not found: {0}")]
    NotFound(String),
    #[error("invalid club: {0}")]
    Invalid(#[from] ValidationErrors),
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Never says which of the two fields was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,
}

// ============================================================================
// REGISTRATION SUBMISSION
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid registration: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Please select a valid club before submitting.")]
    ClubNotSelected,
    #[error("intake request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("intake endpoint answered {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("unexpected non-JSON response ({content_type}): {body}")]
    NonJson { content_type: String, body: String },
    #[error("malformed intake response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Submission failed: {message}")]
    Rejected { message: String },
}

impl SubmissionError {
    /// Text fit for the student; transport detail stays in the logs
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation(_)
            | SubmissionError::ClubNotSelected
            | SubmissionError::Rejected { .. } => self.to_string(),
            SubmissionError::Transport(_)
            | SubmissionError::HttpStatus { .. }
            | SubmissionError::NonJson { .. }
            | SubmissionError::MalformedResponse(_) => {
                "Failed to submit. Please try again.".to_string()
            }
        }
    }

    /// Caught before the intake endpoint was contacted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmissionError::Validation(_) | SubmissionError::ClubNotSelected
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
