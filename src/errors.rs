//! Error types for result submission.
//!
//! Every failure path surfaces here as an explicit error value with a
//! user-facing message and a process exit code; nothing is swallowed on
//! the way up to `main`.

use std::error::Error;
use std::fmt;

/// Exit codes for the application.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Network error (connection failed, timeout, etc.).
    pub const NETWORK_ERROR: i32 = 1;
    /// The result service refused or mangled the submission.
    pub const SUBMISSION_ERROR: i32 = 2;
    /// Invalid arguments or measurement values.
    pub const INPUT_ERROR: i32 = 3;
}

/// Categories of errors that can occur while generating a result link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Measurement input failed to parse or validate.
    Input,
    /// Network-level failure reaching the result endpoint.
    Transport,
    /// The service answered with its array-shaped rejection sentinel.
    Rejected,
    /// The service answered, but not with the expected success shape.
    UnexpectedResponse,
}

impl ErrorKind {
    /// Get the exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Input => exit_codes::INPUT_ERROR,
            ErrorKind::Transport => exit_codes::NETWORK_ERROR,
            // An unexpected shape is a rejection as far as the caller is
            // concerned; the kind stays distinct for diagnostics.
            ErrorKind::Rejected => exit_codes::SUBMISSION_ERROR,
            ErrorKind::UnexpectedResponse => exit_codes::SUBMISSION_ERROR,
        }
    }

    /// Get a user-friendly description of this error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Input => "Invalid input",
            ErrorKind::Transport => "Network error",
            ErrorKind::Rejected => "Submission rejected",
            ErrorKind::UnexpectedResponse => "Unexpected response",
        }
    }
}

/// A user-friendly error for submission operations.
#[derive(Debug)]
pub struct SubmitError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// User-friendly error message.
    pub message: String,
    /// Optional suggestion for how to resolve the error.
    pub suggestion: Option<String>,
    /// The underlying error, if any.
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl SubmitError {
    /// Create a new SubmitError.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), suggestion: None, source: None }
    }

    /// Add a suggestion for how to resolve the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add the underlying error source.
    pub fn with_source(
        mut self,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Create an input validation error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Input, message)
    }

    /// Create a transport error from a failed request.
    pub fn transport(error: reqwest::Error) -> Self {
        let suggestion = if error.is_timeout() {
            "The result service may be slow or unreachable. Try again later."
        } else if error.is_connect() {
            "Check your internet connection and try again."
        } else {
            "The result service may be experiencing issues. Try again later."
        };

        Self::new(
            ErrorKind::Transport,
            format!("failed to reach the result service: {}", error),
        )
        .with_suggestion(suggestion)
        .with_source(error)
    }

    /// Create a rejected-submission error.
    pub fn rejected() -> Self {
        Self::new(
            ErrorKind::Rejected,
            "the result service refused the submission",
        )
        .with_suggestion(
            "The signature or payload may no longer match what the service \
             expects.",
        )
    }

    /// Create an unexpected-response error.
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedResponse, message)
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.description(), self.message)?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Format an error for user display.
pub fn format_error_for_display(error: &SubmitError) -> String {
    let mut output = format!("Failed to generate result: {}", error.message);

    if let Some(ref suggestion) = error.suggestion {
        output.push_str(&format!("\n\nSuggestion: {}", suggestion));
    }

    output
}
