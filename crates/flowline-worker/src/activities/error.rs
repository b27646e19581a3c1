// Error type crossing the activity boundary

use serde::{Deserialize, Serialize};

use flowline_rest::RestError;

/// Error returned by activities to the execution runtime.
///
/// Serializable because it crosses the payload boundary like any other
/// activity result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityError {
    /// Error message
    pub message: String,

    /// Error type/code for programmatic handling
    pub error_type: Option<String>,

    /// Whether this error is retryable
    ///
    /// Non-retryable errors fail the activity immediately, without further
    /// retry attempts.
    pub retryable: bool,

    /// Additional error details (for debugging)
    pub details: Option<serde_json::Value>,
}

impl ActivityError {
    /// Create a new retryable error
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            retryable: true,
            details: None,
        }
    }

    /// Create a non-retryable error
    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            retryable: false,
            details: None,
        }
    }

    /// Non-retryable validation failure; retrying a bad request cannot help.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::non_retryable(message).with_type("validation")
    }

    /// Set the error type
    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Add error details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ActivityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActivityError {}

impl From<RestError> for ActivityError {
    fn from(err: RestError) -> Self {
        // 4xx answers will not improve on retry; everything else might
        let base = if err.is_client_error() {
            Self::non_retryable(err.to_string())
        } else {
            Self::retryable(err.to_string())
        };
        let base = base.with_type("rest");
        match err.status() {
            Some(status) => base.with_details(serde_json::json!({ "status": status })),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_non_retryable() {
        let err: ActivityError = RestError::Api {
            status: 404,
            message: "task not found".to_string(),
        }
        .into();

        assert!(!err.retryable);
        assert_eq!(err.error_type.as_deref(), Some("rest"));
        assert_eq!(err.details, Some(serde_json::json!({ "status": 404 })));
    }

    #[test]
    fn test_server_errors_stay_retryable() {
        let err: ActivityError = RestError::Api {
            status: 503,
            message: "maintenance".to_string(),
        }
        .into();

        assert!(err.retryable);
    }

    #[test]
    fn test_validation_errors_never_retry() {
        let err = ActivityError::validation("ownerId or ownerEmail is required");
        assert!(!err.retryable);
        assert_eq!(err.error_type.as_deref(), Some("validation"));
    }
}
