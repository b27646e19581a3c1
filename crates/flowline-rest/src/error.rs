// Error types for the REST client

use thiserror::Error;

/// Result alias for REST operations.
pub type Result<T> = std::result::Result<T, RestError>;

/// Failures surfaced by the Flowline REST client.
#[derive(Debug, Error)]
pub enum RestError {
    /// The API answered with an error status. `message` carries the backend's
    /// own description when the error body could be parsed.
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never completed: connection, TLS or timeout trouble.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but its body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The client was built with unusable settings.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl RestError {
    /// HTTP status of the failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Api { status, .. } => Some(*status),
            RestError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure is a 4xx the caller should not blindly retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_the_4xx_range() {
        let not_found = RestError::Api {
            status: 404,
            message: "task not found".to_string(),
        };
        let server_side = RestError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };

        assert!(not_found.is_client_error());
        assert!(!server_side.is_client_error());
        assert!(!RestError::InvalidResponse("bad json".to_string()).is_client_error());
    }
}
