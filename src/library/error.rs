//! Library API errors.

/// Errors that can occur talking to the library server
#[derive(Debug, Clone, thiserror::Error)]
pub enum LibraryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Authentication failed or missing token")]
    MissingToken,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl LibraryError {
    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_http_errors() {
        let err = LibraryError::Http {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        assert_eq!(LibraryError::Network("refused".to_string()).status(), None);
    }
}
