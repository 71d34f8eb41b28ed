//! Error types for prgate-core

use thiserror::Error as ThisError;

/// Result type alias for prgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for prgate operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// GitHub API answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (or status reason when the body is empty)
        message: String,
    },

    /// API rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration or missing environment
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Non-success API status
    Api,
    /// API rate limit exceeded
    RateLimitExceeded,
    /// Transport failure
    Http,
    /// Unexpected response body
    Decode,
    /// Configuration error
    Config,
    /// I/O operation error
    Io,
    /// YAML parsing error
    Yaml,
}

impl Error {
    /// Fieldless kind of this error
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Api { .. } => ErrorKind::Api,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::Http(_) => ErrorKind::Http,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Yaml(_) => ErrorKind::Yaml,
        }
    }

    /// Borrow the error message
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Api { message, .. } => message,
            Error::RateLimitExceeded(msg)
            | Error::Http(msg)
            | Error::Decode(msg)
            | Error::Config(msg)
            | Error::Yaml(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }

    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let err = Error::Config("test".to_string());
        let k = err.kind();
        let k2 = k;
        assert_eq!(k, k2);
    }

    #[test]
    fn test_error_kind_repr_u8() {
        assert_eq!(std::mem::size_of::<ErrorKind>(), 1);
    }

    #[test]
    fn test_error_message_borrows() {
        let err = Error::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "GitHub API error (404): Not Found");
    }

    #[test]
    fn test_all_error_variants_have_kind() {
        let cases: Vec<(Error, ErrorKind)> = vec![
            (
                Error::Api {
                    status: 500,
                    message: "a".into(),
                },
                ErrorKind::Api,
            ),
            (
                Error::RateLimitExceeded("rl".into()),
                ErrorKind::RateLimitExceeded,
            ),
            (Error::Http("h".into()), ErrorKind::Http),
            (Error::Decode("d".into()), ErrorKind::Decode),
            (Error::Config("c".into()), ErrorKind::Config),
            (Error::Io(std::io::Error::other("io")), ErrorKind::Io),
            (Error::Yaml("y".into()), ErrorKind::Yaml),
        ];

        for (err, expected_kind) in cases {
            assert_eq!(err.kind(), expected_kind, "Mismatch for {:?}", err);
        }
    }

    #[test]
    fn test_error_messages_never_contain_token_patterns() {
        let token_patterns = ["ghp_", "gho_", "ghs_", "github_pat_", "Bearer "];
        let errors: Vec<Error> = vec![
            Error::Api {
                status: 401,
                message: "Bad credentials".into(),
            },
            Error::Config("GITHUB_REPOSITORY not set".into()),
            Error::Http("connection refused".into()),
            Error::RateLimitExceeded("rate limit exceeded".into()),
        ];

        for err in &errors {
            let display = format!("{}", err);
            let debug = format!("{:?}", err);
            for pattern in &token_patterns {
                assert!(!display.contains(pattern), "Display leaks '{}'", pattern);
                assert!(!debug.contains(pattern), "Debug leaks '{}'", pattern);
            }
        }
    }
}
