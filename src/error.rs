use std::io;
use thiserror::Error;

/// Custom result type for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the AIORNOT SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (missing API key, malformed base URL)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 401 - Invalid or missing API key
    #[error("[{status_code}] {message}")]
    Authentication {
        status_code: u16,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// 422 from the API, or input rejected locally before any request was sent
    #[error("{}", with_status(*status_code, message))]
    Validation {
        status_code: Option<u16>,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// 429 - Rate limit exceeded
    #[error("[{status_code}] {message}")]
    RateLimit {
        status_code: u16,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// 5xx - Server-side error
    #[error("[{status_code}] {message}")]
    Server {
        status_code: u16,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// Any other non-2xx response
    #[error("[{status_code}] {message}")]
    Api {
        status_code: u16,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// Request timed out
    #[error("{0}")]
    Timeout(String),

    /// Local file or directory does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn with_status(status_code: Option<u16>, message: &str) -> String {
    match status_code {
        Some(code) => format!("[{code}] {message}"),
        None => message.to_string(),
    }
}

impl Error {
    /// Build a validation error for input rejected before reaching the API
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            status_code: None,
            message: message.into(),
            response: None,
        }
    }

    /// HTTP status code of the failed response, if the error came from the API
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Authentication { status_code, .. }
            | Error::RateLimit { status_code, .. }
            | Error::Server { status_code, .. }
            | Error::Api { status_code, .. } => Some(*status_code),
            Error::Validation { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Parsed response body of the failed request, if any
    pub fn response(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Authentication { response, .. }
            | Error::Validation { response, .. }
            | Error::RateLimit { response, .. }
            | Error::Server { response, .. }
            | Error::Api { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Stable name of the error kind, used in batch output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => "InvalidConfigError",
            Error::Authentication { .. } => "AuthenticationError",
            Error::Validation { .. } => "ValidationError",
            Error::RateLimit { .. } => "RateLimitError",
            Error::Server { .. } => "ServerError",
            Error::Api { .. } => "APIError",
            Error::Timeout(_) => "TimeoutError",
            Error::FileNotFound(_) => "FileNotFoundError",
            Error::InvalidRequest(_) => "InvalidRequestError",
            Error::RequestError(_) => "RequestError",
            Error::IOError(_) => "IOError",
            Error::JsonError(_) => "JSONError",
        }
    }

    /// Whether the error was produced by the remote API (as opposed to local validation or IO)
    pub fn is_api_error(&self) -> bool {
        self.status_code().is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;
    use std::io;

    #[test]
    fn test_error_display() {
        // Test display implementation for each error variant
        let errors = [
            (
                Error::InvalidConfig("missing api key".to_string()),
                "Invalid configuration: missing api key",
            ),
            (
                Error::Authentication {
                    status_code: 401,
                    message: "Invalid API key".to_string(),
                    response: None,
                },
                "[401] Invalid API key",
            ),
            (
                Error::Validation {
                    status_code: Some(422),
                    message: "Invalid image format".to_string(),
                    response: None,
                },
                "[422] Invalid image format",
            ),
            (
                Error::validation("Text must be at least 10 characters"),
                "Text must be at least 10 characters",
            ),
            (
                Error::RateLimit {
                    status_code: 429,
                    message: "Rate limit exceeded".to_string(),
                    response: None,
                },
                "[429] Rate limit exceeded",
            ),
            (
                Error::Timeout("Image analysis timed out".to_string()),
                "Image analysis timed out",
            ),
            (
                Error::FileNotFound("missing.jpg".to_string()),
                "File not found: missing.jpg",
            ),
            (
                Error::InvalidRequest("missing parameter".to_string()),
                "Invalid request: missing parameter",
            ),
        ];

        for (error, expected_message) in errors {
            assert_eq!(error.to_string(), expected_message);
        }
    }

    #[test]
    fn test_local_failures_have_no_response() {
        let missing: Error = io::Error::new(io::ErrorKind::NotFound, "photo.jpg").into();
        assert_eq!(missing.kind(), "IOError");
        assert_eq!(missing.status_code(), None);
        assert!(missing.response().is_none());

        let malformed: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(malformed.kind(), "JSONError");
        assert!(malformed.to_string().starts_with("JSON parsing error:"));
    }

    #[test]
    fn test_rate_limit_keeps_response_body() {
        let body = serde_json::json!({"detail": "Too many requests"});
        let error = Error::RateLimit {
            status_code: 429,
            message: "Too many requests".to_string(),
            response: Some(body.clone()),
        };

        assert_eq!(error.kind(), "RateLimitError");
        assert_eq!(error.status_code(), Some(429));
        assert_eq!(error.response(), Some(&body));
        assert_eq!(error.to_string(), "[429] Too many requests");
    }

    #[test]
    fn test_status_code_and_kind() {
        let error = Error::Server {
            status_code: 503,
            message: "Service unavailable".to_string(),
            response: None,
        };
        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.kind(), "ServerError");
        assert!(error.is_api_error());

        let local = Error::validation("too short");
        assert_eq!(local.status_code(), None);
        assert_eq!(local.kind(), "ValidationError");
        assert!(!local.is_api_error());

        let timeout = Error::Timeout("timed out".to_string());
        assert_eq!(timeout.status_code(), None);
        assert_eq!(timeout.kind(), "TimeoutError");
    }
}
