//! Error types for brandchat.
//!
//! A single error enum covers the model provider, the chat wire format, and
//! local resources.  HTTP handlers translate these into the small set of
//! caller-visible failures in [`crate::server::ApiError`].

use std::error;
use std::fmt;
use std::io;
use std::str::Utf8Error;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// The main error type for brandchat.
#[derive(Clone, Debug)]
pub enum Error {
    /// A non-success HTTP status, from the model provider or a chat server.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Provider error type, e.g. `authentication_error`.
        error_type: Option<String>,
        /// Human-readable error message.
        message: String,
        /// Request ID for debugging and support.
        request_id: Option<String>,
    },

    /// A required setting (such as the provider credential) is absent.
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// A setting or parameter has an unusable value.
    Validation {
        /// Human-readable error message.
        message: String,
        /// The offending parameter.
        param: Option<String>,
    },

    /// The request timed out.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// The configured timeout in seconds.
        duration: Option<f64>,
    },

    /// The HTTP client could not connect, send, or read.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Source>,
    },

    /// A response stream broke after it started.
    Streaming {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Source>,
    },

    /// JSON (or the text framing around it) could not be read or written.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Source>,
    },

    /// A local file could not be read.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// A URL could not be parsed or joined.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates an error for a non-success HTTP status.
    pub fn api(
        status_code: u16,
        error_type: Option<String>,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Error::Api {
            status_code,
            error_type,
            message: message.into(),
            request_id,
        }
    }

    /// Creates a missing-setting error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid-setting error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates an HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a broken-stream error.
    pub fn streaming(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Streaming {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Maps a reqwest send failure into a timeout or client error.
    pub(crate) fn from_send(err: reqwest::Error, timeout: Option<f64>) -> Self {
        if err.is_timeout() {
            Error::timeout(format!("Request timed out: {err}"), timeout)
        } else if err.is_connect() {
            Error::http_client(format!("Connection error: {err}"), Some(Box::new(err)))
        } else {
            Error::http_client(format!("Request failed: {err}"), Some(Box::new(err)))
        }
    }

    /// Returns true if a required setting is absent.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns true if a setting has an unusable value.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if a stream broke after it started.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Error::Streaming { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                error_type,
                message,
                request_id,
            } => {
                match error_type {
                    Some(error_type) => write!(f, "{error_type}: {message}")?,
                    None => write!(f, "HTTP {status_code}: {message}")?,
                }
                if let Some(request_id) = request_id {
                    write!(f, " (Request ID: {request_id})")?;
                }
                Ok(())
            }
            Error::Configuration { message } => write!(f, "Configuration error: {message}"),
            Error::Validation { message, param } => match param {
                Some(param) => write!(f, "Invalid {param}: {message}"),
                None => write!(f, "Validation error: {message}"),
            },
            Error::Timeout { message, duration } => match duration {
                Some(duration) => write!(f, "Timeout after {duration}s: {message}"),
                None => write!(f, "Timeout: {message}"),
            },
            Error::HttpClient { message, .. } => write!(f, "HTTP client error: {message}"),
            Error::Streaming { message, .. } => write!(f, "Streaming error: {message}"),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {message}"),
            Error::Io { message, .. } => write!(f, "I/O error: {message}"),
            Error::Url { message, .. } => write!(f, "URL error: {message}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::HttpClient { source, .. }
            | Error::Streaming { source, .. }
            | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source.as_ref()),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::serialization(format!("invalid UTF-8: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for brandchat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn api_display() {
        let err = Error::api(
            418,
            Some("teapot_error".to_string()),
            "short and stout",
            Some("req_1".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "teapot_error: short and stout (Request ID: req_1)"
        );
        let err = Error::api(400, None, "message required", None);
        assert_eq!(err.to_string(), "HTTP 400: message required");
    }

    #[test]
    fn configuration_predicate() {
        let err = Error::configuration("provider credential missing");
        assert!(err.is_configuration());
        assert!(!err.is_streaming());
        assert_eq!(
            err.to_string(),
            "Configuration error: provider credential missing"
        );
    }

    #[test]
    fn validation_names_the_parameter() {
        let err = Error::validation("must be positive", Some("max_tokens".to_string()));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid max_tokens: must be positive");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serialization { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn utf8_errors_are_serialization_errors() {
        let bytes = [0x66, 0xff];
        let err: Error = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(matches!(err, Error::Serialization { .. }));
    }
}
