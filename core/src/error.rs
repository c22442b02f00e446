//! Error types for outbound calls.
//!
//! # Design
//! Every failure is a `CallError` tagged with an `ErrorKind`. The kind is the
//! stable classification used for logging and for retry eligibility; the
//! message is for humans. Diagnostic context (the request description, the
//! raw response body, ...) is attached as named JSON values so structured
//! data such as a parsed error body survives intact.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

/// Classification code of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The endpoint is not a valid absolute URL.
    UrlParsing,
    /// The transport request could not be assembled (bad method or header).
    RequestCreation,
    /// The body could not be serialized to JSON.
    JsonSerialization,
    /// The body could not be serialized as a form.
    FormSerialization,
    /// Network failure, timeout or expired deadline.
    ApiRequest,
    /// The server answered with a status other than 200.
    ApiRequestStatus,
    /// A 200 response body did not deserialize into the target type.
    JsonDeserialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UrlParsing => "URL_PARSING_ERROR",
            ErrorKind::RequestCreation => "REQUEST_CREATION_ERROR",
            ErrorKind::JsonSerialization => "JSON_SERIALIZATION_ERROR",
            ErrorKind::FormSerialization => "FORM_SERIALIZATION_ERROR",
            ErrorKind::ApiRequest => "API_REQUEST_ERROR",
            ErrorKind::ApiRequestStatus => "API_REQUEST_STATUS_ERROR",
            ErrorKind::JsonDeserialization => "JSON_DESERIALIZATION_ERROR",
        }
    }

    /// Transient kinds are the only ones worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::ApiRequest | ErrorKind::ApiRequestStatus)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A classified call failure with attached diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    context: BTreeMap<&'static str, Value>,
    #[source]
    source: Option<BoxError>,
}

impl CallError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            context: BTreeMap::new(),
            source: None,
        }
    }

    /// Attach a named context value. A later value under the same key wins.
    pub fn with_context(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.context.insert(key, value.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the response, for `ApiRequestStatus` errors.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn context(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn context_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.context.keys().copied()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_transient()
    }

    /// Emit this error as a single structured `tracing` event.
    pub fn log(&self) {
        let context = Value::Object(
            self.context
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        );
        tracing::error!(
            kind = %self.kind,
            status = ?self.status,
            context = %context,
            "{}",
            self.message
        );
    }

    /// Log and return `self`; used at every point an error is detected.
    pub(crate) fn logged(self) -> Self {
        self.log();
        self
    }
}

/// Failures reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's deadline had already passed when the call was issued.
    #[error("deadline exceeded before the request was sent")]
    DeadlineExceeded,

    /// Connection, DNS, TLS or protocol failure.
    #[error("transport error: {0}")]
    Connection(#[source] BoxError),
}

/// Invalid client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T, E = CallError> = std::result::Result<T, E>;
