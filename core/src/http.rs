//! HTTP transport types.
//!
//! # Design
//! The executor assembles an `HttpRequest` as plain data and hands it to a
//! [`Transport`](crate::transport::Transport). The transport returns an
//! `HttpResponse` whose body is still an open reader; the executor owns
//! draining and dropping it, so the release of the connection does not
//! depend on which classification path the response takes.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use http::{HeaderMap, Method, StatusCode};
use url::Url;

/// A fully assembled request, ready for the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Upper bound for the whole exchange.
    pub timeout: Duration,
}

/// A response as returned by the transport, body not yet read.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    /// Build a response with an in-memory body.
    pub fn from_bytes(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Box::new(std::io::Cursor::new(body.into())),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
