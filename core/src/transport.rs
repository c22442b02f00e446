//! The network boundary.
//!
//! The executor only talks to the network through [`Transport`], which
//! keeps classification and retry logic testable with an in-memory
//! implementation. [`UreqTransport`] is the blocking default.

use std::fmt;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one assembled request.
///
/// Implementations must honor `request.timeout` and return non-2xx
/// responses as `Ok`; only failures to obtain a response are errors.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured agent. Status codes must not be mapped to errors,
    /// and the agent should allow non-standard methods; both are also forced
    /// per request.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn send<S: ureq::AsSendBody>(
        &self,
        request: http::Request<S>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let request = self
            .agent
            .configure_request(request)
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .timeout_global(Some(timeout))
            .build();

        let response = self.agent.run(request).map_err(|e| match e {
            ureq::Error::Timeout(_) => TransportError::Timeout(timeout),
            other => TransportError::Connection(Box::new(other)),
        })?;

        let (parts, body) = response.into_parts();
        Ok(HttpResponse {
            status: parts.status,
            headers: parts.headers,
            body: Box::new(body.into_reader()),
        })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = http::Request::builder().method(method).uri(url.as_str());
        if let Some(map) = builder.headers_mut() {
            *map = headers;
        }

        let built = match body {
            Some(bytes) => builder.body(bytes).map(|req| self.send(req, timeout)),
            None => builder.body(()).map(|req| self.send(req, timeout)),
        };
        built.map_err(|e| TransportError::Connection(Box::new(e)))?
    }
}
