//! Blocking outbound HTTP calls with typed failures and bounded retries.
//!
//! # Overview
//! A caller describes a call as a [`RequestSpec`] (endpoint, method, body,
//! auth, headers, timeout) and hands it to a [`Client`]. The client encodes
//! the body according to its [`ContentType`], assembles the request, sends it
//! through a [`Transport`] and classifies the outcome into a [`CallError`]
//! tagged with an [`ErrorKind`].
//!
//! # Design
//! - Only status 200 is success. Any other status is an `ApiRequestStatus`
//!   error carrying the raw body.
//! - Transport failures and non-200 statuses are transient and may be
//!   retried; encoding, URL and decoding failures never are.
//! - Every error is logged once through `tracing` where it is detected.
//! - The network sits behind the `Transport` trait; [`UreqTransport`] is the
//!   default, tests use in-memory transports.

pub mod client;
pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod executor;
pub mod http;
pub mod retry;
pub mod spec;
pub mod transport;

#[cfg(test)]
mod testing;

pub use crate::client::Client;
pub use crate::config::ClientConfig;
pub use crate::context::CallContext;
pub use crate::error::{CallError, ConfigError, ErrorKind, Result, TransportError};
pub use crate::http::{HttpRequest, HttpResponse};
pub use crate::spec::{ContentType, RequestSpec};
pub use crate::transport::{Transport, UreqTransport};
