//! Public entry points.
//!
//! # Design
//! `Client` holds a transport and a config and nothing else; calls share no
//! state. The raw call is the building block: the decoding calls run it
//! (optionally through the retry loop) and deserialize the 200 body.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{CallError, ErrorKind, Result};
use crate::executor;
use crate::retry::with_retries;
use crate::spec::RequestSpec;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    transport: T,
    config: ClientConfig,
}

impl Client {
    /// A client over a default `ureq` agent.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `spec` once and return the raw body of a 200 response.
    pub fn call_raw<B>(&self, ctx: &CallContext, spec: &RequestSpec<B>) -> Result<Vec<u8>>
    where
        B: Serialize + Debug,
    {
        executor::execute(&self.transport, &self.config, ctx, spec)
    }

    /// Like [`call_raw`](Self::call_raw), retrying transient failures up to
    /// `retries` more times.
    pub fn call_raw_with_retries<B>(
        &self,
        ctx: &CallContext,
        spec: &RequestSpec<B>,
        retries: u32,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + Debug,
    {
        with_retries(retries, |_| self.call_raw(ctx, spec))
    }

    /// Send `spec` once and decode the JSON body of a 200 response.
    pub fn call<B, R>(&self, ctx: &CallContext, spec: &RequestSpec<B>) -> Result<R>
    where
        B: Serialize + Debug,
        R: DeserializeOwned,
    {
        let body = self.call_raw(ctx, spec)?;
        decode(&body, spec)
    }

    /// Decoding call with up to `retries` immediate retries on transport
    /// failures and non-200 statuses. Decoding failures are not retried.
    pub fn call_with_retries<B, R>(
        &self,
        ctx: &CallContext,
        spec: &RequestSpec<B>,
        retries: u32,
    ) -> Result<R>
    where
        B: Serialize + Debug,
        R: DeserializeOwned,
    {
        with_retries(retries, |_| self.call(ctx, spec))
    }
}

/// Deserialize a successful response body.
pub fn decode<B: Debug, R: DeserializeOwned>(body: &[u8], spec: &RequestSpec<B>) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| {
        CallError::new(ErrorKind::JsonDeserialization, e.to_string())
            .with_context("response", String::from_utf8_lossy(body).into_owned())
            .with_context("request", format!("{spec:?}"))
            .with_source(e)
            .logged()
    })
}
