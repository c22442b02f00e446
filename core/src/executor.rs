//! Turns a [`RequestSpec`] into one transport call and classifies the result.
//!
//! # Design
//! `build_request` is pure: it encodes the body, resolves the URL and
//! assembles headers in a fixed order. Header order matters because the
//! auth mechanisms overwrite each other:
//!
//! 1. `Content-Type`
//! 2. `Authorization: Token <token>`
//! 3. `Authorization: Basic base64(user:password)` when both are set
//! 4. `Authorization: Basic <pre-encoded>`
//! 5. `Host`
//! 6. custom headers, appended rather than replaced
//!
//! `execute` sends the request and classifies the response. Only status 200
//! counts as success; every other status is an error carrying the body.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::Read;

use base64::Engine;
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, HOST};
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::encode::encode_body;
use crate::error::{CallError, ErrorKind, Result, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::spec::RequestSpec;
use crate::transport::Transport;

const TOKEN_PREFIX: &str = "Token";

/// Assemble the wire request for `spec` without sending it.
pub fn build_request<B>(
    spec: &RequestSpec<B>,
    config: &ClientConfig,
    ctx: &CallContext,
) -> Result<HttpRequest>
where
    B: Serialize + Debug,
{
    let body = encode_body(spec.body(), spec.content_type())?;

    let mut url = Url::parse(spec.endpoint()).map_err(|e| {
        CallError::new(
            ErrorKind::UrlParsing,
            format!("url: {}; error: {e}", spec.endpoint()),
        )
        .with_source(e)
        .logged()
    })?;

    if !spec.query_params().is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in spec.query_params() {
            pairs.append_pair(key, value);
        }
    }

    let creation_error = |err: &dyn std::fmt::Display| {
        CallError::new(
            ErrorKind::RequestCreation,
            format!("url: {url}; error: {err}"),
        )
        .logged()
    };

    let method = Method::from_bytes(spec.method().as_bytes()).map_err(|e| creation_error(&e))?;
    let headers = build_headers(spec).map_err(|e| creation_error(&e))?;

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
        timeout: ctx.cap(config.effective_timeout(spec.timeout())),
    })
}

fn build_headers<B>(spec: &RequestSpec<B>) -> std::result::Result<HeaderMap, http::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(spec.content_type().as_str())?,
    );

    if let Some(token) = assigned(spec.auth_token()) {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("{TOKEN_PREFIX} {token}"))?,
        );
    }

    if let (Some(user), Some(password)) =
        (assigned(spec.auth_user_name()), assigned(spec.auth_password()))
    {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Basic {encoded}"))?);
    }

    if let Some(encoded) = assigned(spec.basic_auth()) {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Basic {encoded}"))?);
    }

    if let Some(host) = assigned(spec.host()) {
        headers.insert(HOST, HeaderValue::from_str(host)?);
    }

    for (name, value) in spec.headers() {
        headers.append(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }

    Ok(headers)
}

/// Empty strings count as unset, as for every optional field of a spec.
fn assigned(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Send `spec` once and return the body of a 200 response.
pub fn execute<B, T>(
    transport: &T,
    config: &ClientConfig,
    ctx: &CallContext,
    spec: &RequestSpec<B>,
) -> Result<Vec<u8>>
where
    B: Serialize + Debug,
    T: Transport + ?Sized,
{
    let request = build_request(spec, config, ctx)?;
    let url = request.url.clone();

    let outcome = if ctx.is_expired() {
        Err(TransportError::DeadlineExceeded)
    } else {
        transport.execute(request)
    };

    let response = outcome.map_err(|e| transport_error(&url, spec, e))?;
    let status = response.status;
    let body = drain(response).map_err(|e| transport_error(&url, spec, e))?;

    if status != StatusCode::OK {
        return Err(status_error(&url, spec, status, body));
    }

    Ok(body)
}

/// Read the whole body and release it, whatever the status.
fn drain(response: HttpResponse) -> std::result::Result<Vec<u8>, TransportError> {
    let HttpResponse { mut body, .. } = response;
    let mut bytes = Vec::new();
    let read = body.read_to_end(&mut bytes);
    drop(body);
    read.map_err(|e| TransportError::Connection(Box::new(e)))?;
    Ok(bytes)
}

fn transport_error<B: Debug>(url: &Url, spec: &RequestSpec<B>, err: TransportError) -> CallError {
    CallError::new(ErrorKind::ApiRequest, format!("url: {url}; error: {err}"))
        .with_context("request", format!("{spec:?}"))
        .with_source(err)
        .logged()
}

fn status_error<B: Debug>(
    url: &Url,
    spec: &RequestSpec<B>,
    status: StatusCode,
    body: Vec<u8>,
) -> CallError {
    // Best effort: error bodies are often, but not always, flat JSON objects.
    // A body with any non-string value yields no map at all, never a partial one.
    let parsed: Option<BTreeMap<String, String>> = serde_json::from_slice(&body).ok();
    let raw = String::from_utf8_lossy(&body).into_owned();

    let mut err = CallError::new(
        ErrorKind::ApiRequestStatus,
        format!(
            "url: {url}; status code: {}; status: {status}; body: {:?}",
            status.as_u16(),
            parsed.clone().unwrap_or_default()
        ),
    )
    .with_status(status.as_u16())
    .with_context("response", raw.clone())
    .with_context("request", format!("{spec:?}"))
    .with_context("response-json", raw);

    if let Some(map) = parsed {
        err = err.with_context(
            "response-map",
            map.into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect::<serde_json::Map<_, _>>(),
        );
    }
    err.logged()
}
