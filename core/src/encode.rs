//! Request body encoding, dispatched on [`ContentType`].

use std::fmt::Debug;

use serde::Serialize;

use crate::error::{CallError, ErrorKind, Result};
use crate::spec::ContentType;

/// Encode `body` for the wire.
///
/// Returns `Ok(None)` when there is nothing to send: no body, or a content
/// type this encoder does not know. In the latter case the body is dropped
/// and only the `Content-Type` header reaches the server.
pub fn encode_body<B>(body: Option<&B>, content_type: &ContentType) -> Result<Option<Vec<u8>>>
where
    B: Serialize + Debug,
{
    let Some(body) = body else {
        return Ok(None);
    };

    match content_type {
        ContentType::Json => serde_json::to_vec(body).map(Some).map_err(|e| {
            serialization_error(ErrorKind::JsonSerialization, body, e)
        }),
        ContentType::FormUrlEncoded => serde_urlencoded::to_string(body)
            .map(|encoded| Some(encoded.into_bytes()))
            .map_err(|e| serialization_error(ErrorKind::FormSerialization, body, e)),
        ContentType::Other(media_type) => {
            tracing::debug!(content_type = %media_type, "no encoder for content type, body not sent");
            Ok(None)
        }
    }
}

fn serialization_error<B, E>(kind: ErrorKind, body: &B, err: E) -> CallError
where
    B: Debug,
    E: std::error::Error + Send + Sync + 'static,
{
    let body = format!("{body:?}");
    CallError::new(kind, format!("request: {body}, error: {err}"))
        .with_context("body", body)
        .with_context("error", err.to_string())
        .with_source(err)
        .logged()
}
