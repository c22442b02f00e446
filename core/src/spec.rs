//! Description of a single outbound call.
//!
//! # Design
//! `RequestSpec` is plain data filled in through setters. Nothing is
//! validated here: the endpoint, method and header values are checked when
//! the call is executed, so building a spec never fails. The body type is a
//! generic parameter so callers can hand over their own `Serialize` types
//! without converting them first; it defaults to `serde_json::Value`.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Encoding applied to the request body, also sent as `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Json,
    FormUrlEncoded,
    /// Any other media type. The header is sent but the body is not encoded.
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => "application/json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::Other(media_type) => media_type,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct RequestSpec<B = serde_json::Value> {
    endpoint: String,
    method: String,
    body: Option<B>,
    query_params: HashMap<String, String>,
    auth_user_name: Option<String>,
    auth_password: Option<String>,
    basic_auth: Option<String>,
    auth_token: Option<String>,
    host: Option<String>,
    custom_headers: HashMap<String, String>,
    content_type: ContentType,
    timeout: Duration,
}

impl RequestSpec {
    /// A bodiless JSON call to `endpoint` with no extra headers.
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            body: None,
            query_params: HashMap::new(),
            auth_user_name: None,
            auth_password: None,
            basic_auth: None,
            auth_token: None,
            host: None,
            custom_headers: HashMap::new(),
            content_type: ContentType::Json,
            timeout: Duration::ZERO,
        }
    }
}

impl<B> RequestSpec<B> {
    /// Replace the body, changing the body type.
    pub fn with_body<T>(self, body: T) -> RequestSpec<T> {
        RequestSpec {
            endpoint: self.endpoint,
            method: self.method,
            body: Some(body),
            query_params: self.query_params,
            auth_user_name: self.auth_user_name,
            auth_password: self.auth_password,
            basic_auth: self.basic_auth,
            auth_token: self.auth_token,
            host: self.host,
            custom_headers: self.custom_headers,
            content_type: self.content_type,
            timeout: self.timeout,
        }
    }

    pub fn set_body(&mut self, body: B) {
        self.body = Some(body);
    }

    pub fn clear_body(&mut self) {
        self.body = None;
    }

    pub fn set_auth_user_name(&mut self, user_name: impl Into<String>) {
        self.auth_user_name = Some(user_name.into());
    }

    pub fn set_auth_password(&mut self, password: impl Into<String>) {
        self.auth_password = Some(password.into());
    }

    pub fn set_auth(&mut self, user_name: impl Into<String>, password: impl Into<String>) {
        self.auth_user_name = Some(user_name.into());
        self.auth_password = Some(password.into());
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Pre-encoded credentials, sent as `Authorization: Basic <value>`.
    pub fn set_basic_auth(&mut self, encoded: impl Into<String>) {
        self.basic_auth = Some(encoded.into());
    }

    pub fn set_query_params(&mut self, params: HashMap<String, String>) {
        self.query_params = params;
    }

    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom_headers.insert(key.into(), value.into());
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    /// Zero means "use the client's default timeout".
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn auth_user_name(&self) -> Option<&str> {
        self.auth_user_name.as_deref()
    }

    pub fn auth_password(&self) -> Option<&str> {
        self.auth_password.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn basic_auth(&self) -> Option<&str> {
        self.basic_auth.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.custom_headers
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

const REDACTED: &str = "<redacted>";

// Credentials never reach logs or error context through this impl.
impl<B: fmt::Debug> fmt::Debug for RequestSpec<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| REDACTED);
        f.debug_struct("RequestSpec")
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("body", &self.body)
            .field("query_params", &self.query_params)
            .field("auth_user_name", &self.auth_user_name)
            .field("auth_password", &redact(&self.auth_password))
            .field("basic_auth", &redact(&self.basic_auth))
            .field("auth_token", &redact(&self.auth_token))
            .field("host", &self.host)
            .field("custom_headers", &self.custom_headers)
            .field("content_type", &self.content_type)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_spec_has_json_defaults() {
        let spec = RequestSpec::new("https://api.example.com/items", "GET");
        assert_eq!(spec.endpoint(), "https://api.example.com/items");
        assert_eq!(spec.method(), "GET");
        assert_eq!(spec.content_type(), &ContentType::Json);
        assert!(spec.body().is_none());
        assert!(spec.query_params().is_empty());
        assert!(spec.headers().is_empty());
        assert_eq!(spec.timeout(), Duration::ZERO);
        assert!(spec.auth_token().is_none());
        assert!(spec.host().is_none());
    }

    #[test]
    fn setters_accept_anything_without_validation() {
        let mut spec = RequestSpec::new("not a url", "NOT A METHOD");
        spec.add_header("bad\nheader", "value");
        spec.set_host("");
        spec.set_timeout(Duration::from_secs(5));
        assert_eq!(spec.endpoint(), "not a url");
        assert_eq!(spec.host(), Some(""));
        assert_eq!(spec.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn set_auth_sets_both_fields() {
        let mut spec = RequestSpec::new("https://example.com", "GET");
        spec.set_auth("alice", "s3cret");
        assert_eq!(spec.auth_user_name(), Some("alice"));
        assert_eq!(spec.auth_password(), Some("s3cret"));
    }

    #[test]
    fn query_params_are_keyed_and_replaceable() {
        let mut spec = RequestSpec::new("https://example.com", "GET");
        spec.add_query_param("page", "1");
        spec.add_query_param("page", "2");
        assert_eq!(spec.query_params().get("page").map(String::as_str), Some("2"));

        spec.set_query_params(HashMap::from([("q".to_string(), "rust".to_string())]));
        assert_eq!(spec.query_params().len(), 1);
        assert!(spec.query_params().contains_key("q"));
    }

    #[test]
    fn with_body_changes_body_type_and_keeps_fields() {
        #[derive(Debug, PartialEq)]
        struct Payload {
            name: &'static str,
        }

        let mut spec = RequestSpec::new("https://example.com", "POST");
        spec.set_auth_token("abc");
        spec.set_content_type(ContentType::FormUrlEncoded);
        let spec = spec.with_body(Payload { name: "x" });

        assert_eq!(spec.body(), Some(&Payload { name: "x" }));
        assert_eq!(spec.auth_token(), Some("abc"));
        assert_eq!(spec.content_type(), &ContentType::FormUrlEncoded);
    }

    #[test]
    fn set_body_and_clear_body() {
        let mut spec = RequestSpec::new("https://example.com", "POST");
        spec.set_body(json!({"a": 1}));
        assert_eq!(spec.body(), Some(&json!({"a": 1})));
        spec.clear_body();
        assert!(spec.body().is_none());
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut spec = RequestSpec::new("https://example.com", "GET");
        spec.set_auth("alice", "s3cret");
        spec.set_auth_token("tok-123");
        spec.set_basic_auth("YWxpY2U6czNjcmV0");

        let described = format!("{spec:?}");
        assert!(described.contains("alice"));
        assert!(!described.contains("s3cret"));
        assert!(!described.contains("tok-123"));
        assert!(!described.contains("YWxpY2U6czNjcmV0"));
        assert!(described.contains(REDACTED));
    }

    #[test]
    fn content_type_media_types() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::Other("text/plain".into()).to_string(), "text/plain");
    }
}
