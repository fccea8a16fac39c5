//! Request and response descriptors for the client pipeline
//!
//! These types are transport-agnostic: the core builds and replays
//! [`ApiRequest`] values and the transport adapter turns them into real
//! HTTP calls.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{AUTHORIZATION_HEADER, BEARER_PREFIX};
use crate::errors::ApiError;

/// HTTP verbs supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types that can be flattened into query-string pairs
///
/// Implementations skip `None` fields so only supplied filters are sent.
pub trait QueryParams {
    fn to_query(&self) -> Vec<(String, String)>;
}

/// Push `key=value` when the value is present
pub fn push_param<V: ToString>(params: &mut Vec<(String, String)>, key: &str, value: Option<V>) {
    if let Some(value) = value {
        params.push((key.to_string(), value.to_string()));
    }
}

/// Per-call options supplied by facade callers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config carrying the query pairs of a filter struct
    pub fn with_params<P: QueryParams + ?Sized>(params: &P) -> Self {
        Self { query: params.to_query(), ..Self::default() }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// One logical request as seen by the interceptor pipeline
///
/// `retry` marks a request that has already been replayed after a token
/// refresh; a second 401 on such a request is terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub id: Uuid,
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub retry: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            retry: false,
        }
    }

    /// Apply per-call query pairs and headers
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.query.extend(config.query);
        self.headers.extend(config.headers);
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Make a 401 on this request terminal (login, registration)
    pub fn without_refresh(mut self) -> Self {
        self.retry = true;
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value
    pub fn set_bearer(&mut self, token: &str) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
        self.headers.insert(AUTHORIZATION_HEADER.to_string(), format!("{BEARER_PREFIX}{token}"));
    }

    /// Token carried in the bearer header, if any
    pub fn bearer(&self) -> Option<&str> {
        self.header(AUTHORIZATION_HEADER).and_then(|value| value.strip_prefix(BEARER_PREFIX))
    }
}

/// Raw response returned by the transport
///
/// Non-success statuses are still responses; classification happens in the
/// client pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: BTreeMap::new(), body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Body as lossy UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the JSON body
    ///
    /// 204/205 responses and empty bodies decode from `null`, so `()` and
    /// `Option<T>` work for endpoints without content.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.status == 204 || self.status == 205 || self.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Serialization(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    self.status
                ))
            });
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Serialization(format!("Failed to parse response: {e}")))
    }
}

/// Decoded response handed to facade callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    pub status: u16,
    pub data: T,
}

impl<T> Response<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}
