//! Recorded request/response pairs.
//!
//! A [`CacheEntry`] is created once, after a successful (`200 OK`) exchange,
//! and never changes afterwards. Its serialized form uses stable field names:
//!
//! ```json
//! {
//!   "method": "POST",
//!   "url": "http://127.0.0.1:8080/search",
//!   "body": [123, 125],
//!   "response": [111, 107],
//!   "header": { "content-type": ["application/json"] }
//! }
//! ```
//!
//! `body` is omitted when the request carried no body.

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};

/// Methods whose request body takes part in matching and recording.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// An immutable record of one completed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "http_serde::method")]
    method: Method,
    url: String,
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    body: Bytes,
    response: Bytes,
    #[serde(with = "header_lists")]
    header: HeaderMap,
}

impl CacheEntry {
    /// Creates an entry.
    ///
    /// The request body is dropped for methods that do not carry one, so two
    /// `GET`s never differ by a body nobody matches on.
    pub fn new(
        method: Method,
        url: impl Into<String>,
        body: Bytes,
        response: Bytes,
        header: HeaderMap,
    ) -> Self {
        let body = if carries_body(&method) {
            body
        } else {
            Bytes::new()
        };
        Self {
            method,
            url: url.into(),
            body,
            response,
            header,
        }
    }

    /// HTTP method of the recorded request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Fully resolved request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body, empty for bodiless methods.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response body bytes.
    pub fn response(&self) -> &Bytes {
        &self.response
    }

    /// Response headers.
    pub fn header(&self) -> &HeaderMap {
        &self.header
    }
}

/// Serializes a [`HeaderMap`] as `{ name: [value, ...] }`.
///
/// Every name maps to a list, even with a single value, and the value order
/// of repeated headers is preserved. Values must be valid UTF-8; any other
/// bytes fail serialization instead of being altered.
mod header_lists {
    use http::{HeaderMap, HeaderName, HeaderValue};
    use serde::de::Error as _;
    use serde::ser::{Error as _, SerializeMap};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(headers.keys_len()))?;
        for name in headers.keys() {
            let values = headers
                .get_all(name)
                .iter()
                .map(|value| std::str::from_utf8(value.as_bytes()).map_err(S::Error::custom))
                .collect::<Result<Vec<&str>, _>>()?;
            map.serialize_entry(name.as_str(), &values)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut headers = HeaderMap::with_capacity(raw.len());
        for (name, values) in raw {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(D::Error::custom)?;
            for value in values {
                let value = HeaderValue::from_str(&value).map_err(D::Error::custom)?;
                headers.append(name.clone(), value);
            }
        }
        Ok(headers)
    }
}
