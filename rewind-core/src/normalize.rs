//! Body-equality policies.
//!
//! Request bodies are compared after passing both sides through a
//! [`Normalizer`]. [`BodyMatch::Raw`] compares bytes as they are,
//! [`BodyMatch::Json`] compares the canonical form produced by [`JsonNormalizer`].

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Turns a body into the form used for equality checks.
///
/// Implementations must be pure: the same input always yields the same output,
/// and input they cannot interpret is returned unchanged.
pub trait Normalizer: Send + Sync {
    /// Returns the canonical form of `body`.
    fn normalize<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]>;
}

impl<N> Normalizer for Arc<N>
where
    N: Normalizer + ?Sized,
{
    fn normalize<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        (**self).normalize(body)
    }
}

impl<N> Normalizer for Box<N>
where
    N: Normalizer + ?Sized,
{
    fn normalize<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        (**self).normalize(body)
    }
}

/// Built-in body-equality policies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMatch {
    /// Exact byte equality.
    #[default]
    Raw,
    /// JSON bodies are compared by canonical form; anything else byte for byte.
    Json,
}

impl Normalizer for BodyMatch {
    fn normalize<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            BodyMatch::Raw => Cow::Borrowed(body),
            BodyMatch::Json => JsonNormalizer.normalize(body),
        }
    }
}

/// Canonical JSON: object keys sorted at every depth, two-space indentation.
///
/// Input that does not parse as JSON (including an empty body) is returned
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNormalizer;

impl Normalizer for JsonNormalizer {
    fn normalize<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        let Ok(mut value) = serde_json::from_slice::<Value>(body) else {
            return Cow::Borrowed(body);
        };
        sort_keys(&mut value);
        match serde_json::to_vec_pretty(&value) {
            Ok(canonical) => Cow::Owned(canonical),
            Err(_) => Cow::Borrowed(body),
        }
    }
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.sort_keys();
            map.values_mut().for_each(sort_keys);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}
