//! Body-parameter trees and their wire encodings.
//!
//! Request bodies are described as a tree of [`ParamValue`]s and flattened at
//! resume time into either a URL-encoded byte string or a JSON byte string.
//! Nested maps and lists use the bracket-path convention: a map value under
//! key `k` contributes `k[nested]` pairs, a list value contributes one `k[]`
//! pair per element.

use std::collections::BTreeMap;

use bytes::Bytes;
use url::Url;

/// Flat query-string parameters applied to the request URL at resume time.
pub type QueryParams = BTreeMap<String, String>;

/// Nested body parameters keyed by field name.
///
/// `BTreeMap` keeps iteration deterministic, so encoded output is stable for
/// any given tree.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A body-parameter value: a scalar string, an ordered list, or a nested map.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A single string value.
    Scalar(String),
    /// An ordered sequence of values; order is preserved in the encoding.
    List(Vec<ParamValue>),
    /// A nested map of values.
    Map(ParamMap),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl<V: Into<ParamValue>> From<Vec<V>> for ParamValue {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<ParamMap> for ParamValue {
    fn from(map: ParamMap) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Scalar(String::new()),
            serde_json::Value::Bool(b) => Self::Scalar(b.to_string()),
            serde_json::Value::Number(n) => Self::Scalar(n.to_string()),
            serde_json::Value::String(s) => Self::Scalar(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, ParamValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl ParamValue {
    /// Mirror the tree as a JSON value: maps become objects, lists become
    /// arrays, scalars become strings.
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Scalar(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(ParamValue::to_json).collect())
            }
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// How the body-parameter tree is serialized at resume time.
///
/// The active mode also decides the `Content-Type` header written as the last
/// finalization step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SerializationMode {
    /// `application/x-www-form-urlencoded` body with bracket-path flattening.
    #[default]
    FormUrlEncoded,
    /// `application/json` body mirroring the Map/List/Scalar tree.
    Json,
}

impl SerializationMode {
    pub(crate) fn content_type(self) -> &'static str {
        match self {
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Json => "application/json",
        }
    }
}

/// Serialize a parameter tree into body bytes under the given mode.
///
/// `None` params produce no body. A tree that fails to serialize under `Json`
/// also produces no body; the failure is logged, never raised.
pub fn encode_params(params: Option<&ParamMap>, mode: SerializationMode) -> Option<Bytes> {
    let params = params?;

    match mode {
        SerializationMode::Json => {
            let value = ParamValue::Map(params.clone()).to_json();
            match serde_json::to_vec(&value) {
                Ok(bytes) => Some(Bytes::from(bytes)),
                Err(e) => {
                    tracing::error!(
                        target: "courier_http::http",
                        "failed to serialize JSON body: {e}"
                    );
                    None
                }
            }
        }
        SerializationMode::FormUrlEncoded => {
            let mut pairs: Vec<(String, String)> = Vec::new();
            for (key, value) in params {
                flatten_into(key, value, &mut pairs);
            }
            let encoded = pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            Some(Bytes::from(encoded.into_bytes()))
        }
    }
}

/// Recursively flatten one tree node into percent-encoded `(key, value)`
/// pairs using the `k[nested]` / `k[]` bracket convention.
fn flatten_into(key: &str, value: &ParamValue, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Map(map) => {
            for (nested_key, nested) in map {
                flatten_into(&format!("{key}[{nested_key}]"), nested, out);
            }
        }
        ParamValue::List(items) => {
            let list_key = format!("{key}[]");
            for item in items {
                flatten_into(&list_key, item, out);
            }
        }
        ParamValue::Scalar(scalar) => {
            // An empty scalar still emits its pair, as `k=`.
            out.push((
                urlencoding::encode(key).into_owned(),
                urlencoding::encode(scalar).into_owned(),
            ));
        }
    }
}

/// Merge query parameters into a URL, appending to any pre-existing query.
///
/// Existing pairs are preserved untouched; each new pair is appended exactly
/// once. An empty `params` leaves the URL byte-identical.
pub fn merge_query(url: &mut Url, params: &QueryParams) {
    if params.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in params {
        pairs.append_pair(key, value);
    }
}
