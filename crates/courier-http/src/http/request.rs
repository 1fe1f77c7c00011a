//! HTTP request configuration and resume-time finalization.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use cookie::Cookie;
use http::header;
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use url::Url;

use super::client::{Client, RequestHandle};
use super::params::{ParamMap, ParamValue, QueryParams, SerializationMode, encode_params, merge_query};
use super::response::Response;
use crate::error::Error;

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
    /// HTTP PATCH method.
    Patch,
}

impl HttpMethod {
    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Head => write!(f, "HEAD"),
            Self::Options => write!(f, "OPTIONS"),
            Self::Patch => write!(f, "PATCH"),
        }
    }
}

/// A fully resolved request, frozen at resume time and ready for transport
/// execution.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    /// The request URL with query parameters merged in.
    pub url: Url,
    /// The HTTP method.
    pub method: HttpMethod,
    /// The finalized header map.
    pub headers: HeaderMap,
    /// The serialized body, if the request carries one.
    pub body: Option<Bytes>,
}

/// Mutable request configuration, owned by the caller until resumed.
///
/// Obtained from the [`Client`] method constructors. Configuration can change
/// any number of times; it is frozen into a [`PreparedRequest`] exactly once,
/// when [`build`](Self::build) or [`resume`](Self::resume) runs.
pub struct RequestBuilder {
    client: Client,
    method: HttpMethod,
    url: Url,
    headers: HeaderMap,
    query: QueryParams,
    params: Option<ParamMap>,
    mode: SerializationMode,
}

impl RequestBuilder {
    pub(crate) fn new(
        client: Client,
        method: HttpMethod,
        url: Url,
        params: Option<ParamMap>,
        query: QueryParams,
    ) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            query,
            params,
            mode: SerializationMode::default(),
        }
    }

    /// Set a single header; a later call with the same name wins.
    ///
    /// Invalid names or values are logged and skipped.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(target: "courier_http::http", "skipping invalid header");
            }
        }
        self
    }

    /// Replace the entire header set with the given map.
    ///
    /// All previously set headers are cleared, including any written by
    /// [`basic_auth`](Self::basic_auth) or [`cookies`](Self::cookies).
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the `Accept` header.
    pub fn accept(self, value: impl TryInto<HeaderValue>) -> Self {
        self.header(header::ACCEPT, value)
    }

    /// Set the `Authorization` header to `Basic base64(username:password)`.
    ///
    /// If the resulting credential string is not a valid header value the
    /// header is left unset; the skip is logged, not silent.
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        match HeaderValue::from_str(&format!("Basic {credentials}")) {
            Ok(value) => {
                self.headers.insert(header::AUTHORIZATION, value);
            }
            Err(e) => {
                tracing::warn!(
                    target: "courier_http::http",
                    "skipping unencodable Authorization header: {e}"
                );
            }
        }
        self
    }

    /// Derive the request's `Cookie` header from the given name/value pairs.
    ///
    /// Each cookie is bound to the request's origin host and root path. The
    /// header is merged into the existing set without clearing other headers;
    /// a later call replaces the `Cookie` header as a whole.
    pub fn cookies(mut self, cookies: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut pairs: Vec<String> = Vec::new();
        for (name, value) in cookies {
            let mut builder = Cookie::build((name, value)).path("/");
            if let Some(host) = self.url.host_str() {
                builder = builder.domain(host.to_string());
            }
            // Only the name=value pair travels on a request Cookie header.
            pairs.push(builder.build().stripped().to_string());
        }
        if pairs.is_empty() {
            return self;
        }
        match HeaderValue::from_str(&pairs.join("; ")) {
            Ok(value) => {
                self.headers.insert(header::COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(
                    target: "courier_http::http",
                    "skipping unencodable Cookie header: {e}"
                );
            }
        }
        self
    }

    /// Set the body serialization mode.
    ///
    /// Takes effect at resume time only, for both the body encoding and the
    /// `Content-Type` header.
    pub fn serialization_mode(mut self, mode: SerializationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add multiple query parameters.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set a single body parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params
            .get_or_insert_default()
            .insert(key.into(), value.into());
        self
    }

    /// Replace the body-parameter tree.
    pub fn params(mut self, params: ParamMap) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the body-parameter tree from any serializable value.
    ///
    /// The value must serialize to a JSON object; anything else is logged and
    /// leaves the current parameters unchanged.
    pub fn params_json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(serde_json::Value::Object(fields)) => {
                self.params = Some(
                    fields
                        .into_iter()
                        .map(|(k, v)| (k, ParamValue::from(v)))
                        .collect(),
                );
            }
            Ok(_) => {
                tracing::error!(
                    target: "courier_http::http",
                    "body parameters must serialize to a JSON object"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: "courier_http::http",
                    "failed to serialize body parameters: {e}"
                );
            }
        }
        self
    }

    /// Freeze the configuration into an immutable [`PreparedRequest`].
    ///
    /// Finalization runs in a fixed order: query parameters are merged into
    /// the URL, the body is serialized under the current mode, and
    /// `Content-Type` is written last. That final write intentionally
    /// overrides any earlier `header("Content-Type", ..)` call so the header
    /// always reflects the finalized mode.
    pub fn build(self) -> PreparedRequest {
        self.finalize().1
    }

    /// Finalize this request and hand it to the transport for asynchronous
    /// execution.
    ///
    /// The completion callback fires exactly once per resumed request, with
    /// either a populated response or an error (a cancellation also counts as
    /// an error). Must be called from within a tokio runtime.
    pub fn resume(
        self,
        completion: impl FnOnce(Response, Option<Error>) + Send + 'static,
    ) -> RequestHandle {
        let (client, prepared) = self.finalize();
        client.dispatch(prepared, completion)
    }

    fn finalize(mut self) -> (Client, PreparedRequest) {
        merge_query(&mut self.url, &self.query);
        let body = encode_params(self.params.as_ref(), self.mode);
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.mode.content_type()),
        );
        (
            self.client,
            PreparedRequest {
                url: self.url,
                method: self.method,
                headers: self.headers,
                body,
            },
        )
    }
}
