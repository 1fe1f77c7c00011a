//! HTTP response snapshot types.

use bytes::Bytes;
use http::HeaderMap;

use super::client::RequestId;

/// An immutable snapshot of a completed (or cancelled) request's outcome.
///
/// Fields the transport could not provide stay absent: a cancelled request
/// has no status, a connection failure has no headers or body. The derived
/// [`text`](Self::text) and [`json`](Self::json) views are recomputed from
/// the raw body on each access.
pub struct Response {
    request_id: RequestId,
    status: Option<u16>,
    headers: Option<HeaderMap>,
    body: Option<Bytes>,
}

impl Response {
    pub(crate) fn new(
        request_id: RequestId,
        status: Option<u16>,
        headers: Option<HeaderMap>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            request_id,
            status,
            headers,
            body,
        }
    }

    /// Correlation id of the originating request, for diagnostics only.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The HTTP status code, absent if no HTTP exchange completed.
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Check if the response carries a success (2xx) status.
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }

    /// The response headers, absent if no HTTP exchange completed.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .as_ref()?
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// The raw response body.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The body decoded as UTF-8, absent if the body is absent or not valid
    /// UTF-8.
    pub fn text(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        std::str::from_utf8(body).ok().map(str::to_string)
    }

    /// The body parsed as JSON.
    ///
    /// An absent body and an unparseable body both yield `None`; inspect
    /// [`body`](Self::body) or [`status_code`](Self::status_code) to tell
    /// them apart.
    pub fn json(&self) -> Option<serde_json::Value> {
        let body = self.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("request_id", &self.request_id)
            .field("status", &self.status)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .finish()
    }
}
