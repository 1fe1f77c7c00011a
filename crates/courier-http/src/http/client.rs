//! HTTP client: request construction entry points, dispatch, and in-flight
//! cancellation tracking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use url::Url;

use super::params::{ParamMap, QueryParams};
use super::request::{HttpMethod, PreparedRequest, RequestBuilder};
use super::response::Response;
use super::transport::{RawOutcome, ReqwestTransport, Transport};
use crate::error::{Error, Result};

/// Configuration for the default transport session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Whether to follow redirects.
    pub follow_redirects: bool,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// Default user agent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: Some(format!("Courier/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for creating a client with custom configuration.
pub struct ClientBuilder {
    config: ClientConfig,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Disable redirect following.
    pub fn no_redirects(mut self) -> Self {
        self.config.follow_redirects = false;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client over the default reqwest-backed transport.
    pub fn build(self) -> Result<Client> {
        let transport = ReqwestTransport::from_config(&self.config)?;
        Ok(Client {
            inner: Arc::new(ClientInner {
                transport: Arc::new(transport),
                config: self.config,
                in_flight: Mutex::new(HashMap::new()),
            }),
        })
    }
}

/// Unique identifier for a dispatched request.
///
/// A response carries the id of its originating request as a plain
/// correlation key; it never keeps the request alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A handle to an in-flight request.
pub struct RequestHandle {
    /// The unique id of this request.
    pub id: RequestId,
    cancel_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl RequestHandle {
    /// Request cooperative cancellation.
    ///
    /// Returns `true` if the cancellation signal was sent, `false` if the
    /// request already completed or was already cancelled (a no-op).
    pub fn cancel(&self) -> bool {
        if let Some(tx) = self.cancel_tx.lock().take() {
            tx.send(()).is_ok()
        } else {
            false
        }
    }

    /// Check if the request is still pending.
    pub fn is_pending(&self) -> bool {
        self.cancel_tx.lock().is_some()
    }
}

impl Clone for RequestHandle {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cancel_tx: self.cancel_tx.clone(),
        }
    }
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    in_flight: Mutex<HashMap<RequestId, RequestHandle>>,
}

/// The entry point for issuing HTTP requests.
///
/// The client is cheaply cloneable and thread-safe; clones share the same
/// transport session and in-flight registry. Construct one explicitly and
/// pass it where it is needed; there is no process-wide instance.
///
/// # Example
///
/// ```ignore
/// use courier_http::{Client, QueryParams};
///
/// let client = Client::new();
/// let handle = client
///     .get("https://api.example.com/data", QueryParams::new())?
///     .resume(|response, error| {
///         if let Some(status) = response.status_code() {
///             println!("completed with {status}");
///         }
///     });
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client with default configuration.
    pub fn new() -> Self {
        ClientBuilder::new()
            .build()
            .expect("Failed to create HTTP client with default configuration")
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client over an injected transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                config: ClientConfig::default(),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Create a GET request builder.
    pub fn get(
        &self,
        url: &str,
        query: impl IntoIterator<Item = (String, String)>,
    ) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Get, url, None, query.into_iter().collect())
    }

    /// Create a DELETE request builder.
    pub fn delete(
        &self,
        url: &str,
        query: impl IntoIterator<Item = (String, String)>,
    ) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Delete, url, None, query.into_iter().collect())
    }

    /// Create a HEAD request builder.
    pub fn head(
        &self,
        url: &str,
        query: impl IntoIterator<Item = (String, String)>,
    ) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Head, url, None, query.into_iter().collect())
    }

    /// Create an OPTIONS request builder.
    pub fn options(
        &self,
        url: &str,
        query: impl IntoIterator<Item = (String, String)>,
    ) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Options, url, None, query.into_iter().collect())
    }

    /// Create a POST request builder carrying body parameters.
    pub fn post(&self, url: &str, params: ParamMap) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Post, url, Some(params), QueryParams::new())
    }

    /// Create a PUT request builder carrying body parameters.
    pub fn put(&self, url: &str, params: ParamMap) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Put, url, Some(params), QueryParams::new())
    }

    /// Create a PATCH request builder carrying body parameters.
    pub fn patch(&self, url: &str, params: ParamMap) -> Result<RequestBuilder> {
        self.request_with(HttpMethod::Patch, url, Some(params), QueryParams::new())
    }

    /// Create a request builder with a custom method and no parameters.
    pub fn request(&self, method: HttpMethod, url: &str) -> Result<RequestBuilder> {
        self.request_with(method, url, None, QueryParams::new())
    }

    fn request_with(
        &self,
        method: HttpMethod,
        url: &str,
        params: Option<ParamMap>,
        query: QueryParams,
    ) -> Result<RequestBuilder> {
        // Fail fast: no builder exists for a malformed URL.
        let url = Url::parse(url)?;
        Ok(RequestBuilder::new(self.clone(), method, url, params, query))
    }

    /// Number of requests currently tracked as in flight.
    pub fn in_flight_requests(&self) -> usize {
        self.inner.in_flight.lock().len()
    }

    /// Request cancellation of every tracked in-flight request.
    ///
    /// Safe to call from any thread, including with nothing in flight. Each
    /// cancelled request's completion callback still fires exactly once, with
    /// a cancellation error.
    pub fn cancel_all_requests(&self) {
        let handles: Vec<RequestHandle> = self.inner.in_flight.lock().values().cloned().collect();
        for handle in handles {
            handle.cancel();
        }
    }

    /// Hand a prepared request to the transport and track it until its
    /// completion callback has fired.
    pub(crate) fn dispatch(
        &self,
        prepared: PreparedRequest,
        completion: impl FnOnce(Response, Option<Error>) + Send + 'static,
    ) -> RequestHandle {
        let id = RequestId::next();
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        let handle = RequestHandle {
            id,
            cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
        };
        self.inner.in_flight.lock().insert(id, handle.clone());

        tracing::debug!(
            target: "courier_http::http",
            "dispatching {} {} [{}]",
            prepared.method,
            prepared.url,
            id.as_u64()
        );

        let inner = self.inner.clone();
        let task_handle = handle.clone();
        let execute = self.inner.transport.execute(prepared);

        tokio::spawn(async move {
            // Biased, cancel arm first: a request cancelled before its
            // execution future is first polled never reaches the transport.
            let outcome = tokio::select! {
                biased;
                _ = &mut cancel_rx => None,
                outcome = execute => Some(outcome),
            };

            task_handle.cancel_tx.lock().take();
            inner.in_flight.lock().remove(&id);

            match outcome {
                Some(RawOutcome {
                    status,
                    headers,
                    body,
                    error,
                }) => {
                    tracing::debug!(
                        target: "courier_http::http",
                        "request [{}] completed (status {:?})",
                        id.as_u64(),
                        status
                    );
                    completion(Response::new(id, status, headers, body), error);
                }
                None => {
                    tracing::debug!(
                        target: "courier_http::http",
                        "request [{}] cancelled",
                        id.as_u64()
                    );
                    completion(Response::new(id, None, None, None), Some(Error::Cancelled));
                }
            }
        });

        handle
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("in_flight", &self.inner.in_flight.lock().len())
            .finish()
    }
}
