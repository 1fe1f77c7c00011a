//! The transport collaborator contract and its default reqwest-backed
//! implementation.
//!
//! The core never performs socket I/O itself; it hands a [`PreparedRequest`]
//! to a [`Transport`] and receives a [`RawOutcome`] asynchronously.
//! Cancellation is cooperative: the dispatcher abandons the execution future,
//! which aborts the in-flight exchange.

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::HeaderMap;
use reqwest::redirect::Policy;

use super::client::ClientConfig;
use super::request::PreparedRequest;
use crate::error::{Error, Result};

/// The raw result of executing a prepared request.
///
/// Fields the exchange never reached stay `None`; a transport-level failure
/// after the status line still carries the status and headers it saw.
#[derive(Debug, Default)]
pub struct RawOutcome {
    /// HTTP status code, if a status line was received.
    pub status: Option<u16>,
    /// Response headers, if received.
    pub headers: Option<HeaderMap>,
    /// Response body bytes, if fully received.
    pub body: Option<Bytes>,
    /// Transport-level error, if the exchange failed.
    pub error: Option<Error>,
}

/// Executes prepared requests asynchronously.
///
/// Implementations must be shareable across requests; one transport instance
/// backs every request a [`Client`](super::client::Client) issues.
pub trait Transport: Send + Sync {
    /// Execute a prepared request, resolving to the raw transport outcome.
    fn execute(&self, request: PreparedRequest) -> BoxFuture<'static, RawOutcome>;
}

/// The default transport: a single shared reqwest session.
///
/// The session (connection pool, TLS) is created once per client and reused
/// by every request.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        builder = if config.follow_redirects {
            builder.redirect(Policy::limited(config.max_redirects))
        } else {
            builder.redirect(Policy::none())
        };
        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: PreparedRequest) -> BoxFuture<'static, RawOutcome> {
        let client = self.client.clone();
        Box::pin(async move {
            let mut req = client.request(request.method.to_reqwest(), request.url);
            for (name, value) in request.headers.iter() {
                req = req.header(name, value);
            }
            if let Some(body) = request.body {
                req = req.body(body);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let headers = response.headers().clone();
                    match response.bytes().await {
                        Ok(bytes) => RawOutcome {
                            status: Some(status),
                            headers: Some(headers),
                            body: Some(bytes),
                            error: None,
                        },
                        // Body read failed; keep the status and headers we saw.
                        Err(err) => RawOutcome {
                            status: Some(status),
                            headers: Some(headers),
                            body: None,
                            error: Some(err.into()),
                        },
                    }
                }
                Err(err) => RawOutcome {
                    error: Some(err.into()),
                    ..RawOutcome::default()
                },
            }
        })
    }
}
