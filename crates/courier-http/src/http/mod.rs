//! HTTP request construction and dispatch.
//!
//! A request starts as a [`RequestBuilder`] obtained from one of the
//! [`Client`] method constructors, accumulates configuration (headers, auth,
//! cookies, query and body parameters, serialization mode), and is frozen
//! into an immutable [`PreparedRequest`] when resumed. The prepared request
//! is executed by the [`Transport`] collaborator; the outcome arrives as a
//! [`Response`] through a completion callback that fires exactly once.
//!
//! # Example
//!
//! ```ignore
//! use courier_http::{Client, ParamValue, SerializationMode};
//!
//! let client = Client::new();
//!
//! let handle = client
//!     .post("https://api.example.com/users", Default::default())?
//!     .param("name", "john")
//!     .param("roles", vec!["admin", "ops"])
//!     .serialization_mode(SerializationMode::Json)
//!     .basic_auth("john", "hunter2")
//!     .resume(|response, error| {
//!         match error {
//!             None => println!("created: {:?}", response.json()),
//!             Some(e) => println!("failed: {e}"),
//!         }
//!     });
//!
//! // Cancellation is best-effort and idempotent.
//! handle.cancel();
//! ```

mod client;
mod params;
mod request;
mod response;
mod transport;

pub use client::{Client, ClientBuilder, ClientConfig, RequestHandle, RequestId};
pub use params::{
    ParamMap, ParamValue, QueryParams, SerializationMode, encode_params, merge_query,
};
pub use request::{HttpMethod, PreparedRequest, RequestBuilder};
pub use response::Response;
pub use transport::{RawOutcome, ReqwestTransport, Transport};
