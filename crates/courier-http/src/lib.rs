//! Courier: asynchronous HTTP request construction and dispatch.
//!
//! This crate builds fully-formed HTTP requests (URL with merged query
//! string, serialized body, content-type/authorization/cookie headers) and
//! dispatches them through a pluggable transport, delivering a structured
//! response through a completion callback.
//!
//! # Quick start
//!
//! ```ignore
//! use courier_http::{Client, QueryParams};
//!
//! let client = Client::new();
//!
//! let request = client.get(
//!     "https://api.example.com/search",
//!     [("q".to_string(), "pigeons".to_string())],
//! )?;
//!
//! request.resume(|response, error| {
//!     if error.is_none() {
//!         println!("{}", response.text().unwrap_or_default());
//!     }
//! });
//! ```
//!
//! # Body parameters
//!
//! Bodies are described as a tree of scalars, lists, and maps, serialized at
//! resume time as either a URL-encoded form (`a[b]=c`, `a[]=x` bracket paths)
//! or JSON, depending on the active [`SerializationMode`]:
//!
//! ```ignore
//! use courier_http::{Client, ParamValue, SerializationMode};
//!
//! client.post("https://api.example.com/users", Default::default())?
//!     .param("user", ParamValue::Map(
//!         [("name".to_string(), ParamValue::from("john"))].into(),
//!     ))
//!     .serialization_mode(SerializationMode::Json)
//!     .resume(|response, _| println!("{:?}", response.status_code()));
//! ```
//!
//! # Cancellation
//!
//! Every resumed request returns a [`RequestHandle`]; [`Client`] tracks all
//! in-flight requests and can cancel them in bulk. A cancelled request still
//! delivers its completion callback, exactly once, with a cancellation error.

mod error;
pub mod http;

pub use error::{Error, Result};

// Re-export commonly used types at the crate root
pub use http::{
    Client, ClientBuilder, ClientConfig, HttpMethod, ParamMap, ParamValue, PreparedRequest,
    QueryParams, RawOutcome, ReqwestTransport, RequestBuilder, RequestHandle, RequestId, Response,
    SerializationMode, Transport,
};
