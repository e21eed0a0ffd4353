//! HTTP transport for the NodeBB client.
//!
//! Entities never talk to the network directly; they go through the
//! [`Transport`] trait. Two implementations ship with the crate:
//!
//! - [`HttpTransport`] -- blocking `reqwest` client with a per-request
//!   deadline and bounded, exponentially backed-off retries
//! - [`InMemoryTransport`] -- canned responses keyed by method and URL, with
//!   a request log, for tests and offline embedding

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod response;
pub mod traits;

pub use config::{RetryPolicy, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use memory::InMemoryTransport;
pub use response::{Headers, HttpResponse};
pub use traits::{Method, Transport};

pub use url::Url;
