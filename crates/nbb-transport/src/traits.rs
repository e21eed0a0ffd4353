use std::fmt;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::TransportResult;
use crate::response::HttpResponse;

/// HTTP methods the client issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Head,
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Head => f.write_str("HEAD"),
            Method::Get => f.write_str("GET"),
        }
    }
}

/// Blocking HTTP transport.
///
/// Implementations return every response they receive, whatever its status;
/// callers decide which statuses are errors. Transport-level failures
/// (connection, timeout) are errors.
pub trait Transport: Send + Sync {
    /// Send a `HEAD` request.
    fn head(&self, url: &Url) -> TransportResult<HttpResponse>;

    /// Send a `GET` request and read the whole body.
    fn get(&self, url: &Url) -> TransportResult<HttpResponse>;

    /// `GET` a JSON document. Non-2xx statuses and malformed bodies are
    /// errors.
    fn get_json(&self, url: &Url) -> TransportResult<Value> {
        let response = self.get(url)?.error_for_status(url)?;
        debug!(%url, bytes = response.body.len(), "decoding JSON body");
        response.decode_json(url)
    }

    /// `GET` raw bytes. Non-2xx statuses are errors.
    fn get_bytes(&self, url: &Url) -> TransportResult<HttpResponse> {
        self.get(url)?.error_for_status(url)
    }
}
