use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{TransportError, TransportResult};
use crate::response::HttpResponse;
use crate::traits::{Method, Transport};

/// In-memory transport serving canned responses.
///
/// Intended for tests and offline embedding. Responses are keyed by method
/// and the serialized URL; a request with no registered route fails with
/// [`TransportError::NoRoute`]. Every request, routed or not, is appended to
/// a log that tests can inspect.
pub struct InMemoryTransport {
    routes: RwLock<HashMap<(Method, String), HttpResponse>>,
    log: Mutex<Vec<(Method, Url)>>,
}

impl InMemoryTransport {
    /// Create a transport with no routes.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Register `response` for `method url`, replacing any previous route.
    pub fn route(&self, method: Method, url: &str, response: HttpResponse) -> TransportResult<()> {
        let url = parse(url)?;
        self.routes
            .write()
            .expect("lock poisoned")
            .insert((method, url.to_string()), response);
        Ok(())
    }

    /// Builder form of [`route`](Self::route).
    pub fn with_route(self, method: Method, url: &str, response: HttpResponse) -> TransportResult<Self> {
        self.route(method, url, response)?;
        Ok(self)
    }

    /// Register a `200 OK` JSON document for `GET url`.
    pub fn with_json(self, url: &str, body: Value) -> TransportResult<Self> {
        self.with_route(Method::Get, url, HttpResponse::json(&body))
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<(Method, Url)> {
        self.log.lock().expect("lock poisoned").clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.log.lock().expect("lock poisoned").len()
    }

    /// Number of requests received for `method url`.
    pub fn count(&self, method: Method, url: &str) -> usize {
        let Ok(url) = parse(url) else {
            return 0;
        };
        self.log
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(m, u)| *m == method && *u == url)
            .count()
    }

    fn serve(&self, method: Method, url: &Url) -> TransportResult<HttpResponse> {
        self.log
            .lock()
            .expect("lock poisoned")
            .push((method, url.clone()));

        let routes = self.routes.read().expect("lock poisoned");
        match routes.get(&(method, url.to_string())) {
            Some(response) => {
                debug!(%method, %url, status = response.status, "served canned response");
                Ok(response.clone())
            }
            None => Err(TransportError::NoRoute {
                method: method.to_string(),
                url: url.to_string(),
            }),
        }
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for InMemoryTransport {
    fn head(&self, url: &Url) -> TransportResult<HttpResponse> {
        self.serve(Method::Head, url)
    }

    fn get(&self, url: &Url) -> TransportResult<HttpResponse> {
        self.serve(Method::Get, url)
    }
}

impl std::fmt::Debug for InMemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes = self.routes.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryTransport")
            .field("route_count", &routes)
            .field("request_count", &self.request_count())
            .finish()
    }
}

fn parse(url: &str) -> TransportResult<Url> {
    Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const API: &str = "https://forum.example.com/api/";

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn serves_registered_json() {
        let t = InMemoryTransport::new()
            .with_json(API, json!({"topics": []}))
            .unwrap();
        let value = t.get_json(&url(API)).unwrap();
        assert_eq!(value, json!({"topics": []}));
    }

    #[test]
    fn unrouted_request_fails_and_is_logged() {
        let t = InMemoryTransport::new();
        match t.get(&url(API)) {
            Err(TransportError::NoRoute { method, url }) => {
                assert_eq!(method, "GET");
                assert_eq!(url, API);
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
        assert_eq!(t.request_count(), 1);
    }

    #[test]
    fn routes_are_per_method() {
        let t = InMemoryTransport::new()
            .with_route(Method::Head, API, HttpResponse::new(200))
            .unwrap();
        assert!(t.head(&url(API)).is_ok());
        assert!(t.get(&url(API)).is_err());
    }

    #[test]
    fn urls_are_normalized() {
        let t = InMemoryTransport::new()
            .with_json("https://FORUM.example.com/api/", json!({}))
            .unwrap();
        assert!(t.get(&url(API)).is_ok());
    }

    #[test]
    fn request_log_in_order() {
        let t = InMemoryTransport::new()
            .with_route(Method::Head, "https://forum.example.com/", HttpResponse::new(200))
            .unwrap()
            .with_json(API, json!({}))
            .unwrap();
        t.head(&url("https://forum.example.com/")).unwrap();
        t.get(&url(API)).unwrap();
        t.get(&url(API)).unwrap();

        let methods: Vec<Method> = t.requests().into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, vec![Method::Head, Method::Get, Method::Get]);
        assert_eq!(t.count(Method::Get, API), 2);
    }

    #[test]
    fn non_success_status_fails_get_json() {
        let t = InMemoryTransport::new()
            .with_route(Method::Get, API, HttpResponse::new(500))
            .unwrap();
        assert!(matches!(t.get_json(&url(API)), Err(TransportError::Status { status: 500, .. })));
    }

    #[test]
    fn invalid_route_url_is_rejected() {
        let t = InMemoryTransport::new();
        assert!(matches!(
            t.route(Method::Get, "not a url", HttpResponse::new(200)),
            Err(TransportError::InvalidUrl { .. })
        ));
    }
}
