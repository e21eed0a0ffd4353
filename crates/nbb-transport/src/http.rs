use std::thread;

use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::response::{Headers, HttpResponse};
use crate::traits::{Method, Transport};

/// Blocking HTTP transport backed by `reqwest`.
///
/// Every request carries the configured deadline. Timeouts, connection
/// failures, HTTP 429 and 5xx responses are retried according to the
/// configured [`RetryPolicy`](crate::RetryPolicy); everything else is
/// returned on the first attempt.
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Build a transport with its own `reqwest` client.
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Use a preconfigured client. Client-level deadlines take precedence;
    /// only the retry policy is read from `config`.
    pub fn with_client(client: Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn execute(&self, method: Method, url: &Url) -> TransportResult<HttpResponse> {
        let policy = &self.config.retry;
        let mut attempt = 1;
        loop {
            let outcome = self.send_once(method, url);
            let transient = match &outcome {
                Ok(response) => response.is_transient_failure(),
                Err(e) => e.is_transient(),
            };
            if !transient || !policy.allows_retry(attempt) {
                return outcome;
            }

            let delay = policy.backoff(attempt);
            let delay_ms = delay.as_millis() as u64;
            match &outcome {
                Ok(response) => warn!(
                    %method, %url, attempt, status = response.status, delay_ms,
                    "transient HTTP status; retrying"
                ),
                Err(e) => warn!(
                    %method, %url, attempt, error = %e, delay_ms,
                    "transient transport failure; retrying"
                ),
            }
            thread::sleep(delay);
            attempt += 1;
        }
    }

    fn send_once(&self, method: Method, url: &Url) -> TransportResult<HttpResponse> {
        let request = match method {
            Method::Head => self.client.head(url.clone()),
            Method::Get => self.client.get(url.clone()),
        };
        let response = request.send().map_err(|e| classify(url, e))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().map_err(|e| classify(url, e))?.to_vec();

        debug!(%method, %url, status, bytes = body.len(), "HTTP response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn head(&self, url: &Url) -> TransportResult<HttpResponse> {
        self.execute(Method::Head, url)
    }

    fn get(&self, url: &Url) -> TransportResult<HttpResponse> {
        self.execute(Method::Get, url)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish()
    }
}

fn classify(url: &Url, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: error.to_string(),
            connect: error.is_connect(),
        }
    }
}
