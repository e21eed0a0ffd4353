use std::fmt;
use std::sync::Arc;

use nbb_transport::Transport;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};

/// Connection context shared by a forum and every entity fetched from it.
///
/// Users and topics hold an `Arc<Site>` rather than a reference to the
/// [`Forum`](crate::Forum) entity, so they stay usable after the forum
/// itself is dropped and never keep its attributes alive.
pub struct Site {
    base_url: Url,
    endpoint: Url,
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl Site {
    pub fn new(base_url: Url, transport: Arc<dyn Transport>, config: ClientConfig) -> SdkResult<Self> {
        let endpoint = join(&base_url, "api/")?;
        Ok(Self {
            base_url,
            endpoint,
            transport,
            config,
        })
    }

    /// The forum root as given by the caller.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API root, `<base>/api/`.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a path relative to the API root.
    pub fn api_url(&self, path: &str) -> SdkResult<Url> {
        join(&self.endpoint, path)
    }

    /// `<base>/api/user/<username>`, with the username encoded as a single
    /// path segment.
    pub fn user_url(&self, username: &str) -> SdkResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| SdkError::InvalidUrl {
                url: self.endpoint.to_string(),
                reason: "cannot be a base".to_string(),
            })?;
            segments.pop_if_empty().push("user").push(username);
        }
        Ok(url)
    }

    /// Resolve a possibly relative reference (such as a user's `picture`)
    /// against the API root. Absolute URLs are returned as-is.
    pub fn resolve_url(&self, reference: &str) -> SdkResult<Url> {
        join(&self.endpoint, reference)
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("base_url", &self.base_url.as_str())
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .finish()
    }
}

/// Parse a caller-supplied URL.
pub(crate) fn parse_url(url: &str) -> SdkResult<Url> {
    Url::parse(url).map_err(|e| SdkError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, reference: &str) -> SdkResult<Url> {
    base.join(reference).map_err(|e| SdkError::InvalidUrl {
        url: format!("{base} + {reference}"),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbb_transport::InMemoryTransport;

    fn site(base: &str) -> Site {
        Site::new(
            parse_url(base).unwrap(),
            Arc::new(InMemoryTransport::new()),
            ClientConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_is_api_root() {
        let s = site("https://forum.example.com/");
        assert_eq!(s.endpoint().as_str(), "https://forum.example.com/api/");
        assert_eq!(s.api_url("config").unwrap().as_str(), "https://forum.example.com/api/config");
    }

    #[test]
    fn host_without_trailing_slash() {
        let s = site("https://forum.example.com");
        assert_eq!(s.endpoint().as_str(), "https://forum.example.com/api/");
    }

    #[test]
    fn subdirectory_install() {
        let s = site("https://example.com/community/");
        assert_eq!(s.endpoint().as_str(), "https://example.com/community/api/");
    }

    #[test]
    fn user_url_encodes_segment() {
        let s = site("https://forum.example.com/");
        assert_eq!(
            s.user_url("Webmaster4o").unwrap().as_str(),
            "https://forum.example.com/api/user/Webmaster4o"
        );
        assert_eq!(
            s.user_url("John Doe/2").unwrap().as_str(),
            "https://forum.example.com/api/user/John%20Doe%2F2"
        );
    }

    #[test]
    fn resolve_relative_and_absolute_references() {
        let s = site("https://forum.example.com/");
        assert_eq!(
            s.resolve_url("/assets/uploads/profile/1-profileavatar.png").unwrap().as_str(),
            "https://forum.example.com/assets/uploads/profile/1-profileavatar.png"
        );
        assert_eq!(
            s.resolve_url("https://cdn.example.net/a.png").unwrap().as_str(),
            "https://cdn.example.net/a.png"
        );
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(parse_url("forum.example.com"), Err(SdkError::InvalidUrl { .. })));
    }
}
