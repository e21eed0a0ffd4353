use std::sync::{Arc, OnceLock};

use nbb_entity::{merge_documents, AliasTable, Entity, Value};
use nbb_transport::{HttpTransport, Transport};
use nbb_types::{attribute_map, AttributeMap};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::site::{parse_url, Site};
use crate::topic::Topic;
use crate::user::User;

/// Response header that identifies the server software.
pub const POWERED_BY_HEADER: &str = "X-Powered-By";

/// Expected value of [`POWERED_BY_HEADER`].
pub const NODEBB: &str = "NodeBB";

/// A NodeBB forum.
///
/// The attribute space is the front page (`GET <base>/api/`) merged with
/// the site configuration (`GET <base>/api/config`); configuration values
/// win when both documents carry the same key.
#[derive(Debug)]
pub struct Forum {
    site: Arc<Site>,
    display_name: String,
    attributes: AttributeMap,
    front_page: AttributeMap,
    config: AttributeMap,
    topics: OnceLock<Vec<Topic>>,
}

impl Forum {
    /// Connect over HTTP with the default configuration.
    pub fn connect(base_url: &str) -> SdkResult<Self> {
        Self::connect_with_config(base_url, ClientConfig::default())
    }

    /// Connect over HTTP with the given configuration.
    pub fn connect_with_config(base_url: &str, config: ClientConfig) -> SdkResult<Self> {
        let transport = HttpTransport::new(config.transport.clone())?;
        Self::connect_with(base_url, Arc::new(transport), config)
    }

    /// Connect through an arbitrary transport.
    ///
    /// Fails with [`SdkError::NotANodeBBForum`] before any API request when
    /// the root does not answer with `X-Powered-By: NodeBB`.
    pub fn connect_with(
        base_url: &str,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> SdkResult<Self> {
        let site = Arc::new(Site::new(parse_url(base_url)?, transport, config)?);
        identify(&site)?;

        let front_page = fetch_document(&site, site.endpoint(), "front page")?;
        let config = fetch_document(&site, &site.api_url("config")?, "site configuration")?;
        let display_name = match config.get("siteTitle") {
            Some(Value::String(title)) => title.clone(),
            _ => {
                return Err(SdkError::malformed(
                    "site configuration",
                    "missing string field siteTitle",
                ))
            }
        };
        let attributes = merge_documents([front_page.clone(), config.clone()]);

        info!(url = %site.base_url(), title = %display_name, keys = attributes.len(), "connected to forum");
        Ok(Self {
            site,
            display_name,
            attributes,
            front_page,
            config,
            topics: OnceLock::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        self.site.base_url()
    }

    /// The API root, `<base>/api/`.
    pub fn endpoint(&self) -> &Url {
        self.site.endpoint()
    }

    /// The site title.
    pub fn title(&self) -> &str {
        &self.display_name
    }

    /// The site configuration document as fetched.
    pub fn config(&self) -> &AttributeMap {
        &self.config
    }

    /// The front-page document as fetched.
    pub fn front_page(&self) -> &AttributeMap {
        &self.front_page
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    /// Fetch a user by name. Each call performs a fresh request.
    pub fn user(&self, username: &str) -> SdkResult<User> {
        User::fetch(Arc::clone(&self.site), username)
    }

    /// Topics embedded in the front page.
    ///
    /// Built on first access and kept for the lifetime of this forum.
    /// Building a topic performs no request.
    pub fn topics(&self) -> SdkResult<&[Topic]> {
        if let Some(topics) = self.topics.get() {
            return Ok(topics);
        }
        let topics = self.build_topics()?;
        Ok(self.topics.get_or_init(|| topics))
    }

    fn build_topics(&self) -> SdkResult<Vec<Topic>> {
        let records = match self.front_page.get("topics") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(_) => return Err(SdkError::malformed("front page", "topics is not an array")),
        };
        let topics = records
            .iter()
            .map(|record| Topic::from_record(record.clone(), Arc::clone(&self.site)))
            .collect::<SdkResult<Vec<_>>>()?;
        debug!(count = topics.len(), "topics built");
        Ok(topics)
    }
}

impl Entity for Forum {
    const ALIASES: AliasTable = AliasTable::new(&[("title", "siteTitle")]);

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

fn identify(site: &Site) -> SdkResult<()> {
    let response = site.transport().head(site.base_url())?;
    match response.headers.get(POWERED_BY_HEADER) {
        Some(NODEBB) => Ok(()),
        other => Err(SdkError::NotANodeBBForum {
            url: site.base_url().to_string(),
            powered_by: other.map(str::to_string),
        }),
    }
}

fn fetch_document(site: &Site, url: &Url, document: &str) -> SdkResult<AttributeMap> {
    let body = site.transport().get_json(url)?;
    attribute_map(body).ok_or_else(|| SdkError::malformed(document, "expected a JSON object"))
}
