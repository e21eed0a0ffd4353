use std::sync::Arc;

use nbb_entity::{Entity, Value};
use nbb_types::{attribute_map, AttributeMap};
use tracing::debug;
use url::Url;

use crate::avatar::{Avatar, AvatarImage};
use crate::error::{SdkError, SdkResult};
use crate::site::Site;

/// A forum member, built from `GET <base>/api/user/<username>`.
#[derive(Debug)]
pub struct User {
    site: Arc<Site>,
    username: String,
    attributes: AttributeMap,
}

impl User {
    /// Fetch the user document. Every call performs a request; nothing is
    /// cached.
    pub fn fetch(site: Arc<Site>, username: &str) -> SdkResult<Self> {
        let url = site.user_url(username)?;
        let document = site.transport().get_json(&url)?;
        let attributes = attribute_map(document)
            .ok_or_else(|| SdkError::malformed("user document", "expected a JSON object"))?;

        debug!(username, keys = attributes.len(), "user fetched");
        Ok(Self {
            site,
            username: username.to_string(),
            attributes,
        })
    }

    /// The name this user was requested by.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    /// Absolute URL of the profile picture.
    ///
    /// `None` when the user has no picture (`null` or empty string).
    pub fn picture_url(&self) -> SdkResult<Option<Url>> {
        match self.get_raw("picture")? {
            Value::Null => Ok(None),
            Value::String(path) if path.is_empty() => Ok(None),
            Value::String(path) => self.site.resolve_url(path).map(Some),
            _ => Err(SdkError::malformed("user document", "picture is not a string")),
        }
    }

    /// The profile picture, downloaded when the client is configured to
    /// fetch images and otherwise as a bare URL.
    pub fn image(&self) -> SdkResult<Option<Avatar>> {
        let Some(url) = self.picture_url()? else {
            return Ok(None);
        };
        if !self.site.config().fetch_images {
            return Ok(Some(Avatar::Url(url)));
        }

        let response = self.site.transport().get_bytes(&url)?;
        let content_type = response.content_type().map(str::to_string);
        debug!(username = %self.username, %url, bytes = response.body.len(), "avatar fetched");
        Ok(Some(Avatar::Image(AvatarImage {
            url,
            content_type,
            bytes: response.body,
        })))
    }
}

impl Entity for User {
    fn display_name(&self) -> &str {
        &self.username
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}
