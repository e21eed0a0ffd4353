use nbb_transport::TransportConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Client-wide settings shared by every entity fetched from one forum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Download avatar bytes in [`User::image`](crate::User::image). When
    /// `false` the image accessor only resolves the URL.
    pub fetch_images: bool,
    /// HTTP deadlines, user agent and retry policy.
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fetch_images: true,
            transport: TransportConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        toml::from_str(source).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}
