use url::Url;

/// A user's profile picture.
///
/// Which variant comes back depends on
/// [`ClientConfig::fetch_images`](crate::ClientConfig::fetch_images);
/// callers must handle both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Avatar {
    /// The image was downloaded. Decoding the bytes is up to the caller.
    Image(AvatarImage),

    /// Only the absolute URL was resolved.
    Url(Url),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarImage {
    pub url: Url,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Avatar {
    pub fn url(&self) -> &Url {
        match self {
            Avatar::Image(image) => &image.url,
            Avatar::Url(url) => url,
        }
    }

    /// Downloaded bytes, if the image was fetched.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Avatar::Image(image) => Some(&image.bytes),
            Avatar::Url(_) => None,
        }
    }
}
