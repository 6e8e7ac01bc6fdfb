use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

/// Body of a successful `/v2/everything` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    pub articles: Vec<RawArticle>,
}

/// Error body the provider sends along with a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// One article as received on the wire.
///
/// Every field is optional here so that one incomplete record does not fail
/// the whole response; required fields are enforced when the record is
/// mapped to an [`ArticleViewModel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawArticle {
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// Stable identity of an article across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(String);

impl ArticleId {
    /// Hashes the canonical URL when there is one, the publisher and title
    /// otherwise. The image URL, when present, is hashed in as well.
    pub fn derive(
        url: Option<&str>,
        image_url: Option<&str>,
        publisher: &str,
        title: &str,
    ) -> Self {
        let mut hasher = Sha256::new();
        match url.filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                hasher.update(b"url:");
                hasher.update(url.trim().as_bytes());
            }
            None => {
                hasher.update(b"title:");
                hasher.update(publisher.as_bytes());
                hasher.update([0u8]);
                hasher.update(title.as_bytes());
            }
        }
        if let Some(image_url) = image_url {
            hasher.update(b"\0image:");
            hasher.update(image_url.as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display-ready article shown by the list and detail screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleViewModel {
    pub id: ArticleId,
    pub title: String,
    pub publisher: String,
    pub description: String,
    pub website_url: String,
    pub date: String,
    pub image_url: Option<Url>,
    image_data: Option<Vec<u8>>,
}

impl ArticleViewModel {
    pub fn new(
        title: String,
        publisher: String,
        description: String,
        website_url: String,
        date: String,
        image_url: Option<Url>,
    ) -> Self {
        let url = (!website_url.is_empty()).then_some(website_url.as_str());
        let id = ArticleId::derive(
            url,
            image_url.as_ref().map(Url::as_str),
            &publisher,
            &title,
        );
        Self {
            id,
            title,
            publisher,
            description,
            website_url,
            date,
            image_url,
            image_data: None,
        }
    }

    pub fn image_data(&self) -> Option<&[u8]> {
        self.image_data.as_deref()
    }

    /// Fills the image buffer the first time an image arrives. Returns false
    /// when the buffer was already set; the existing bytes are kept.
    pub fn attach_image(&mut self, data: Vec<u8>) -> bool {
        if self.image_data.is_some() {
            return false;
        }
        self.image_data = Some(data);
        true
    }

    pub fn needs_image(&self) -> bool {
        self.image_url.is_some() && self.image_data.is_none()
    }
}
