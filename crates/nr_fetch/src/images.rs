use std::time::Duration;

use async_trait::async_trait;
use nr_core::FetchError;
use tracing::debug;
use url::Url;

use crate::client::{status_error, USER_AGENT};

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Downloads the raw bytes of one image
    async fn load(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    http: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new(timeout: Duration) -> nr_core::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { http })
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        debug!("🖼️ loaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
