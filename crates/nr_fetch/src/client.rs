use async_trait::async_trait;
use nr_core::types::{ApiErrorBody, ArticlesResponse};
use nr_core::{FeedConfig, FetchError, RawArticle};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

pub const USER_AGENT: &str = concat!("nr/", env!("CARGO_PKG_VERSION"));

/// Something that can produce one page of raw article records.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Returns the name of the source, for logs
    fn name(&self) -> &str;

    /// Issues exactly one request and decodes the article list
    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError>;
}

/// Client for a NewsAPI `/v2/everything` style endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    url: Url,
}

impl NewsApiClient {
    pub fn new(config: &FeedConfig) -> nr_core::Result<Self> {
        let url = config.request_url()?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { http, url })
    }

    pub fn with_http_client(http: reqwest::Client, config: &FeedConfig) -> nr_core::Result<Self> {
        Ok(Self {
            http,
            url: config.request_url()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    fn name(&self) -> &str {
        self.url.host_str().unwrap_or("news api")
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError> {
        debug!("GET {}", redacted(&self.url));
        let response = self.http.get(self.url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let decoded: ArticlesResponse = serde_json::from_slice(&body)?;
        info!(
            "📰 {} returned {} articles (total results: {})",
            self.name(),
            decoded.articles.len(),
            decoded
                .total_results
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(decoded.articles)
    }
}

/// Builds a status error, preferring the provider's own message.
pub(crate) fn status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .map(|e| match e.code {
            Some(code) => format!("{} ({})", e.message, code),
            None => e.message,
        })
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

/// The URL with the API key masked, safe to log.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k.eq_ignore_ascii_case("apikey") {
                "<redacted>".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return masked.to_string();
    }
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
