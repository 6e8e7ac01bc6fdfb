use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use crate::error::ConfigError;
use crate::transform::DEFAULT_PAGE_SIZE;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_QUERY: &str = "apple";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortBy {
    Relevancy,
    #[default]
    Popularity,
    PublishedAt,
}

impl SortBy {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// Everything needed to build the single article query.
#[derive(Clone)]
pub struct FeedConfig {
    pub endpoint: String,
    pub query: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort_by: SortBy,
    pub language: Option<String>,
    pub api_key: Option<String>,
    pub page_size: usize,
    pub timeout: Duration,
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("sort_by", &self.sort_by)
            .field("language", &self.language)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        let day = NaiveDate::from_ymd_opt(2023, 2, 3);
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: DEFAULT_QUERY.to_string(),
            from: day,
            to: day,
            sort_by: SortBy::default(),
            language: None,
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.query.trim().is_empty() {
            return Err(ConfigError::EmptyQuery);
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ConfigError::InvertedDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", self.endpoint, e)))?;
        Ok(())
    }

    /// Full request URL, query string included.
    pub fn request_url(&self) -> Result<Url, ConfigError> {
        self.validate()?;
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", self.endpoint, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", self.query.trim());
            if let Some(from) = self.from {
                pairs.append_pair("from", &from.format("%Y-%m-%d").to_string());
            }
            if let Some(to) = self.to {
                pairs.append_pair("to", &to.format("%Y-%m-%d").to_string());
            }
            pairs.append_pair("sortBy", self.sort_by.as_query_value());
            if let Some(language) = &self.language {
                pairs.append_pair("language", language);
            }
            if let Some(api_key) = &self.api_key {
                pairs.append_pair("apiKey", api_key);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_url() {
        let url = FeedConfig::default()
            .with_api_key(Some("secret".to_string()))
            .request_url()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?q=apple&from=2023-02-03&to=2023-02-03&sortBy=popularity&apiKey=secret"
        );
    }

    #[test]
    fn test_query_is_encoded() {
        let url = FeedConfig::default()
            .with_query("rust & go")
            .with_date_range(None, None)
            .request_url()
            .unwrap();
        assert_eq!(url.query(), Some("q=rust+%26+go&sortBy=popularity"));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            FeedConfig::default().with_page_size(0).validate(),
            Err(ConfigError::ZeroPageSize)
        );
        assert_eq!(
            FeedConfig::default().with_query("  ").validate(),
            Err(ConfigError::EmptyQuery)
        );
        let inverted = FeedConfig::default().with_date_range(
            NaiveDate::from_ymd_opt(2023, 2, 4),
            NaiveDate::from_ymd_opt(2023, 2, 3),
        );
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvertedDateRange { .. })
        ));
        assert!(matches!(
            FeedConfig::default().with_endpoint("not a url").validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FeedConfig::default().with_api_key(Some("secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
