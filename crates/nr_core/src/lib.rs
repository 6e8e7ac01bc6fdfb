pub mod config;
pub mod counters;
pub mod date;
pub mod error;
pub mod transform;
pub mod types;

pub use config::{FeedConfig, SortBy};
pub use counters::ViewCountStore;
pub use error::{ConfigError, CounterIndexError, Error, FetchError, Result};
pub use transform::{ArticleTransformer, DEFAULT_PAGE_SIZE, NO_DESCRIPTION};
pub use types::{ArticleId, ArticleViewModel, ArticlesResponse, RawArticle, RawSource};

pub mod prelude {
    pub use super::{
        ArticleId, ArticleTransformer, ArticleViewModel, Error, FeedConfig, FetchError,
        RawArticle, Result, ViewCountStore,
    };
}
