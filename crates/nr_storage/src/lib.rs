use async_trait::async_trait;
use nr_core::{ArticleId, Result};

pub mod backends;

pub use backends::*;

/// Image bytes cached per article identity for the life of the process.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes for an article, replacing anything already cached
    async fn put(&self, id: &ArticleId, data: Vec<u8>) -> Result<()>;

    /// Get a copy of the cached bytes
    async fn get(&self, id: &ArticleId) -> Result<Option<Vec<u8>>>;

    async fn contains(&self, id: &ArticleId) -> Result<bool>;

    /// Number of cached images
    async fn len(&self) -> Result<usize>;

    async fn clear(&self) -> Result<()>;
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::ImageStore;
}
