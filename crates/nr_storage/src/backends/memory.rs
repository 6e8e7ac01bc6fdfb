use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use nr_core::{ArticleId, Error, Result};
use tokio::sync::RwLock;
use tracing::debug;

use crate::ImageStore;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of images kept; the oldest entry is evicted first.
    pub capacity: usize,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryStore {
    images: HashMap<ArticleId, Vec<u8>>,
    order: VecDeque<ArticleId>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            images: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn put(&mut self, id: &ArticleId, data: Vec<u8>) {
        if self.images.insert(id.clone(), data).is_none() {
            self.order.push_back(id.clone());
        }
        while self.images.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.images.remove(&oldest);
                    debug!("evicted cached image {}", oldest);
                }
                None => break,
            }
        }
    }

    pub fn get(&self, id: &ArticleId) -> Option<Vec<u8>> {
        self.images.get(id).cloned()
    }

    pub fn contains(&self, id: &ArticleId) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.order.clear();
    }
}

#[derive(Clone)]
pub struct MemoryImageStore {
    store: Arc<RwLock<MemoryStore>>,
    config: MemoryConfig,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::from_parts(MemoryConfig::new())
    }

    pub fn with_config(config: MemoryConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(Error::Storage(
                "image store capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: MemoryConfig) -> Self {
        let store = Arc::new(RwLock::new(MemoryStore::new(config.capacity)));
        Self { store, config }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, id: &ArticleId, data: Vec<u8>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(id, data);
        Ok(())
    }

    async fn get(&self, id: &ArticleId) -> Result<Option<Vec<u8>>> {
        let store = self.store.read().await;
        Ok(store.get(id))
    }

    async fn contains(&self, id: &ArticleId) -> Result<bool> {
        let store = self.store.read().await;
        Ok(store.contains(id))
    }

    async fn len(&self) -> Result<usize> {
        let store = self.store.read().await;
        Ok(store.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }
}
