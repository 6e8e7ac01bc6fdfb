//! The feed's owning timeline.
//!
//! `FeedSession` holds the current page of view models and their view
//! counters. Network work runs on spawned tasks that never touch that state;
//! they post a [`FeedEvent`] back and the owner applies it with
//! [`FeedSession::apply`]. Each refresh gets a new generation number and only
//! the result of the latest generation is applied.

use std::collections::HashSet;
use std::sync::Arc;

use nr_core::{
    ArticleId, ArticleTransformer, ArticleViewModel, CounterIndexError, Error, FetchError,
    RawArticle, Result, ViewCountStore,
};
use nr_storage::ImageStore;
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc;

use crate::client::ArticleSource;
use crate::images::ImageLoader;
use crate::logging::Logger;

#[derive(Debug)]
pub enum FeedEvent {
    Fetched {
        generation: u64,
        result: std::result::Result<Vec<RawArticle>, FetchError>,
    },
    ImageLoaded {
        id: ArticleId,
        result: std::result::Result<Vec<u8>, FetchError>,
    },
}

/// What applying a [`FeedEvent`] did to the session.
#[derive(Debug)]
pub enum Applied {
    Refreshed { generation: u64, count: usize },
    Stale { generation: u64, latest: u64 },
    FetchFailed { generation: u64, error: FetchError },
    ImageAttached { id: ArticleId, index: Option<usize> },
    ImageFailed { id: ArticleId, error: FetchError },
}

pub struct FeedSession<R = StdRng> {
    source: Arc<dyn ArticleSource>,
    images: Arc<dyn ImageLoader>,
    store: Arc<dyn ImageStore>,
    transformer: ArticleTransformer<R>,
    articles: Vec<ArticleViewModel>,
    counters: ViewCountStore,
    generation: u64,
    completed: u64,
    pending_images: HashSet<ArticleId>,
    events_tx: mpsc::UnboundedSender<FeedEvent>,
    events_rx: mpsc::UnboundedReceiver<FeedEvent>,
    logger: Logger,
}

impl FeedSession<StdRng> {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        images: Arc<dyn ImageLoader>,
        store: Arc<dyn ImageStore>,
        page_size: usize,
    ) -> Self {
        Self::with_transformer(source, images, store, ArticleTransformer::new(page_size))
    }
}

impl<R: Rng> FeedSession<R> {
    pub fn with_transformer(
        source: Arc<dyn ArticleSource>,
        images: Arc<dyn ImageLoader>,
        store: Arc<dyn ImageStore>,
        transformer: ArticleTransformer<R>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            images,
            store,
            transformer,
            articles: Vec::new(),
            counters: ViewCountStore::new(),
            generation: 0,
            completed: 0,
            pending_images: HashSet::new(),
            events_tx,
            events_rx,
            logger: Logger::new().with_prefix("[feed]"),
        }
    }

    pub fn articles(&self) -> &[ArticleViewModel] {
        &self.articles
    }

    pub fn article(&self, index: usize) -> Option<&ArticleViewModel> {
        self.articles.get(index)
    }

    pub fn counters(&self) -> &ViewCountStore {
        &self.counters
    }

    pub fn view_count(&self, index: usize) -> Option<u32> {
        self.counters.get(index)
    }

    /// Generation of the most recently started refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the latest refresh has not reported back.
    pub fn is_loading(&self) -> bool {
        self.completed < self.generation
    }

    pub fn pending_images(&self) -> usize {
        self.pending_images.len()
    }

    /// Starts a background fetch and returns its generation.
    pub fn refresh(&mut self) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        self.logger
            .info(&format!("🔄 refresh #{} from {}", generation, source.name()));

        tokio::spawn(async move {
            let result = source.fetch().await;
            // A closed channel means the session is gone.
            let _ = tx.send(FeedEvent::Fetched { generation, result });
        });
        generation
    }

    /// Starts loading the image of the article at `index` unless it is
    /// already attached, cached or in flight. Returns true when a download
    /// was started.
    pub async fn request_image(&mut self, index: usize) -> Result<bool> {
        let Some(model) = self.articles.get(index) else {
            return Ok(false);
        };
        let Some(url) = model.image_url.clone() else {
            return Ok(false);
        };
        if model.image_data().is_some() || self.pending_images.contains(&model.id) {
            return Ok(false);
        }

        let id = model.id.clone();
        if let Some(bytes) = self.store.get(&id).await? {
            self.attach(&id, bytes);
            return Ok(false);
        }

        self.pending_images.insert(id.clone());
        let images = Arc::clone(&self.images);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = images.load(&url).await;
            let _ = tx.send(FeedEvent::ImageLoaded { id, result });
        });
        Ok(true)
    }

    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events_rx.recv().await
    }

    pub async fn apply(&mut self, event: FeedEvent) -> Result<Applied> {
        match event {
            FeedEvent::Fetched { generation, result } => {
                if generation != self.generation {
                    self.logger.debug(&format!(
                        "discarding stale result #{} (latest #{})",
                        generation, self.generation
                    ));
                    return Ok(Applied::Stale {
                        generation,
                        latest: self.generation,
                    });
                }
                self.completed = generation;

                match result {
                    Ok(raw) => {
                        let count = self.replace_articles(raw).await?;
                        self.logger
                            .info(&format!("✨ refresh #{} shows {} articles", generation, count));
                        Ok(Applied::Refreshed { generation, count })
                    }
                    Err(error) => {
                        self.logger.warn(&format!(
                            "⚠️ refresh #{} failed, keeping {} articles: {}",
                            generation,
                            self.articles.len(),
                            error
                        ));
                        Ok(Applied::FetchFailed { generation, error })
                    }
                }
            }
            FeedEvent::ImageLoaded { id, result } => {
                self.pending_images.remove(&id);
                match result {
                    Ok(bytes) => {
                        self.store.put(&id, bytes.clone()).await?;
                        let index = self.attach(&id, bytes);
                        Ok(Applied::ImageAttached { id, index })
                    }
                    Err(error) => {
                        self.logger
                            .warn(&format!("image for {} failed: {}", id, error));
                        Ok(Applied::ImageFailed { id, error })
                    }
                }
            }
        }
    }

    /// Refreshes and waits for that refresh to be applied. Returns the number
    /// of articles now shown.
    pub async fn fetch_now(&mut self) -> Result<usize> {
        let generation = self.refresh();
        loop {
            let event = self.next_event().await.ok_or_else(|| {
                Error::External(anyhow::anyhow!("feed event channel closed"))
            })?;
            match self.apply(event).await? {
                Applied::Refreshed { generation: g, count } if g == generation => {
                    return Ok(count)
                }
                Applied::FetchFailed { generation: g, error } if g == generation => {
                    return Err(error.into())
                }
                _ => {}
            }
        }
    }

    /// Counts a view of the article at `index` and returns it.
    pub fn select(
        &mut self,
        index: usize,
    ) -> std::result::Result<&ArticleViewModel, CounterIndexError> {
        self.counters.increment(index)?;
        let len = self.articles.len();
        self.articles
            .get(index)
            .ok_or(CounterIndexError { index, len })
    }

    async fn replace_articles(&mut self, raw: Vec<RawArticle>) -> Result<usize> {
        let mut articles = self.transformer.transform(raw);
        for model in articles.iter_mut().filter(|m| m.image_url.is_some()) {
            if let Some(bytes) = self.store.get(&model.id).await? {
                model.attach_image(bytes);
            }
        }

        self.counters.reset(articles.len());
        self.articles = articles;
        debug_assert_eq!(self.counters.len(), self.articles.len());
        Ok(self.articles.len())
    }

    /// Attaches bytes to every current article with this identity. Returns
    /// the first matching index.
    fn attach(&mut self, id: &ArticleId, bytes: Vec<u8>) -> Option<usize> {
        let mut first = None;
        for (index, model) in self.articles.iter_mut().enumerate() {
            if &model.id == id {
                model.attach_image(bytes.clone());
                first.get_or_insert(index);
            }
        }
        first
    }
}
