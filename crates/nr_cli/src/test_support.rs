use std::cell::RefCell;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use nr_core::{ArticleTransformer, FetchError, RawArticle, RawSource};
use nr_fetch::{ArticleSource, FeedSession, ImageLoader};
use nr_storage::MemoryImageStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use url::Url;

use crate::browser::Browser;

pub struct StaticSource(pub usize);

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError> {
        Ok((0..self.0)
            .map(|i| RawArticle {
                source: Some(RawSource {
                    id: None,
                    name: Some("Desk".to_string()),
                }),
                title: Some(format!("Item {i}")),
                description: None,
                url: Some(format!("https://desk.example/{i}")),
                url_to_image: None,
                published_at: Some("2023-02-03T10:00:00Z".to_string()),
            })
            .collect())
    }
}

pub struct NoImages;

#[async_trait]
impl ImageLoader for NoImages {
    async fn load(&self, _url: &Url) -> Result<Vec<u8>, FetchError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    pub opened: RefCell<Vec<String>>,
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &Url) -> io::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

pub async fn loaded_session(n: usize) -> FeedSession<StdRng> {
    let mut session = FeedSession::with_transformer(
        Arc::new(StaticSource(n)),
        Arc::new(NoImages),
        Arc::new(MemoryImageStore::new()),
        ArticleTransformer::with_rng(20, StdRng::seed_from_u64(9)),
    );
    session
        .fetch_now()
        .await
        .expect("static source always succeeds");
    session
}
