pub mod cli;
pub mod client;
pub mod images;
pub mod logging;
pub mod session;

pub use cli::{handle_command, FeedArgs, FeedCommands};
pub use client::{ArticleSource, NewsApiClient};
pub use images::{HttpImageLoader, ImageLoader};
pub use logging::{init_logging, LogTarget, Logger};
pub use session::{Applied, FeedEvent, FeedSession};

pub mod prelude {
    pub use super::client::ArticleSource;
    pub use super::images::ImageLoader;
    pub use super::session::{Applied, FeedEvent, FeedSession};
    pub use nr_core::{ArticleViewModel, Error, FetchError, Result};
}
