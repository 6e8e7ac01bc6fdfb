mod app;
mod browser;
#[cfg(test)]
mod test_support;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use nr_core::config::{DEFAULT_ENDPOINT, DEFAULT_QUERY};
use nr_core::{FeedConfig, SortBy, DEFAULT_PAGE_SIZE};
use nr_fetch::{
    handle_command, init_logging, FeedArgs, FeedCommands, FeedSession, HttpImageLoader,
    LogTarget, NewsApiClient,
};
use nr_storage::MemoryImageStore;
use tracing::Level;

use crate::browser::SystemBrowser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read the news in your terminal", long_about = None)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Search term
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,
    /// Oldest publication date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-02-03")]
    from: NaiveDate,
    /// Newest publication date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-02-03")]
    to: NaiveDate,
    /// Do not restrict the query to a date range
    #[arg(long, conflicts_with_all = ["from", "to"])]
    any_date: bool,
    #[arg(long, value_enum, default_value_t = SortBy::Popularity)]
    sort_by: SortBy,
    /// Two-letter language code, e.g. en
    #[arg(long)]
    language: Option<String>,
    /// Articles shown per refresh
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Write logs to this file (the interactive screen discards them otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Commands {
    /// Browse the list and detail screens (default)
    Browse,
    /// Print one page of articles
    List,
    /// Print the article at INDEX of a fresh page
    Show { index: usize },
}

impl Cli {
    fn feed_config(&self) -> FeedConfig {
        let (from, to) = if self.any_date {
            (None, None)
        } else {
            (Some(self.from), Some(self.to))
        };
        FeedConfig {
            endpoint: self.endpoint.clone(),
            query: self.query.clone(),
            from,
            to,
            sort_by: self.sort_by,
            language: self.language.clone(),
            api_key: self.api_key.clone(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Browse);

    let target = match (&cli.log_file, &command) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, Commands::Browse) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    };
    let logger = init_logging(cli.log_level, target)?;

    let config = cli.feed_config();
    config.validate()?;
    if config.api_key.is_none() {
        logger.warn("⚠️ no API key given, set NEWS_API_KEY or pass --api-key");
    }
    logger.info(&format!("🗞️ {:?}", config));

    let mut session = FeedSession::new(
        Arc::new(NewsApiClient::new(&config)?),
        Arc::new(HttpImageLoader::new(config.timeout)?),
        Arc::new(MemoryImageStore::new()),
        config.page_size,
    );

    match command {
        Commands::Browse => app::run(&mut session, &SystemBrowser).await?,
        Commands::List => {
            let args = FeedArgs {
                command: FeedCommands::List,
            };
            handle_command(args, &mut session, &mut std::io::stdout()).await?;
        }
        Commands::Show { index } => {
            let args = FeedArgs {
                command: FeedCommands::Show { index },
            };
            handle_command(args, &mut session, &mut std::io::stdout()).await?;
        }
    }

    Ok(())
}
