use std::io::Write;

use clap::{Args, Subcommand};
use nr_core::{ArticleViewModel, Result};
use rand::Rng;

use crate::session::FeedSession;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// Fetch one page of articles and print it
    List,
    /// Fetch one page and print the article at INDEX (0-based)
    Show {
        index: usize,
    },
}

/// Runs a one-shot command against a fresh fetch, writing to `out`.
pub async fn handle_command<R: Rng, W: Write>(
    args: FeedArgs,
    session: &mut FeedSession<R>,
    out: &mut W,
) -> Result<()> {
    let count = session.fetch_now().await?;
    match args.command {
        FeedCommands::List => {
            writeln!(out, "Found {} articles", count)?;
            for (index, article) in session.articles().iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}  {}  ({}, {})",
                    index, article.title, article.publisher, article.date
                )?;
            }
        }
        FeedCommands::Show { index } => {
            let article = session.select(index)?.clone();
            let views = session.view_count(index).unwrap_or_default();
            write_detail(out, &article, views)?;
        }
    }
    Ok(())
}

pub fn write_detail<W: Write>(out: &mut W, article: &ArticleViewModel, views: u32) -> Result<()> {
    writeln!(out, "{}", article.title)?;
    writeln!(out)?;
    writeln!(out, "{}", article.description)?;
    writeln!(out)?;
    writeln!(out, "Published by {}", article.publisher)?;
    writeln!(out, "{}", article.date)?;
    if !article.website_url.is_empty() {
        writeln!(out, "{}", article.website_url)?;
    }
    writeln!(out, "View count: {}", views)?;
    Ok(())
}
