//! Turns raw provider records into the page of view models shown to the user.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;
use url::Url;

use crate::date::format_published_at;
use crate::types::{ArticleViewModel, RawArticle};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const NO_DESCRIPTION: &str = "No description has been provided";

/// Why a single record could not become a view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMappingFailure {
    MissingTitle,
    MissingPublisher,
}

impl fmt::Display for RecordMappingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordMappingFailure::MissingTitle => f.write_str("record has no title"),
            RecordMappingFailure::MissingPublisher => f.write_str("record has no source name"),
        }
    }
}

/// Shuffles, truncates and maps raw records.
///
/// The random source is injected so that tests can use a seeded generator;
/// [`ArticleTransformer::new`] seeds from the OS.
pub struct ArticleTransformer<R = StdRng> {
    rng: R,
    page_size: usize,
}

impl ArticleTransformer<StdRng> {
    pub fn new(page_size: usize) -> Self {
        Self::with_rng(page_size, StdRng::from_entropy())
    }
}

impl<R: Rng> ArticleTransformer<R> {
    pub fn with_rng(page_size: usize, rng: R) -> Self {
        Self { rng, page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn transform(&mut self, raw: Vec<RawArticle>) -> Vec<ArticleViewModel> {
        transform(raw, self.page_size, &mut self.rng)
    }
}

/// Shuffle the whole list, keep the first `page_size` records and map each of
/// them. Records that fail to map are dropped.
pub fn transform<R: Rng + ?Sized>(
    mut raw: Vec<RawArticle>,
    page_size: usize,
    rng: &mut R,
) -> Vec<ArticleViewModel> {
    raw.shuffle(rng);
    raw.truncate(page_size);

    let received = raw.len();
    let models: Vec<ArticleViewModel> = raw
        .into_iter()
        .filter_map(|record| match map_article(record) {
            Ok(model) => Some(model),
            Err(reason) => {
                debug!("dropping article record: {}", reason);
                None
            }
        })
        .collect();

    if models.len() < received {
        debug!("mapped {} of {} article records", models.len(), received);
    }
    models
}

pub fn map_article(raw: RawArticle) -> Result<ArticleViewModel, RecordMappingFailure> {
    let publisher = non_blank(raw.source.and_then(|s| s.name))
        .ok_or(RecordMappingFailure::MissingPublisher)?;
    let title = non_blank(raw.title).ok_or(RecordMappingFailure::MissingTitle)?;

    let description = raw
        .description
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let website_url = raw.url.unwrap_or_default();
    let date = format_published_at(raw.published_at.as_deref());
    let image_url = raw
        .url_to_image
        .as_deref()
        .and_then(|u| Url::parse(u.trim()).ok());

    Ok(ArticleViewModel::new(
        title,
        publisher,
        description,
        website_url,
        date,
        image_url,
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::UNKNOWN_DATE;
    use crate::types::RawSource;

    fn record(i: usize) -> RawArticle {
        RawArticle {
            source: Some(RawSource {
                id: None,
                name: Some(format!("Publisher {i}")),
            }),
            title: Some(format!("Title {i}")),
            description: Some(format!("Description {i}")),
            url: Some(format!("https://news.example/{i}")),
            url_to_image: Some(format!("https://img.example/{i}.jpg")),
            published_at: Some("2023-02-03T08:00:00Z".to_string()),
        }
    }

    fn records(n: usize) -> Vec<RawArticle> {
        (0..n).map(record).collect()
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn sorted_titles(models: &[ArticleViewModel]) -> Vec<String> {
        let mut titles: Vec<String> = models.iter().map(|m| m.title.clone()).collect();
        titles.sort();
        titles
    }

    #[test]
    fn test_short_list_keeps_every_record() {
        for n in 1..=DEFAULT_PAGE_SIZE {
            let out = transform(records(n), DEFAULT_PAGE_SIZE, &mut seeded(n as u64));
            assert_eq!(out.len(), n);
        }
    }

    #[test]
    fn test_long_list_truncated_to_page_size() {
        for n in [21, 25, 100] {
            let out = transform(records(n), DEFAULT_PAGE_SIZE, &mut seeded(7));
            assert_eq!(out.len(), DEFAULT_PAGE_SIZE);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(transform(Vec::new(), DEFAULT_PAGE_SIZE, &mut seeded(1)).is_empty());
    }

    #[test]
    fn test_well_formed_page_has_no_placeholders() {
        let mut transformer = ArticleTransformer::with_rng(DEFAULT_PAGE_SIZE, seeded(3));
        let out = transformer.transform(records(25));
        assert_eq!(out.len(), 20);
        for model in &out {
            assert_ne!(model.description, NO_DESCRIPTION);
            assert_ne!(model.date, UNKNOWN_DATE);
            assert!(!model.website_url.is_empty());
            assert!(model.image_url.is_some());
            assert!(model.image_data().is_none());
        }
    }

    #[test]
    fn test_missing_description_uses_placeholder() {
        let mut raw = record(1);
        raw.description = None;
        let model = map_article(raw).unwrap();
        assert_eq!(model.description, "No description has been provided");
    }

    #[test]
    fn test_bad_or_missing_date_uses_placeholder() {
        let mut bad = record(1);
        bad.published_at = Some("yesterday".to_string());
        assert_eq!(map_article(bad).unwrap().date, "Date is unknown");

        let mut missing = record(2);
        missing.published_at = None;
        assert_eq!(map_article(missing).unwrap().date, "Date is unknown");
    }

    #[test]
    fn test_sparse_record_scenario() {
        let raw: RawArticle = serde_json::from_str(
            r#"{"source":{"name":"BBC"},"title":"X","description":null,"url":null,"urlToImage":null,"publishedAt":"not-a-date"}"#,
        )
        .unwrap();
        let model = map_article(raw).unwrap();
        assert_eq!(model.title, "X");
        assert_eq!(model.publisher, "BBC");
        assert_eq!(model.description, "No description has been provided");
        assert_eq!(model.website_url, "");
        assert_eq!(model.date, "Date is unknown");
        assert_eq!(model.image_url, None);
    }

    #[test]
    fn test_unparseable_image_url_is_absent() {
        let mut raw = record(1);
        raw.url_to_image = Some("not a url".to_string());
        assert_eq!(map_article(raw).unwrap().image_url, None);
    }

    #[test]
    fn test_records_without_title_or_publisher_are_dropped() {
        let mut no_title = record(1);
        no_title.title = None;
        let mut blank_publisher = record(2);
        blank_publisher.source = Some(RawSource {
            id: None,
            name: Some("  ".to_string()),
        });
        assert_eq!(map_article(no_title.clone()), Err(RecordMappingFailure::MissingTitle));
        assert_eq!(
            map_article(blank_publisher.clone()),
            Err(RecordMappingFailure::MissingPublisher)
        );

        let input = vec![record(0), no_title, blank_publisher, record(3)];
        let out = transform(input, DEFAULT_PAGE_SIZE, &mut seeded(11));
        assert_eq!(sorted_titles(&out), vec!["Title 0", "Title 3"]);
    }

    #[test]
    fn test_malformed_records_shrink_the_truncated_page() {
        // Ten of 25 records have no title; any 20 kept records include at
        // least five of them.
        let input: Vec<RawArticle> = (0..25)
            .map(|i| {
                let mut raw = record(i);
                if i % 5 < 2 {
                    raw.title = None;
                }
                raw
            })
            .collect();

        for seed in [1, 8, 21] {
            let out = transform(input.clone(), DEFAULT_PAGE_SIZE, &mut seeded(seed));
            assert!(out.len() < DEFAULT_PAGE_SIZE);
            assert!(out.len() >= 10 && out.len() <= 15);
        }
    }

    #[test]
    fn test_same_content_across_runs() {
        let a = transform(records(12), DEFAULT_PAGE_SIZE, &mut seeded(1));
        let b = transform(records(12), DEFAULT_PAGE_SIZE, &mut seeded(2));
        assert_eq!(a.len(), b.len());

        let mut a = a;
        let mut b = b;
        a.sort_by(|x, y| x.title.cmp(&y.title));
        b.sort_by(|x, y| x.title.cmp(&y.title));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = transform(records(30), DEFAULT_PAGE_SIZE, &mut seeded(42));
        let b = transform(records(30), DEFAULT_PAGE_SIZE, &mut seeded(42));
        let titles = |v: &[ArticleViewModel]| v.iter().map(|m| m.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&a), titles(&b));
    }
}
