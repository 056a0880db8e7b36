//! Turns a search term into ballot records.
//!
//! In preloaded mode every row is already in memory and resolution is a
//! filter. In lazy mode only the zip lookup table is resident: a structured
//! query fetches its zip's file directly, a free-text query fans out one
//! fetch per matching zip. A failed fetch costs that zip its rows and nothing
//! else.

use crate::config::{self, Config, Mode};
use crate::error::LookupError;
use crate::index::LocationIndex;
use crate::models::{BallotRecord, ParsedQuery};
use crate::parser::parse_term;
use crate::source::{self, DataSource};
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything loaded up front.
#[derive(Debug, Default)]
pub struct Catalog {
    pub index: LocationIndex,
    /// Only present in preloaded mode.
    pub dataset: Option<Vec<BallotRecord>>,
    pub labels: Vec<String>,
}

impl Catalog {
    pub async fn load(source: &dyn DataSource, config: &Config) -> Result<Self, LookupError> {
        let index = LocationIndex::load(source, &config.index_path).await?;
        info!("Loaded {} zip codes from {}", index.len(), config.index_path);

        let dataset = match config.mode {
            Mode::Preloaded => {
                let rows = load_records(source, &config.dataset_path).await?;
                info!("Loaded {} ballot rows from {}", rows.len(), config.dataset_path);
                Some(rows)
            }
            Mode::Lazy => None,
        };

        let labels = index.labels();
        Ok(Self {
            index,
            dataset,
            labels,
        })
    }
}

/// Records for one search plus what the renderer needs to lay them out.
#[derive(Debug, Default)]
pub struct Resolution {
    pub parsed: Option<ParsedQuery>,
    pub records: Vec<BallotRecord>,
    /// zip -> address of its visualization page, only for zips that have one.
    pub visualizations: HashMap<String, String>,
}

pub struct Resolver {
    source: Arc<dyn DataSource>,
    mode: Mode,
    zip_path: String,
    map_path: String,
}

impl Resolver {
    pub fn new(source: Arc<dyn DataSource>, config: &Config) -> Self {
        Self {
            source,
            mode: config.mode,
            zip_path: config.zip_path.clone(),
            map_path: config.map_path.clone(),
        }
    }

    pub async fn resolve(&self, catalog: &Catalog, raw: &str) -> Resolution {
        let term = raw.trim();
        let parsed = parse_term(term);

        let records = match self.mode {
            Mode::Preloaded => {
                let rows = catalog.dataset.as_deref().unwrap_or(&[]);
                resolve_preloaded(rows, term, parsed.as_ref())
            }
            Mode::Lazy => self.resolve_lazy(&catalog.index, term, parsed.as_ref()).await,
        };

        let visualizations = self.probe_visualizations(&records).await;
        Resolution {
            parsed,
            records,
            visualizations,
        }
    }

    async fn resolve_lazy(
        &self,
        index: &LocationIndex,
        term: &str,
        parsed: Option<&ParsedQuery>,
    ) -> Vec<BallotRecord> {
        // A structured zip is terminal here: no free-text fallback.
        if let Some(zip) = parsed.and_then(ParsedQuery::zip_term) {
            return self
                .fetch_zip_or_empty(zip)
                .await
                .into_iter()
                .filter(|row| row.zip.contains(zip))
                .collect();
        }

        let candidates = index.candidates(term);
        debug!("'{}' matched {} candidate zip(s)", term, candidates.len());

        // join_all keeps candidate order, whatever order the fetches finish in.
        join_all(candidates.iter().map(|zip| self.fetch_zip_or_empty(zip)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn fetch_zip(&self, zip: &str) -> Result<Vec<BallotRecord>, LookupError> {
        let path = config::zip_path(&self.zip_path, zip)?;
        load_records(self.source.as_ref(), &path).await
    }

    async fn fetch_zip_or_empty(&self, zip: &str) -> Vec<BallotRecord> {
        match self.fetch_zip(zip).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Skipping zip {}: {}", zip, e);
                Vec::new()
            }
        }
    }

    async fn probe_visualizations(&self, records: &[BallotRecord]) -> HashMap<String, String> {
        let mut zips: Vec<&str> = Vec::new();
        for record in records {
            if !zips.contains(&record.zip.as_str()) {
                zips.push(&record.zip);
            }
        }

        let probes = zips.into_iter().map(|zip| async move {
            let path = match config::zip_path(&self.map_path, zip) {
                Ok(path) => path,
                Err(e) => {
                    debug!("No visualization lookup: {}", e);
                    return None;
                }
            };
            if self.source.exists(&path).await {
                Some((zip.to_string(), self.source.locate(&path)))
            } else {
                debug!("No visualization for {}", zip);
                None
            }
        });

        join_all(probes).await.into_iter().flatten().collect()
    }
}

async fn load_records(source: &dyn DataSource, path: &str) -> Result<Vec<BallotRecord>, LookupError> {
    let rows: Vec<BallotRecord> = source::fetch_rows(source, path).await?;
    Ok(rows
        .into_iter()
        .filter(|row| !row.zip.trim().is_empty())
        .collect())
}

fn resolve_preloaded(rows: &[BallotRecord], term: &str, parsed: Option<&ParsedQuery>) -> Vec<BallotRecord> {
    if let Some(zip) = parsed.and_then(ParsedQuery::zip_term) {
        let by_zip: Vec<BallotRecord> = rows.iter().filter(|row| row.zip.contains(zip)).cloned().collect();
        if !by_zip.is_empty() {
            return by_zip;
        }
    }

    substring_matches(rows, term)
}

/// Rows where any of county, state, zip or district contains `term`,
/// ignoring case, in source order.
pub fn substring_matches(rows: &[BallotRecord], term: &str) -> Vec<BallotRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    rows.iter().filter(|row| row.contains(&needle)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;
    use crate::source::memory::MemorySource;

    const INDEX_CSV: &str = "county,state,zip\n\
        Cheshire,New Hampshire,03446\n\
        Cheshire,New Hampshire,03431\n\
        Cook,Illinois,60629\n";

    const DATA_CSV: &str = "county,state,zip,district,ballot_markdown\n\
        Cheshire,New Hampshire,03446,,# Races\n\
        Cook,Illinois,60629,Ward 14,# Cook 14\n\
        Cook,Illinois,60629,Ward 15,# Cook 15\n";

    fn config(mode: Mode) -> Config {
        Config {
            mode,
            ..Config::default()
        }
    }

    async fn setup(mode: Mode, source: MemorySource) -> (Resolver, Catalog) {
        let config = config(mode);
        let source: Arc<dyn DataSource> = Arc::new(source);
        let catalog = Catalog::load(source.as_ref(), &config).await.unwrap();
        (Resolver::new(source, &config), catalog)
    }

    fn preloaded_source() -> MemorySource {
        MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .with("data.csv", DATA_CSV)
    }

    fn zips(resolution: &Resolution) -> Vec<&str> {
        resolution.records.iter().map(|r| r.zip.as_str()).collect()
    }

    #[tokio::test]
    async fn structured_query_filters_by_zip() {
        let (resolver, catalog) = setup(Mode::Preloaded, preloaded_source()).await;
        let resolution = resolver.resolve(&catalog, "Cheshire, New Hampshire (03446)").await;

        assert_eq!(resolution.records.len(), 1);
        assert_eq!(resolution.records[0].ballot_markdown, "# Races");
        assert_eq!(resolution.parsed.unwrap().county, "Cheshire");
    }

    #[tokio::test]
    async fn preloaded_falls_back_to_substring_search() {
        let (resolver, catalog) = setup(Mode::Preloaded, preloaded_source()).await;

        let resolution = resolver.resolve(&catalog, "ward 15").await;
        assert_eq!(resolution.records[0].district.as_deref(), Some("Ward 15"));

        // zip miss on a shaped query still searches the raw text
        let resolution = resolver.resolve(&catalog, "Cook, Illinois (99999)").await;
        assert!(resolution.records.is_empty());
        let resolution = resolver.resolve(&catalog, "cook").await;
        assert_eq!(zips(&resolution), vec!["60629", "60629"]);
    }

    #[tokio::test]
    async fn nothing_matches_gibberish() {
        let (resolver, catalog) = setup(Mode::Preloaded, preloaded_source()).await;
        let resolution = resolver.resolve(&catalog, "zzzz").await;
        assert!(resolution.records.is_empty());
        assert!(resolution.visualizations.is_empty());
    }

    #[tokio::test]
    async fn resolving_twice_gives_the_same_records() {
        let (resolver, catalog) = setup(Mode::Preloaded, preloaded_source()).await;
        let first = resolver.resolve(&catalog, "new hampshire").await;
        let second = resolver.resolve(&catalog, "new hampshire").await;
        assert_eq!(first.records, second.records);
    }

    #[tokio::test]
    async fn lazy_structured_query_fetches_one_zip() {
        let source = MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .with(
                "data/03446.csv",
                "county,state,zip,ballot_markdown\nCheshire,New Hampshire,03446,# Races\n",
            );
        let (resolver, catalog) = setup(Mode::Lazy, source).await;
        assert!(catalog.dataset.is_none());

        let resolution = resolver.resolve(&catalog, "Cheshire, New Hampshire (03446)").await;
        assert_eq!(zips(&resolution), vec!["03446"]);
    }

    #[tokio::test]
    async fn lazy_structured_miss_does_not_fall_back() {
        let source = MemorySource::default().with("zip_lookup.csv", INDEX_CSV);
        let (resolver, catalog) = setup(Mode::Lazy, source).await;

        let resolution = resolver.resolve(&catalog, "Cheshire, New Hampshire (03446)").await;
        assert!(resolution.records.is_empty());
    }

    #[tokio::test]
    async fn lazy_structured_zip_cannot_leave_data_dir() {
        let source = MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .with(
                "data/../secret.csv",
                "county,state,zip,ballot_markdown\nCook,Illinois,../secret,# Hidden\n",
            );
        let (resolver, catalog) = setup(Mode::Lazy, source).await;

        let resolution = resolver.resolve(&catalog, "Cook, Illinois (../secret)").await;
        assert!(resolution.records.is_empty());
    }

    #[tokio::test]
    async fn unsafe_dataset_zip_gets_no_visualization() {
        let source = MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .with(
                "data.csv",
                "county,state,zip,ballot_markdown\nCook,Illinois,../60629,# Cook\n",
            )
            .with("maps/../60629.html", "<html></html>");
        let (resolver, catalog) = setup(Mode::Preloaded, source).await;

        let resolution = resolver.resolve(&catalog, "cook").await;
        assert_eq!(zips(&resolution), vec!["../60629"]);
        assert!(resolution.visualizations.is_empty());
    }

    #[tokio::test]
    async fn lazy_candidate_failure_is_isolated() {
        let source = MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .failing("data/03446.csv")
            .with(
                "data/03431.csv",
                "county,state,zip,ballot_markdown\nCheshire,New Hampshire,03431,# Keene\n",
            );
        let (resolver, catalog) = setup(Mode::Lazy, source).await;

        let resolution = resolver.resolve(&catalog, "cheshire").await;
        assert_eq!(zips(&resolution), vec!["03431"]);
    }

    #[tokio::test]
    async fn lazy_results_follow_candidate_order() {
        let source = MemorySource::default()
            .with("zip_lookup.csv", INDEX_CSV)
            .with("data/03446.csv", "county,state,zip,ballot_markdown\nCheshire,New Hampshire,03446,a\n")
            .with("data/03431.csv", "county,state,zip,ballot_markdown\nCheshire,New Hampshire,03431,b\n");
        let (resolver, catalog) = setup(Mode::Lazy, source).await;

        let resolution = resolver.resolve(&catalog, "hampshire").await;
        assert_eq!(zips(&resolution), vec!["03446", "03431"]);
    }

    #[tokio::test]
    async fn finds_visualizations_per_zip() {
        let source = preloaded_source().with("maps/60629.html", "<html></html>");
        let (resolver, catalog) = setup(Mode::Preloaded, source).await;

        let resolution = resolver.resolve(&catalog, "a").await;
        assert_eq!(resolution.visualizations.len(), 1);
        assert_eq!(
            resolution.visualizations.get("60629").map(String::as_str),
            Some("mem://maps/60629.html")
        );
    }

    #[tokio::test]
    async fn load_fails_without_index() {
        let source = MemorySource::default();
        let err = Catalog::load(&source, &config(Mode::Lazy)).await.unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }

    #[test]
    fn substring_search_ignores_case() {
        let rows = vec![
            record("Cheshire", "New Hampshire", "03446", ""),
            record("Cook", "Illinois", "60629", ""),
        ];
        assert_eq!(substring_matches(&rows, "ILL").len(), 1);
        assert!(substring_matches(&rows, " ").is_empty());
    }
}
