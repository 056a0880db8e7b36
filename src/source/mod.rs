//! Where the zip lookup table, ballot rows and visualization pages come from.
//!
//! Every path handed to a [`DataSource`] is relative to the configured data
//! root, so the same layout works from a local directory or a static host.

mod file;
mod http;
#[cfg(test)]
pub mod memory;

pub use file::FileSource;
pub use http::HttpSource;

use crate::config::Config;
use crate::error::LookupError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches the resource at `path` as text.
    async fn fetch_text(&self, path: &str) -> Result<String, LookupError>;

    /// Lightweight existence probe. Any failure counts as absent.
    async fn exists(&self, path: &str) -> bool;

    /// Address of `path` as the rendered page should reference it.
    fn locate(&self, path: &str) -> String;
}

pub fn from_config(config: &Config) -> Result<Arc<dyn DataSource>, LookupError> {
    if config.is_remote() {
        Ok(Arc::new(HttpSource::new(&config.data_root, config.fetch_timeout)?))
    } else {
        Ok(Arc::new(FileSource::new(&config.data_root)))
    }
}

/// Fetches `path` and decodes every row with the CSV header as field names.
pub async fn fetch_rows<T: DeserializeOwned>(
    source: &dyn DataSource,
    path: &str,
) -> Result<Vec<T>, LookupError> {
    let text = source.fetch_text(path).await?;
    parse_rows(path, &text)
}

pub fn parse_rows<T: DeserializeOwned>(path: &str, text: &str) -> Result<Vec<T>, LookupError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LookupError::Csv {
            path: path.to_string(),
            source,
        })
}
