use crate::error::LookupError;
use crate::models::LocationEntry;
use crate::source::{self, DataSource};
use std::collections::HashSet;

/// Zip code to (county, state) table, loaded once.
#[derive(Debug, Default)]
pub struct LocationIndex {
    entries: Vec<LocationEntry>,
}

impl LocationIndex {
    pub fn new(entries: Vec<LocationEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|entry| !entry.zip.trim().is_empty())
            .collect();
        Self { entries }
    }

    pub async fn load(source: &dyn DataSource, path: &str) -> Result<Self, LookupError> {
        let entries = source::fetch_rows(source, path).await?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Zips of every entry whose county, state or zip contains `term`,
    /// without repeats, in table order.
    pub fn candidates(&self, term: &str) -> Vec<String> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| entry.contains(&needle))
            .filter(|entry| seen.insert(entry.zip.as_str()))
            .map(|entry| entry.zip.clone())
            .collect()
    }

    /// Deduplicated suggestion strings in table order.
    pub fn labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(LocationEntry::label)
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn entry(county: &str, state: &str, zip: &str) -> LocationEntry {
    LocationEntry {
        county: county.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
    }
}
