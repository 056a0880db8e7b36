use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the zip lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub county: String,
    pub state: String,
    pub zip: String,
}

impl LocationEntry {
    /// Display string used by the suggestion list.
    pub fn label(&self) -> String {
        format!("{} County, {} ({})", self.county, self.state, self.zip)
    }

    /// `needle` must already be lowercased.
    pub fn contains(&self, needle: &str) -> bool {
        [&self.county, &self.state, &self.zip]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Ballot content for one zip/district combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotRecord {
    pub county: String,
    pub state: String,
    pub zip: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub district: Option<String>,
    #[serde(alias = "full_markdown")]
    pub ballot_markdown: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub full_enhanced_ballot: Option<String>,
}

impl BallotRecord {
    pub fn title(&self) -> String {
        match &self.district {
            Some(district) => format!("{} County, {} — {}", self.county, self.state, district),
            None => format!("{} County, {}", self.county, self.state),
        }
    }

    /// Markdown for the requested variant, `None` when the record does not carry it.
    pub fn content(&self, variant: ContentVariant) -> Option<&str> {
        match variant {
            ContentVariant::Simplified => Some(&self.ballot_markdown),
            ContentVariant::Enhanced => self.full_enhanced_ballot.as_deref(),
        }
    }

    pub fn has_enhanced(&self) -> bool {
        self.full_enhanced_ballot.is_some()
    }

    /// Case-insensitive containment over county, state, zip and district.
    /// `needle` must already be lowercased.
    pub fn contains(&self, needle: &str) -> bool {
        let fields = [
            Some(&self.county),
            Some(&self.state),
            Some(&self.zip),
            self.district.as_ref(),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// A `"county, state (zip)"` query broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub county: String,
    pub state: String,
    pub zip: String,
}

impl ParsedQuery {
    /// The zip part, if there is one to search by.
    pub fn zip_term(&self) -> Option<&str> {
        if self.zip.is_empty() {
            None
        } else {
            Some(&self.zip)
        }
    }
}

/// Which markdown field a result section is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentVariant {
    #[default]
    Simplified,
    Enhanced,
}

impl ContentVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentVariant::Simplified => "simplified",
            ContentVariant::Enhanced => "enhanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentVariant::Simplified => "Simplified",
            ContentVariant::Enhanced => "Enhanced",
        }
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "simplified" => Ok(ContentVariant::Simplified),
            "enhanced" | "full" => Ok(ContentVariant::Enhanced),
            other => Err(format!("unknown ballot view '{}'", other)),
        }
    }
}

#[cfg(test)]
pub(crate) fn record(county: &str, state: &str, zip: &str, markdown: &str) -> BallotRecord {
    BallotRecord {
        county: county.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
        district: None,
        ballot_markdown: markdown.to_string(),
        full_enhanced_ballot: None,
    }
}
