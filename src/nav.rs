//! Query string state: `q` holds the search text, `toggles` the
//! comma-separated disclosure bits of the rendered results.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use url::form_urlencoded;

lazy_static! {
    static ref TOGGLES: Regex = Regex::new(r"^[01](,[01])*$").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub query: Option<String>,
    pub toggles: Option<Vec<bool>>,
}

impl NavigationState {
    /// Reads `?q=...&toggles=...`. Unknown keys are ignored and a malformed
    /// toggle list is dropped.
    pub fn parse(query_string: &str) -> Self {
        let query_string = query_string.trim().trim_start_matches('?');
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            match key.as_ref() {
                "q" => state.query = Some(value.into_owned()),
                "toggles" => state.toggles = parse_toggles(&value),
                _ => {}
            }
        }

        state
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(query) = &self.query {
            serializer.append_pair("q", query);
        }
        if let Some(toggles) = &self.toggles {
            serializer.append_pair("toggles", &format_toggles(toggles));
        }
        let encoded = serializer.finish();

        if encoded.is_empty() {
            encoded
        } else {
            format!("?{}", encoded)
        }
    }

    /// Search text, if there is something to search for.
    pub fn search_term(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }
}

fn parse_toggles(value: &str) -> Option<Vec<bool>> {
    if value.is_empty() {
        return None;
    }
    if !TOGGLES.is_match(value) {
        warn!("Ignoring malformed toggles '{}'", value);
        return None;
    }
    Some(value.split(',').map(|bit| bit == "1").collect())
}

fn format_toggles(toggles: &[bool]) -> String {
    toggles
        .iter()
        .map(|&open| if open { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(",")
}
