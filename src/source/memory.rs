use super::DataSource;
use crate::error::LookupError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;

/// In-memory data for tests. Paths in `failing` error on fetch.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    failing: HashSet<String>,
}

impl MemorySource {
    pub fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, LookupError> {
        if self.failing.contains(path) {
            return Err(LookupError::Io {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            });
        }
        self.files.get(path).cloned().ok_or_else(|| LookupError::Io {
            path: path.to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn locate(&self, path: &str) -> String {
        format!("mem://{}", path)
    }
}
