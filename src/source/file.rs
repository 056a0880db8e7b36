use super::DataSource;
use crate::error::LookupError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Data laid out under a local directory.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LookupError> {
        tokio::fs::read_to_string(self.root.join(path))
            .await
            .map_err(|source| LookupError::Io {
                path: path.to_string(),
                source,
            })
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(self.root.join(path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    fn locate(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }
}
