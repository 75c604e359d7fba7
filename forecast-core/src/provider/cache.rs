use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::project_dirs;

use super::ForecastProvider;

/// Last successful response body, kept on disk for `--offline` runs.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/last_response.json`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("last_response.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<String> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(anyhow!(
                "No cached forecast at {}.\n\
                 Hint: run once without --offline to populate the cache.",
                self.path.display()
            ));
        }

        log::info!("Reading cached forecast from {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read cached forecast: {}", self.path.display()))
    }

    pub async fn store(&self, body: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("Failed to write cached forecast: {}", self.path.display()))?;

        log::debug!("Cached {} bytes at {}", body.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ForecastProvider for ResponseCache {
    async fn fetch_body(&self) -> Result<String> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("data").join("last_response.json"));

        cache.store("{\"ok\":true}").await.expect("store must succeed");
        assert_eq!(cache.fetch_body().await.unwrap(), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn missing_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("last_response.json"));

        let err = cache.load().await.unwrap_err();
        assert!(err.to_string().contains("No cached forecast"));
    }
}
