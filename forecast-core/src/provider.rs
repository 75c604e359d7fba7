use crate::{
    Config, Forecast, Overrides,
    provider::{cache::ResponseCache, darksky::DarkSkyProvider},
};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod cache;
pub mod darksky;

/// Where a run gets its forecast document from.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Raw response body, undecoded.
    async fn fetch_body(&self) -> Result<String>;

    async fn fetch(&self) -> Result<Forecast> {
        let body = self.fetch_body().await?;
        Forecast::from_json(&body)
    }
}

/// How the provider should treat the on-disk response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Fetch live and store the body for later offline runs.
    #[default]
    Refresh,
    /// Fetch live, leave the cache alone.
    Bypass,
    /// Never touch the network; read the last stored body.
    Offline,
}

/// Construct a provider from config and command-line overrides.
///
/// Offline runs only read the cache, so they need neither an API key nor
/// coordinates.
pub fn provider_from_config(
    config: &Config,
    overrides: Overrides,
    mode: CacheMode,
) -> Result<Box<dyn ForecastProvider>> {
    if mode == CacheMode::Offline {
        return Ok(Box::new(ResponseCache::default_location()?));
    }

    let settings = config.resolve(overrides)?;
    let provider = DarkSkyProvider::new(settings);

    let boxed: Box<dyn ForecastProvider> = match mode {
        CacheMode::Refresh => Box::new(provider.with_cache(ResponseCache::default_location()?)),
        CacheMode::Bypass | CacheMode::Offline => Box::new(provider),
    };

    Ok(boxed)
}
