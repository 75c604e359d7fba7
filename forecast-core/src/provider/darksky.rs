use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::{Forecast, Settings};

use super::{ForecastProvider, cache::ResponseCache};

/// Client for the `/forecast/<key>/<lat>,<lon>` endpoint shared by Dark Sky
/// and its drop-in replacements.
#[derive(Debug, Clone)]
pub struct DarkSkyProvider {
    settings: Settings,
    http: Client,
    cache: Option<ResponseCache>,
}

impl DarkSkyProvider {
    pub fn new(settings: Settings) -> Self {
        Self { settings, http: Client::new(), cache: None }
    }

    /// Store each response body that decodes in `cache`.
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn endpoint(&self) -> String {
        forecast_url(&self.settings)
    }
}

/// Endpoint URL without the query string. The API key is part of the path.
pub fn forecast_url(settings: &Settings) -> String {
    format!(
        "{}/forecast/{}/{},{}",
        settings.base_url, settings.api_key, settings.latitude, settings.longitude
    )
}

#[async_trait]
impl ForecastProvider for DarkSkyProvider {
    async fn fetch_body(&self) -> Result<String> {
        log::info!(
            "Fetching forecast for {},{} (units={})",
            self.settings.latitude,
            self.settings.longitude,
            self.settings.units
        );

        let res = self
            .http
            .get(self.endpoint())
            .query(&[("units", self.settings.units.as_str())])
            .send()
            .await
            .context("Failed to send forecast request")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        log::debug!("Received {} bytes with status {}", body.len(), status);
        Ok(body)
    }

    /// Decodes before touching the cache, so a body that does not parse never
    /// replaces the last good response.
    async fn fetch(&self) -> Result<Forecast> {
        let body = self.fetch_body().await?;
        let forecast = Forecast::from_json(&body)?;

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.store(&body).await {
                log::warn!("{err:#}");
            }
        }

        Ok(forecast)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let end = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
