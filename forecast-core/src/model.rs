use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Decoded forecast document, as returned by a Dark Sky compatible API.
///
/// Only the fields the report reads are modelled; everything else in the
/// response is ignored. A missing or null field here is a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// IANA identifier, e.g. "Europe/Vienna".
    pub timezone: String,
    /// Hours east of UTC at request time. Not every provider sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    pub currently: WeatherSnapshot,
    pub daily: Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub icon: String,
    pub summary: String,
    pub time: i64,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub dew_point: f64,
    /// Relative humidity as a fraction in `0..=1`.
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_bearing: f64,
    pub uv_index: f64,
    pub visibility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Daily {
    pub data: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub icon: String,
    pub time: i64,
    pub sunrise_time: i64,
    pub sunset_time: i64,
    pub apparent_temperature_low: f64,
    pub apparent_temperature_high: f64,
}

impl Forecast {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("Failed to parse forecast JSON")
    }

    /// Daily entry at `offset` days from today.
    pub fn day(&self, offset: usize) -> Option<&DailyForecast> {
        self.daily.data.get(offset)
    }
}
