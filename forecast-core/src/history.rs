//! Append-only record of observed conditions, one JSON object per line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Forecast, config::project_dirs};

/// One observation as stored in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: i64,
    pub summary: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub dew_point: f64,
    pub wind_bearing: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    pub visibility: f64,
    pub pressure: f64,
    pub uv_index: f64,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl From<&Forecast> for HistoryRecord {
    fn from(forecast: &Forecast) -> Self {
        let now = &forecast.currently;
        let today = forecast.day(0);

        HistoryRecord {
            timestamp: now.time,
            summary: now.summary.clone(),
            icon: now.icon.clone(),
            temperature: now.temperature,
            feels_like: now.apparent_temperature,
            dew_point: now.dew_point,
            wind_bearing: now.wind_bearing,
            wind_speed: now.wind_speed,
            humidity: now.humidity,
            visibility: now.visibility,
            pressure: now.pressure,
            uv_index: now.uv_index,
            sunrise: today.map(|d| d.sunrise_time),
            sunset: today.map(|d| d.sunset_time),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/history.jsonl`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("history.jsonl")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let line = serde_json::to_string(record).context("Failed to serialize history record")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history log: {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to write history log: {}", self.path.display()))?;

        log::debug!("Recorded observation {} in {}", record.timestamp, self.path.display());
        Ok(())
    }

    /// Every record, oldest first. A missing log reads as empty.
    pub fn load(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history log: {}", self.path.display()))?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!("Failed to parse history log line {}: {}", n + 1, self.path.display())
                })
            })
            .collect()
    }
}
