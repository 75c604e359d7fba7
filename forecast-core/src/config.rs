use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fs, path::{Path, PathBuf}};

pub const DEFAULT_BASE_URL: &str = "https://api.pirateweather.net";

/// Unit system requested from the API. Decides whether temperatures come back
/// in °C or °F, speeds in m/s, km/h or mph, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Si,
    Us,
    Ca,
    Uk2,
    Auto,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Si => "si",
            Units::Us => "us",
            Units::Ca => "ca",
            Units::Uk2 => "uk2",
            Units::Auto => "auto",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Si, Units::Us, Units::Ca, Units::Uk2, Units::Auto]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        Units::all().iter().copied().find(|u| u.as_str() == lower).ok_or_else(|| {
            anyhow!("Unknown unit system '{value}'. Supported units: si, us, ca, uk2, auto.")
        })
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// latitude = 48.2082
/// longitude = 16.3738
/// units = "si"
/// base_url = "https://api.pirateweather.net"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub units: Option<Units>,
    /// Scheme and host of a Dark Sky compatible API.
    pub base_url: Option<String>,
}

/// Values supplied on the command line or through the environment. Each one
/// that is set wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub units: Option<Units>,
    pub base_url: Option<String>,
}

/// Fully resolved request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub units: Units,
    pub base_url: String,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Layer `overrides` on top of this config and check that everything a
    /// request needs is present.
    pub fn resolve(&self, overrides: Overrides) -> Result<Settings> {
        let api_key = overrides.api_key.or_else(|| self.api_key.clone()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `forecast configure` or set FORECAST_API_KEY."
            )
        })?;

        let latitude = overrides.latitude.or(self.latitude);
        let longitude = overrides.longitude.or(self.longitude);
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(anyhow!(
                "No coordinates configured.\n\
                 Hint: run `forecast configure` or pass --lat and --lon."
            ));
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(anyhow!("Latitude {latitude} is outside -90..=90"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow!("Longitude {longitude} is outside -180..=180"));
        }

        let base_url = overrides
            .base_url
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Settings {
            api_key,
            latitude,
            longitude,
            units: overrides.units.or(self.units).unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "forecast", "forecast")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
