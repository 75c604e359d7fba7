//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Fetching the forecast document, live or from the response cache
//! - The decoded forecast model
//! - Glyph and compass lookup tables
//! - An opt-in history log of observed conditions
//! - Rendering of the fixed-order line feed read by e-ink panels and status bars
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod compass;
pub mod config;
pub mod glyph;
pub mod history;
pub mod model;
pub mod provider;
pub mod report;

pub use config::{Config, Overrides, Settings, Units};
pub use history::{HistoryLog, HistoryRecord};
pub use model::{DailyForecast, Forecast, WeatherSnapshot};
pub use provider::{CacheMode, ForecastProvider, provider_from_config};
pub use report::{ReportError, render, write_lines};
