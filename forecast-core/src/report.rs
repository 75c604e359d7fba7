//! The 27-line display feed.
//!
//! Line order is positional and consumed as-is by the display side, so it must
//! never change:
//!
//! | line  | content                                               |
//! |-------|-------------------------------------------------------|
//! | 1     | current glyph (day or night table)                    |
//! | 2     | apparent temperature                                  |
//! | 3–14  | per forecast day 1..=3: glyph, low, high, weekday     |
//! | 15    | temperature                                           |
//! | 16    | `Dew point: <raw>`                                    |
//! | 17    | `Humidity: <percent>`                                 |
//! | 18    | pressure                                              |
//! | 19    | wind speed                                            |
//! | 20    | `UV: <raw>`                                           |
//! | 21    | `Vis: <rounded>`                                      |
//! | 22–23 | today's sunrise and sunset, `HH:MM`                   |
//! | 24    | wind direction                                        |
//! | 25    | observation time, `HH:MM`                             |
//! | 26    | summary                                               |
//! | 27    | API timezone identifier                               |
//!
//! Weekdays are computed in the timezone the API reports for the location.
//! Clock times use the zone of the machine running the program.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::{fmt::Display, io::Write};
use thiserror::Error;

use crate::{
    Forecast,
    compass::compass_direction,
    glyph::{daytime_icon, forecast_icon, nighttime_icon},
};

pub const LINE_COUNT: usize = 27;
pub const FORECAST_DAYS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Forecast has no daily entry for day offset {offset}")]
    MissingDay { offset: usize },

    #[error("Timestamp {value} in `{field}` is out of range")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

/// Round half away from zero.
pub fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Daytime is strictly between 06:00 and 18:00 local wall-clock hours.
pub fn is_daytime(hour: u32) -> bool {
    hour > 6 && hour < 18
}

/// Zone the API reports for the forecast location.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ApiZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ApiZone {
    fn of(forecast: &Forecast) -> Self {
        if let Ok(tz) = forecast.timezone.parse::<Tz>() {
            return ApiZone::Named(tz);
        }

        let fixed = forecast
            .offset
            .and_then(|hours| FixedOffset::east_opt((hours * 3600.0).round() as i32));

        match fixed {
            Some(offset) => {
                log::warn!(
                    "Unknown timezone '{}', using reported offset {offset}",
                    forecast.timezone
                );
                ApiZone::Fixed(offset)
            }
            None => {
                log::warn!("Unknown timezone '{}' and no offset, using UTC", forecast.timezone);
                ApiZone::Fixed(Utc.fix())
            }
        }
    }

    fn weekday(&self, at: DateTime<Utc>) -> String {
        match self {
            ApiZone::Named(tz) => at.with_timezone(tz).format("%a").to_string(),
            ApiZone::Fixed(offset) => at.with_timezone(offset).format("%a").to_string(),
        }
    }
}

fn instant(field: &'static str, value: i64) -> Result<DateTime<Utc>, ReportError> {
    DateTime::<Utc>::from_timestamp(value, 0).ok_or(ReportError::InvalidTimestamp { field, value })
}

fn clock<L>(local: &L, field: &'static str, value: i64) -> Result<String, ReportError>
where
    L: TimeZone,
    L::Offset: Display,
{
    Ok(instant(field, value)?.with_timezone(local).format("%H:%M").to_string())
}

/// Free text from the API, flattened so it cannot add lines to the feed.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn glyph_line(glyph: Option<char>) -> String {
    glyph.map(String::from).unwrap_or_default()
}

/// Humidity fraction scaled to percent and rounded to 0.01, which removes
/// float noise from the scaling (0.57 prints as 57, not 56.99999999999999).
fn humidity_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0
}

/// Render every line of the feed.
///
/// Nothing is written anywhere; a forecast that cannot be rendered in full
/// yields an error and no lines at all.
pub fn render<L>(forecast: &Forecast, local_hour: u32, local: &L) -> Result<Vec<String>, ReportError>
where
    L: TimeZone,
    L::Offset: Display,
{
    let now = &forecast.currently;
    let zone = ApiZone::of(forecast);
    let today = forecast.day(0).ok_or(ReportError::MissingDay { offset: 0 })?;

    let mut lines = Vec::with_capacity(LINE_COUNT);

    let icon = if is_daytime(local_hour) {
        daytime_icon(&now.icon)
    } else {
        nighttime_icon(&now.icon)
    };
    lines.push(glyph_line(icon));
    lines.push(round(now.apparent_temperature).to_string());

    for offset in 1..=FORECAST_DAYS {
        let day = forecast.day(offset).ok_or(ReportError::MissingDay { offset })?;
        lines.push(glyph_line(forecast_icon(&day.icon)));
        lines.push(round(day.apparent_temperature_low).to_string());
        lines.push(round(day.apparent_temperature_high).to_string());
        lines.push(zone.weekday(instant("daily.time", day.time)?));
    }

    lines.push(round(now.temperature).to_string());
    lines.push(format!("Dew point: {}", now.dew_point));
    lines.push(format!("Humidity: {}", humidity_percent(now.humidity)));
    lines.push(round(now.pressure).to_string());
    lines.push(round(now.wind_speed).to_string());
    lines.push(format!("UV: {}", now.uv_index));
    lines.push(format!("Vis: {}", round(now.visibility)));
    lines.push(clock(local, "daily.sunriseTime", today.sunrise_time)?);
    lines.push(clock(local, "daily.sunsetTime", today.sunset_time)?);
    lines.push(compass_direction(now.wind_bearing).to_string());
    lines.push(clock(local, "currently.time", now.time)?);
    lines.push(single_line(&now.summary));
    lines.push(single_line(&forecast.timezone));

    debug_assert_eq!(lines.len(), LINE_COUNT);
    Ok(lines)
}

/// Write `lines` newline-terminated and flush.
pub fn write_lines(out: &mut impl Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Forecast {
        Forecast::from_json(include_str!("../testdata/forecast.json")).expect("fixture must decode")
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(20.5), 21);
        assert_eq!(round(-20.5), -21);
        assert_eq!(round(20.49), 20);
        assert_eq!(round(-0.4), 0);
    }

    #[test]
    fn daytime_window_is_exclusive() {
        assert!(!is_daytime(6));
        assert!(is_daytime(7));
        assert!(is_daytime(17));
        assert!(!is_daytime(18));
        assert!(!is_daytime(0));
    }

    #[test]
    fn renders_fixture_in_order() {
        let lines = render(&fixture(), 10, &Utc).expect("fixture must render");

        let expected = [
            "g", "5", // current
            "q", "-3", "1", "Wed", // day 1
            "e", "0", "4", "Thu", // day 2
            "a", "1", "7", "Fri", // day 3
            "7",
            "Dew point: 5.12",
            "Humidity: 87",
            "1013",
            "4",
            "UV: 1",
            "Vis: 9",
            "06:05",
            "15:27",
            "SSW",
            "09:42",
            "Light Rain",
            "Europe/Vienna",
        ];
        assert_eq!(lines, expected);
    }

    #[test]
    fn night_uses_nighttime_table() {
        let lines = render(&fixture(), 20, &Utc).unwrap();
        assert_eq!(lines[0], "G");

        let lines = render(&fixture(), 6, &Utc).unwrap();
        assert_eq!(lines[0], "G");
    }

    #[test]
    fn clock_times_follow_local_zone() {
        let local = FixedOffset::east_opt(2 * 3600).unwrap();
        let lines = render(&fixture(), 10, &local).unwrap();

        assert_eq!(lines[21], "08:05");
        assert_eq!(lines[22], "17:27");
        assert_eq!(lines[24], "11:42");
        // weekdays stay in the API zone
        assert_eq!(lines[5], "Wed");
    }

    #[test]
    fn out_of_range_bearing_reads_north() {
        let mut forecast = fixture();
        forecast.currently.wind_bearing = 370.0;

        let lines = render(&forecast, 10, &Utc).unwrap();
        assert_eq!(lines[23], "N");
    }

    #[test]
    fn humidity_is_scaled_without_float_noise() {
        let mut forecast = fixture();
        forecast.currently.humidity = 0.57;
        assert_eq!(render(&forecast, 10, &Utc).unwrap()[16], "Humidity: 57");

        forecast.currently.humidity = 0.655;
        assert_eq!(render(&forecast, 10, &Utc).unwrap()[16], "Humidity: 65.5");
    }

    #[test]
    fn unknown_icon_leaves_blank_line() {
        let mut forecast = fixture();
        forecast.currently.icon = "hail".into();
        forecast.daily.data[2].icon = "thunderstorm".into();

        let lines = render(&forecast, 10, &Utc).unwrap();
        assert_eq!(lines.len(), LINE_COUNT);
        assert_eq!(lines[0], "");
        assert_eq!(lines[6], "");
    }

    #[test]
    fn unknown_timezone_falls_back_to_offset_then_utc() {
        let mut forecast = fixture();
        forecast.timezone = "Mars/Olympus_Mons".into();

        let lines = render(&forecast, 10, &Utc).unwrap();
        assert_eq!(lines[5], "Wed");
        assert_eq!(lines[26], "Mars/Olympus_Mons");

        forecast.offset = None;
        let lines = render(&forecast, 10, &Utc).unwrap();
        assert_eq!(lines[5], "Tue");
    }

    #[test]
    fn short_daily_sequence_is_an_error() {
        let mut forecast = fixture();
        forecast.daily.data.truncate(3);

        let err = render(&forecast, 10, &Utc).unwrap_err();
        assert_eq!(err, ReportError::MissingDay { offset: 3 });

        forecast.daily.data.clear();
        let err = render(&forecast, 10, &Utc).unwrap_err();
        assert_eq!(err, ReportError::MissingDay { offset: 0 });
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let mut forecast = fixture();
        forecast.currently.time = i64::MAX;

        let err = render(&forecast, 10, &Utc).unwrap_err();
        assert!(matches!(err, ReportError::InvalidTimestamp { field: "currently.time", .. }));
    }

    #[test]
    fn multi_line_text_stays_on_one_line() {
        let mut forecast = fixture();
        forecast.currently.summary = "Light Rain\nclearing later\r\ntonight".into();
        forecast.timezone = "Europe/\nVienna".into();

        let lines = render(&forecast, 10, &Utc).unwrap();
        assert_eq!(lines[25], "Light Rain clearing later tonight");
        assert_eq!(lines[26], "Europe/ Vienna");

        let mut out = Vec::new();
        write_lines(&mut out, &lines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), LINE_COUNT);
    }

    #[test]
    fn always_27_lines() {
        for hour in 0..24 {
            assert_eq!(render(&fixture(), hour, &Utc).unwrap().len(), LINE_COUNT);
        }
    }

    #[test]
    fn write_lines_terminates_every_line() {
        let lines = render(&fixture(), 10, &Utc).unwrap();
        let mut out = Vec::new();
        write_lines(&mut out, &lines).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Europe/Vienna\n"));
        assert_eq!(text.lines().count(), LINE_COUNT);
    }
}
