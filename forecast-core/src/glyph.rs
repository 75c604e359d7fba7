//! Condition code to icon-font glyph tables.
//!
//! The display uses a weather icon font where each glyph is addressed by a
//! single printable character. There are three tables: the current-conditions
//! glyph differs between day and night, and forecast days use their own set.

use std::str::FromStr;

/// Closed set of condition codes reported in `icon` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    ClearDay,
    ClearNight,
    Rain,
    Snow,
    Sleet,
    Wind,
    Fog,
    Cloudy,
    PartlyCloudyDay,
    PartlyCloudyNight,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::ClearDay => "clear-day",
            Condition::ClearNight => "clear-night",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Sleet => "sleet",
            Condition::Wind => "wind",
            Condition::Fog => "fog",
            Condition::Cloudy => "cloudy",
            Condition::PartlyCloudyDay => "partly-cloudy-day",
            Condition::PartlyCloudyNight => "partly-cloudy-night",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::ClearDay,
            Condition::ClearNight,
            Condition::Rain,
            Condition::Snow,
            Condition::Sleet,
            Condition::Wind,
            Condition::Fog,
            Condition::Cloudy,
            Condition::PartlyCloudyDay,
            Condition::PartlyCloudyNight,
        ]
    }

    pub fn daytime_glyph(&self) -> char {
        match self {
            Condition::ClearDay | Condition::ClearNight => 'a',
            Condition::Rain => 'g',
            Condition::Snow => 'o',
            Condition::Sleet => 'x',
            Condition::Wind => '9',
            Condition::Fog => '7',
            Condition::Cloudy => 'e',
            Condition::PartlyCloudyDay => 'c',
            Condition::PartlyCloudyNight => 'a',
        }
    }

    pub fn nighttime_glyph(&self) -> char {
        match self {
            Condition::ClearDay | Condition::ClearNight => 'A',
            Condition::Rain => 'G',
            Condition::Snow => 'O',
            Condition::Sleet => 'x',
            Condition::Wind => '9',
            Condition::Fog => '7',
            Condition::Cloudy => 'f',
            Condition::PartlyCloudyDay | Condition::PartlyCloudyNight => 'C',
        }
    }

    pub fn forecast_glyph(&self) -> char {
        match self {
            Condition::ClearDay | Condition::ClearNight => 'a',
            Condition::Rain => 'j',
            Condition::Snow => 'q',
            Condition::Sleet => 'x',
            Condition::Wind => '9',
            Condition::Fog => '7',
            Condition::Cloudy => 'e',
            Condition::PartlyCloudyDay => 'c',
            Condition::PartlyCloudyNight => 'a',
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Condition::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown condition code '{value}'"))
    }
}

fn lookup(code: &str, glyph: fn(&Condition) -> char) -> Option<char> {
    match code.parse::<Condition>() {
        Ok(condition) => Some(glyph(&condition)),
        Err(err) => {
            log::warn!("{err}; leaving glyph blank");
            None
        }
    }
}

/// Glyph for current conditions while the sun is up. `None` for unknown codes.
pub fn daytime_icon(code: &str) -> Option<char> {
    lookup(code, Condition::daytime_glyph)
}

/// Glyph for current conditions at night. `None` for unknown codes.
pub fn nighttime_icon(code: &str) -> Option<char> {
    lookup(code, Condition::nighttime_glyph)
}

/// Glyph for a forecast day. `None` for unknown codes.
pub fn forecast_icon(code: &str) -> Option<char> {
    lookup(code, Condition::forecast_glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_as_str_roundtrip() {
        for c in Condition::all() {
            let parsed: Condition = c.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*c, parsed);
        }
    }

    #[test]
    fn tables_match_icon_font() {
        let expected = [
            ("clear-day", 'a', 'A', 'a'),
            ("clear-night", 'a', 'A', 'a'),
            ("rain", 'g', 'G', 'j'),
            ("snow", 'o', 'O', 'q'),
            ("sleet", 'x', 'x', 'x'),
            ("wind", '9', '9', '9'),
            ("fog", '7', '7', '7'),
            ("cloudy", 'e', 'f', 'e'),
            ("partly-cloudy-day", 'c', 'C', 'c'),
            ("partly-cloudy-night", 'a', 'C', 'a'),
        ];

        for (code, day, night, forecast) in expected {
            assert_eq!(daytime_icon(code), Some(day), "daytime {code}");
            assert_eq!(nighttime_icon(code), Some(night), "nighttime {code}");
            assert_eq!(forecast_icon(code), Some(forecast), "forecast {code}");
        }
    }

    #[test]
    fn spot_checks() {
        assert_eq!(forecast_icon("rain"), Some('j'));
        assert_eq!(nighttime_icon("cloudy"), Some('f'));
    }

    #[test]
    fn unknown_code_is_absent() {
        assert_eq!(daytime_icon("thunderstorm"), None);
        assert_eq!(nighttime_icon(""), None);
        assert_eq!(forecast_icon("Rain"), None);
    }

    #[test]
    fn unknown_condition_error() {
        let err = "hail".parse::<Condition>().unwrap_err();
        assert!(err.to_string().contains("Unknown condition code"));
    }
}
