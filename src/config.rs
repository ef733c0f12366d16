//! TOML configuration for a calendar and for solar-event feed files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::calendar::Calendar;
use crate::canonical::{CANONICAL_LATITUDE, CANONICAL_LONGITUDE, CANONICAL_TIMEZONE};
use crate::error::ConfigError;
use crate::solar_events::{SolarEvent, SolarEventFeed, SolarEventKind};
use crate::solar_time::{Location, NoaaSolarTimes};

/// Where and how to build a calendar. Every field defaults to the reference
/// location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// IANA time zone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Solar-event feed file. The built-in table is used when absent.
    #[serde(default)]
    pub solar_events: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            solar_events: None,
        }
    }
}

fn default_latitude() -> f64 {
    CANONICAL_LATITUDE
}
fn default_longitude() -> f64 {
    CANONICAL_LONGITUDE
}
fn default_timezone() -> String {
    CANONICAL_TIMEZONE.name().to_string()
}

impl CalendarConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<CalendarConfig, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads a config file. A relative `solar_events` path is taken relative
    /// to the config file's directory.
    pub fn load(path: &Path) -> Result<CalendarConfig, ConfigError> {
        let mut config = CalendarConfig::from_toml_str(&read(path)?)?;
        if let (Some(feed), Some(dir)) = (config.solar_events.as_mut(), path.parent()) {
            if feed.is_relative() {
                *feed = dir.join(&*feed);
            }
        }
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(self.timezone.clone()))
    }

    pub fn solar_event_feed(&self) -> Result<SolarEventFeed, ConfigError> {
        match &self.solar_events {
            Some(path) => load_solar_event_feed(path),
            None => Ok(SolarEventFeed::builtin()),
        }
    }

    /// Calendar with NOAA sunrise/sunset and the configured feed.
    pub fn build(&self) -> Result<Calendar, ConfigError> {
        let calendar = Calendar::with_sources(
            self.location(),
            self.timezone()?,
            NoaaSolarTimes,
            self.solar_event_feed()?,
        )?;
        Ok(calendar)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedFile {
    #[serde(default)]
    event: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedEntry {
    instant: DateTime<Utc>,
    kind: SolarEventKind,
}

/// Parses a feed of `[[event]]` tables, each with an RFC 3339 `instant`
/// string and a `kind`.
pub fn parse_solar_event_feed(toml_str: &str) -> Result<SolarEventFeed, ConfigError> {
    let file: FeedFile = toml::from_str(toml_str)?;
    let events = file
        .event
        .into_iter()
        .map(|entry| SolarEvent {
            instant: entry.instant,
            kind: entry.kind,
        })
        .collect();
    SolarEventFeed::new(events).map_err(ConfigError::Feed)
}

pub fn load_solar_event_feed(path: &Path) -> Result<SolarEventFeed, ConfigError> {
    let feed = parse_solar_event_feed(&read(path)?)?;
    debug!(path = %path.display(), events = feed.events().len(), "loaded solar event feed");
    Ok(feed)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FEED: &str = r#"
[[event]]
instant = "2024-12-21T09:20:00Z"
kind = "summer_solstice"

[[event]]
instant = "2025-03-20T09:01:00Z"
kind = "autumnal_equinox"
"#;

    #[test]
    fn empty_config_is_reference_location() {
        let config = CalendarConfig::from_toml_str("").unwrap();
        assert_eq!(config, CalendarConfig::default());
        assert_eq!(config.timezone().unwrap(), CANONICAL_TIMEZONE);
    }

    #[test]
    fn parses_location_and_timezone() {
        let config = CalendarConfig::from_toml_str(
            "latitude = 51.5072\nlongitude = -0.1276\ntimezone = \"Europe/London\"\n",
        )
        .unwrap();
        assert_eq!(config.location(), Location::new(51.5072, -0.1276));
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = CalendarConfig::from_toml_str("latitud = 10.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = CalendarConfig::from_toml_str("timezone = \"Mars/Olympus\"").unwrap();
        match config.timezone() {
            Err(ConfigError::UnknownTimeZone(name)) => assert_eq!(name, "Mars/Olympus"),
            other => panic!("expected UnknownTimeZone, got {other:?}"),
        }
    }

    #[test]
    fn parses_feed() {
        let feed = parse_solar_event_feed(FEED).unwrap();
        assert_eq!(feed.events().len(), 2);
        assert_eq!(feed.events()[0].kind, SolarEventKind::SummerSolstice);
        assert_eq!(feed.events()[1].instant.to_rfc3339(), "2025-03-20T09:01:00+00:00");
    }

    #[test]
    fn unsorted_feed_is_rejected() {
        let reversed = r#"
[[event]]
instant = "2025-03-20T09:01:00Z"
kind = "autumnal_equinox"

[[event]]
instant = "2024-12-21T09:20:00Z"
kind = "summer_solstice"
"#;
        let err = parse_solar_event_feed(reversed).unwrap_err();
        assert!(matches!(err, ConfigError::Feed(_)));
    }

    #[test]
    fn load_resolves_feed_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut feed_file = std::fs::File::create(dir.path().join("events.toml")).unwrap();
        feed_file.write_all(FEED.as_bytes()).unwrap();
        let config_path = dir.path().join("solcadre.toml");
        std::fs::write(&config_path, "solar_events = \"events.toml\"\n").unwrap();

        let config = CalendarConfig::load(&config_path).unwrap();
        assert_eq!(config.solar_events.as_deref(), Some(dir.path().join("events.toml").as_path()));
        assert_eq!(config.solar_event_feed().unwrap().events().len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = CalendarConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
