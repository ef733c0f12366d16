//! Error types for the solcadre crate.

use chrono::NaiveDate;

/// Error type for calendar generation and lookup.
///
/// `InvalidLatitude` and `OutOfRange` are operational failures. The remaining
/// variants are integrity failures: they mean the reference constants or the
/// solar-event feed are corrupt, and generation halts when one is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// The sun does not rise or set at this latitude on the given date.
    #[error("latitude({latitude}) is invalid: {reason}")]
    InvalidLatitude {
        /// Latitude of the failing location.
        latitude: f64,
        /// Which event was missing, and on which date.
        reason: String,
    },

    /// The reference epoch's sunrise is not on a Sunday.
    #[error("epoch sunrise on {date} falls on {weekday}, expected Sunday")]
    EpochNotSunday {
        date: NaiveDate,
        weekday: chrono::Weekday,
    },

    /// More than one solar event matched a transition window.
    #[error("{count} solar events fall within {window_days} days of {date}, expected one")]
    AmbiguousSolarEvent {
        date: NaiveDate,
        count: usize,
        window_days: i64,
    },

    /// A provider returned sunrise and sunset on different civil dates.
    #[error("sunrise on {sunrise} and sunset on {sunset} fall on different dates")]
    SunriseSunsetDateMismatch {
        sunrise: NaiveDate,
        sunset: NaiveDate,
    },

    /// The localized start could not be aligned to a Sunday sunrise.
    #[error("sunrise on {date} falls on {weekday}, cannot align the calendar start to Sunday")]
    UnalignedStart {
        date: NaiveDate,
        weekday: chrono::Weekday,
    },

    /// The calendar produced no days at all.
    #[error("calendar has no days: the solar event feed ends before the calendar starts")]
    NoDays,

    /// A solar-event feed was not in ascending order.
    #[error("solar events are not in ascending order at position {position}")]
    UnsortedSolarEvents { position: usize },

    /// A time was queried against a day that does not contain it.
    #[error("time {time} is outside of day {day} [{start}, {end})")]
    OutOfRange {
        time: String,
        day: String,
        start: String,
        end: String,
    },
}

impl CalendarError {
    /// True for errors that indicate corrupt reference data rather than an
    /// unsupported location or a bad query.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            CalendarError::InvalidLatitude { .. } | CalendarError::OutOfRange { .. } => false,
            CalendarError::EpochNotSunday { .. }
            | CalendarError::AmbiguousSolarEvent { .. }
            | CalendarError::SunriseSunsetDateMismatch { .. }
            | CalendarError::UnalignedStart { .. }
            | CalendarError::NoDays
            | CalendarError::UnsortedSolarEvents { .. } => true,
        }
    }
}

/// Error type for loading configuration and solar-event feeds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("invalid solar event feed: {0}")]
    Feed(CalendarError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
