use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::angles;
use crate::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Location {
        Location {
            latitude,
            longitude,
        }
    }
}

/// Source of sunrise and sunset instants.
///
/// Both methods return an instant on the civil date `date` in `tz`, or
/// `CalendarError::InvalidLatitude` when the sun does not cross the horizon
/// that day.
pub trait SolarTimeProvider {
    fn sunrise(&self, location: &Location, date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, CalendarError>;

    fn sunset(&self, location: &Location, date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, CalendarError>;
}

/// Sunrise/sunset from the NOAA solar-position approximation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoaaSolarTimes;

impl NoaaSolarTimes {
    fn crossing(&self, location: &Location, date: NaiveDate, tz: &Tz, rising: bool) -> Result<DateTime<Tz>, CalendarError> {
        let event = if rising { "sunrise" } else { "sunset" };
        let invalid = || CalendarError::InvalidLatitude {
            latitude: location.latitude,
            reason: format!("no {event} on date({date})"),
        };

        // Solve against the UTC date first, then step a day either way until
        // the result lands on the requested local date.
        let mut utc_date = date;
        for _ in 0..3 {
            let minutes = angles::horizon_crossing_minutes(location.latitude, location.longitude, utc_date, rising)
                .ok_or_else(invalid)?;
            let midnight = utc_date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .ok_or_else(invalid)?;
            let instant = (midnight + Duration::milliseconds((minutes * 60_000.0).round() as i64)).with_timezone(tz);
            utc_date = match instant.date_naive().cmp(&date) {
                Ordering::Equal => return Ok(instant),
                Ordering::Greater => utc_date.pred_opt().ok_or_else(invalid)?,
                Ordering::Less => utc_date.succ_opt().ok_or_else(invalid)?,
            };
        }
        Err(invalid())
    }
}

impl SolarTimeProvider for NoaaSolarTimes {
    fn sunrise(&self, location: &Location, date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, CalendarError> {
        self.crossing(location, date, tz, true)
    }

    fn sunset(&self, location: &Location, date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, CalendarError> {
        self.crossing(location, date, tz, false)
    }
}
