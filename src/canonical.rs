//! The reference sequence of days.
//!
//! Structure (weeks, blocks, leap weeks, years) is derived once at a fixed
//! reference location and reused by every localized calendar.

use std::rc::Rc;

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::error::CalendarError;
use crate::solar_events::SolarEventFeed;
use crate::solar_time::{Location, SolarTimeProvider};
use crate::types::{block_type_from_index, BlockType, Day, DayIndex, Transition, DAYS_PER_WEEK, WEEKS_PER_SEASON};

pub const CANONICAL_LATITUDE: f64 = -33.865143;
pub const CANONICAL_LONGITUDE: f64 = 151.209900;
pub const CANONICAL_TIMEZONE: Tz = chrono_tz::Australia::Sydney;

pub const LAST_DAY_OF_WEEK: u8 = DAYS_PER_WEEK - 1;
pub const LAST_WEEK_OF_SEASON: u8 = WEEKS_PER_SEASON - 1;

/// Half-width, in days, of the window searched for a transition's solar event.
pub const SOLAR_EVENT_WINDOW_DAYS: i64 = 14;

pub fn canonical_location() -> Location {
    Location::new(CANONICAL_LATITUDE, CANONICAL_LONGITUDE)
}

/// First day of the calendar: 22 September 2024.
pub fn canonical_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 22).expect("22 September 2024 is a valid date")
}

enum State {
    Start,
    Running { date: NaiveDate, index: DayIndex },
    Done,
}

/// Iterator over the reference days, beginning at the epoch.
///
/// Ends when a transition closes with no solar event left in the feed, and
/// after the first error.
pub struct CanonicalDays<P> {
    provider: Rc<P>,
    feed: Rc<SolarEventFeed>,
    location: Location,
    tz: Tz,
    state: State,
}

impl<P: SolarTimeProvider> CanonicalDays<P> {
    pub fn new(provider: Rc<P>, feed: Rc<SolarEventFeed>) -> CanonicalDays<P> {
        CanonicalDays {
            provider,
            feed,
            location: canonical_location(),
            tz: CANONICAL_TIMEZONE,
            state: State::Start,
        }
    }

    fn sunrise(&self, date: NaiveDate) -> Result<DateTime<Tz>, CalendarError> {
        self.provider.sunrise(&self.location, date, &self.tz)
    }

    fn sunset(&self, date: NaiveDate) -> Result<DateTime<Tz>, CalendarError> {
        self.provider.sunset(&self.location, date, &self.tz)
    }

    fn day(&self, date: NaiveDate, index: DayIndex) -> Result<Day, CalendarError> {
        let next = date + Duration::days(1);
        Day::new(self.sunrise(date)?, self.sunset(date)?, self.sunrise(next)?, None, index)
    }

    fn first(&mut self) -> Result<Option<Day>, CalendarError> {
        let date = canonical_epoch();
        let sunrise = self.sunrise(date)?;
        let weekday = sunrise.date_naive().weekday();
        if weekday != chrono::Weekday::Sun {
            return Err(CalendarError::EpochNotSunday {
                date: sunrise.date_naive(),
                weekday,
            });
        }
        let index = DayIndex {
            year_of_calendar: 0,
            block_of_year: 0,
            week_of_block: 0,
            day_of_week: 0,
            day_of_calendar: 0,
        };
        let day = self.day(date, index)?;
        self.state = State::Running { date, index };
        Ok(Some(day))
    }

    fn step(&mut self, previous_date: NaiveDate, previous: DayIndex) -> Result<Option<Day>, CalendarError> {
        let date = previous_date + Duration::days(1);
        let mut index = DayIndex {
            day_of_calendar: previous.day_of_calendar + 1,
            ..previous
        };

        if previous.day_of_week < LAST_DAY_OF_WEEK {
            index.day_of_week += 1;
        } else {
            index.day_of_week = 0;
            match block_type_from_index(previous.block_of_year) {
                BlockType::Transition(transition) => {
                    let events = self.feed.events_near(date, &self.tz, SOLAR_EVENT_WINDOW_DAYS);
                    let event = match events.as_slice() {
                        [] => {
                            debug!(%date, "no solar event for transition, calendar ends");
                            return Ok(None);
                        }
                        [event] => *event,
                        _ => {
                            return Err(CalendarError::AmbiguousSolarEvent {
                                date,
                                count: events.len(),
                                window_days: SOLAR_EVENT_WINDOW_DAYS,
                            })
                        }
                    };
                    let leap_week_threshold = self.sunset(date + Duration::days(1))?;
                    if event.instant > leap_week_threshold {
                        debug!(%date, transition = transition.name(), event = %event.instant, "inserting leap week");
                        index.week_of_block += 1;
                    } else {
                        index.week_of_block = 0;
                        index.block_of_year = transition.next().index();
                        if transition == Transition::VernalEquinox {
                            index.year_of_calendar += 1;
                            debug!(%date, year = index.year_of_calendar, "new year");
                        }
                    }
                }
                BlockType::Season(season) if previous.week_of_block == LAST_WEEK_OF_SEASON => {
                    index.week_of_block = 0;
                    index.block_of_year = season.next().index();
                }
                BlockType::Season(_) => {
                    index.week_of_block += 1;
                }
            }
        }

        let day = self.day(date, index)?;
        trace!(%date, day = %day, "canonical day");
        self.state = State::Running { date, index };
        Ok(Some(day))
    }
}

impl<P: SolarTimeProvider> Iterator for CanonicalDays<P> {
    type Item = Result<Day, CalendarError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            State::Start => self.first(),
            State::Running { date, index } => self.step(date, index),
            State::Done => return None,
        };
        match result {
            Ok(Some(day)) => Some(Ok(day)),
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(err) => {
                self.state = State::Done;
                Some(Err(err))
            }
        }
    }
}
