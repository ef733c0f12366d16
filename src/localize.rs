//! Projection of the reference days onto an arbitrary location.

use std::rc::Rc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, trace};

use crate::canonical::{canonical_epoch, CanonicalDays};
use crate::error::CalendarError;
use crate::solar_events::{SolarEvent, SolarEventFeed};
use crate::solar_time::{Location, SolarTimeProvider};
use crate::types::{block_type_from_index, BlockType, Day, DayIndex, Hemisphere, Season};

/// Days skipped in the reference sequence to shift a northern calendar by
/// half a year: two seasons plus two single-week transitions.
pub const NORTHERN_SKIP_DAYS: usize = 2 * (12 + 1) * 7;

/// Iterator over the days of a calendar localized to one location.
///
/// Each reference day is rebuilt with the location's own sunrise and sunset,
/// its block flipped for the northern hemisphere, and its year recounted in
/// the local frame.
pub struct LocalizedDays<P> {
    canonical: CanonicalDays<P>,
    provider: Rc<P>,
    feed: Rc<SolarEventFeed>,
    location: Location,
    tz: Tz,
    hemisphere: Hemisphere,
    skip: usize,
    date: NaiveDate,
    sunrise: Option<DateTime<Tz>>,
    year_of_calendar: i32,
    day_of_calendar: usize,
    next_event: usize,
    done: bool,
}

impl<P: SolarTimeProvider> LocalizedDays<P> {
    /// Aligns the local start date so that it begins on a Sunday sunrise.
    pub fn new(provider: Rc<P>, feed: Rc<SolarEventFeed>, location: Location, tz: Tz) -> Result<LocalizedDays<P>, CalendarError> {
        let hemisphere = Hemisphere::from_latitude(location.latitude);
        let skip = match hemisphere {
            Hemisphere::Northern => NORTHERN_SKIP_DAYS,
            Hemisphere::Southern => 0,
        };

        let anchor = canonical_epoch() + Duration::days(skip as i64);
        let anchor_sunrise = provider.sunrise(&location, anchor, &tz)?;
        let shift = match anchor_sunrise.date_naive().weekday() {
            chrono::Weekday::Mon => -1,
            chrono::Weekday::Sun => 0,
            chrono::Weekday::Sat => 1,
            weekday => {
                return Err(CalendarError::UnalignedStart {
                    date: anchor_sunrise.date_naive(),
                    weekday,
                })
            }
        };
        let date = anchor + Duration::days(shift);
        let start_sunrise = provider.sunrise(&location, date, &tz)?;
        let weekday = start_sunrise.date_naive().weekday();
        if weekday != chrono::Weekday::Sun {
            return Err(CalendarError::UnalignedStart {
                date: start_sunrise.date_naive(),
                weekday,
            });
        }

        info!(
            latitude = location.latitude,
            longitude = location.longitude,
            timezone = tz.name(),
            ?hemisphere,
            start = %date,
            "localized calendar"
        );

        Ok(LocalizedDays {
            canonical: CanonicalDays::new(Rc::clone(&provider), Rc::clone(&feed)),
            provider,
            feed,
            location,
            tz,
            hemisphere,
            skip,
            date,
            sunrise: Some(start_sunrise),
            year_of_calendar: -1,
            day_of_calendar: 0,
            next_event: 0,
            done: false,
        })
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    fn skip_ahead(&mut self) -> Result<bool, CalendarError> {
        while self.skip > 0 {
            match self.canonical.next() {
                Some(Ok(_)) => self.skip -= 1,
                Some(Err(err)) => return Err(err),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// The first solar event in `[sunrise, next_sunrise)`, advancing the
    /// cursor past events that precede `sunrise`.
    fn solar_event(&mut self, sunrise: &DateTime<Tz>, next_sunrise: &DateTime<Tz>) -> Option<SolarEvent<Tz>> {
        let sunrise = sunrise.with_timezone(&Utc);
        let next_sunrise = next_sunrise.with_timezone(&Utc);
        let events = self.feed.events();
        while self.next_event < events.len() && events[self.next_event].instant < sunrise {
            self.next_event += 1;
        }
        events
            .get(self.next_event)
            .filter(|event| event.instant < next_sunrise)
            .map(|event| event.localize(&self.tz))
    }

    fn localize(&mut self, canonical: &Day) -> Result<Day, CalendarError> {
        let source = canonical.index();
        let block_of_year = match self.hemisphere {
            Hemisphere::Northern => block_type_from_index(source.block_of_year).flip().index(),
            Hemisphere::Southern => source.block_of_year,
        };
        if block_type_from_index(block_of_year) == BlockType::Season(Season::Greentide)
            && source.week_of_block == 0
            && source.day_of_week == 0
        {
            self.year_of_calendar += 1;
        }

        let sunrise = match self.sunrise.take() {
            Some(sunrise) => sunrise,
            None => self.provider.sunrise(&self.location, self.date, &self.tz)?,
        };
        let sunset = self.provider.sunset(&self.location, self.date, &self.tz)?;
        let next_sunrise = self
            .provider
            .sunrise(&self.location, self.date + Duration::days(1), &self.tz)?;
        let solar_event = self.solar_event(&sunrise, &next_sunrise);

        let index = DayIndex {
            year_of_calendar: self.year_of_calendar,
            block_of_year,
            week_of_block: source.week_of_block,
            day_of_week: source.day_of_week,
            day_of_calendar: self.day_of_calendar,
        };
        let day = Day::new(sunrise, sunset, next_sunrise, solar_event, index)?;
        trace!(date = %self.date, day = %day, "localized day");

        self.sunrise = Some(next_sunrise);
        self.date = self.date + Duration::days(1);
        self.day_of_calendar += 1;
        Ok(day)
    }

    fn advance(&mut self) -> Result<Option<Day>, CalendarError> {
        if !self.skip_ahead()? {
            return Ok(None);
        }
        match self.canonical.next() {
            Some(Ok(canonical)) => self.localize(&canonical).map(Some),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }
}

impl<P: SolarTimeProvider> Iterator for LocalizedDays<P> {
    type Item = Result<Day, CalendarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(day)) => Some(Ok(day)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
