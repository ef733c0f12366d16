//! The consumer-facing calendar: lazy day, week, block and year sequences
//! plus instant and positional lookups over them.

use std::rc::Rc;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::canonical::{canonical_location, CANONICAL_TIMEZONE};
use crate::error::CalendarError;
use crate::grouping::{group_blocks, group_weeks, group_years};
use crate::lazy::{Iter, LazySeq};
use crate::localize::LocalizedDays;
use crate::solar_events::SolarEventFeed;
use crate::solar_time::{Location, NoaaSolarTimes, SolarTimeProvider};
use crate::types::{Block, Day, Hemisphere, InBlock, InYear, Interval, Time, Week, Year};

/// A solar calendar localized to one place.
///
/// Every sequence is generated on demand and memoized, so lookups near the
/// epoch are cheap and lookups far in the future pay once. Not thread-safe.
pub struct Calendar {
    location: Location,
    timezone: Tz,
    hemisphere: Hemisphere,
    days: Rc<LazySeq<Day>>,
    weeks: Rc<LazySeq<Week>>,
    blocks: Rc<LazySeq<Block>>,
    years: Rc<LazySeq<Year>>,
    epoch: Rc<Day>,
}

impl Calendar {
    /// Calendar at `location` using NOAA sunrise/sunset and the built-in
    /// solstice/equinox table.
    pub fn new(location: Location, timezone: Tz) -> Result<Calendar, CalendarError> {
        Calendar::with_sources(location, timezone, NoaaSolarTimes, SolarEventFeed::builtin())
    }

    /// Calendar at the reference location itself.
    pub fn canonical() -> Result<Calendar, CalendarError> {
        Calendar::new(canonical_location(), CANONICAL_TIMEZONE)
    }

    pub fn with_sources<P>(
        location: Location,
        timezone: Tz,
        provider: P,
        feed: SolarEventFeed,
    ) -> Result<Calendar, CalendarError>
    where
        P: SolarTimeProvider + 'static,
    {
        let localized = LocalizedDays::new(Rc::new(provider), Rc::new(feed), location, timezone)?;
        let hemisphere = localized.hemisphere();

        let days = Rc::new(LazySeq::new(localized));
        let weeks = Rc::new(LazySeq::new(group_weeks(days.iter(None, None))));
        let blocks = Rc::new(LazySeq::new(group_blocks(weeks.iter(None, None))));
        let years = Rc::new(LazySeq::new(group_years(blocks.iter(None, None))));

        let epoch = days.get(0)?.ok_or(CalendarError::NoDays)?;
        info!(
            timezone = timezone.name(),
            ?hemisphere,
            epoch = %epoch.start(),
            "calendar ready"
        );

        Ok(Calendar {
            location,
            timezone,
            hemisphere,
            days,
            weeks,
            blocks,
            years,
            epoch,
        })
    }

    /// First day of the calendar.
    pub fn epoch(&self) -> Rc<Day> {
        Rc::clone(&self.epoch)
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Day at position `day_of_calendar`, or `None` past the end of the
    /// solar-event feed.
    pub fn day(&self, day_of_calendar: usize) -> Result<Option<Rc<Day>>, CalendarError> {
        self.days.get(day_of_calendar)
    }

    pub fn find_day<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<Option<Rc<Day>>, CalendarError> {
        self.find(&self.days, time)
    }

    pub fn find_week<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<Option<Rc<Week>>, CalendarError> {
        self.find(&self.weeks, time)
    }

    pub fn find_block<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<Option<Rc<Block>>, CalendarError> {
        self.find(&self.blocks, time)
    }

    pub fn find_year<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<Option<Rc<Year>>, CalendarError> {
        self.find(&self.years, time)
    }

    /// The day containing `time` and the clock time and solar phase within it.
    pub fn find_time<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<Option<Time>, CalendarError> {
        let Some(day) = self.find_day(time)? else {
            return Ok(None);
        };
        let time_of_day = day.time_of_day(time)?;
        Ok(Some(Time { day, time_of_day }))
    }

    /// Scans forward from the start of `seq`. Units are contiguous and
    /// ascending, so the scan stops at the first unit starting after `time`.
    fn find<T, Z>(&self, seq: &Rc<LazySeq<T>>, time: &DateTime<Z>) -> Result<Option<Rc<T>>, CalendarError>
    where
        T: Interval,
        Z: TimeZone,
    {
        let time = time.with_timezone(&self.timezone);
        if time < self.epoch.start() {
            return Ok(None);
        }
        for unit in seq.iter(None, None) {
            let unit = unit?;
            if unit.start() > time {
                break;
            }
            if Interval::contains(&*unit, &time) {
                return Ok(Some(unit));
            }
        }
        debug!(time = %time, "no unit contains time");
        Ok(None)
    }

    /// Days from `start` up to but excluding `end`.
    pub fn iter_days(&self, start: Option<&Day>, end: Option<&Day>) -> Iter<Day> {
        self.days.iter(
            start.map(Day::day_of_calendar),
            end.map(Day::day_of_calendar),
        )
    }

    pub fn iter_weeks(&self, start: Option<&Week>, end: Option<&Week>) -> Iter<Week> {
        self.weeks.iter(
            start.map(Week::week_of_calendar),
            end.map(Week::week_of_calendar),
        )
    }

    pub fn iter_blocks(&self, start: Option<&Block>, end: Option<&Block>) -> Iter<Block> {
        self.blocks.iter(
            start.map(Block::block_of_calendar),
            end.map(Block::block_of_calendar),
        )
    }

    pub fn iter_years(&self, start: Option<&Year>, end: Option<&Year>) -> Iter<Year> {
        self.years.iter(
            start.map(Year::years_since_epoch),
            end.map(Year::years_since_epoch),
        )
    }

    /// Year holding `unit`. `None` for a unit before the calendar's first
    /// year, which happens when the localized start skips a leap week.
    pub fn year_of<U: InYear + ?Sized>(&self, unit: &U) -> Result<Option<Rc<Year>>, CalendarError> {
        let offset = unit.year_of_calendar() - self.epoch.year_of_calendar();
        match usize::try_from(offset) {
            Ok(years_since_epoch) => self.years.get(years_since_epoch),
            Err(_) => Ok(None),
        }
    }

    pub fn block_of<U: InBlock + ?Sized>(&self, unit: &U) -> Result<Option<Rc<Block>>, CalendarError> {
        let Some(year) = self.year_of(unit)? else {
            return Ok(None);
        };
        Ok(year
            .blocks()
            .iter()
            .find(|block| block.index().block_of_year == unit.block_of_year())
            .cloned())
    }

    pub fn week_of(&self, day: &Day) -> Result<Option<Rc<Week>>, CalendarError> {
        let Some(block) = self.block_of(day)? else {
            return Ok(None);
        };
        Ok(block
            .weeks()
            .iter()
            .find(|week| week.index().week_of_block == day.index().week_of_block)
            .cloned())
    }
}
