use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::CalendarError;
use crate::solar_events::SolarEvent;

pub const DAYS_PER_WEEK: u8 = 7;
pub const BLOCKS_PER_YEAR: u8 = 8;
pub const WEEKS_PER_SEASON: u8 = 12;

/// The four 12-week seasons. Discriminants are block-of-year positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Greentide = 0,
    Suncrest = 2,
    Emberwane = 4,
    Frostfall = 6,
}

/// The four solstice/equinox transitions. Discriminants are block-of-year positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    SummerSolstice = 1,
    AutumnalEquinox = 3,
    WinterSolstice = 5,
    VernalEquinox = 7,
}

impl Season {
    /// The season 180 degrees away in the cycle.
    pub fn flip(self) -> Season {
        match self {
            Season::Greentide => Season::Emberwane,
            Season::Suncrest => Season::Frostfall,
            Season::Emberwane => Season::Greentide,
            Season::Frostfall => Season::Suncrest,
        }
    }

    /// The transition that closes this season.
    pub fn next(self) -> Transition {
        match self {
            Season::Greentide => Transition::SummerSolstice,
            Season::Suncrest => Transition::AutumnalEquinox,
            Season::Emberwane => Transition::WinterSolstice,
            Season::Frostfall => Transition::VernalEquinox,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Greentide => "Greentide",
            Season::Suncrest => "Suncrest",
            Season::Emberwane => "Emberwane",
            Season::Frostfall => "Frostfall",
        }
    }
}

impl Transition {
    /// The transition 180 degrees away in the cycle.
    pub fn flip(self) -> Transition {
        match self {
            Transition::SummerSolstice => Transition::WinterSolstice,
            Transition::AutumnalEquinox => Transition::VernalEquinox,
            Transition::WinterSolstice => Transition::SummerSolstice,
            Transition::VernalEquinox => Transition::AutumnalEquinox,
        }
    }

    /// The season that follows this transition.
    pub fn next(self) -> Season {
        match self {
            Transition::SummerSolstice => Season::Suncrest,
            Transition::AutumnalEquinox => Season::Emberwane,
            Transition::WinterSolstice => Season::Frostfall,
            Transition::VernalEquinox => Season::Greentide,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::SummerSolstice => "Summer Solstice",
            Transition::AutumnalEquinox => "Autumnal Equinox",
            Transition::WinterSolstice => "Winter Solstice",
            Transition::VernalEquinox => "Vernal Equinox",
        }
    }
}

/// A block of the year: either a season or a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Season(Season),
    Transition(Transition),
}

/// Maps a block-of-year position (taken modulo 8) to its block type.
pub fn block_type_from_index(index: u8) -> BlockType {
    match index % BLOCKS_PER_YEAR {
        0 => BlockType::Season(Season::Greentide),
        1 => BlockType::Transition(Transition::SummerSolstice),
        2 => BlockType::Season(Season::Suncrest),
        3 => BlockType::Transition(Transition::AutumnalEquinox),
        4 => BlockType::Season(Season::Emberwane),
        5 => BlockType::Transition(Transition::WinterSolstice),
        6 => BlockType::Season(Season::Frostfall),
        _ => BlockType::Transition(Transition::VernalEquinox),
    }
}

impl BlockType {
    pub fn index(self) -> u8 {
        match self {
            BlockType::Season(season) => season.index(),
            BlockType::Transition(transition) => transition.index(),
        }
    }

    /// 1-based block number within the year (1..=8).
    pub fn number(self) -> u8 {
        self.index() + 1
    }

    pub fn flip(self) -> BlockType {
        match self {
            BlockType::Season(season) => BlockType::Season(season.flip()),
            BlockType::Transition(transition) => BlockType::Transition(transition.flip()),
        }
    }

    pub fn next(self) -> BlockType {
        match self {
            BlockType::Season(season) => BlockType::Transition(season.next()),
            BlockType::Transition(transition) => BlockType::Season(transition.next()),
        }
    }

    pub fn is_season(self) -> bool {
        matches!(self, BlockType::Season(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Season(season) => season.name(),
            BlockType::Transition(transition) => transition.name(),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day of the week, numbered from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub fn from_index(index: u8) -> Weekday {
        match index % DAYS_PER_WEEK {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    pub fn from_date(date: NaiveDate) -> Weekday {
        Weekday::from_index(date.weekday().num_days_from_sunday() as u8)
    }

    /// 1-based weekday number (1 is Sunday).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

/// Whether a moment within a day falls in daylight or night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarPhase {
    Day,
    Night,
}

impl SolarPhase {
    pub fn abbreviation(self) -> char {
        match self {
            SolarPhase::Day => 'D',
            SolarPhase::Night => 'N',
        }
    }
}

/// Clock time within a day plus its solar phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub time: NaiveTime,
    pub solar_phase: SolarPhase,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.time.format("%H:%M:%S"),
            self.solar_phase.abbreviation()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    /// The equator itself counts as southern.
    pub fn from_latitude(latitude: f64) -> Hemisphere {
        if latitude > 0.0 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }
}

/// Position of a day within the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayIndex {
    pub year_of_calendar: i32,
    pub block_of_year: u8,
    pub week_of_block: u8,
    pub day_of_week: u8,
    pub day_of_calendar: usize,
}

/// Units that belong to a year.
pub trait InYear {
    fn year_of_calendar(&self) -> i32;
}

/// Units that belong to a block.
pub trait InBlock: InYear {
    fn block_of_year(&self) -> u8;
}

/// Units that belong to a week.
pub trait InWeek: InBlock {
    fn week_of_block(&self) -> u8;
}

/// A sunrise-to-sunrise day.
///
/// Equality and hashing use only `day_of_calendar`.
#[derive(Debug, Clone)]
pub struct Day {
    sunrise: DateTime<Tz>,
    sunset: DateTime<Tz>,
    next_sunrise: DateTime<Tz>,
    solar_event: Option<SolarEvent<Tz>>,
    index: DayIndex,
}

impl Day {
    /// Builds a day, rejecting a sunset that lands on a different civil date
    /// than the sunrise.
    pub fn new(
        sunrise: DateTime<Tz>,
        sunset: DateTime<Tz>,
        next_sunrise: DateTime<Tz>,
        solar_event: Option<SolarEvent<Tz>>,
        index: DayIndex,
    ) -> Result<Day, CalendarError> {
        if sunrise.date_naive() != sunset.date_naive() {
            return Err(CalendarError::SunriseSunsetDateMismatch {
                sunrise: sunrise.date_naive(),
                sunset: sunset.date_naive(),
            });
        }
        Ok(Day {
            sunrise,
            sunset,
            next_sunrise,
            solar_event,
            index,
        })
    }

    pub fn sunrise(&self) -> DateTime<Tz> {
        self.sunrise
    }

    pub fn sunset(&self) -> DateTime<Tz> {
        self.sunset
    }

    pub fn next_sunrise(&self) -> DateTime<Tz> {
        self.next_sunrise
    }

    pub fn solar_event(&self) -> Option<&SolarEvent<Tz>> {
        self.solar_event.as_ref()
    }

    pub fn index(&self) -> &DayIndex {
        &self.index
    }

    pub fn day_of_calendar(&self) -> usize {
        self.index.day_of_calendar
    }

    /// Civil date of the sunrise.
    pub fn date(&self) -> NaiveDate {
        self.sunrise.date_naive()
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.sunrise
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.next_sunrise
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from_index(self.index.day_of_week)
    }

    pub fn week_number(&self) -> u8 {
        self.index.week_of_block + 1
    }

    pub fn block_type(&self) -> BlockType {
        block_type_from_index(self.index.block_of_year)
    }

    pub fn year_number(&self) -> i32 {
        self.index.year_of_calendar + 1
    }

    pub fn contains<Z: TimeZone>(&self, time: &DateTime<Z>) -> bool {
        let time = time.with_timezone(&self.sunrise.timezone());
        self.sunrise <= time && time < self.next_sunrise
    }

    /// Daylight up to and including sunset, night afterwards.
    pub fn solar_phase<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<SolarPhase, CalendarError> {
        let time = self.checked_time(time)?;
        if time <= self.sunset {
            Ok(SolarPhase::Day)
        } else {
            Ok(SolarPhase::Night)
        }
    }

    pub fn time_of_day<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<TimeOfDay, CalendarError> {
        let solar_phase = self.solar_phase(time)?;
        let local = time.with_timezone(&self.sunrise.timezone());
        Ok(TimeOfDay {
            time: local.time(),
            solar_phase,
        })
    }

    fn checked_time<Z: TimeZone>(&self, time: &DateTime<Z>) -> Result<DateTime<Tz>, CalendarError> {
        let local = time.with_timezone(&self.sunrise.timezone());
        if self.sunrise <= local && local < self.next_sunrise {
            Ok(local)
        } else {
            Err(CalendarError::OutOfRange {
                time: local.to_rfc3339(),
                day: self.to_string(),
                start: self.sunrise.to_rfc3339(),
                end: self.next_sunrise.to_rfc3339(),
            })
        }
    }
}

impl PartialEq for Day {
    fn eq(&self, other: &Self) -> bool {
        self.index.day_of_calendar == other.index.day_of_calendar
    }
}

impl Eq for Day {}

impl Hash for Day {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.day_of_calendar.hash(state);
    }
}

impl InYear for Day {
    fn year_of_calendar(&self) -> i32 {
        self.index.year_of_calendar
    }
}

impl InBlock for Day {
    fn block_of_year(&self) -> u8 {
        self.index.block_of_year
    }
}

impl InWeek for Day {
    fn week_of_block(&self) -> u8 {
        self.index.week_of_block
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.year_number(),
            self.block_type().number(),
            self.week_number(),
            self.weekday().number()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekIndex {
    pub year_of_calendar: i32,
    pub block_of_year: u8,
    pub week_of_block: u8,
    pub week_of_calendar: usize,
}

/// Seven consecutive days of one block.
#[derive(Debug, Clone)]
pub struct Week {
    days: Vec<Rc<Day>>,
    index: WeekIndex,
}

impl Week {
    /// `days` must be non-empty and share one (year, block, week) key.
    pub(crate) fn new(days: Vec<Rc<Day>>, week_of_calendar: usize) -> Week {
        let first = days[0].index;
        Week {
            index: WeekIndex {
                year_of_calendar: first.year_of_calendar,
                block_of_year: first.block_of_year,
                week_of_block: first.week_of_block,
                week_of_calendar,
            },
            days,
        }
    }

    pub fn days(&self) -> &[Rc<Day>] {
        &self.days
    }

    pub fn index(&self) -> &WeekIndex {
        &self.index
    }

    pub fn week_of_calendar(&self) -> usize {
        self.index.week_of_calendar
    }

    pub fn number(&self) -> u8 {
        self.index.week_of_block + 1
    }

    pub fn block_type(&self) -> BlockType {
        block_type_from_index(self.index.block_of_year)
    }

    pub fn year_number(&self) -> i32 {
        self.index.year_of_calendar + 1
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.days[0].start()
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.days[self.days.len() - 1].end()
    }
}

impl PartialEq for Week {
    fn eq(&self, other: &Self) -> bool {
        self.index.week_of_calendar == other.index.week_of_calendar
    }
}

impl Eq for Week {}

impl Hash for Week {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.week_of_calendar.hash(state);
    }
}

impl InYear for Week {
    fn year_of_calendar(&self) -> i32 {
        self.index.year_of_calendar
    }
}

impl InBlock for Week {
    fn block_of_year(&self) -> u8 {
        self.index.block_of_year
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.year_number(),
            self.block_type().number(),
            self.number()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockIndex {
    pub year_of_calendar: i32,
    pub block_of_year: u8,
    pub block_of_calendar: usize,
}

/// A season or transition, made of consecutive weeks.
#[derive(Debug, Clone)]
pub struct Block {
    weeks: Vec<Rc<Week>>,
    index: BlockIndex,
}

impl Block {
    /// `weeks` must be non-empty and share one (year, block) key.
    pub(crate) fn new(weeks: Vec<Rc<Week>>, block_of_calendar: usize) -> Block {
        let first = weeks[0].index;
        Block {
            index: BlockIndex {
                year_of_calendar: first.year_of_calendar,
                block_of_year: first.block_of_year,
                block_of_calendar,
            },
            weeks,
        }
    }

    pub fn weeks(&self) -> &[Rc<Week>] {
        &self.weeks
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn block_of_calendar(&self) -> usize {
        self.index.block_of_calendar
    }

    pub fn block_type(&self) -> BlockType {
        block_type_from_index(self.index.block_of_year)
    }

    pub fn year_number(&self) -> i32 {
        self.index.year_of_calendar + 1
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.weeks[0].start()
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.weeks[self.weeks.len() - 1].end()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.index.block_of_calendar == other.index.block_of_calendar
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.block_of_calendar.hash(state);
    }
}

impl InYear for Block {
    fn year_of_calendar(&self) -> i32 {
        self.index.year_of_calendar
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year_number(), self.block_type().number())
    }
}

/// A run of blocks from GREENTIDE through the VERNAL_EQUINOX transition.
#[derive(Debug, Clone)]
pub struct Year {
    blocks: Vec<Rc<Block>>,
    year_of_calendar: i32,
    years_since_epoch: usize,
}

impl Year {
    /// `blocks` must be non-empty and share one year.
    pub(crate) fn new(blocks: Vec<Rc<Block>>, years_since_epoch: usize) -> Year {
        Year {
            year_of_calendar: blocks[0].index.year_of_calendar,
            blocks,
            years_since_epoch,
        }
    }

    pub fn blocks(&self) -> &[Rc<Block>] {
        &self.blocks
    }

    /// Position of this year in the calendar's year sequence.
    pub fn years_since_epoch(&self) -> usize {
        self.years_since_epoch
    }

    pub fn number(&self) -> i32 {
        self.year_of_calendar + 1
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.blocks[0].start()
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.blocks[self.blocks.len() - 1].end()
    }
}

impl PartialEq for Year {
    fn eq(&self, other: &Self) -> bool {
        self.years_since_epoch == other.years_since_epoch
    }
}

impl Eq for Year {}

impl Hash for Year {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.years_since_epoch.hash(state);
    }
}

impl InYear for Year {
    fn year_of_calendar(&self) -> i32 {
        self.year_of_calendar
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A unit covering the half-open interval `[start, end)`.
pub trait Interval {
    fn start(&self) -> DateTime<Tz>;

    fn end(&self) -> DateTime<Tz>;

    fn contains<Z: TimeZone>(&self, time: &DateTime<Z>) -> bool {
        let time = time.with_timezone(&self.start().timezone());
        self.start() <= time && time < self.end()
    }
}

macro_rules! impl_interval {
    ($($unit:ty),*) => {
        $(
            impl Interval for $unit {
                fn start(&self) -> DateTime<Tz> {
                    <$unit>::start(self)
                }

                fn end(&self) -> DateTime<Tz> {
                    <$unit>::end(self)
                }
            }
        )*
    };
}

impl_interval!(Day, Week, Block, Year);

/// A point in time expressed as a day plus a time of day.
#[derive(Debug, Clone)]
pub struct Time {
    pub day: Rc<Day>,
    pub time_of_day: TimeOfDay,
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time_of_day)
    }
}
