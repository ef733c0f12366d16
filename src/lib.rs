pub mod angles;
pub mod calendar;
pub mod canonical;
pub mod config;
pub mod error;
pub mod format;
pub mod grouping;
pub mod lazy;
pub mod localize;
pub mod solar_events;
pub mod solar_time;
pub mod types;

pub use angles::{
    days_in_year, deg_to_rad, equation_of_time, fractional_year, horizon_crossing_minutes,
    leap_year, rad_to_deg, solar_declination, sunrise_hour_angle, MINUTES_PER_DEGREE,
    SUNRISE_ZENITH,
};

pub use calendar::Calendar;

pub use canonical::{
    canonical_epoch, canonical_location, CanonicalDays, CANONICAL_LATITUDE, CANONICAL_LONGITUDE,
    CANONICAL_TIMEZONE, SOLAR_EVENT_WINDOW_DAYS,
};

pub use config::CalendarConfig;

pub use error::{CalendarError, ConfigError};

pub use format::{format_time, ordinal};

pub use grouping::{group_blocks, group_weeks, group_years, GroupBy};

pub use lazy::LazySeq;

pub use localize::{LocalizedDays, NORTHERN_SKIP_DAYS};

pub use solar_events::{SolarEvent, SolarEventFeed, SolarEventKind};

pub use solar_time::{Location, NoaaSolarTimes, SolarTimeProvider};

pub use types::{
    block_type_from_index, Block, BlockIndex, BlockType, Day, DayIndex, Hemisphere, InBlock,
    InWeek, InYear, Interval, Season, SolarPhase, Time, TimeOfDay, Transition, Week, WeekIndex,
    Weekday, Year, BLOCKS_PER_YEAR, DAYS_PER_WEEK, WEEKS_PER_SEASON,
};
