use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Australia::Sydney;
use chrono_tz::Europe::London;
use chrono_tz::Tz;

use solcadre::types::*;
use solcadre::{canonical_epoch, Calendar, CalendarError, Location};

fn sydney(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
    Sydney.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn minutes_of_day(time: &DateTime<Tz>) -> u32 {
    time.hour() * 60 + time.minute()
}

fn london() -> Calendar {
    Calendar::new(Location::new(51.5072, -0.1276), London).unwrap()
}

// ── Reference location ──

#[test]
fn test_epoch_is_sunday_sunrise() {
    let calendar = Calendar::canonical().unwrap();
    let epoch = calendar.epoch();
    assert_eq!(epoch.date(), canonical_epoch());
    assert_eq!(epoch.weekday(), Weekday::Sunday);
    assert_eq!(epoch.block_type(), BlockType::Season(Season::Greentide));
    assert_eq!(epoch.to_string(), "1/1/1/1");
    assert_eq!(calendar.hemisphere(), Hemisphere::Southern);
    // NOAA puts sunrise at about 05:46 AEST.
    let sunrise = minutes_of_day(&epoch.sunrise());
    assert!((5 * 60 + 40..=5 * 60 + 52).contains(&sunrise), "sunrise {}", epoch.sunrise());
}

#[test]
fn test_second_day_follows_epoch() {
    let calendar = Calendar::canonical().unwrap();
    let epoch = calendar.epoch();
    let second = calendar.day(1).unwrap().unwrap();
    assert_eq!(second.weekday(), Weekday::Monday);
    assert_eq!(second.sunrise(), epoch.next_sunrise());
    assert_eq!(second.date(), NaiveDate::from_ymd_opt(2024, 9, 23).unwrap());
}

#[test]
fn test_days_are_contiguous() {
    let calendar = Calendar::canonical().unwrap();
    let days: Vec<_> = calendar.iter_days(None, None).take(400).map(|d| d.unwrap()).collect();
    for day in &days {
        assert_eq!(day.sunrise().date_naive(), day.sunset().date_naive(), "{day}");
        assert!(day.sunrise() < day.sunset() && day.sunset() < day.next_sunrise());
    }
    for pair in days.windows(2) {
        assert_eq!(pair[1].sunrise(), pair[0].next_sunrise());
        assert_eq!(pair[1].day_of_calendar(), pair[0].day_of_calendar() + 1);
    }
}

#[test]
fn test_first_year_has_leap_week_at_vernal_equinox() {
    // The September 2025 equinox falls early on the 23rd, after sunset on the
    // 22nd, so the closing transition runs two weeks.
    let calendar = Calendar::canonical().unwrap();
    let year = calendar.iter_years(None, None).next().unwrap().unwrap();
    let weeks: Vec<usize> = year.blocks().iter().map(|b| b.weeks().len()).collect();
    assert_eq!(weeks, vec![12, 1, 12, 1, 12, 1, 12, 2]);

    let second = calendar.find_year(&sydney(2025, 10, 1, 12)).unwrap().unwrap();
    assert_eq!(second.number(), 2);
    assert_eq!(second.start().date_naive(), NaiveDate::from_ymd_opt(2025, 9, 28).unwrap());
    assert_eq!(second.start(), year.end());
}

#[test]
fn test_find_day_new_year() {
    let calendar = Calendar::canonical().unwrap();
    let day = calendar.find_day(&sydney(2025, 1, 1, 12)).unwrap().unwrap();
    assert_eq!(day.to_string(), "1/3/2/4");
    assert_eq!(day.weekday(), Weekday::Wednesday);
    assert!(day.contains(&sydney(2025, 1, 1, 12)));
}

#[test]
fn test_find_day_matches_interval() {
    let calendar = Calendar::canonical().unwrap();
    let t = Utc.with_ymd_and_hms(2025, 2, 14, 18, 30, 0).unwrap();
    let day = calendar.find_day(&t).unwrap().unwrap();
    assert!(day.start() <= t && t < day.end());

    let week = calendar.find_week(&t).unwrap().unwrap();
    assert!(week.days().contains(&day));
    let block = calendar.find_block(&t).unwrap().unwrap();
    assert_eq!(block.block_type(), day.block_type());
}

#[test]
fn test_find_time_phase() {
    let calendar = Calendar::canonical().unwrap();
    let noon = calendar.find_time(&sydney(2024, 9, 22, 12)).unwrap().unwrap();
    assert_eq!(noon.day.day_of_calendar(), 0);
    assert_eq!(noon.time_of_day.solar_phase, SolarPhase::Day);

    let night = calendar.find_time(&sydney(2024, 9, 23, 5)).unwrap().unwrap();
    assert_eq!(night.day.day_of_calendar(), 0);
    assert_eq!(night.time_of_day.solar_phase, SolarPhase::Night);
    assert_eq!(night.to_string(), "1/1/1/1 05:00:00 N");
}

#[test]
fn test_solar_events_fall_in_transitions() {
    let calendar = Calendar::canonical().unwrap();
    let days: Vec<_> = calendar.iter_days(None, None).take(371).map(|d| d.unwrap()).collect();
    let events: Vec<_> = days.iter().filter(|d| d.solar_event().is_some()).collect();
    // The 22 September 2024 equinox lands on the epoch itself.
    assert_eq!(events.len(), 5);
    for day in &events[1..] {
        assert!(!day.block_type().is_season(), "{day}");
    }
}

// ── Other locations ──

#[test]
fn test_northern_calendar_start() {
    let calendar = london();
    assert_eq!(calendar.hemisphere(), Hemisphere::Northern);
    let epoch = calendar.epoch();
    assert_eq!(epoch.date(), NaiveDate::from_ymd_opt(2025, 3, 23).unwrap());
    assert_eq!(epoch.weekday(), Weekday::Sunday);
    assert_eq!(epoch.block_type(), BlockType::Season(Season::Greentide));
    assert_eq!(epoch.year_number(), 1);
    assert!(calendar.find_day(&Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()).unwrap().is_none());
}

#[test]
fn test_northern_and_southern_blocks_are_opposite() {
    let south = Calendar::canonical().unwrap();
    let north = london();
    for (m, d) in [(4, 15), (6, 1), (8, 1), (11, 1)] {
        let t = Utc.with_ymd_and_hms(2025, m, d, 10, 0, 0).unwrap();
        let s = south.find_day(&t).unwrap().unwrap();
        let n = north.find_day(&t).unwrap().unwrap();
        assert_eq!(n.block_type(), s.block_type().flip(), "at {t}");
    }
}

#[test]
fn test_equator_is_southern() {
    let calendar = Calendar::new(Location::new(0.0, 0.0), chrono_tz::UTC).unwrap();
    assert_eq!(calendar.hemisphere(), Hemisphere::Southern);
    assert_eq!(calendar.epoch().date(), canonical_epoch());
}

#[test]
fn test_polar_latitude_fails() {
    let calendar = Calendar::new(Location::new(-80.0, 0.0), chrono_tz::UTC).unwrap();
    let results: Vec<_> = calendar.iter_days(None, None).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert!((20..30).contains(&ok), "{ok} days before failure");
    match results.last() {
        Some(Err(err @ CalendarError::InvalidLatitude { .. })) => {
            assert!(!err.is_contract_violation());
            assert!(err.to_string().starts_with("latitude(-80) is invalid"));
        }
        other => panic!("expected InvalidLatitude, got {other:?}"),
    }
}
