use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::error::CalendarError;

/// Solstice and equinox kinds, named for the southern hemisphere the
/// reference location sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarEventKind {
    /// December solstice.
    SummerSolstice,
    /// March equinox.
    AutumnalEquinox,
    /// June solstice.
    WinterSolstice,
    /// September equinox.
    VernalEquinox,
}

impl SolarEventKind {
    pub fn name(self) -> &'static str {
        match self {
            SolarEventKind::SummerSolstice => "summer solstice",
            SolarEventKind::AutumnalEquinox => "autumnal equinox",
            SolarEventKind::WinterSolstice => "winter solstice",
            SolarEventKind::VernalEquinox => "vernal equinox",
        }
    }
}

impl fmt::Display for SolarEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarEvent<Z: TimeZone = Utc> {
    pub instant: DateTime<Z>,
    pub kind: SolarEventKind,
}

impl<Z: TimeZone> SolarEvent<Z> {
    /// Same instant, expressed in `tz`.
    pub fn localize<Z2: TimeZone>(&self, tz: &Z2) -> SolarEvent<Z2> {
        SolarEvent {
            instant: self.instant.with_timezone(tz),
            kind: self.kind,
        }
    }
}

/// Ascending sequence of solstice/equinox instants.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarEventFeed {
    events: Vec<SolarEvent>,
}

impl SolarEventFeed {
    pub fn new(events: Vec<SolarEvent>) -> Result<SolarEventFeed, CalendarError> {
        if let Some(position) = events
            .windows(2)
            .position(|pair| pair[1].instant < pair[0].instant)
        {
            return Err(CalendarError::UnsortedSolarEvents {
                position: position + 1,
            });
        }
        Ok(SolarEventFeed { events })
    }

    /// Solstices and equinoxes from the March 2024 equinox to the December
    /// 2035 solstice, to the minute.
    pub fn builtin() -> SolarEventFeed {
        let events = BUILTIN_EVENTS
            .iter()
            .filter_map(|&(y, mo, d, h, mi, kind)| {
                Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
                    .single()
                    .map(|instant| SolarEvent { instant, kind })
            })
            .collect();
        SolarEventFeed { events }
    }

    pub fn events(&self) -> &[SolarEvent] {
        &self.events
    }

    /// Events whose civil date in `tz` lies within `days` of `date`.
    pub fn events_near<Z: TimeZone>(&self, date: NaiveDate, tz: &Z, days: i64) -> Vec<&SolarEvent> {
        self.events
            .iter()
            .filter(|event| {
                let event_date = event.instant.with_timezone(tz).date_naive();
                event_date.signed_duration_since(date).num_days().abs() <= days
            })
            .collect()
    }
}

use SolarEventKind::{AutumnalEquinox, SummerSolstice, VernalEquinox, WinterSolstice};

#[rustfmt::skip]
const BUILTIN_EVENTS: &[(i32, u32, u32, u32, u32, SolarEventKind)] = &[
    (2024, 3, 20, 3, 6, AutumnalEquinox),
    (2024, 6, 20, 20, 51, WinterSolstice),
    (2024, 9, 22, 12, 44, VernalEquinox),
    (2024, 12, 21, 9, 20, SummerSolstice),
    (2025, 3, 20, 9, 1, AutumnalEquinox),
    (2025, 6, 21, 2, 42, WinterSolstice),
    (2025, 9, 22, 18, 19, VernalEquinox),
    (2025, 12, 21, 15, 3, SummerSolstice),
    (2026, 3, 20, 14, 46, AutumnalEquinox),
    (2026, 6, 21, 8, 24, WinterSolstice),
    (2026, 9, 23, 0, 5, VernalEquinox),
    (2026, 12, 21, 20, 50, SummerSolstice),
    (2027, 3, 20, 20, 25, AutumnalEquinox),
    (2027, 6, 21, 14, 11, WinterSolstice),
    (2027, 9, 23, 6, 2, VernalEquinox),
    (2027, 12, 22, 2, 42, SummerSolstice),
    (2028, 3, 20, 2, 17, AutumnalEquinox),
    (2028, 6, 20, 20, 2, WinterSolstice),
    (2028, 9, 22, 11, 45, VernalEquinox),
    (2028, 12, 21, 8, 20, SummerSolstice),
    (2029, 3, 20, 8, 2, AutumnalEquinox),
    (2029, 6, 21, 1, 48, WinterSolstice),
    (2029, 9, 22, 17, 38, VernalEquinox),
    (2029, 12, 21, 14, 14, SummerSolstice),
    (2030, 3, 20, 13, 52, AutumnalEquinox),
    (2030, 6, 21, 7, 31, WinterSolstice),
    (2030, 9, 22, 23, 27, VernalEquinox),
    (2030, 12, 21, 20, 9, SummerSolstice),
    (2031, 3, 20, 19, 41, AutumnalEquinox),
    (2031, 6, 21, 13, 17, WinterSolstice),
    (2031, 9, 23, 5, 15, VernalEquinox),
    (2031, 12, 22, 1, 56, SummerSolstice),
    (2032, 3, 20, 1, 22, AutumnalEquinox),
    (2032, 6, 20, 19, 9, WinterSolstice),
    (2032, 9, 22, 11, 11, VernalEquinox),
    (2032, 12, 21, 7, 56, SummerSolstice),
    (2033, 3, 20, 7, 23, AutumnalEquinox),
    (2033, 6, 21, 1, 1, WinterSolstice),
    (2033, 9, 22, 16, 52, VernalEquinox),
    (2033, 12, 21, 13, 46, SummerSolstice),
    (2034, 3, 20, 13, 17, AutumnalEquinox),
    (2034, 6, 21, 6, 44, WinterSolstice),
    (2034, 9, 22, 22, 41, VernalEquinox),
    (2034, 12, 21, 19, 34, SummerSolstice),
    (2035, 3, 20, 19, 3, AutumnalEquinox),
    (2035, 6, 21, 12, 33, WinterSolstice),
    (2035, 9, 23, 4, 39, VernalEquinox),
    (2035, 12, 22, 1, 31, SummerSolstice),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Australia::Sydney;

    #[test]
    fn builtin_feed_is_ascending() {
        let feed = SolarEventFeed::builtin();
        assert_eq!(feed.events().len(), BUILTIN_EVENTS.len());
        assert!(SolarEventFeed::new(feed.events().to_vec()).is_ok());
    }

    #[test]
    fn unsorted_feed_is_rejected() {
        let mut events = SolarEventFeed::builtin().events().to_vec();
        events.swap(4, 5);
        assert_eq!(
            SolarEventFeed::new(events),
            Err(CalendarError::UnsortedSolarEvents { position: 5 })
        );
    }

    #[test]
    fn localize_keeps_instant_and_kind() {
        let event = SolarEventFeed::builtin().events()[0].clone();
        let localized = event.localize(&Sydney);
        assert_eq!(localized.kind, event.kind);
        assert_eq!(localized.instant, event.instant);
        assert_eq!(localized.instant.timezone(), Sydney);
    }

    #[test]
    fn events_near_uses_local_dates() {
        let feed = SolarEventFeed::builtin();
        // 2024-09-22 12:44 UTC is 22:44 on the 22nd in Sydney.
        let date = NaiveDate::from_ymd_opt(2024, 10, 6).unwrap();
        let near = feed.events_near(date, &Sydney, 14);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].kind, SolarEventKind::VernalEquinox);
        let date = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap();
        assert!(feed.events_near(date, &Sydney, 14).is_empty());
    }
}
