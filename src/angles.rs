use chrono::{Datelike, NaiveDate};

/// Zenith of the sun's centre at apparent sunrise/sunset, allowing for
/// refraction and the solar disc.
pub const SUNRISE_ZENITH: f64 = 90.833;
pub const MINUTES_PER_DEGREE: f64 = 4.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_year(year: i32) -> f64 {
    if leap_year(year) {
        366.0
    } else {
        365.0
    }
}

/// Fractional year in radians for the given date and UTC hour.
pub fn fractional_year(date: NaiveDate, utc_hours: f64) -> f64 {
    let n = date.ordinal() as f64;
    2.0 * std::f64::consts::PI / days_in_year(date.year()) * (n - 1.0 + (utc_hours - 12.0) / 24.0)
}

/// Equation of time in minutes.
pub fn equation_of_time(gamma: f64) -> f64 {
    229.18
        * (0.000075
            + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin())
}

/// Solar declination in radians.
pub fn solar_declination(gamma: f64) -> f64 {
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Hour angle of sunrise in degrees, or `None` when the sun stays above or
/// below the horizon all day.
pub fn sunrise_hour_angle(latitude: f64, declination: f64) -> Option<f64> {
    let lat_rad = deg_to_rad(latitude);
    let cos_h = deg_to_rad(SUNRISE_ZENITH).cos() / (lat_rad.cos() * declination.cos())
        - lat_rad.tan() * declination.tan();
    if !cos_h.is_finite() || !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    Some(rad_to_deg(cos_h.acos()))
}

/// Minutes after 00:00 UTC on `date` at which the sun rises (`rising`) or
/// sets at the given coordinates. May fall outside 0..1440.
pub fn horizon_crossing_minutes(latitude: f64, longitude: f64, date: NaiveDate, rising: bool) -> Option<f64> {
    let sign = if rising { 1.0 } else { -1.0 };
    let mut utc_hours = 12.0 - longitude / 15.0 - sign * 6.0;
    let mut minutes = 0.0;
    // A second pass re-evaluates the orbit at the estimated event time.
    for _ in 0..2 {
        let gamma = fractional_year(date, utc_hours);
        let ha = sunrise_hour_angle(latitude, solar_declination(gamma))?;
        minutes = 720.0 - MINUTES_PER_DEGREE * (longitude + sign * ha) - equation_of_time(gamma);
        utc_hours = minutes / 60.0;
    }
    Some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declination_bounded() {
        for n in 0..366 {
            let gamma = 2.0 * std::f64::consts::PI * n as f64 / 365.0;
            let decl = rad_to_deg(solar_declination(gamma));
            assert!((-23.5..=23.5).contains(&decl), "day {}: {}", n, decl);
        }
    }

    #[test]
    fn no_sunrise_in_polar_winter() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        assert!(horizon_crossing_minutes(-80.0, 0.0, date, true).is_none());
        assert!(horizon_crossing_minutes(80.0, 0.0, date, false).is_none());
    }
}
