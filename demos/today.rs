use chrono::TimeZone;
use chrono_tz::Europe::London;

use solcadre::{format_time, Calendar, Location};

fn main() {
    let latitude = 51.5072;
    let longitude = -0.1276;

    let calendar = Calendar::new(Location::new(latitude, longitude), London).unwrap();
    let dt = London.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();

    println!("=== Solcadre Date Example ===");
    println!("Location: London ({:.4}°N, {:.4}°W)", latitude, -longitude);
    println!("Hemisphere: {:?}", calendar.hemisphere());
    println!("Calendar starts: {}", format_time(&calendar.epoch().start()));
    println!("Date/Time: {}", dt);
    println!();

    let time = calendar.find_time(&dt).unwrap().unwrap();
    let day = &time.day;
    println!("--- Day ---");
    println!("Path: {}", day);
    println!("Time of day: {}", time.time_of_day);
    println!("Block: {}", day.block_type());
    println!("Week: {}", day.week_number());
    println!("Weekday: {:?}", day.weekday());
    println!("Sunrise: {}", format_time(&day.sunrise()));
    println!("Sunset: {}", format_time(&day.sunset()));
    println!("Next sunrise: {}", format_time(&day.next_sunrise()));
    println!();

    let block = calendar.block_of(day.as_ref()).unwrap().unwrap();
    println!("--- Block ---");
    println!(
        "{} runs {} weeks, {} to {}",
        block.block_type(),
        block.weeks().len(),
        format_time(&block.start()),
        format_time(&block.end())
    );
    for week in block.weeks() {
        if let Some(event) = week.days().iter().find_map(|d| d.solar_event()) {
            println!("Week {}: {} at {}", week.number(), event.kind, format_time(&event.instant));
        }
    }
}
