mod cli;

use std::process;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use solcadre::{format_time, ordinal, Block, BlockType, Calendar, CalendarConfig, Day, Season};

use crate::cli::{CalendarArgs, Cli, Command};

const WIDTH: usize = 50;
const WEEK_HEADER: &str = "| Week | Sun | Mon | Tue | Wed | Thu | Fri | Sat |";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Logs solcadre events to stderr at warn, or info/debug/trace for each `-v`.
/// A `RUST_LOG` filter takes precedence.
fn init_logging(verbose: u8) {
    let level = ["warn", "info", "debug", "trace"][usize::from(verbose.min(3))];
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solcadre={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let timezone = config.timezone()?;
    let calendar = config.build().context("failed to build calendar")?;

    let time = match &cli.time {
        Some(text) => parse_time(text, &timezone)?,
        None => Utc::now().with_timezone(&timezone),
    };
    let Some(found) = calendar.find_time(&time)? else {
        return Err(anyhow!(
            "{} is outside the calendar, which starts {}",
            format_time(&time),
            format_time(&calendar.epoch().start())
        ));
    };
    let day = &found.day;

    match cli.time {
        Some(_) => println!("{} is {}.", format_time(&time), day),
        None => println!("It is now {}.", found),
    }
    println!(
        "The {} day of week {} of {}, year {}.",
        ordinal(i64::from(day.weekday().number())),
        day.week_number(),
        day.block_type(),
        day.year_number()
    );
    println!();
    println!(
        "The day begins at {} and ends at {}; the sun sets at {}.",
        format_time(&day.start()),
        format_time(&day.end()),
        format_time(&day.sunset())
    );
    if let Some(event) = day.solar_event() {
        println!("The {} falls today at {}.", event.kind, format_time(&event.instant));
    }

    if let Some(Command::Calendar(args)) = cli.command {
        println!();
        print_calendar(&calendar, day, &args)?;
    }
    Ok(())
}

/// Config file first, then command-line overrides. Without either, times
/// are shown in the system time zone.
fn resolve_config(cli: &Cli) -> Result<CalendarConfig> {
    let mut config = match &cli.config {
        Some(path) => CalendarConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let mut config = CalendarConfig::default();
            if let Some(timezone) = system_timezone(iana_time_zone::get_timezone()) {
                config.timezone = timezone;
            }
            config
        }
    };
    if let Some(latitude) = cli.latitude {
        config.latitude = latitude;
    }
    if let Some(longitude) = cli.longitude {
        config.longitude = longitude;
    }
    if let Some(timezone) = &cli.timezone {
        config.timezone = timezone.clone();
    }
    Ok(config)
}

/// The host zone name, if chrono-tz knows it.
fn system_timezone<E: std::fmt::Display>(name: Result<String, E>) -> Option<String> {
    match name {
        Ok(name) if name.parse::<Tz>().is_ok() => Some(name),
        Ok(name) => {
            debug!(timezone = %name, "system time zone unknown to chrono-tz");
            None
        }
        Err(e) => {
            debug!(error = %e, "cannot read system time zone");
            None
        }
    }
}

/// RFC 3339, or a naive local time in `timezone`.
fn parse_time(text: &str, timezone: &Tz) -> Result<DateTime<Tz>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.with_timezone(timezone));
    }
    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| anyhow!("cannot parse time({text})"))?;
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("time({text}) does not exist in {}", timezone.name()))
}

fn print_calendar(calendar: &Calendar, today: &Day, args: &CalendarArgs) -> Result<()> {
    let first = calendar
        .block_of(today)?
        .ok_or_else(|| anyhow!("no block holds {today}"))?;
    for block in calendar.iter_blocks(Some(&first), None).take(args.blocks) {
        let block = block?;
        print_block(&block, today);
    }
    Ok(())
}

fn print_block(block: &Block, today: &Day) {
    let rule = "-".repeat(WIDTH);
    if block.block_type() == BlockType::Season(Season::Greentide) {
        println!();
        println!("{:^width$}", format!("* Year {} *", block.year_number()), width = WIDTH);
        println!();
    }
    println!("{:^width$}", format!("- {} -", block.block_type()), width = WIDTH);
    println!("{rule}");
    println!("{}", WEEK_HEADER);
    println!("{rule}");
    for week in block.weeks() {
        let mut cells = vec![format!("  {:>2}  ", week.number())];
        cells.extend(week.days().iter().map(|day| {
            if **day == *today {
                "TODAY"
            } else if day.solar_event().is_some() {
                "SOLAR"
            } else {
                "     "
            }
            .to_string()
        }));
        cells.resize(8, "     ".to_string());
        println!("|{}|", cells.join("|"));
    }
    println!("{rule}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("solcadre").chain(args.iter().copied()))
    }

    #[test]
    fn system_timezone_falls_back_when_unknown() {
        assert_eq!(
            system_timezone::<String>(Ok("Europe/Paris".to_string())),
            Some("Europe/Paris".to_string())
        );
        assert_eq!(system_timezone::<String>(Ok("Mars/Olympus".to_string())), None);
        assert_eq!(system_timezone(Err("no zoneinfo")), None);
    }

    #[test]
    fn timezone_flag_overrides_system_zone() {
        let config = resolve_config(&cli(&["--timezone", "Asia/Tokyo"])).unwrap();
        assert_eq!(config.timezone, "Asia/Tokyo");
    }

    #[test]
    fn default_timezone_is_valid() {
        let config = resolve_config(&cli(&[])).unwrap();
        assert!(config.timezone().is_ok(), "{}", config.timezone);
    }

    #[test]
    fn parse_naive_time_in_zone() {
        let time = parse_time("2025-01-01 12:00", &chrono_tz::Australia::Sydney).unwrap();
        assert_eq!(time.to_rfc3339(), "2025-01-01T12:00:00+11:00");
        assert!(parse_time("tomorrow", &chrono_tz::UTC).is_err());
    }

    #[test]
    fn calendar_prints_following_blocks() {
        let calendar = Calendar::canonical().unwrap();
        let today = calendar.day(100).unwrap().unwrap();
        let args = CalendarArgs { blocks: 3 };
        print_calendar(&calendar, &today, &args).unwrap();
    }
}
