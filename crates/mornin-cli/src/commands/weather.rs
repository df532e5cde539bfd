//! Weather lookup commands backed by OpenWeatherMap.

use clap::Subcommand;
use chrono::Local;
use mornin_core::providers::WeatherForecastProvider;
use mornin_core::time::arrival_instant;
use mornin_core::{ClockTime, Config, Coordinates, WeatherSnapshot};

use super::{parse_coordinates, parse_now, print_json, runtime};

#[derive(Subcommand)]
pub enum WeatherAction {
    /// Current conditions
    Now {
        /// lat,lng (defaults to the configured position)
        #[arg(long, value_parser = parse_coordinates)]
        position: Option<Coordinates>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast for the next occurrence of a clock time
    At {
        /// Clock time (HH:MM)
        time: ClockTime,
        /// lat,lng (defaults to the configured position)
        #[arg(long, value_parser = parse_coordinates)]
        position: Option<Coordinates>,
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WeatherAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = config.providers.openweather_client();
    let rt = runtime()?;
    let origin = |position: Option<Coordinates>| {
        position
            .or_else(|| config.location.current())
            .unwrap_or_else(|| config.location.fallback())
    };

    match action {
        WeatherAction::Now { position, json } => {
            let snapshot = rt.block_on(client.current(origin(position)))?;
            show(&snapshot, json, &config.providers.units)
        }
        WeatherAction::At {
            time,
            position,
            now,
            json,
        } => {
            let target = match parse_now(now.as_deref())? {
                Some(now) => arrival_instant(time, now),
                None => arrival_instant(time, Local::now()).fixed_offset(),
            };
            let snapshot = rt.block_on(client.forecast_at(origin(position), target))?;
            if !json {
                println!("Forecast for {}", target.format("%a %b %-d %H:%M"));
            }
            show(&snapshot, json, &config.providers.units)
        }
    }
}

fn show(snapshot: &WeatherSnapshot, json: bool, units: &str) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        return print_json(snapshot);
    }
    let degree = match units {
        "metric" => "°C",
        "standard" => "K",
        _ => "°F",
    };
    println!("{} ({})", snapshot.condition, snapshot.description);
    println!(
        "  Temperature:   {:.0}{degree} (feels like {:.0}{degree})",
        snapshot.temperature, snapshot.feels_like
    );
    println!("  Precipitation: {:.1} mm", snapshot.precipitation_amount);
    println!("  Clouds:        {}%", snapshot.cloud_coverage_percent);
    println!("  Humidity:      {}%", snapshot.humidity_percent);
    if snapshot.delay_minutes() > 0 {
        println!("  Adds {} min to the morning", snapshot.delay_minutes());
    }
    Ok(())
}
