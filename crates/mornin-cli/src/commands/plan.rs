//! Plan the next wake-up against the live providers.

use clap::Args;
use chrono::{DateTime, Local, TimeZone};
use mornin_core::providers::ConfiguredLocation;
use mornin_core::time::parse_minutes_lenient;
use mornin_core::{ClockTime, Config, Coordinates, Destination, Planner, SleeperProfile, TimeFormat};
use tracing::debug;

use super::{parse_coordinates, parse_now, print_json, render_schedule, runtime};

#[derive(Args)]
pub struct PlanArgs {
    /// Arrival time (HH:MM); defaults to the configured one
    #[arg(long)]
    arrive: Option<ClockTime>,
    /// Minutes needed to get ready
    #[arg(long)]
    get_ready: Option<String>,
    /// Safety buffer in minutes
    #[arg(long)]
    buffer: Option<String>,
    /// Sleeper profile (heavy-sleeper, normal, light-sleeper, always-late)
    #[arg(long)]
    profile: Option<SleeperProfile>,
    /// Destination address; overrides the saved one
    #[arg(long, alias = "to")]
    destination: Option<String>,
    /// Destination coordinates as lat,lng (skips geocoding)
    #[arg(long, value_parser = parse_coordinates)]
    dest_coords: Option<Coordinates>,
    /// Current position as lat,lng
    #[arg(long, value_parser = parse_coordinates)]
    from: Option<Coordinates>,
    /// Reference time (RFC 3339); defaults to now
    #[arg(long)]
    now: Option<String>,
    /// Clock format: 24h or 12h
    #[arg(long)]
    format: Option<TimeFormat>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    match parse_now(args.now.as_deref())? {
        Some(now) => plan(args, now),
        None => plan(args, Local::now()),
    }
}

fn plan<Tz: TimeZone>(args: PlanArgs, now: DateTime<Tz>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let mut inputs = config.schedule_inputs();
    if let Some(arrive) = args.arrive {
        inputs.arrival_time = arrive;
    }
    if let Some(raw) = &args.get_ready {
        inputs.get_ready_minutes = parse_minutes_lenient(raw);
    }
    if let Some(raw) = &args.buffer {
        inputs.buffer_minutes = parse_minutes_lenient(raw);
    }
    if let Some(profile) = args.profile {
        inputs.sleeper_profile = profile;
    }
    match (args.destination, args.dest_coords) {
        (Some(label), coords) => {
            let mut destination = Destination::new(label);
            destination.coordinates = coords;
            inputs.destination = Some(destination);
        }
        (None, Some(coords)) => {
            inputs.destination = Some(Destination::new(coords.to_string()).with_coordinates(coords));
        }
        (None, None) => {}
    }

    debug!(
        arrival = %inputs.arrival_time,
        profile = %inputs.sleeper_profile,
        destination = ?inputs.destination,
        "planning"
    );

    let location = ConfiguredLocation::new(args.from.or_else(|| config.location.current()));
    let here = config.providers.here_client();
    let weather = config.providers.openweather_client();
    let planner = Planner::new(&location, &here, &here, &weather, config.location.fallback());

    let outcome = runtime()?.block_on(planner.plan(&inputs, now.clone()))?;

    if args.json {
        return print_json(&outcome);
    }

    for warning in outcome.warnings() {
        eprintln!("warning: {warning}");
    }
    let format = args.format.unwrap_or(config.schedule.time_format);
    println!("Destination: {}", outcome.destination.label);
    if outcome.traffic.is_available() {
        println!(
            "Traffic:     {} min ({} congestion)",
            outcome.traffic.total_travel_minutes, outcome.traffic.congestion
        );
    }
    let w = &outcome.wake_weather;
    println!(
        "Weather:     {}, {:.0}° at wake-up ({})",
        w.condition, w.temperature, w.description
    );
    println!();
    print!("{}", render_schedule(&outcome.schedule, format, now));
    Ok(())
}
