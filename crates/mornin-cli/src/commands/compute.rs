//! Offline computation: no providers, every figure comes from the flags.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use clap::Args;
use mornin_core::time::parse_minutes_lenient;
use mornin_core::{
    engine, ClockTime, Config, ScheduleInputs, ScheduleResult, SleeperProfile, TimeFormat,
    TrafficSnapshot, WeatherSnapshot,
};
use serde::Serialize;

use super::{parse_now, print_json, render_schedule};

#[derive(Args)]
pub struct ComputeArgs {
    /// Arrival time (HH:MM)
    #[arg(long)]
    arrive: ClockTime,
    /// Minutes needed to get ready
    #[arg(long, default_value = "30")]
    get_ready: String,
    /// Safety buffer in minutes
    #[arg(long, default_value = "10")]
    buffer: String,
    /// Sleeper profile (heavy-sleeper, normal, light-sleeper, always-late)
    #[arg(long, default_value = "normal")]
    profile: SleeperProfile,
    /// Travel time under current traffic, in minutes; omit when unknown
    #[arg(long)]
    travel: Option<u32>,
    /// Free-flow travel time in minutes; defaults to --travel
    #[arg(long, requires = "travel")]
    baseline: Option<u32>,
    /// Commute assumed when --travel is omitted; defaults to the configured one
    #[arg(long)]
    fallback_commute: Option<u32>,
    /// Precipitation forecast at wake-up, in mm
    #[arg(long, default_value_t = 0.0)]
    precipitation: f64,
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

#[derive(Serialize)]
struct ComputeOutput {
    provisional_wake_time: ClockTime,
    weather_target: DateTime<FixedOffset>,
    #[serde(flatten)]
    schedule: ScheduleResult,
}

pub fn run(args: ComputeArgs) -> Result<(), Box<dyn std::error::Error>> {
    match parse_now(args.now.as_deref())? {
        Some(now) => compute(args, now),
        None => compute(args, Local::now()),
    }
}

fn compute<Tz: TimeZone>(args: ComputeArgs, now: DateTime<Tz>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let inputs = ScheduleInputs::new(args.arrive)
        .get_ready(parse_minutes_lenient(&args.get_ready))
        .buffer(parse_minutes_lenient(&args.buffer))
        .profile(args.profile)
        .fallback_commute(
            args.fallback_commute
                .unwrap_or(config.schedule.fallback_commute_minutes),
        );

    let traffic = match args.travel {
        Some(total) => TrafficSnapshot::from_durations(total, args.baseline.unwrap_or(total)),
        None => TrafficSnapshot::unavailable("no travel time given"),
    };
    let weather = WeatherSnapshot {
        precipitation_amount: args.precipitation.max(0.0),
        ..WeatherSnapshot::default()
    };

    let estimate = engine::estimate(&inputs, &traffic, now.clone());
    let schedule = estimate.refine(&weather);

    if args.json {
        return print_json(&ComputeOutput {
            provisional_wake_time: estimate.wake_time,
            weather_target: estimate.weather_target,
            schedule,
        });
    }

    let format = args.format.unwrap_or(config.schedule.time_format);
    print!("{}", render_schedule(&schedule, format, now));
    Ok(())
}
