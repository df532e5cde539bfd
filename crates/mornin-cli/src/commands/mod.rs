pub mod address;
pub mod completions;
pub mod compute;
pub mod config;
pub mod plan;
pub mod profile;
pub mod weather;

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, TimeZone};
use mornin_core::{ClockTime, Coordinates, ScheduleResult, TimeFormat, ValidationError};
use serde::Serialize;

/// Runtime for the network-bound commands.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// The `--now` flag (RFC 3339). `None` means the caller uses `Local::now()`,
/// which keeps the local zone so DST changes before the arrival are honored.
pub(crate) fn parse_now(raw: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, ValidationError> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s.trim()).map_err(|e| ValidationError::InvalidValue {
            field: "now".into(),
            message: format!("expected RFC 3339 (e.g. 2026-03-10T22:00:00-05:00): {e}"),
        })
    })
    .transpose()
}

/// clap value parser for `lat,lng`.
pub(crate) fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng', got '{raw}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{lng}'"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {lat},{lng}"));
    }
    Ok(Coordinates::new(lat, lng))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn day_suffix<Tz: TimeZone>(at: DateTime<FixedOffset>, now: &DateTime<Tz>) -> String {
    match (at.with_timezone(&now.timezone()).date_naive() - now.date_naive()).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        _ => at.format("%a %b %-d").to_string(),
    }
}

/// Human-readable schedule with the itemized breakdown.
pub(crate) fn render_schedule<Tz: TimeZone>(
    result: &ScheduleResult,
    format: TimeFormat,
    now: DateTime<Tz>,
) -> String {
    let t = |time: ClockTime| time.format(format);
    let b = &result.breakdown;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Wake up:     {} ({})",
        t(result.wake_up_time),
        day_suffix(result.wake_at, &now)
    );
    if result.snooze_count > 0 {
        let plural = if result.snooze_count == 1 { "" } else { "s" };
        let _ = writeln!(
            out,
            "First alarm: {} ({} snooze{plural} included)",
            t(result.first_alarm_time),
            result.snooze_count
        );
    }
    let _ = writeln!(out);

    let mut rows: Vec<(&str, String)> = vec![
        ("Getting ready", b.get_ready.to_string()),
        ("Normal commute", b.commute.to_string()),
        ("Traffic delay", format!("+{}", b.traffic_delay)),
    ];
    if b.weather_delay > 0 {
        rows.push(("Weather delay", format!("+{}", b.weather_delay)));
    }
    rows.push(("Buffer time", b.buffer.to_string()));
    rows.push(("Personal buffer", b.personal_buffer.to_string()));
    if b.snooze_time > 0 {
        rows.push(("Snooze time", b.snooze_time.to_string()));
    }
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<18}{value:>5} min");
    }
    let _ = writeln!(out, "  {}", "-".repeat(27));
    let _ = writeln!(
        out,
        "  {:<18}{:>9} ({})",
        "Arrival time",
        t(result.arrival_time),
        day_suffix(result.arrival_at, &now)
    );

    if let Some(e) = &result.traffic_error {
        let _ = writeln!(out);
        let _ = writeln!(out, "Traffic unavailable ({e}); assumed the fallback commute.");
    }
    out
}
