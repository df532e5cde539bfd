//! Sleeper profile listing.

use clap::Subcommand;
use mornin_core::{Config, SleeperProfile};
use serde::Serialize;

use super::print_json;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List the sleeper profiles and what each adds to the morning
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRow {
    key: &'static str,
    label: &'static str,
    snooze_count: u32,
    snooze_minutes: u32,
    extra_buffer_minutes: u32,
    active: bool,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::List { json } => list(json),
    }
}

fn list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let active = Config::load_or_default().schedule.sleeper_profile;
    let rows: Vec<ProfileRow> = SleeperProfile::ALL
        .iter()
        .map(|&profile| {
            let spec = profile.spec();
            ProfileRow {
                key: profile.key(),
                label: spec.label,
                snooze_count: spec.snooze_count,
                snooze_minutes: spec.snooze_minutes(),
                extra_buffer_minutes: spec.extra_buffer_minutes,
                active: profile == active,
            }
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    println!("Sleeper Profiles:");
    println!();
    for row in rows {
        let marker = if row.active { " [ACTIVE]" } else { "" };
        println!("  {} - {}{}", row.key, row.label, marker);
        println!(
            "    {} snooze(s), {} min snoozing, +{} min personal buffer",
            row.snooze_count, row.snooze_minutes, row.extra_buffer_minutes
        );
        println!();
    }
    Ok(())
}
