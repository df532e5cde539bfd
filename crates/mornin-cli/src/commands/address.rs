//! Address lookup commands backed by HERE.

use std::io::BufRead;

use clap::Subcommand;
use mornin_core::providers::debounce::{is_searchable, MIN_QUERY_CHARS};
use mornin_core::providers::{
    AutocompleteProvider, GeocodingProvider, QueryDebouncer, ReverseGeocodingProvider, Suggestion,
};
use mornin_core::{Config, Coordinates};
use tokio::sync::mpsc;
use tokio::time::timeout_at;
use tracing::debug;

use super::{parse_coordinates, print_json, runtime};

#[derive(Subcommand)]
pub enum AddressAction {
    /// Suggest addresses for a partial query
    Suggest {
        /// Partial address (at least two characters)
        #[arg(required_unless_present = "interactive")]
        query: Option<String>,
        /// Read the query from stdin as it is typed, one line per edit, and
        /// look it up once input pauses
        #[arg(long, short, conflicts_with = "query")]
        interactive: bool,
        /// Bias results toward lat,lng (defaults to the configured position)
        #[arg(long, value_parser = parse_coordinates)]
        near: Option<Coordinates>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve an address to coordinates
    Resolve {
        /// Free-text address
        address: String,
        /// Save the result as the destination
        #[arg(long)]
        save: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up the address at a position
    Reverse {
        /// lat,lng (defaults to the configured position)
        #[arg(value_parser = parse_coordinates)]
        position: Option<Coordinates>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AddressAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let here = config.providers.here_client();
    let rt = runtime()?;

    match action {
        AddressAction::Suggest {
            query,
            interactive,
            near,
            json,
        } => {
            let bias = near.or_else(|| config.location.current());
            if interactive {
                return rt.block_on(suggest_as_typed(&here, bias, json));
            }
            let query = query.unwrap_or_default();
            if !is_searchable(&query) {
                return Err(format!("query must be at least {MIN_QUERY_CHARS} characters").into());
            }
            let suggestions = rt.block_on(here.suggest(query.trim(), bias))?;
            show_suggestions(&suggestions, json)?;
        }
        AddressAction::Resolve { address, save, json } => {
            let position = rt.block_on(here.geocode(&address))?;
            if save {
                config.destination.label = address.clone();
                config.destination.lat = Some(position.lat);
                config.destination.lng = Some(position.lng);
                config.save()?;
            }
            if json {
                return print_json(&position);
            }
            println!("{}", position.to_query());
            if save {
                println!("saved as destination: {address}");
            }
        }
        AddressAction::Reverse { position, json } => {
            let position = position
                .or_else(|| config.location.current())
                .unwrap_or_else(|| config.location.fallback());
            let place = rt.block_on(here.reverse_geocode(position))?;
            if json {
                return print_json(&place);
            }
            println!("{}", place.label);
        }
    }
    Ok(())
}

fn show_suggestions(suggestions: &[Suggestion], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        return print_json(&suggestions);
    }
    if suggestions.is_empty() {
        println!("No suggestions.");
    }
    for s in suggestions {
        match &s.address {
            Some(address) if *address != s.label => println!("{}  ({address})", s.label),
            _ => println!("{}", s.label),
        }
    }
    Ok(())
}

/// Each stdin line is the full query after an edit. A lookup runs once the
/// input has been quiet for the debounce period, and once more at end of
/// input for anything still pending.
async fn suggest_as_typed<A: AutocompleteProvider>(
    provider: &A,
    bias: Option<Coordinates>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut debouncer = QueryDebouncer::default();
    loop {
        let line = match debouncer.deadline() {
            Some(deadline) => match timeout_at(deadline, rx.recv()).await {
                Ok(line) => line,
                Err(_) => {
                    if let Some(query) = debouncer.ready() {
                        lookup(provider, &query, bias, json).await?;
                    }
                    continue;
                }
            },
            None => rx.recv().await,
        };
        match line {
            Some(line) => debouncer.push(&line),
            None => break,
        }
    }
    if let Some(query) = debouncer.settle().await {
        lookup(provider, &query, bias, json).await?;
    }
    Ok(())
}

/// Provider failures are reported and the session goes on.
async fn lookup<A: AutocompleteProvider>(
    provider: &A,
    query: &str,
    bias: Option<Coordinates>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(query, "autocomplete");
    match provider.suggest(query, bias).await {
        Ok(suggestions) => {
            if !json {
                println!("> {query}");
            }
            show_suggestions(&suggestions, json)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(())
        }
    }
}
