//! One-shot lookup commands. Each prints a JSON document on stdout.

use std::sync::Arc;

use ngpost_core::{LocationResult, PostalCodeTable};
use ngpost_geocoder::{GeocodingClient, LocationResolver};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LookupOutput {
    result: Option<LocationResult>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StatesOutput<'a> {
    States { states: Vec<&'a str> },
    Lgas { state: &'a str, lgas: Vec<&'a str> },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn run_lookup(table: &PostalCodeTable, state: &str, lga: &str) -> anyhow::Result<()> {
    let result = table
        .find_by_state_lga(state, lga)
        .map(LocationResult::from_record);
    if result.is_none() {
        tracing::info!(state, lga, "no postal code mapped for state and LGA");
    }
    print_json(&LookupOutput { result })
}

pub(crate) async fn run_reverse(
    table: Arc<PostalCodeTable>,
    client: GeocodingClient,
    lat: f64,
    lng: f64,
    fallback: bool,
) -> anyhow::Result<()> {
    let resolver = LocationResolver::new(table, client);
    let result = if fallback {
        resolver.resolve_with_fallback(lat, lng).await?
    } else {
        resolver.resolve_by_coordinates(lat, lng).await?
    };
    print_json(&LookupOutput { result })
}

pub(crate) fn run_states(table: &PostalCodeTable, state: Option<&str>) -> anyhow::Result<()> {
    let output = match state.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => StatesOutput::Lgas {
            state: name,
            lgas: table.lgas_for_state(name),
        },
        None => StatesOutput::States {
            states: table.states(),
        },
    };
    print_json(&output)
}
