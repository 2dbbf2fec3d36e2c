//! WebAssembly module for the Cocoon Price Advisor dashboard
//!
//! Provides client-side helpers for:
//! - Normalizing location spellings before a request is sent
//! - Season of a month
//! - Harvest date of a start date

use chrono::NaiveDate;
use js_sys::Array;
use wasm_bindgen::prelude::*;

use shared::{harvest_date_for as harvest_of, season_of, Location};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn normalize(label: &str) -> Result<&'static str, String> {
    Location::canonicalize(label)
        .map(|location| location.display_name())
        .ok_or_else(|| format!("Unrecognized location: {}", label))
}

fn harvest(start_date: &str) -> Result<String, String> {
    let start = NaiveDate::parse_from_str(start_date.trim(), DATE_FORMAT)
        .map_err(|e| format!("Invalid start date {}: {}", start_date, e))?;
    harvest_of(start)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .ok_or_else(|| format!("Harvest date out of range for {}", start_date))
}

fn location_names() -> Vec<&'static str> {
    Location::ALL.iter().map(|l| l.display_name()).collect()
}

/// Display name for any accepted spelling of a location
#[wasm_bindgen]
pub fn normalize_location(label: &str) -> Result<String, JsValue> {
    normalize(label)
        .map(str::to_string)
        .map_err(|e| JsValue::from_str(&e))
}

/// Season label of a calendar month
#[wasm_bindgen]
pub fn season_for_month(month: u32) -> String {
    season_of(month).label().to_string()
}

/// Harvest date (`YYYY-MM-DD`) of a crop started on `start_date`
#[wasm_bindgen]
pub fn harvest_date_for(start_date: &str) -> Result<String, JsValue> {
    harvest(start_date).map_err(|e| JsValue::from_str(&e))
}

/// Display names of every supported location
#[wasm_bindgen]
pub fn supported_locations() -> Array {
    location_names().into_iter().map(JsValue::from_str).collect()
}
