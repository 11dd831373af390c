//! WASM bindings for availability-engine.
//!
//! Exposes working-hours normalization and unavailable-hours computation to the
//! JavaScript timeline via `wasm-bindgen`. All complex types are passed as JSON
//! strings: the provider map is an object of provider id → normalized working
//! hours (`{blocks, timezone}`), exactly what `normalizeWorkingHours` returns.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```
//!
//! The `*_json` functions carry the logic and return plain `String` errors so
//! they can be exercised natively; the exported wrappers only convert errors to
//! `JsValue`.

use availability_engine::time::parse_date;
use availability_engine::{ProviderMap, WorkingHoursResponse};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-level implementations
// ---------------------------------------------------------------------------

fn parse_providers(json: &str) -> Result<ProviderMap, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid providers JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

/// Normalize a raw working-hours API response into `{blocks, timezone}`.
pub fn normalize_working_hours_json(response_json: &str) -> Result<String, String> {
    let response: WorkingHoursResponse = serde_json::from_str(response_json)
        .map_err(|e| format!("Invalid working hours JSON: {}", e))?;
    let data =
        availability_engine::normalize_working_hours(&response).map_err(|e| e.to_string())?;
    to_json(&data)
}

/// Unavailable hours for every weekday, as `{"0": [...], ..., "6": [...]}`.
pub fn unavailable_hours_by_day_of_week_json(providers_json: &str) -> Result<String, String> {
    let providers = parse_providers(providers_json)?;
    to_json(&availability_engine::unavailable_hours_by_day_of_week(
        &providers,
    ))
}

/// Unavailable hours for one `YYYY-MM-DD` date, as `[{start, end}, ...]`.
pub fn unavailable_hours_for_date_json(providers_json: &str, date: &str) -> Result<String, String> {
    let providers = parse_providers(providers_json)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    to_json(&availability_engine::unavailable_hours_for_date(
        &providers, date,
    ))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Normalize a raw working-hours API response.
///
/// `response_json` is the `awhours` payload (`{weekDayConfig, timezone}`).
/// Returns a JSON string with the normalized `{blocks, timezone}`.
#[wasm_bindgen(js_name = "normalizeWorkingHours")]
pub fn normalize_working_hours(response_json: &str) -> Result<String, JsValue> {
    normalize_working_hours_json(response_json).map_err(|e| JsValue::from_str(&e))
}

/// Compute unavailable hours for every weekday across all providers.
///
/// Returns a JSON object keyed by weekday index (0 = Sunday). The object is
/// empty when there are no providers.
#[wasm_bindgen(js_name = "unavailableHoursByDayOfWeek")]
pub fn unavailable_hours_by_day_of_week(providers_json: &str) -> Result<String, JsValue> {
    unavailable_hours_by_day_of_week_json(providers_json).map_err(|e| JsValue::from_str(&e))
}

/// Compute unavailable hours for a single `YYYY-MM-DD` date.
#[wasm_bindgen(js_name = "unavailableHoursForDate")]
pub fn unavailable_hours_for_date(providers_json: &str, date: &str) -> Result<String, JsValue> {
    unavailable_hours_for_date_json(providers_json, date).map_err(|e| JsValue::from_str(&e))
}
