use serde_json::Value;
use tracing::warn;

use crate::error::{self, WayfareError};
use crate::model::{BookingRecord, LegRecord, Location};

fn parse_leg(val: &Value) -> Option<LegRecord> {
    serde_json::from_value(val.clone())
        .map_err(|e| warn!("skipping malformed flight record: {e}"))
        .ok()
}

// A group with any unreadable leg is listed as empty rather than with a
// hole in its route.
fn parse_group(entry: &Value) -> Vec<LegRecord> {
    let legs = match entry {
        Value::Array(arr) => Some(arr),
        Value::Object(obj) => obj.get("flights").and_then(|v| v.as_array()),
        _ => None,
    };

    let Some(legs) = legs else {
        warn!("search result entry has no flights array");
        return Vec::new();
    };

    let parsed: Vec<LegRecord> = legs.iter().filter_map(parse_leg).collect();
    if parsed.len() != legs.len() {
        return Vec::new();
    }
    parsed
}

/// Splits a search response into per-itinerary leg groups, in the order the
/// service returned them. Entries are either `{"flights": [...]}` objects or
/// bare leg arrays.
pub fn parse_search_payload(payload: &Value) -> Result<Vec<Vec<LegRecord>>, WayfareError> {
    let entries = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Array(arr) => arr,
        _ => {
            return Err(WayfareError::JsonParse(
                "search response is not an array".into(),
            ))
        }
    };

    Ok(entries.iter().map(parse_group).collect())
}

pub fn parse_search_response(body: &str) -> Result<Vec<Vec<LegRecord>>, WayfareError> {
    let payload: Value = serde_json::from_str(body).map_err(error::from_json_error)?;
    parse_search_payload(&payload)
}

pub fn parse_locations(body: &str) -> Result<Vec<Location>, WayfareError> {
    serde_json::from_str(body).map_err(error::from_json_error)
}

pub fn parse_bookings(body: &str) -> Result<Vec<BookingRecord>, WayfareError> {
    let payload: Value = serde_json::from_str(body).map_err(error::from_json_error)?;
    let entries = payload
        .as_array()
        .ok_or_else(|| WayfareError::JsonParse("bookings response is not an array".into()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            serde_json::from_value(entry.clone())
                .map_err(|e| warn!("skipping malformed booking record: {e}"))
                .ok()
        })
        .collect())
}
