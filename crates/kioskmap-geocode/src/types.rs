//! Kakao Local API response types.
//!
//! Only the fields the geocoder reads are modelled; everything else in the
//! provider's payload is ignored.

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// search/keyword.json
// ---------------------------------------------------------------------------

/// Envelope for `GET /v2/local/search/keyword.json`.
#[derive(Debug, Deserialize)]
pub struct KeywordSearchResponse {
    #[serde(default)]
    pub documents: Vec<Place>,
}

/// One place matched by a keyword search.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_name: String,
    /// Longitude.
    #[serde(deserialize_with = "de_longitude")]
    pub x: f64,
    /// Latitude.
    #[serde(deserialize_with = "de_latitude")]
    pub y: f64,
}

// ---------------------------------------------------------------------------
// geo/coord2address.json
// ---------------------------------------------------------------------------

/// Envelope for `GET /v2/local/geo/coord2address.json`.
#[derive(Debug, Deserialize)]
pub struct AddressResponse {
    #[serde(default)]
    pub documents: Vec<AddressDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressDocument {
    /// Lot-number address; `null` for some coordinates at sea or on borders.
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    /// First-level region, e.g. `서울특별시` (Kakao may also return `서울`).
    #[serde(default)]
    pub region_1depth_name: String,
    /// Second-level region, e.g. `구로구`.
    #[serde(default)]
    pub region_2depth_name: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Kakao documents its coordinates as strings, but numeric values show up in
/// practice too. Accept both, but only finite values within `±limit`.
fn de_coordinate<'de, D>(deserializer: D, axis: &str, limit: f64) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => value,
        NumberOrString::Text(text) => text.trim().parse::<f64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid coordinate \"{text}\": {e}"))
        })?,
    };

    if !value.is_finite() || !(-limit..=limit).contains(&value) {
        return Err(serde::de::Error::custom(format!(
            "invalid coordinate: {axis} {value} out of range"
        )));
    }
    Ok(value)
}

fn de_longitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    de_coordinate(deserializer, "longitude", 180.0)
}

fn de_latitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    de_coordinate(deserializer, "latitude", 90.0)
}
