//! Source row to geocoded [`MachineRecord`].

use chrono::{DateTime, Utc};
use kioskmap_core::{MachineDetails, MachineRecord};
use kioskmap_geocode::Geocoder;
use serde_json::Value;

use crate::types::RawRow;

// Column labels of the Seoul Metro kiosk dataset.
pub const LABEL_STATION_NAME: &str = "역명";
pub const LABEL_LINE: &str = "호선";
pub const LABEL_DEVICE_TYPE: &str = "기기종류";
pub const LABEL_LOCATION_TYPE: &str = "지상지하구분";
pub const LABEL_FLOOR: &str = "역층";
pub const LABEL_DETAIL_LOCATION: &str = "상세위치";
pub const LABEL_CONTRACTOR: &str = "계약자(업체명)";
pub const LABEL_PHONE: &str = "전화번호";

/// Builds records from details by geocoding the station they name.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    geocoder: Geocoder,
}

impl RecordTransformer {
    #[must_use]
    pub fn new(geocoder: Geocoder) -> Self {
        Self { geocoder }
    }

    #[must_use]
    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    /// Maps a source row and geocodes it. Never fails: missing columns become
    /// empty strings and a geocoding miss leaves the unresolved sentinel.
    pub async fn transform(&self, row: &RawRow, now: DateTime<Utc>) -> MachineRecord {
        self.build_record(details_from_row(row), now).await
    }

    /// Geocodes `details` and stamps both timestamps with `now`.
    pub async fn build_record(&self, details: MachineDetails, now: DateTime<Utc>) -> MachineRecord {
        let location = self
            .geocoder
            .locate(&details.station_name, &details.line)
            .await;
        MachineRecord::new(details, location, now)
    }
}

/// Copies the known columns of `row` into [`MachineDetails`].
#[must_use]
pub fn details_from_row(row: &RawRow) -> MachineDetails {
    MachineDetails {
        line: field_text(row, LABEL_LINE),
        station_name: field_text(row, LABEL_STATION_NAME),
        device_type: field_text(row, LABEL_DEVICE_TYPE),
        location_type: field_text(row, LABEL_LOCATION_TYPE),
        floor: field_text(row, LABEL_FLOOR),
        detail_location: field_text(row, LABEL_DETAIL_LOCATION),
        contractor: field_text(row, LABEL_CONTRACTOR),
        phone: field_text(row, LABEL_PHONE),
    }
}

/// Scalars are rendered as text; absent, `null` and nested values are `""`.
fn field_text(row: &RawRow, label: &str) -> String {
    match row.get(label) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => String::new(),
    }
}
