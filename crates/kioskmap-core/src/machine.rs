//! Domain model for station service kiosks ("machines").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A WGS84 coordinate pair.
///
/// Latitude and longitude only ever travel together; `(0.0, 0.0)` is the
/// unresolved sentinel produced when geocoding finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const UNRESOLVED: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_resolved(&self) -> bool {
        !(self.latitude == 0.0 && self.longitude == 0.0)
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}

/// First- and second-level administrative region (e.g. `서울특별시` / `구로구`).
///
/// Both fields are empty when the reverse lookup found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub city: String,
    pub district: String,
}

impl Region {
    #[must_use]
    pub fn new(city: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            district: district.into(),
        }
    }

    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.city.is_empty() || !self.district.is_empty()
    }
}

/// Outcome of geocoding one station: coordinates plus the region they fall in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoLocation {
    pub coordinates: Coordinates,
    pub region: Region,
}

impl GeoLocation {
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }
}

/// Descriptive fields of a machine as supplied by the importer or the API.
///
/// Every field defaults to the empty string; absent source values never
/// become nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineDetails {
    pub line: String,
    pub station_name: String,
    pub device_type: String,
    pub location_type: String,
    pub floor: String,
    pub detail_location: String,
    pub contractor: String,
    pub phone: String,
}

/// Sparse edit of the mutable detail fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetailUpdate {
    pub detail_location: Option<String>,
    pub contractor: Option<String>,
    pub phone: Option<String>,
    pub floor: Option<String>,
}

impl DetailUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detail_location.is_none()
            && self.contractor.is_none()
            && self.phone.is_none()
            && self.floor.is_none()
    }
}

/// A kiosk installation as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Assigned by the store on first save.
    pub id: Option<Uuid>,
    pub line: String,
    pub station_name: String,
    pub device_type: String,
    pub location_type: String,
    pub floor: String,
    pub detail_location: String,
    pub contractor: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl MachineRecord {
    /// Builds an unsaved record from its details and geocoding outcome,
    /// stamping both timestamps with `now`.
    #[must_use]
    pub fn new(details: MachineDetails, location: GeoLocation, now: DateTime<Utc>) -> Self {
        let MachineDetails {
            line,
            station_name,
            device_type,
            location_type,
            floor,
            detail_location,
            contractor,
            phone,
        } = details;

        Self {
            id: None,
            line,
            station_name,
            device_type,
            location_type,
            floor,
            detail_location,
            contractor,
            phone,
            latitude: location.coordinates.latitude,
            longitude: location.coordinates.longitude,
            city: location.region.city,
            district: location.region.district,
            created_at: now,
            modified_at: now,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn region(&self) -> Region {
        Region::new(self.city.clone(), self.district.clone())
    }

    /// Applies a detail edit in place. Station, line, coordinates and region
    /// are never touched; `created_at` is preserved.
    pub fn apply_update(&mut self, update: DetailUpdate, now: DateTime<Utc>) {
        if let Some(detail_location) = update.detail_location {
            self.detail_location = detail_location;
        }
        if let Some(contractor) = update.contractor {
            self.contractor = contractor;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(floor) = update.floor {
            self.floor = floor;
        }
        self.modified_at = now;
    }
}
