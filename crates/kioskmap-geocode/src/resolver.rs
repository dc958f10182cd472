//! Cascading station geocoder.

use kioskmap_core::{AppConfig, CandidateGenerator, Coordinates, GeoLocation, Region};

use crate::client::KakaoClient;
use crate::error::GeocodeError;

/// Resolves a station to coordinates and an administrative region.
///
/// None of the methods fail: provider errors are logged and treated as a
/// miss, and a miss yields the unresolved sentinel.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: KakaoClient,
    candidates: CandidateGenerator,
}

impl Geocoder {
    #[must_use]
    pub fn new(client: KakaoClient, candidates: CandidateGenerator) -> Self {
        Self { client, candidates }
    }

    /// Builds a geocoder from the `KAKAO_*` and `KIOSKMAP_GEOCODE_*` settings.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP client cannot be constructed or
    /// the configured base URL is invalid.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let client = KakaoClient::with_base_url(
            &config.kakao_api_key,
            config.geocode_timeout_secs,
            &config.user_agent,
            &config.kakao_base_url,
        )?;
        Ok(Self::new(
            client,
            CandidateGenerator::new(config.geocode_region_prefix.clone()),
        ))
    }

    #[must_use]
    pub fn candidates(&self) -> &CandidateGenerator {
        &self.candidates
    }

    /// Queries each candidate in order and returns the first hit's
    /// coordinates, or [`Coordinates::UNRESOLVED`] when every candidate
    /// misses. A blank station name resolves to the sentinel without any
    /// request.
    pub async fn resolve_coordinates(&self, station_name: &str, line: &str) -> Coordinates {
        if station_name.trim().is_empty() {
            tracing::debug!("blank station name; skipping forward geocode");
            return Coordinates::UNRESOLVED;
        }

        for candidate in self.candidates.generate(station_name, line) {
            match self.client.search_keyword(&candidate).await {
                Ok(places) => {
                    if let Some(place) = places.first() {
                        tracing::debug!(
                            station = station_name,
                            candidate = %candidate,
                            place = %place.place_name,
                            latitude = place.y,
                            longitude = place.x,
                            "forward geocode hit"
                        );
                        return Coordinates::new(place.y, place.x);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        station = station_name,
                        candidate = %candidate,
                        error = %e,
                        "forward geocode candidate failed"
                    );
                }
            }
        }

        tracing::info!(station = station_name, line, "no geocode candidate matched");
        Coordinates::UNRESOLVED
    }

    /// One reverse lookup. Failures and empty results both map to
    /// [`Region::unresolved`].
    pub async fn resolve_region(&self, coordinates: Coordinates) -> Region {
        match self.client.coord_to_address(coordinates).await {
            Ok(documents) => documents
                .into_iter()
                .next()
                .and_then(|document| document.address)
                .map_or_else(Region::unresolved, |address| {
                    Region::new(address.region_1depth_name, address.region_2depth_name)
                }),
            Err(e) => {
                tracing::warn!(
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    error = %e,
                    "reverse geocode failed"
                );
                Region::unresolved()
            }
        }
    }

    /// Forward then reverse.
    ///
    /// The reverse lookup is intentionally not issued for the `(0, 0)`
    /// sentinel. It could only miss, and the result is the same
    /// [`GeoLocation::unresolved`] either way.
    pub async fn locate(&self, station_name: &str, line: &str) -> GeoLocation {
        let coordinates = self.resolve_coordinates(station_name, line).await;
        if !coordinates.is_resolved() {
            return GeoLocation::unresolved();
        }

        let region = self.resolve_region(coordinates).await;
        GeoLocation {
            coordinates,
            region,
        }
    }
}
