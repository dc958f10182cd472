//! `geocode` command handler.

use kioskmap_core::AppConfig;
use kioskmap_geocode::Geocoder;

/// Prints the candidate queries for `station`, then the resolved location.
///
/// # Errors
///
/// Returns an error only if the Kakao client cannot be built; lookup
/// failures resolve to the unresolved sentinel.
pub(crate) async fn run_geocode(config: &AppConfig, station: &str, line: &str) -> anyhow::Result<()> {
    let geocoder = Geocoder::from_app_config(config)?;

    println!("candidates:");
    for (i, candidate) in geocoder
        .candidates()
        .generate(station, line)
        .iter()
        .enumerate()
    {
        println!("  {}. {candidate}", i + 1);
    }

    let location = geocoder.locate(station, line).await;
    if location.coordinates.is_resolved() {
        println!(
            "coordinates: {}, {}",
            location.coordinates.latitude, location.coordinates.longitude
        );
        if location.region.is_resolved() {
            println!("region: {} {}", location.region.city, location.region.district);
        } else {
            println!("region: unresolved");
        }
    } else {
        println!("coordinates: unresolved");
    }

    Ok(())
}
