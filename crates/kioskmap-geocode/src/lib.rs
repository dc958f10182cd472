//! Station geocoding against the Kakao Local API.
//!
//! [`KakaoClient`] speaks the provider's wire format; [`Geocoder`] runs the
//! candidate cascade on top of it and never fails outward.

pub mod client;
pub mod error;
pub mod resolver;
pub mod types;

pub use client::KakaoClient;
pub use error::GeocodeError;
pub use resolver::Geocoder;
pub use types::{Address, AddressDocument, Place};
