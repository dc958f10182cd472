//! HTTP client for the Kakao Local REST API.
//!
//! Wraps `reqwest` with the `KakaoAK` authorization scheme, a finite
//! per-request timeout and typed response deserialization.

use std::time::Duration;

use kioskmap_core::Coordinates;
use reqwest::{header::AUTHORIZATION, Client, Url};

use crate::error::GeocodeError;
use crate::types::{AddressDocument, AddressResponse, KeywordSearchResponse, Place};

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const KEYWORD_SEARCH_PATH: &str = "v2/local/search/keyword.json";
const COORD_TO_ADDRESS_PATH: &str = "v2/local/geo/coord2address.json";

/// Client for the Kakao Local API.
///
/// Use [`KakaoClient::new`] for production or [`KakaoClient::with_base_url`]
/// to point at a mock server in tests. Cloning is cheap and shares the
/// connection pool.
#[derive(Clone)]
pub struct KakaoClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for KakaoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl KakaoClient {
    /// Creates a new client pointed at `https://dapi.kakao.com`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash: `build_url` pops that empty segment and
        // appends the API path after any path prefix in the base URL.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Forward geocoding: places matching a free-text query, best match first.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or timeout.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body does not match the
    ///   expected shape, including an unparseable coordinate.
    pub async fn search_keyword(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let url = self.build_url(KEYWORD_SEARCH_PATH, &[("query", query)]);
        let body = self.request_text(&url).await?;

        let response: KeywordSearchResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("keyword search(query={query})"),
                source: e,
            })?;

        Ok(response.documents)
    }

    /// Reverse geocoding: the address documents for a coordinate.
    ///
    /// # Errors
    ///
    /// Same as [`KakaoClient::search_keyword`].
    pub async fn coord_to_address(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<AddressDocument>, GeocodeError> {
        let x = coordinates.longitude.to_string();
        let y = coordinates.latitude.to_string();
        let url = self.build_url(COORD_TO_ADDRESS_PATH, &[("x", &x), ("y", &y)]);
        let body = self.request_text(&url).await?;

        let response: AddressResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("coord2address(x={x}, y={y})"),
                source: e,
            })?;

        Ok(response.documents)
    }

    /// Joins `path` onto the base URL and appends percent-encoded parameters.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends an authorized GET and returns the body of a 2xx response.
    async fn request_text(&self, url: &Url) -> Result<String, GeocodeError> {
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> KakaoClient {
        KakaoClient::with_base_url("test-key", 10, "kioskmap-test", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_path_and_query() {
        let client = test_client("https://dapi.kakao.com");
        let url = client.build_url(KEYWORD_SEARCH_PATH, &[("query", "온수역")]);
        assert_eq!(
            url.as_str(),
            "https://dapi.kakao.com/v2/local/search/keyword.json?query=%EC%98%A8%EC%88%98%EC%97%AD"
        );
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("http://127.0.0.1:9000/kakao/");
        let url = client.build_url(COORD_TO_ADDRESS_PATH, &[("x", "126.82"), ("y", "37.49")]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/kakao/v2/local/geo/coord2address.json?x=126.82&y=37.49"
        );
    }

    #[test]
    fn build_url_encodes_spaces_in_query() {
        let client = test_client("https://dapi.kakao.com");
        let url = client.build_url(KEYWORD_SEARCH_PATH, &[("query", "서울 온수역 7호선")]);
        assert!(
            url.as_str().contains('+') || url.as_str().contains("%20"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = KakaoClient::with_base_url("k", 10, "ua", "not a url").unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", test_client("https://dapi.kakao.com"));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("[redacted]"));
    }
}
