use std::time::Duration;

use kioskmap_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::ImportError;

/// Characters of a failed response body kept for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// HTTP client for an odcloud (`api.odcloud.kr`) dataset endpoint.
///
/// The service key is sent as the `serviceKey` query parameter and is
/// percent-encoded here, so configure the decoded form of the key.
#[derive(Clone)]
pub struct OpenDataClient {
    client: Client,
    endpoint: Url,
    service_key: String,
}

impl std::fmt::Debug for OpenDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenDataClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("service_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl OpenDataClient {
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidEndpoint`] if `endpoint` does not parse,
    /// or [`ImportError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new(
        endpoint: &str,
        service_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ImportError> {
        let endpoint = Url::parse(endpoint.trim()).map_err(|e| ImportError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()
            .map_err(ImportError::Client)?;

        Ok(Self {
            client,
            endpoint,
            service_key: service_key.to_owned(),
        })
    }

    /// Builds a client from the `OPENDATA_*` settings.
    ///
    /// # Errors
    ///
    /// Same as [`OpenDataClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ImportError> {
        Self::new(
            &config.opendata_api_url,
            &config.opendata_service_key,
            config.opendata_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches one page and returns the raw body.
    ///
    /// # Errors
    ///
    /// - [`ImportError::Http`] on network failure or timeout.
    /// - [`ImportError::UnexpectedStatus`] on a non-2xx status; carries an
    ///   excerpt of the response body.
    /// - [`ImportError::EmptyBody`] if the body is empty or whitespace.
    pub async fn fetch_page(&self, page: u32, per_page: u32) -> Result<String, ImportError> {
        let url = self.build_url(page, per_page);
        tracing::debug!(endpoint = %self.endpoint, page, per_page, "fetching data source page");

        // reqwest errors embed the URL, which carries the service key.
        let http_err = |e: reqwest::Error| ImportError::Http {
            page,
            source: e.without_url(),
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        let body = response.text().await.map_err(http_err)?;

        if !status.is_success() {
            let body: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
            tracing::warn!(page, status = status.as_u16(), body = %body, "data source request failed");
            return Err(ImportError::UnexpectedStatus {
                page,
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Err(ImportError::EmptyBody { page });
        }

        tracing::debug!(
            page,
            bytes = body.len(),
            excerpt = %body.chars().take(BODY_EXCERPT_CHARS).collect::<String>(),
            "data source page received"
        );
        Ok(body)
    }

    /// Appends `page`, `perPage` and `serviceKey` to the endpoint, keeping any
    /// query it already has.
    fn build_url(&self, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("perPage", &per_page.to_string())
            .append_pair("serviceKey", &self.service_key);
        url
    }
}
