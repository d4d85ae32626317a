//! SL API HTTP client.
//!
//! Wraps the two endpoints the tools need: the typeahead station search
//! and the realtime departures board (v4). Each call is a single GET; the
//! API key travels as a query parameter.

use serde_json::Value;
use tracing::debug;

use super::error::SlError;
use super::fetch::fetch;
use super::types::{DepartureBoard, Envelope, Station};

/// Default base URL for the SL API.
pub const DEFAULT_BASE_URL: &str = "https://api.sl.se/api2";

/// Default number of typeahead results.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Configuration for the SL client.
#[derive(Debug, Clone)]
pub struct SlConfig {
    /// Base URL for the API (defaults to production SL)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether to honour system proxy settings
    pub use_system_proxy: bool,
}

impl SlConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            use_system_proxy: true,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Connect directly, ignoring `HTTP_PROXY` and friends.
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

impl Default for SlConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// SL real-time API client.
#[derive(Debug, Clone)]
pub struct SlClient {
    http: reqwest::Client,
    base_url: String,
}

impl SlClient {
    /// Create a new client with the given configuration.
    ///
    /// TLS uses the bundled Mozilla root set rather than the system store.
    pub fn new(config: SlConfig) -> Result<Self, SlError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `url` and return the decoded JSON body as-is.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, SlError> {
        // Only the path: the query carries the API key.
        let path = reqwest::Url::parse(url).map(|url| url.path().to_string());
        debug!(path = path.as_deref().unwrap_or("<invalid url>"), "fetching");
        fetch(self.http.get(url)).await
    }

    /// Search stations (and optionally other places) by name.
    ///
    /// Results keep the API's ordering and are capped at `max_results`.
    pub async fn search_stations(
        &self,
        api_key: &str,
        query: &str,
        max_results: usize,
        stations_only: bool,
    ) -> Result<Vec<Station>, SlError> {
        let url = format!("{}/typeahead.json", self.base_url);
        debug!(%url, query, max_results, stations_only, "searching stations");

        let request = self.http.get(&url).query(&[
            ("key", api_key.to_string()),
            ("searchstring", query.to_string()),
            (
                "stationsonly",
                if stations_only { "True" } else { "False" }.to_string(),
            ),
            ("maxresults", max_results.to_string()),
        ]);

        let envelope: Envelope<Vec<Station>> = fetch(request).await?;
        let mut stations = envelope.into_response_data()?;
        stations.truncate(max_results);

        debug!(count = stations.len(), "station search complete");
        Ok(stations)
    }

    /// Get the realtime departure board for a site.
    ///
    /// # Arguments
    ///
    /// * `site_id` - Site id, as returned in a station's `SiteId`
    /// * `time_window` - Minutes ahead to include departures for
    pub async fn get_departures(
        &self,
        api_key: &str,
        site_id: &str,
        time_window: u32,
    ) -> Result<DepartureBoard, SlError> {
        let url = format!("{}/realtimedeparturesV4.json", self.base_url);
        debug!(%url, site_id, time_window, "fetching departures");

        let request = self.http.get(&url).query(&[
            ("key", api_key.to_string()),
            ("siteid", site_id.to_string()),
            ("timewindow", time_window.to_string()),
        ]);

        let envelope: Envelope<DepartureBoard> = fetch(request).await?;
        let board = envelope.into_response_data()?;

        debug!(departures = board.len(), "departure board received");
        Ok(board)
    }
}
