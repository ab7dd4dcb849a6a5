use log::info;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use url::Url;

use crate::error::{BkwatchError, Result};

use super::types::{Agent, Build};

/// Production Buildkite REST API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.buildkite.com";

/// States the builds listing is filtered to, server-side.
const ACTIVE_STATES: [&str; 3] = ["scheduled", "running", "canceling"];

/// Buildkite API client for fetching build and agent data.
///
/// Each operation is a single round trip: no caching, no retries, no
/// pagination. Errors propagate to the caller and abort the report.
#[derive(Clone)]
pub struct BuildkiteClient {
    /// HTTP client with auth headers baked in
    client: reqwest::Client,
    /// Base URL for the Buildkite REST API
    base_url: Url,
    /// Organization slug
    org: String,
}

impl BuildkiteClient {
    /// Create a new Buildkite API client.
    ///
    /// `base_url` is parameterized so tests can point the client at a mock
    /// server; real callers pass [`DEFAULT_BASE_URL`].
    pub fn new(base_url: &str, org: String, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BkwatchError::Config(format!("Invalid base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bkwatch/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| BkwatchError::Config(format!("Invalid API token: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BkwatchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            org,
        })
    }

    /// Count the agents currently registered for the organization.
    pub async fn available_agents(&self) -> Result<usize> {
        let url = self.org_url("agents")?;
        let agents: Vec<Agent> = self.get_json(url).await?;

        info!("Agents available: {}", agents.len());
        Ok(agents.len())
    }

    /// Fetch the organization's builds in {scheduled, running, canceling}
    /// states, in the order the API returns them.
    pub async fn list_active_builds(&self) -> Result<Vec<Build>> {
        let mut url = self.org_url("builds")?;
        for state in ACTIVE_STATES {
            url.query_pairs_mut().append_pair("state[]", state);
        }

        self.get_json(url).await
    }

    fn org_url(&self, resource: &str) -> Result<Url> {
        self.base_url
            .join(&format!("v2/organizations/{}/{resource}", self.org))
            .map_err(|e| BkwatchError::Config(format!("Invalid API URL: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(BkwatchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
