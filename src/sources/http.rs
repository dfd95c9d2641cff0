use crate::models::Property;
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listings fetched from the marketplace REST backend
pub struct HttpSource {
    client: Client,
    url: String,
}

/// Bodies the backend answers with: a bare array or a `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Property>),
    Envelope { data: Vec<Property> },
}

impl HttpSource {
    /// Create a source for the listings endpoint at `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("listing-query/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Decode a listings response body.
pub(crate) fn parse_payload(body: &str) -> Result<Vec<Property>> {
    let payload: Payload =
        serde_json::from_str(body).context("Response is not a list of listings")?;

    Ok(match payload {
        Payload::List(records) => records,
        Payload::Envelope { data } => data,
    })
}

#[async_trait]
impl ListingSource for HttpSource {
    async fn load(&self) -> Result<Vec<Property>> {
        debug!("Fetching URL: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch listings")?;

        if !response.status().is_success() {
            warn!("Listings endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listings: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes", body.len());

        let records = parse_payload(&body)?;
        info!("Fetched {} listings from {}", records.len(), self.url);
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
