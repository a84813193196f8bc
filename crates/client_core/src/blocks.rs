use anyhow::{Context, Result};
use reqwest::Client;
use shared::protocol::{building_blocks_route, health_route};
use tracing::info;

/// Thin client for the building blocks backend.
#[derive(Clone)]
pub struct BlocksClient {
    http: Client,
    server_url: String,
}

impl BlocksClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<bool> {
        let res = self
            .http
            .get(format!("{}{}", self.server_url, health_route()))
            .send()
            .await
            .context("health request failed")?;
        if !res.status().is_success() {
            return Ok(false);
        }
        let body = res.text().await?;
        Ok(body.trim() == "ok")
    }

    pub async fn building_blocks(&self) -> Result<Vec<String>> {
        let blocks: Vec<String> = self
            .http
            .get(format!("{}{}", self.server_url, building_blocks_route()))
            .send()
            .await
            .context("building blocks request failed")?
            .error_for_status()?
            .json()
            .await
            .context("building blocks response was not a JSON string array")?;
        info!(count = blocks.len(), "fetched building blocks");
        Ok(blocks)
    }
}
