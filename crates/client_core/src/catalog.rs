use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{Entity, QueryFilter},
    error::FetchError,
    protocol::{catalog_entities_route, EntityListResponse},
};
use tracing::{debug, warn};
use url::Url;

/// Anything that can answer an entity query for the list view.
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<Entity>, FetchError>;
}

/// [`EntitySource`] backed by the catalog HTTP API.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    catalog_url: Url,
}

impl CatalogClient {
    pub fn new(catalog_url: &str) -> Result<Self> {
        Self::with_timeout(catalog_url, None)
    }

    pub fn with_timeout(catalog_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let catalog_url = Url::parse(catalog_url.trim_end_matches('/'))
            .with_context(|| format!("invalid catalog url '{catalog_url}'"))?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build catalog http client")?;
        Ok(Self { http, catalog_url })
    }

    pub(crate) fn entities_url(&self, filter: &QueryFilter) -> Url {
        let mut url = self.catalog_url.clone();
        let path = format!(
            "{}{}",
            url.path().trim_end_matches('/'),
            catalog_entities_route()
        );
        url.set_path(&path);
        url.query_pairs_mut()
            .append_pair("filter", &filter.to_query_value());
        url
    }
}

#[async_trait]
impl EntitySource for CatalogClient {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<Entity>, FetchError> {
        let url = self.entities_url(filter);
        debug!(%url, "querying catalog entities");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "catalog rejected entity query");
            return Err(FetchError::unauthorized(format!(
                "catalog responded with {status}"
            )));
        }
        if !status.is_success() {
            warn!(%status, "catalog entity query failed");
            return Err(FetchError::unknown(format!(
                "catalog responded with {status}"
            )));
        }

        let body = response.bytes().await.map_err(classify_transport_error)?;
        let entities = serde_json::from_slice::<EntityListResponse>(&body)
            .map_err(|e| FetchError::malformed(format!("unreadable catalog response: {e}")))?
            .into_entities();
        debug!(count = entities.len(), "catalog entity query completed");
        Ok(entities)
    }
}

pub(crate) fn classify_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_decode() {
        FetchError::malformed(err.to_string())
    } else if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        FetchError::network(err.to_string())
    } else {
        FetchError::unknown(err.to_string())
    }
}
