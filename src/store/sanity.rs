//! Sanity HTTP API implementation of [`ContentStore`].
//!
//! Uses the live API (never the CDN) with a bearer token. Every call is
//! bounded by the configured store timeout.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::ContentStore;
use crate::config::StoreConfig;
use crate::domain::{AssetId, DocumentId, EventRef, PhotoRecord};
use crate::error::StoreError;

/// GROQ query resolving an event slug to its document id.
pub const EVENT_BY_SLUG_QUERY: &str = r#"*[_type == "event" && slug.current == $slug][0]{ _id }"#;

/// Longest error body kept when the store answers with a failure status.
const MAX_ERROR_BODY: usize = 512;

/// Client for one Sanity project/dataset.
#[derive(Clone)]
pub struct SanityClient {
    client: Client,
    base_url: String,
    api_version: String,
    dataset: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    document: AssetDocument,
}

#[derive(Debug, Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

impl SanityClient {
    /// Builds a client from the store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the HTTP client cannot be
    /// constructed (e.g. no TLS backend available).
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            dataset: config.dataset.clone(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v{}/{}/{}",
            self.base_url, self.api_version, path, self.dataset
        )
    }

    async fn mutate(&self, mutations: serde_json::Value) -> Result<MutateResponse, StoreError> {
        let response = self
            .client
            .post(self.endpoint("data/mutate"))
            .bearer_auth(&self.token)
            .query(&[("returnIds", "true"), ("visibility", "sync")])
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

impl fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanityClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("dataset", &self.dataset)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Turns a non-2xx response into [`StoreError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    })
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<EventRef>, StoreError> {
        // Query parameters are JSON-encoded values.
        let slug_param =
            serde_json::to_string(slug).map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        let response = self
            .client
            .get(self.endpoint("data/query"))
            .bearer_auth(&self.token)
            .query(&[("query", EVENT_BY_SLUG_QUERY), ("$slug", slug_param.as_str())])
            .send()
            .await?;

        let body: QueryResponse<EventRef> = check_status(response).await?.json().await?;
        tracing::debug!(slug, found = body.result.is_some(), "event lookup");
        Ok(body.result)
    }

    async fn upload_image_asset(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<AssetId, StoreError> {
        let size = data.len();
        let response = self
            .client
            .post(self.endpoint("assets/images"))
            .bearer_auth(&self.token)
            .query(&[("filename", filename)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        let body: AssetResponse = check_status(response).await?.json().await?;
        tracing::info!(asset_id = %body.document.id, filename, size, "asset uploaded");
        Ok(AssetId::new(body.document.id))
    }

    async fn create_document(&self, record: &PhotoRecord) -> Result<DocumentId, StoreError> {
        let body = self.mutate(json!([{ "create": record }])).await?;
        let id = body
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| StoreError::InvalidResponse("mutation returned no ids".to_string()))?;
        Ok(DocumentId::new(id))
    }

    async fn delete_asset(&self, asset: &AssetId) -> Result<(), StoreError> {
        self.mutate(json!([{ "delete": { "id": asset.as_str() } }]))
            .await?;
        Ok(())
    }
}
