use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;

use crate::data::models::CatalogError;

pub const PROMPTS_FILE: &str = "prompts.json";
pub const BILINGUAL_FILE: &str = "rules_bilingual.json";

/// Capability to retrieve one of the catalog data files as parsed JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, name: &str) -> Result<Value, CatalogError>;
}

fn parse_body(name: &str, body: &str) -> Result<Value, CatalogError> {
    serde_json::from_str(body)
        .map_err(|e| CatalogError::MalformedData(format!("{}: {}", name, e)))
}

/// Reads data files from a local directory.
pub struct FileJsonFetcher {
    dir: PathBuf,
}

impl FileJsonFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileJsonFetcher { dir: dir.into() }
    }
}

#[async_trait]
impl JsonFetcher for FileJsonFetcher {
    async fn fetch_json(&self, name: &str) -> Result<Value, CatalogError> {
        let path = self.dir.join(name);
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CatalogError::FetchFailure(format!("{}: {}", path.display(), e)))?;
        parse_body(name, &body)
    }
}

/// Fetches data files over HTTP from a base URL.
pub struct HttpJsonFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJsonFetcher {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        HttpJsonFetcher {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        // Timestamp query defeats intermediate caches
        format!("{}/{}?t={}", self.base_url, name, Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch_json(&self, name: &str) -> Result<Value, CatalogError> {
        let url = self.url_for(name);
        log::debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::FetchFailure(format!("{}: {}", name, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::FetchFailure(format!(
                "{}: HTTP status {}",
                name, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::FetchFailure(format!("{}: {}", name, e)))?;
        parse_body(name, &body)
    }
}
