// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! `reqwest` implementation of the catalog API.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use super::{CatalogApi, CatalogError, ScenePage, SearchResponse};

/// HTTP client for the imagery catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a client for the catalog rooted at `base_url`. Requests that
    /// take longer than `timeout` fail with a transport error.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the search endpoint for a scene.
    #[must_use]
    pub fn search_url(&self, scene_id: &str) -> String {
        format!("{}search/?search={}", self.base_url, scene_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl CatalogApi for HttpCatalog {
    fn latest_page_url(&self) -> String {
        format!("{}scenes?page=last", self.base_url)
    }

    async fn scene_page(&self, url: &str) -> Result<ScenePage, CatalogError> {
        self.get_json(url).await
    }

    async fn search_scene(&self, scene_id: &str) -> Result<SearchResponse, CatalogError> {
        self.get_json(&self.search_url(scene_id)).await
    }
}
