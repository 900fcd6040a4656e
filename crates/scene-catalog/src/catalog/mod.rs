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


//! Catalog API layer.
//!
//! The [`CatalogApi`] trait is the seam between the rotation engine and the
//! imagery catalog. [`HttpCatalog`] talks to the real service; tests provide
//! in-memory implementations.

mod http;

pub use http::HttpCatalog;

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::scene::{LatLon, Scene, SceneBounds};

/// Default catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.astrodigital.com/v1/";
/// Default limit on a single catalog request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no catalog entry for scene {0}")]
    SceneNotFound(String),

    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

/// Run a catalog request, giving up after `limit`.
pub async fn with_timeout<T, F>(limit: Duration, request: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    tokio::time::timeout(limit, request)
        .await
        .unwrap_or(Err(CatalogError::TimedOut(limit)))
}

/// One page of the scene listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenePage {
    pub results: Vec<Scene>,
    /// Link to the previous (older) page, `null` on the first page.
    #[serde(default)]
    pub previous: Option<String>,
}

/// Location record returned by the scene search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLocation {
    pub lower_left_corner_latitude: f64,
    pub lower_left_corner_longitude: f64,
    pub upper_right_corner_latitude: f64,
    pub upper_right_corner_longitude: f64,
    pub scene_center_latitude: f64,
    pub scene_center_longitude: f64,
}

impl SceneLocation {
    #[must_use]
    pub fn bounds(&self) -> SceneBounds {
        SceneBounds {
            south_west: LatLon::new(
                self.lower_left_corner_latitude,
                self.lower_left_corner_longitude,
            ),
            north_east: LatLon::new(
                self.upper_right_corner_latitude,
                self.upper_right_corner_longitude,
            ),
            center: LatLon::new(self.scene_center_latitude, self.scene_center_longitude),
        }
    }
}

/// Response of the scene search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SceneLocation>,
}

/// Access to the imagery catalog.
pub trait CatalogApi: Send + Sync {
    /// URL of the newest page of the scene listing.
    fn latest_page_url(&self) -> String;

    /// Fetch one page of the scene listing.
    fn scene_page(&self, url: &str)
        -> impl Future<Output = Result<ScenePage, CatalogError>> + Send;

    /// Look up location records for a scene id.
    fn search_scene(
        &self,
        scene_id: &str,
    ) -> impl Future<Output = Result<SearchResponse, CatalogError>> + Send;
}
