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


//! In-memory catalog and map doubles shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::catalog::{CatalogApi, CatalogError, ScenePage, SceneLocation, SearchResponse};
use crate::display::{InfoPanel, LayerId, MapSurface};
use crate::scene::{NamedRef, Scene, SceneBounds};

pub const LAST_PAGE: &str = "scenes?page=last";

pub fn scene(id: &str, time_requested: &str, ready: bool) -> Scene {
    Scene {
        scene_id: id.to_string(),
        ready,
        time_requested: time_requested.to_string(),
        map_id: format!("map.{id}"),
        satellite: NamedRef {
            name: "Landsat 8".to_string(),
        },
        process_method: NamedRef {
            name: "True Color".to_string(),
        },
        bounds: None,
    }
}

pub fn location(lat: f64, lon: f64) -> SceneLocation {
    SceneLocation {
        lower_left_corner_latitude: lat - 1.0,
        lower_left_corner_longitude: lon - 1.0,
        upper_right_corner_latitude: lat + 1.0,
        upper_right_corner_longitude: lon + 1.0,
        scene_center_latitude: lat,
        scene_center_longitude: lon,
    }
}

/// Catalog serving canned pages and locations. Unknown pages answer 404,
/// unknown scenes an empty search result. Hanging pages and scenes never
/// answer at all.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    pages: HashMap<String, ScenePage>,
    locations: HashMap<String, SceneLocation>,
    hanging: HashSet<String>,
    page_requests: Mutex<Vec<String>>,
    search_requests: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, results: Vec<Scene>, previous: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            ScenePage {
                results,
                previous: previous.map(str::to_string),
            },
        );
        self
    }

    pub fn with_location(mut self, scene_id: &str, location: SceneLocation) -> Self {
        self.locations.insert(scene_id.to_string(), location);
        self
    }

    /// Requests for this page url or scene id never complete.
    pub fn with_hanging(mut self, key: &str) -> Self {
        self.hanging.insert(key.to_string());
        self
    }

    pub fn pages_requested(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.search_requests.load(Ordering::SeqCst)
    }
}

impl CatalogApi for FakeCatalog {
    fn latest_page_url(&self) -> String {
        LAST_PAGE.to_string()
    }

    async fn scene_page(&self, url: &str) -> Result<ScenePage, CatalogError> {
        self.page_requests.lock().unwrap().push(url.to_string());
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        self.pages.get(url).cloned().ok_or(CatalogError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn search_scene(&self, scene_id: &str) -> Result<SearchResponse, CatalogError> {
        self.search_requests.fetch_add(1, Ordering::SeqCst);
        if self.hanging.contains(scene_id) {
            std::future::pending::<()>().await;
        }
        Ok(SearchResponse {
            results: self.locations.get(scene_id).copied().into_iter().collect(),
        })
    }
}

/// Everything a [`RecordingMap`] has been asked to do.
#[derive(Debug, Default)]
pub struct MapLog {
    next_layer: u64,
    pub created: Vec<(LayerId, String)>,
    pub active: Vec<LayerId>,
    pub removed: Vec<LayerId>,
    pub fits: Vec<(SceneBounds, [f32; 2])>,
    pub info: Option<InfoPanel>,
}

impl MapLog {
    /// Map ids of every layer that was created, in order.
    pub fn shown(&self) -> Vec<String> {
        self.created.iter().map(|(_, id)| id.clone()).collect()
    }
}

/// Map surface that records calls. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    pub log: Arc<Mutex<MapLog>>,
}

impl RecordingMap {
    pub fn shown(&self) -> Vec<String> {
        self.log.lock().unwrap().shown()
    }

    pub fn active_count(&self) -> usize {
        self.log.lock().unwrap().active.len()
    }
}

impl MapSurface for RecordingMap {
    fn create_tile_layer(&mut self, map_id: &str) -> LayerId {
        let mut log = self.log.lock().unwrap();
        log.next_layer += 1;
        let layer = LayerId(log.next_layer);
        log.created.push((layer, map_id.to_string()));
        layer
    }

    fn add_layer(&mut self, layer: LayerId) {
        self.log.lock().unwrap().active.push(layer);
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.log.lock().unwrap().active.contains(&layer)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        let mut log = self.log.lock().unwrap();
        log.active.retain(|l| *l != layer);
        log.removed.push(layer);
    }

    fn fit_bounds(&mut self, bounds: &SceneBounds, padding: [f32; 2]) {
        self.log.lock().unwrap().fits.push((*bounds, padding));
    }

    fn set_info(&mut self, info: &InfoPanel) {
        self.log.lock().unwrap().info = Some(info.clone());
    }
}
