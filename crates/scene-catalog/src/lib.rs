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


//! Scene catalog client and rotation engine.
//!
//! This library polls a satellite imagery catalog for recently published
//! scenes and cycles through them on a map, one scene at a time. The layers
//! can be used on their own or wired together through [`Rotator`]:
//!
//! - **Catalog layer**: [`CatalogApi`] and its HTTP implementation [`HttpCatalog`]
//! - **Fetcher**: pages backward through the listing and keeps the newest ready scenes
//! - **Bounds resolver**: looks up a scene's footprint once and memoizes it
//! - **Display**: drives any map widget implementing [`MapSurface`]
//! - **Rotation and refresh**: cancellable tokio tasks sharing a `watch` channel
//!
//! # Quick Start
//!
//! ```no_run
//! use scene_catalog::{HttpCatalog, InfoPanel, LayerId, MapSurface, Rotator, RotatorConfig, SceneBounds};
//!
//! #[derive(Default)]
//! struct PrintMap(u64);
//!
//! impl MapSurface for PrintMap {
//!     fn create_tile_layer(&mut self, map_id: &str) -> LayerId {
//!         self.0 += 1;
//!         println!("layer {} -> {}", self.0, map_id);
//!         LayerId(self.0)
//!     }
//!     fn add_layer(&mut self, _layer: LayerId) {}
//!     fn has_layer(&self, _layer: LayerId) -> bool { true }
//!     fn remove_layer(&mut self, _layer: LayerId) {}
//!     fn fit_bounds(&mut self, _bounds: &SceneBounds, _padding: [f32; 2]) {}
//!     fn set_info(&mut self, info: &InfoPanel) {
//!         println!("{} / {} / {}", info.satellite, info.method, info.date_captured);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scene_catalog::CatalogError> {
//!     let config = RotatorConfig::default();
//!     let catalog = HttpCatalog::new(&config.api_base_url, config.request_timeout)?;
//!     let rotator = Rotator::spawn(config, catalog, PrintMap::default());
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     rotator.shutdown();
//!     Ok(())
//! }
//! ```

pub mod bounds;
pub mod catalog;
pub mod display;
pub mod fetcher;
pub mod refresh;
pub mod rotation;
pub mod scene;
pub mod tiles;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub use bounds::resolve_bounds;
pub use catalog::{CatalogApi, CatalogError, HttpCatalog, ScenePage, SceneLocation, SearchResponse};
pub use display::{DisplayError, InfoPanel, LayerId, MapSurface, SceneDisplay};
pub use fetcher::{select_latest, SceneFetcher};
pub use refresh::RefreshTimer;
pub use rotation::RotationController;
pub use scene::{CaptureDateError, LatLon, NamedRef, Scene, SceneBounds};
pub use tiles::TileUrlTemplate;

/// Configuration for the full rotation service.
#[derive(Debug, Clone)]
pub struct RotatorConfig {
    /// Catalog endpoint, e.g. `https://api.astrodigital.com/v1/`.
    pub api_base_url: String,
    /// Size of the working set.
    pub scenes_to_fetch: usize,
    /// Time each scene stays on screen.
    pub display_duration: Duration,
    /// Interval between working set refreshes.
    pub refresh_period: Duration,
    /// Upper bound on listing pages read per refresh.
    pub max_pages: usize,
    /// Padding in pixels around a fitted scene.
    pub fit_padding: [f32; 2],
    /// Limit on each catalog request.
    pub request_timeout: Duration,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            api_base_url: catalog::DEFAULT_BASE_URL.to_string(),
            scenes_to_fetch: fetcher::DEFAULT_SCENES_TO_FETCH,
            display_duration: rotation::DEFAULT_DISPLAY_DURATION,
            refresh_period: refresh::DEFAULT_REFRESH_PERIOD,
            max_pages: fetcher::DEFAULT_MAX_PAGES,
            fit_padding: display::DEFAULT_FIT_PADDING,
            request_timeout: catalog::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Full rotation service: a refresh task feeding a rotation task.
///
/// Both tasks run on the current tokio runtime until [`Rotator::shutdown`]
/// is called or the handle is dropped.
pub struct Rotator {
    working_set: watch::Receiver<Vec<Scene>>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for Rotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rotator")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl Rotator {
    /// Spawn the refresh and rotation tasks.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn<C, M>(config: RotatorConfig, catalog: C, map: M) -> Self
    where
        C: CatalogApi + 'static,
        M: MapSurface + Send + 'static,
    {
        let catalog = Arc::new(catalog);
        let (publisher, working_set) = watch::channel(Vec::new());
        let cancel_token = CancellationToken::new();

        info!(
            "Rotating {} scenes from {} every {}s, refreshing every {}s",
            config.scenes_to_fetch,
            config.api_base_url,
            config.display_duration.as_secs(),
            config.refresh_period.as_secs()
        );

        let fetcher = SceneFetcher::new(
            Arc::clone(&catalog),
            config.scenes_to_fetch,
            config.max_pages,
        )
        .with_request_timeout(config.request_timeout);
        let refresh = RefreshTimer::new(fetcher, config.refresh_period, publisher);
        let controller = RotationController::new(
            catalog,
            SceneDisplay::new(map, config.fit_padding),
            working_set.clone(),
            config.display_duration,
        )
        .with_request_timeout(config.request_timeout);

        tokio::spawn(refresh.run(cancel_token.clone()));
        tokio::spawn(controller.run(cancel_token.clone()));

        Self {
            working_set,
            cancel_token,
        }
    }

    /// Number of scenes in the most recently published working set.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.working_set.borrow().len()
    }

    /// Stop both tasks.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Rotator {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
