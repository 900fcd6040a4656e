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


//! Map state shared between the rotation engine and the UI thread.
//!
//! The engine never touches egui types. It records layer, viewport and
//! info panel changes in a [`MapView`]; the app turns them into tile layers
//! and camera moves on the next frame.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use scene_catalog::{InfoPanel, LayerId, MapSurface, SceneBounds};

/// A scene overlay that is on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayer {
    pub id: LayerId,
    pub map_id: String,
}

/// Pending request to move the viewport onto a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub bounds: SceneBounds,
    pub padding: [f32; 2],
}

/// Layers, viewport requests and panel text, in engine terms
#[derive(Debug, Default)]
pub struct MapView {
    next_layer: u64,
    /// Layers created but not added yet
    created: HashMap<LayerId, String>,
    /// Added layers, bottom to top
    overlays: Vec<OverlayLayer>,
    fit_request: Option<FitRequest>,
    info: Option<InfoPanel>,
}

pub type SharedMapView = Arc<Mutex<MapView>>;

impl MapView {
    pub fn create_layer(&mut self, map_id: &str) -> LayerId {
        self.next_layer += 1;
        let id = LayerId(self.next_layer);
        self.created.insert(id, map_id.to_string());
        id
    }

    pub fn add_layer(&mut self, id: LayerId) {
        match self.created.remove(&id) {
            Some(map_id) => {
                debug!("Adding layer {:?} ({})", id, map_id);
                self.overlays.push(OverlayLayer { id, map_id });
            }
            None => warn!("Layer {:?} was never created or is already added", id),
        }
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.overlays.iter().any(|o| o.id == id)
    }

    pub fn remove_layer(&mut self, id: LayerId) {
        self.overlays.retain(|o| o.id != id);
    }

    pub fn overlays(&self) -> &[OverlayLayer] {
        &self.overlays
    }

    pub fn request_fit(&mut self, bounds: SceneBounds, padding: [f32; 2]) {
        self.fit_request = Some(FitRequest { bounds, padding });
    }

    /// Take the latest viewport request, if any
    pub fn take_fit_request(&mut self) -> Option<FitRequest> {
        self.fit_request.take()
    }

    pub fn set_info(&mut self, info: InfoPanel) {
        self.info = Some(info);
    }

    pub fn info(&self) -> Option<&InfoPanel> {
        self.info.as_ref()
    }
}

/// [`MapSurface`] backed by a [`SharedMapView`], repainting egui on change
pub struct EguiMapSurface {
    view: SharedMapView,
    ctx: egui::Context,
}

impl std::fmt::Debug for EguiMapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiMapSurface").finish_non_exhaustive()
    }
}

impl EguiMapSurface {
    pub fn new(view: SharedMapView, ctx: egui::Context) -> Self {
        Self { view, ctx }
    }

    fn update<R>(&self, f: impl FnOnce(&mut MapView) -> R) -> Option<R> {
        let result = match self.view.lock() {
            Ok(mut view) => Some(f(&mut view)),
            Err(e) => {
                warn!("Map view lock poisoned: {}", e);
                None
            }
        };
        self.ctx.request_repaint();
        result
    }
}

impl MapSurface for EguiMapSurface {
    fn create_tile_layer(&mut self, map_id: &str) -> LayerId {
        // A poisoned view cannot show anything; hand out an id that is never added
        self.update(|view| view.create_layer(map_id))
            .unwrap_or(LayerId(0))
    }

    fn add_layer(&mut self, layer: LayerId) {
        self.update(|view| view.add_layer(layer));
    }

    fn has_layer(&self, layer: LayerId) -> bool {
        self.view
            .lock()
            .map(|view| view.has_layer(layer))
            .unwrap_or(false)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.update(|view| view.remove_layer(layer));
    }

    fn fit_bounds(&mut self, bounds: &SceneBounds, padding: [f32; 2]) {
        self.update(|view| view.request_fit(*bounds, padding));
    }

    fn set_info(&mut self, info: &InfoPanel) {
        self.update(|view| view.set_info(info.clone()));
    }
}
