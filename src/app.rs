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


//! Main application window: a full-screen map with the rotating scene
//! overlay and a floating info box.

use std::time::{Duration, Instant};

use log::{info, warn};
use scene_catalog::{
    CatalogError, HttpCatalog, InfoPanel, LatLon, LayerId, Rotator, TileUrlTemplate,
};
use walkers::sources::TileSource;
use walkers::{lon_lat, HttpTiles, Map, MapMemory};

use crate::config::AppConfig;
use crate::info_pane::InfoPane;
use crate::map::tiles::SCENE_MAX_ZOOM;
use crate::map::viewport::{fit_zoom, projected_center, FIT_ANIMATION};
use crate::map::{Camera, CameraAnimation, EguiMapSurface, SceneTileSource, SharedMapView};

pub struct SceneRotatorApp {
    rotator: Rotator,
    view: SharedMapView,
    template: TileUrlTemplate,
    base_tiles: HttpTiles,
    /// Scene overlays, bottom to top
    overlays: Vec<(LayerId, HttpTiles)>,
    memory: MapMemory,
    camera: Camera,
    animation: Option<CameraAnimation>,
    map_size: egui::Vec2,
    min_zoom: f64,
    max_zoom: f64,
    info: Option<InfoPanel>,
    attribution: &'static str,
}

impl SceneRotatorApp {
    /// Build the app and start the rotation service.
    ///
    /// Must be called inside a tokio runtime context.
    pub fn new(ctx: &egui::Context, config: &AppConfig) -> Result<Self, CatalogError> {
        let token = config.resolve_access_token().unwrap_or_else(|| {
            warn!(
                "No tile access token configured; set {} or access_token in the config file",
                crate::config::ACCESS_TOKEN_ENV
            );
            String::new()
        });
        let template = TileUrlTemplate::new(config.tile_url_template.clone(), token);

        let base_source = SceneTileSource::new(
            config.base_layer_id.clone(),
            template.clone(),
            config.base_max_zoom,
        );
        let attribution = base_source.attribution().text;
        let base_tiles = base_source.into_http_tiles(ctx);

        let (min_zoom, max_zoom) = config.base_zoom_range();
        let zoom = config.clamped_initial_zoom();
        if config.initial_zoom.is_nan() || (zoom - config.initial_zoom).abs() > f64::EPSILON {
            warn!(
                "initial_zoom {} is outside {}..={}, using {}",
                config.initial_zoom, min_zoom, max_zoom, zoom
            );
        }
        let camera = Camera {
            center: LatLon::new(0.0, 0.0),
            zoom,
        };
        let mut memory = MapMemory::default();
        if let Err(e) = memory.set_zoom(camera.zoom) {
            warn!("Could not set initial zoom {}: {}", camera.zoom, e);
        }

        let view = SharedMapView::default();
        let surface = EguiMapSurface::new(view.clone(), ctx.clone());
        let rotator_config = config.rotator_config();
        let catalog = HttpCatalog::new(&config.api_base_url, rotator_config.request_timeout)?;
        let rotator = Rotator::spawn(rotator_config, catalog, surface);

        Ok(Self {
            rotator,
            view,
            template,
            base_tiles,
            overlays: Vec::new(),
            memory,
            camera,
            animation: None,
            map_size: egui::vec2(1400.0, 800.0),
            min_zoom,
            max_zoom,
            info: None,
            attribution,
        })
    }

    /// Bring tile layers, viewport and info text in line with the shared view
    fn sync_view(&mut self, ctx: &egui::Context) {
        let (overlays, fit_request, info) = match self.view.lock() {
            Ok(mut view) => (
                view.overlays().to_vec(),
                view.take_fit_request(),
                view.info().cloned(),
            ),
            Err(e) => {
                warn!("Map view lock poisoned: {}", e);
                return;
            }
        };

        self.overlays
            .retain(|(id, _)| overlays.iter().any(|o| o.id == *id));

        for overlay in overlays {
            if self.overlays.iter().any(|(id, _)| *id == overlay.id) {
                continue;
            }
            info!("Adding scene layer {}", overlay.map_id);
            let tiles = SceneTileSource::new(overlay.map_id, self.template.clone(), SCENE_MAX_ZOOM)
                .into_http_tiles(ctx);
            self.overlays.push((overlay.id, tiles));
        }

        if let Some(request) = fit_request {
            let now = Instant::now();
            let target = Camera {
                center: projected_center(&request.bounds),
                zoom: fit_zoom(
                    &request.bounds,
                    [self.map_size.x, self.map_size.y],
                    request.padding,
                    self.min_zoom,
                    self.max_zoom,
                ),
            };
            let from = self.animation.map_or(self.camera, |a| a.sample(now));
            self.animation = Some(CameraAnimation::new(from, target, now, FIT_ANIMATION));
            self.memory.follow_my_position();
        }

        self.info = info;
    }

    /// Advance the camera animation; returns true while still moving
    fn step_camera(&mut self) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let now = Instant::now();
        self.camera = animation.sample(now);
        let _ = self.memory.set_zoom(self.camera.zoom.clamp(self.min_zoom, self.max_zoom));

        if animation.is_finished(now) {
            self.camera = animation.target();
            self.animation = None;
            return false;
        }
        true
    }

    fn draw_map(&mut self, ui: &mut egui::Ui) {
        let position = lon_lat(self.camera.center.lon, self.camera.center.lat);
        let mut map = Map::new(Some(&mut self.base_tiles), &mut self.memory, position);

        for (_, tiles) in &mut self.overlays {
            map = map.with_layer(tiles, 1.0);
        }

        let response = ui.add(map);
        self.map_size = response.rect.size();
    }
}

impl eframe::App for SceneRotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_view(ctx);

        if self.step_camera() {
            ctx.request_repaint();
        } else {
            // Tiles arrive asynchronously
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        // Map takes the full window
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_map(ui);
            });

        InfoPane::render(ctx, self.info.as_ref(), self.attribution);
    }
}

impl Drop for SceneRotatorApp {
    fn drop(&mut self) {
        info!("Shutting down scene rotation");
        self.rotator.shutdown();
    }
}
