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


//! Display renderer.
//!
//! [`SceneDisplay`] drives a [`MapSurface`]: it pushes the overlay for a new
//! scene, moves the viewport, refreshes the info panel and only then drops
//! the overlay of the previous scene, so the map never shows a blank frame.

use log::warn;
use thiserror::Error;

use crate::scene::{format_capture_date, Scene, SceneBounds};

/// Padding in pixels kept around a scene when fitting the viewport.
pub const DEFAULT_FIT_PADDING: [f32; 2] = [50.0, 50.0];

/// Shown in the info panel when the capture date cannot be decoded.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Handle for a tile layer created by a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Errors from displaying a scene.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("scene {0} has no bounds")]
    MissingBounds(String),
}

/// Text of the metadata panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfoPanel {
    /// "lon, lat" of the scene center.
    pub location: String,
    pub satellite: String,
    pub method: String,
    pub date_captured: String,
}

impl InfoPanel {
    #[must_use]
    pub fn for_scene(scene: &Scene, bounds: &SceneBounds) -> Self {
        let date_captured = match scene.capture_date() {
            Ok(date) => format_capture_date(date),
            Err(e) => {
                warn!("No capture date for {}: {}", scene.scene_id, e);
                UNKNOWN_DATE.to_string()
            }
        };

        Self {
            location: format!("{}, {}", bounds.center.lon, bounds.center.lat),
            satellite: scene.satellite.name.clone(),
            method: scene.process_method.name.clone(),
            date_captured,
        }
    }
}

/// The map widget as seen by the renderer.
pub trait MapSurface {
    /// Create (but do not add) a tile layer for a map id.
    fn create_tile_layer(&mut self, map_id: &str) -> LayerId;

    fn add_layer(&mut self, layer: LayerId);

    fn has_layer(&self, layer: LayerId) -> bool;

    fn remove_layer(&mut self, layer: LayerId);

    /// Animate the viewport so `bounds` fits with `padding` pixels to spare.
    fn fit_bounds(&mut self, bounds: &SceneBounds, padding: [f32; 2]);

    fn set_info(&mut self, info: &InfoPanel);
}

/// Shows one scene at a time on a map.
#[derive(Debug)]
pub struct SceneDisplay<M> {
    map: M,
    current: Option<LayerId>,
    padding: [f32; 2],
}

impl<M: MapSurface> SceneDisplay<M> {
    #[must_use]
    pub fn new(map: M, padding: [f32; 2]) -> Self {
        Self {
            map,
            current: None,
            padding,
        }
    }

    /// Replace the displayed scene. The scene must have its bounds resolved.
    pub fn show(&mut self, scene: &Scene) -> Result<(), DisplayError> {
        let bounds = scene
            .bounds
            .as_ref()
            .ok_or_else(|| DisplayError::MissingBounds(scene.scene_id.clone()))?;

        let layer = self.map.create_tile_layer(&scene.map_id);
        self.map.add_layer(layer);
        self.map.fit_bounds(bounds, self.padding);
        self.map.set_info(&InfoPanel::for_scene(scene, bounds));

        if let Some(previous) = self.current.replace(layer) {
            if self.map.has_layer(previous) {
                self.map.remove_layer(previous);
            }
        }

        Ok(())
    }

    /// Layer of the scene currently on screen.
    #[must_use]
    pub fn current_layer(&self) -> Option<LayerId> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{location, scene, RecordingMap};

    fn resolved(id: &str) -> Scene {
        let mut s = scene(id, "2015-01-01T00:00:00Z", true);
        s.bounds = Some(location(-0.5, -77.25).bounds());
        s
    }

    #[test]
    fn test_first_show_removes_nothing() {
        let map = RecordingMap::default();
        let mut display = SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING);

        display.show(&resolved("LC80010622014234LGN00")).unwrap();

        let log = map.log.lock().unwrap();
        assert_eq!(log.active.len(), 1);
        assert!(log.removed.is_empty());
        assert_eq!(log.fits.len(), 1);
        assert_eq!(log.fits[0].1, [50.0, 50.0]);
        assert_eq!(log.created[0].1, "map.LC80010622014234LGN00");
    }

    #[test]
    fn test_show_replaces_previous_layer() {
        let map = RecordingMap::default();
        let mut display = SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING);

        display.show(&resolved("LC80010622014234LGN00")).unwrap();
        let first = display.current_layer().unwrap();
        display.show(&resolved("LC80020622014235LGN00")).unwrap();

        let log = map.log.lock().unwrap();
        assert_eq!(log.removed, vec![first]);
        assert_eq!(log.active, vec![display.current_layer().unwrap()]);
    }

    #[test]
    fn test_info_panel_contents() {
        let map = RecordingMap::default();
        let mut display = SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING);

        display.show(&resolved("LC80010622014234LGN00")).unwrap();

        let info = map.log.lock().unwrap().info.clone().unwrap();
        assert_eq!(info.location, "-77.25, -0.5");
        assert_eq!(info.satellite, "Landsat 8");
        assert_eq!(info.method, "True Color");
        assert_eq!(info.date_captured, "August 22, 2014");
    }

    #[test]
    fn test_info_panel_unknown_date() {
        let s = resolved("short");
        let info = InfoPanel::for_scene(&s, s.bounds.as_ref().unwrap());
        assert_eq!(info.date_captured, UNKNOWN_DATE);
    }

    #[test]
    fn test_show_without_bounds_changes_nothing() {
        let map = RecordingMap::default();
        let mut display = SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING);

        let result = display.show(&scene("S1", "2015-01-01T00:00:00Z", true));

        assert!(matches!(result, Err(DisplayError::MissingBounds(_))));
        assert!(map.log.lock().unwrap().created.is_empty());
        assert!(display.current_layer().is_none());
    }
}
