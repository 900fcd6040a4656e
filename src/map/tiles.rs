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


use std::path::PathBuf;

use scene_catalog::TileUrlTemplate;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

/// Highest zoom requested for scene overlays
pub const SCENE_MAX_ZOOM: u8 = 18;

/// Tile source for one imagery layer, addressed by its map id
pub struct SceneTileSource {
    map_id: String,
    template: TileUrlTemplate,
    max_zoom: u8,
}

impl SceneTileSource {
    pub fn new(map_id: String, template: TileUrlTemplate, max_zoom: u8) -> Self {
        Self {
            map_id,
            template,
            max_zoom,
        }
    }

    /// Wrap the source in `HttpTiles` with an on-disk cache per map id
    pub fn into_http_tiles(self, ctx: &egui::Context) -> HttpTiles {
        let http_options = HttpOptions {
            cache: Some(cache_dir(&self.map_id)),
            ..Default::default()
        };

        HttpTiles::with_options(self, http_options, ctx.clone())
    }
}

impl TileSource for SceneTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.template
            .tile_url(&self.map_id, tile_id.zoom, tile_id.x, tile_id.y)
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© Mapbox, © OpenStreetMap contributors, imagery © Astro Digital",
            url: "https://www.mapbox.com/about/maps/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

fn cache_dir(map_id: &str) -> PathBuf {
    // Map ids end up as directory names
    let dir_name: String = map_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();

    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("scene-rotator")
        .join("tiles")
        .join(dir_name)
}
