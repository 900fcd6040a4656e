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


//! Application configuration management.
//!
//! Settings are persisted as TOML through `confy`. Every field has a serde
//! default so older or hand-edited config files keep loading.

use std::time::Duration;

use scene_catalog::RotatorConfig;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "scene-rotator";
const CONFIG_NAME: &str = "config";

/// Environment variable that overrides the configured access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// How many recently published scenes to rotate through
    #[serde(default = "default_scenes_to_fetch")]
    pub scenes_to_fetch: usize,

    /// Seconds each scene stays on screen
    #[serde(default = "default_scene_switch_secs")]
    pub scene_switch_secs: u64,

    /// Seconds between refreshes of the scene list
    #[serde(default = "default_scenes_refresh_secs")]
    pub scenes_refresh_secs: u64,

    /// Imagery catalog API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Tile URL template with {s}, {id}, {z}, {x}, {y} and {token} placeholders
    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,

    /// Tile service access token (optional, env var takes precedence)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Map id of the base layer drawn under the scenes
    #[serde(default = "default_base_layer_id")]
    pub base_layer_id: String,

    #[serde(default = "default_base_min_zoom")]
    pub base_min_zoom: u8,

    #[serde(default = "default_base_max_zoom")]
    pub base_max_zoom: u8,

    /// Zoom level before the first scene arrives
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,

    /// Padding in pixels kept around a scene when zooming to it
    #[serde(default = "default_fit_padding_px")]
    pub fit_padding_px: f32,

    /// Stop paging through the catalog after this many pages
    #[serde(default = "default_max_catalog_pages")]
    pub max_catalog_pages: usize,

    /// Seconds before an unanswered catalog request is abandoned
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Default value functions for serde
fn default_scenes_to_fetch() -> usize {
    10
}

fn default_scene_switch_secs() -> u64 {
    30
}

fn default_scenes_refresh_secs() -> u64 {
    2 * 60 * 60
}

fn default_api_base_url() -> String {
    scene_catalog::catalog::DEFAULT_BASE_URL.to_string()
}

fn default_tile_url_template() -> String {
    scene_catalog::tiles::DEFAULT_TILE_URL_TEMPLATE.to_string()
}

fn default_base_layer_id() -> String {
    "astrodigital.00ffdda1".to_string()
}

fn default_base_min_zoom() -> u8 {
    4
}

fn default_base_max_zoom() -> u8 {
    12
}

fn default_initial_zoom() -> f64 {
    8.0
}

fn default_fit_padding_px() -> f32 {
    50.0
}

fn default_max_catalog_pages() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scenes_to_fetch: default_scenes_to_fetch(),
            scene_switch_secs: default_scene_switch_secs(),
            scenes_refresh_secs: default_scenes_refresh_secs(),
            api_base_url: default_api_base_url(),
            tile_url_template: default_tile_url_template(),
            access_token: None,
            base_layer_id: default_base_layer_id(),
            base_min_zoom: default_base_min_zoom(),
            base_max_zoom: default_base_max_zoom(),
            initial_zoom: default_initial_zoom(),
            fit_padding_px: default_fit_padding_px(),
            max_catalog_pages: default_max_catalog_pages(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Resolve the tile access token: environment variable first, then config
    pub fn resolve_access_token(&self) -> Option<String> {
        Self::pick_access_token(std::env::var(ACCESS_TOKEN_ENV).ok(), self.access_token.as_deref())
    }

    fn pick_access_token(env_token: Option<String>, config_token: Option<&str>) -> Option<String> {
        env_token
            .filter(|t| !t.is_empty())
            .or_else(|| config_token.map(str::to_string).filter(|t| !t.is_empty()))
    }

    /// Zoom range of the base layer, lowest first
    pub fn base_zoom_range(&self) -> (f64, f64) {
        let min = f64::from(self.base_min_zoom);
        (min, f64::from(self.base_max_zoom).max(min))
    }

    /// Starting zoom, kept inside the base layer's zoom range
    pub fn clamped_initial_zoom(&self) -> f64 {
        let (min, max) = self.base_zoom_range();
        if self.initial_zoom.is_nan() {
            return min;
        }
        self.initial_zoom.clamp(min, max)
    }

    /// Settings for the rotation service
    pub fn rotator_config(&self) -> RotatorConfig {
        RotatorConfig {
            api_base_url: self.api_base_url.clone(),
            scenes_to_fetch: self.scenes_to_fetch.max(1),
            display_duration: Duration::from_secs(self.scene_switch_secs.max(1)),
            refresh_period: Duration::from_secs(self.scenes_refresh_secs.max(60)),
            max_pages: self.max_catalog_pages,
            fit_padding: [self.fit_padding_px, self.fit_padding_px],
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rotator_defaults() {
        let config = AppConfig::default().rotator_config();
        let defaults = RotatorConfig::default();

        assert_eq!(config.api_base_url, defaults.api_base_url);
        assert_eq!(config.scenes_to_fetch, 10);
        assert_eq!(config.display_duration, Duration::from_secs(30));
        assert_eq!(config.refresh_period, Duration::from_secs(7200));
        assert_eq!(config.max_pages, defaults.max_pages);
        assert_eq!(config.fit_padding, [50.0, 50.0]);
        assert_eq!(config.request_timeout, defaults.request_timeout);
    }

    #[test]
    fn test_initial_zoom_clamped_to_base_range() {
        let zoom_of = |initial_zoom| {
            AppConfig {
                initial_zoom,
                ..AppConfig::default()
            }
            .clamped_initial_zoom()
        };

        assert_eq!(zoom_of(8.0), 8.0);
        assert_eq!(zoom_of(40.0), 12.0);
        assert_eq!(zoom_of(-3.0), 4.0);
        assert_eq!(zoom_of(f64::NAN), 4.0);
    }

    #[test]
    fn test_request_timeout_is_never_zero() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.rotator_config().request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "scenes_to_fetch": 4, "access_token": "abc" }"#).unwrap();

        assert_eq!(config.scenes_to_fetch, 4);
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.scene_switch_secs, 30);
        assert_eq!(config.base_layer_id, "astrodigital.00ffdda1");
        assert_eq!(config.base_min_zoom, 4);
        assert_eq!(config.base_max_zoom, 12);
    }

    #[test]
    fn test_env_token_takes_precedence() {
        assert_eq!(
            AppConfig::pick_access_token(Some("env".to_string()), Some("file")),
            Some("env".to_string())
        );
        assert_eq!(
            AppConfig::pick_access_token(Some(String::new()), Some("file")),
            Some("file".to_string())
        );
        assert_eq!(AppConfig::pick_access_token(None, Some("")), None);
    }
}
