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


//! Viewport math: Web Mercator projection, zoom-to-fit and camera easing.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use scene_catalog::{LatLon, SceneBounds};

const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// How long a move onto a new scene takes
pub const FIT_ANIMATION: Duration = Duration::from_millis(1200);

/// Web Mercator projection utilities, in world units (0.0 to 1.0 at zoom 0)
pub struct WebMercator;

impl WebMercator {
    /// Convert longitude to Web Mercator X coordinate (0.0 to 1.0)
    pub fn lon_to_x(lon: f64) -> f64 {
        (lon + 180.0) / 360.0
    }

    /// Convert latitude to Web Mercator Y coordinate (0.0 to 1.0)
    pub fn lat_to_y(lat: f64) -> f64 {
        let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
    }

    /// Convert a Web Mercator X coordinate back to longitude
    pub fn x_to_lon(x: f64) -> f64 {
        x * 360.0 - 180.0
    }

    /// Convert a Web Mercator Y coordinate back to latitude
    pub fn y_to_lat(y: f64) -> f64 {
        (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
    }
}

/// Center of the bounds in projected space, which is what the map centers on
pub fn projected_center(bounds: &SceneBounds) -> LatLon {
    let x = (WebMercator::lon_to_x(bounds.south_west.lon) + WebMercator::lon_to_x(bounds.north_east.lon)) / 2.0;
    let y = (WebMercator::lat_to_y(bounds.south_west.lat) + WebMercator::lat_to_y(bounds.north_east.lat)) / 2.0;
    LatLon::new(WebMercator::y_to_lat(y), WebMercator::x_to_lon(x))
}

/// Largest whole zoom level at which `bounds` fits a viewport of `size`
/// pixels with `padding` on every side, clamped to `[min_zoom, max_zoom]`
pub fn fit_zoom(
    bounds: &SceneBounds,
    size: [f32; 2],
    padding: [f32; 2],
    min_zoom: f64,
    max_zoom: f64,
) -> f64 {
    let width = (WebMercator::lon_to_x(bounds.north_east.lon) - WebMercator::lon_to_x(bounds.south_west.lon)).abs() * TILE_SIZE;
    let height = (WebMercator::lat_to_y(bounds.south_west.lat) - WebMercator::lat_to_y(bounds.north_east.lat)).abs() * TILE_SIZE;

    let available_width = (f64::from(size[0]) - 2.0 * f64::from(padding[0])).max(1.0);
    let available_height = (f64::from(size[1]) - 2.0 * f64::from(padding[1])).max(1.0);

    let zoom_for = |available: f64, extent: f64| {
        if extent > 0.0 {
            (available / extent).log2()
        } else {
            max_zoom
        }
    };

    zoom_for(available_width, width)
        .min(zoom_for(available_height, height))
        .floor()
        .clamp(min_zoom, max_zoom)
}

/// Where the map is looking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LatLon,
    pub zoom: f64,
}

/// Eased move from one camera to another
#[derive(Debug, Clone, Copy)]
pub struct CameraAnimation {
    from: Camera,
    to: Camera,
    started: Instant,
    duration: Duration,
}

impl CameraAnimation {
    pub fn new(from: Camera, to: Camera, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Camera at `now`, using an ease-out cubic curve
    pub fn sample(&self, now: Instant) -> Camera {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t).powi(3);
        let lerp = |a: f64, b: f64| a + (b - a) * eased;

        Camera {
            center: LatLon::new(
                lerp(self.from.center.lat, self.to.center.lat),
                lerp(self.from.center.lon, self.to.center.lon),
            ),
            zoom: lerp(self.from.zoom, self.to.zoom),
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> Camera {
        self.to
    }
}
