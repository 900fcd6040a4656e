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


//! Tile URL templates in the `{s}/{id}/{z}/{x}/{y}` placeholder style.

/// Default template for scene and base layer tiles.
pub const DEFAULT_TILE_URL_TEMPLATE: &str =
    "https://{s}.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={token}";

const SUBDOMAINS: [char; 3] = ['a', 'b', 'c'];

/// A tile URL template bound to an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate {
    template: String,
    token: String,
}

impl TileUrlTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            token: token.into(),
        }
    }

    /// URL of one tile of the layer `id`.
    #[must_use]
    pub fn tile_url(&self, id: &str, zoom: u8, x: u32, y: u32) -> String {
        // Spread requests over the subdomains
        let index = (u64::from(x) + u64::from(y)) % SUBDOMAINS.len() as u64;
        let subdomain = SUBDOMAINS[usize::try_from(index).unwrap_or(0)];

        self.template
            .replace("{s}", &subdomain.to_string())
            .replace("{id}", id)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{token}", &self.token)
    }
}
