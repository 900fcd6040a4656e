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


//! Scene bounds resolver.

use log::debug;

use crate::catalog::{CatalogApi, CatalogError};
use crate::scene::Scene;

/// Attach the footprint and center to `scene`, asking the catalog only if
/// the scene has none yet. The first search result is trusted as is.
pub async fn resolve_bounds<C: CatalogApi>(
    catalog: &C,
    scene: &mut Scene,
) -> Result<(), CatalogError> {
    if scene.bounds.is_some() {
        return Ok(());
    }

    let response = catalog.search_scene(&scene.scene_id).await?;
    let location = response
        .results
        .first()
        .ok_or_else(|| CatalogError::SceneNotFound(scene.scene_id.clone()))?;

    let bounds = location.bounds();
    debug!(
        "Resolved bounds for {}: center {}, {}",
        scene.scene_id, bounds.center.lat, bounds.center.lon
    );
    scene.bounds = Some(bounds);
    Ok(())
}
