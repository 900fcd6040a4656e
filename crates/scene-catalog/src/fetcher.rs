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


//! Scene metadata fetcher.
//!
//! Walks the catalog listing backward from its newest page until enough
//! ready scenes have been collected, then keeps the most recent ones.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::catalog::{with_timeout, CatalogApi, CatalogError, DEFAULT_REQUEST_TIMEOUT};
use crate::scene::Scene;

/// Default number of scenes in a working set.
pub const DEFAULT_SCENES_TO_FETCH: usize = 10;
/// Default upper bound on listing pages read per fetch.
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Fetches the most recently published ready scenes.
#[derive(Debug)]
pub struct SceneFetcher<C> {
    catalog: Arc<C>,
    target: usize,
    max_pages: usize,
    request_timeout: Duration,
}

impl<C: CatalogApi> SceneFetcher<C> {
    #[must_use]
    pub fn new(catalog: Arc<C>, target: usize, max_pages: usize) -> Self {
        Self {
            catalog,
            target,
            max_pages: max_pages.max(1),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Give up on a listing page after `timeout`.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Fetch up to `target` ready scenes, most recent first.
    ///
    /// Stops early when the listing has no older page, when a page link
    /// repeats, or after `max_pages` pages. Any request or decode failure is
    /// returned as is, as is a page that does not arrive in time.
    pub async fn fetch_latest(&self) -> Result<Vec<Scene>, CatalogError> {
        let mut scenes: Vec<Scene> = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.catalog.latest_page_url());

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!("Catalog page {} was already visited, stopping", url);
                break;
            }

            let page = with_timeout(self.request_timeout, self.catalog.scene_page(&url)).await?;
            debug!("Page {} returned {} scenes", url, page.results.len());
            scenes.extend(page.results);

            let ready = scenes.iter().filter(|s| s.ready).count();
            if ready >= self.target {
                break;
            }

            if visited.len() >= self.max_pages {
                warn!(
                    "Read {} catalog pages but only found {} ready scenes, stopping",
                    visited.len(),
                    ready
                );
                break;
            }

            next = page.previous;
            if next.is_none() {
                warn!("Catalog has no older pages, using {} ready scenes", ready);
            }
        }

        Ok(select_latest(scenes, self.target))
    }
}

/// Order scenes newest first, drop the ones that are not ready and keep at
/// most `count`. The sort is stable, equal timestamps keep their order.
#[must_use]
pub fn select_latest(mut scenes: Vec<Scene>, count: usize) -> Vec<Scene> {
    scenes.sort_by(|a, b| b.time_requested.cmp(&a.time_requested));
    scenes.retain(|s| s.ready);
    scenes.truncate(count);
    scenes
}
