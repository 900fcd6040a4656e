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


//! Scene rotation controller.
//!
//! The controller owns the working set and the rotation index. A refresh
//! task publishes replacement working sets through a `watch` channel; they
//! are adopted at the start of the next cycle, keeping the index, which is
//! always read modulo the current length.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::bounds::resolve_bounds;
use crate::catalog::{with_timeout, CatalogApi, DEFAULT_REQUEST_TIMEOUT};
use crate::display::{MapSurface, SceneDisplay};
use crate::scene::Scene;

/// Default time each scene stays on screen.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(30);

/// Cycles through the working set, one scene at a time.
#[derive(Debug)]
pub struct RotationController<C, M> {
    catalog: Arc<C>,
    display: SceneDisplay<M>,
    scenes: Vec<Scene>,
    index: usize,
    working_set: watch::Receiver<Vec<Scene>>,
    display_duration: Duration,
    request_timeout: Duration,
}

impl<C, M> RotationController<C, M>
where
    C: CatalogApi,
    M: MapSurface,
{
    #[must_use]
    pub fn new(
        catalog: Arc<C>,
        display: SceneDisplay<M>,
        working_set: watch::Receiver<Vec<Scene>>,
        display_duration: Duration,
    ) -> Self {
        Self {
            catalog,
            display,
            scenes: Vec::new(),
            index: 0,
            working_set,
            display_duration,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Give up on a bounds lookup after `timeout`.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Position in the working set of the next scene to show.
    #[must_use]
    pub fn index(&self) -> usize {
        if self.scenes.is_empty() {
            0
        } else {
            self.index % self.scenes.len()
        }
    }

    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Swap in a new working set without touching the index.
    pub fn replace_working_set(&mut self, scenes: Vec<Scene>) {
        info!(
            "Working set replaced: {} -> {} scenes",
            self.scenes.len(),
            scenes.len()
        );
        self.scenes = scenes;
    }

    /// Adopt a working set published since the last cycle, if any.
    fn adopt_published(&mut self) -> bool {
        match self.working_set.has_changed() {
            Ok(true) => {
                let scenes = self.working_set.borrow_and_update().clone();
                self.replace_working_set(scenes);
                true
            }
            Ok(false) | Err(_) => false,
        }
    }

    /// Display the scene at the current index, resolving its bounds first.
    ///
    /// Returns `true` if the scene made it to the screen. Failures, including
    /// a lookup that outlives the request timeout, are logged and leave the
    /// previous scene displayed.
    pub async fn tick(&mut self) -> bool {
        let len = self.scenes.len();
        if len == 0 {
            debug!("Working set is empty, nothing to display");
            return false;
        }

        self.index %= len;
        let scene = &mut self.scenes[self.index];

        let lookup = resolve_bounds(self.catalog.as_ref(), scene);
        if let Err(e) = with_timeout(self.request_timeout, lookup).await {
            warn!("Could not resolve bounds for {}: {}", scene.scene_id, e);
            return false;
        }

        match self.display.show(scene) {
            Ok(()) => {
                info!(
                    "Displaying scene {} ({}/{})",
                    scene.scene_id,
                    self.index + 1,
                    len
                );
                true
            }
            Err(e) => {
                warn!("Could not display {}: {}", scene.scene_id, e);
                false
            }
        }
    }

    /// Move to the next scene, wrapping to the start.
    pub fn advance(&mut self) {
        let len = self.scenes.len();
        self.index = if len == 0 { 0 } else { (self.index % len + 1) % len };
    }

    /// Rotate until cancelled. Waits for the first non-empty working set.
    pub async fn run(mut self, cancel_token: CancellationToken) {
        loop {
            self.adopt_published();
            if !self.scenes.is_empty() {
                break;
            }

            tokio::select! {
                changed = self.working_set.changed() => {
                    if changed.is_err() {
                        info!("Working set publisher closed before any scenes arrived");
                        return;
                    }
                }
                () = cancel_token.cancelled() => {
                    info!("Scene rotation cancelled");
                    return;
                }
            }
        }

        info!("Starting scene rotation with {} scenes", self.scenes.len());

        loop {
            self.adopt_published();

            tokio::select! {
                _ = self.tick() => {}
                () = cancel_token.cancelled() => {
                    info!("Scene rotation cancelled");
                    return;
                }
            }

            tokio::select! {
                () = sleep(self.display_duration) => {}
                () = cancel_token.cancelled() => {
                    info!("Scene rotation cancelled");
                    return;
                }
            }

            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DEFAULT_FIT_PADDING;
    use crate::testing::{location, scene, FakeCatalog, RecordingMap};

    fn scenes(count: usize) -> Vec<Scene> {
        (0..count)
            .map(|i| scene(&format!("S{i}"), &format!("2015-01-{:02}T00:00:00Z", 28 - i), true))
            .collect()
    }

    fn catalog_for(count: usize) -> FakeCatalog {
        (0..count).fold(FakeCatalog::new(), |catalog, i| {
            catalog.with_location(&format!("S{i}"), location(i as f64, i as f64))
        })
    }

    fn controller(
        catalog: FakeCatalog,
        map: &RecordingMap,
    ) -> (
        RotationController<FakeCatalog, RecordingMap>,
        watch::Sender<Vec<Scene>>,
    ) {
        let (tx, rx) = watch::channel(Vec::new());
        let controller = RotationController::new(
            Arc::new(catalog),
            SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING),
            rx,
            DEFAULT_DISPLAY_DURATION,
        );
        (controller, tx)
    }

    #[tokio::test]
    async fn test_index_wraps_after_full_cycle() {
        let map = RecordingMap::default();
        let (mut controller, _tx) = controller(catalog_for(4), &map);
        controller.replace_working_set(scenes(4));

        for _ in 0..4 {
            assert!(controller.tick().await);
            controller.advance();
        }

        assert_eq!(controller.index(), 0);
        assert_eq!(map.shown(), vec!["map.S0", "map.S1", "map.S2", "map.S3"]);
        assert_eq!(map.active_count(), 1);
    }

    #[tokio::test]
    async fn test_bounds_resolved_once_per_scene() {
        let map = RecordingMap::default();
        let catalog = Arc::new(catalog_for(2));
        let (_tx, rx) = watch::channel(Vec::new());
        let mut controller = RotationController::new(
            Arc::clone(&catalog),
            SceneDisplay::new(map.clone(), DEFAULT_FIT_PADDING),
            rx,
            DEFAULT_DISPLAY_DURATION,
        );
        controller.replace_working_set(scenes(2));

        for _ in 0..6 {
            controller.tick().await;
            controller.advance();
        }

        assert_eq!(catalog.search_count(), 2);
        assert!(controller.scenes().iter().all(|s| s.bounds.is_some()));
    }

    #[tokio::test]
    async fn test_shrunk_working_set_reads_index_modulo_length() {
        let map = RecordingMap::default();
        let (mut controller, _tx) = controller(catalog_for(10), &map);
        controller.replace_working_set(scenes(10));
        for _ in 0..7 {
            controller.advance();
        }
        assert_eq!(controller.index(), 7);

        controller.replace_working_set(scenes(3));
        assert_eq!(controller.index(), 1);

        assert!(controller.tick().await);
        assert_eq!(map.shown(), vec!["map.S1"]);

        controller.advance();
        assert_eq!(controller.index(), 2);
    }

    #[tokio::test]
    async fn test_empty_working_set_is_a_no_op() {
        let map = RecordingMap::default();
        let (mut controller, _tx) = controller(FakeCatalog::new(), &map);

        assert!(!controller.tick().await);
        controller.advance();
        assert_eq!(controller.index(), 0);
        assert!(map.shown().is_empty());
    }

    #[tokio::test]
    async fn test_bounds_failure_keeps_previous_scene() {
        let map = RecordingMap::default();
        // Only S0 has a location
        let (mut controller, _tx) = controller(catalog_for(1), &map);
        controller.replace_working_set(scenes(2));

        assert!(controller.tick().await);
        controller.advance();
        assert!(!controller.tick().await);

        assert_eq!(map.shown(), vec!["map.S0"]);
        assert_eq!(map.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_rotates_on_timer_and_stops_on_cancel() {
        let map = RecordingMap::default();
        let (controller, tx) = controller(catalog_for(3), &map);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(controller.run(cancel_token.clone()));

        tx.send_replace(scenes(3));
        sleep(Duration::from_secs(65)).await;
        assert_eq!(map.shown(), vec!["map.S0", "map.S1", "map.S2"]);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(map.shown().last().map(String::as_str), Some("map.S0"));

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_adopts_refreshed_set_on_next_cycle() {
        let map = RecordingMap::default();
        let catalog = catalog_for(3).with_location("N0", location(5.0, 5.0));
        let (controller, tx) = controller(catalog, &map);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(controller.run(cancel_token.clone()));

        tx.send_replace(scenes(3));
        sleep(Duration::from_secs(10)).await;
        assert_eq!(map.shown(), vec!["map.S0"]);

        // Replacement arrives mid-cycle; the current scene stays up
        tx.send_replace(vec![scene("N0", "2015-02-01T00:00:00Z", true)]);
        assert_eq!(map.shown(), vec!["map.S0"]);

        sleep(Duration::from_secs(25)).await;
        assert_eq!(map.shown(), vec!["map.S0", "map.N0"]);

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_while_waiting_for_scenes() {
        let map = RecordingMap::default();
        let (controller, _tx) = controller(FakeCatalog::new(), &map);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(controller.run(cancel_token.clone()));

        sleep(Duration::from_secs(1)).await;
        cancel_token.cancel();
        handle.await.unwrap();
        assert!(map.shown().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_moves_past_unanswered_bounds_lookup() {
        let map = RecordingMap::default();
        let (controller, tx) = controller(catalog_for(3).with_hanging("S1"), &map);
        let controller = controller.with_request_timeout(Duration::from_secs(10));
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(controller.run(cancel_token.clone()));

        // S0 at 0s, S1 gives up at 40s, S2 at 70s
        tx.send_replace(scenes(3));
        sleep(Duration::from_secs(75)).await;
        assert_eq!(map.shown(), vec!["map.S0", "map.S2"]);
        assert_eq!(map.active_count(), 1);

        cancel_token.cancel();
        handle.await.unwrap();
    }
}
