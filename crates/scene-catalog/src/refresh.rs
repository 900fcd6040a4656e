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


//! Refresh timer for the working set.

use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogApi;
use crate::fetcher::SceneFetcher;
use crate::scene::Scene;

/// Default interval between full working set refreshes.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(2 * 60 * 60);

/// Periodically re-fetches the latest scenes and publishes them.
#[derive(Debug)]
pub struct RefreshTimer<C> {
    fetcher: SceneFetcher<C>,
    period: Duration,
    publisher: watch::Sender<Vec<Scene>>,
}

impl<C: CatalogApi> RefreshTimer<C> {
    #[must_use]
    pub fn new(
        fetcher: SceneFetcher<C>,
        period: Duration,
        publisher: watch::Sender<Vec<Scene>>,
    ) -> Self {
        Self {
            fetcher,
            period,
            publisher,
        }
    }

    /// Fetch once and publish the result.
    ///
    /// Failed fetches and empty results leave the published working set as
    /// it was. Returns `true` if a new set was published.
    pub async fn refresh_once(&self) -> bool {
        match self.fetcher.fetch_latest().await {
            Ok(scenes) if scenes.is_empty() => {
                warn!("Catalog returned no ready scenes, keeping current working set");
                false
            }
            Ok(scenes) => {
                info!(
                    "Fetched {} of {} requested scenes",
                    scenes.len(),
                    self.fetcher.target()
                );
                self.publisher.send_replace(scenes);
                true
            }
            Err(e) => {
                error!("Failed to refresh scene list: {}", e);
                false
            }
        }
    }

    /// Refresh immediately, then once per period, until cancelled.
    pub async fn run(self, cancel_token: CancellationToken) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tokio::select! {
                        _ = self.refresh_once() => {}
                        () = cancel_token.cancelled() => {
                            info!("Scene refresh cancelled");
                            return;
                        }
                    }
                }
                () = cancel_token.cancelled() => {
                    info!("Scene refresh cancelled");
                    return;
                }
            }
        }
    }
}
