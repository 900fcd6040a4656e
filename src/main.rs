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


mod app;
mod config;
mod info_pane;
mod map;

use clap::Parser;
use log::{info, warn};

use app::SceneRotatorApp;
use config::AppConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Cycle through the most recently published satellite scenes on a map
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of recent scenes to rotate through
    #[arg(long)]
    scenes: Option<usize>,

    /// Seconds each scene stays on screen
    #[arg(long)]
    switch_secs: Option<u64>,

    /// Seconds between scene list refreshes
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Imagery catalog API base URL
    #[arg(long)]
    api_url: Option<String>,
}

impl Args {
    /// Override config values for this run only
    fn apply(&self, config: &mut AppConfig) {
        if let Some(scenes) = self.scenes {
            config.scenes_to_fetch = scenes;
        }
        if let Some(secs) = self.switch_secs {
            config.scene_switch_secs = secs;
        }
        if let Some(secs) = self.refresh_secs {
            config.scenes_refresh_secs = secs;
        }
        if let Some(url) = &self.api_url {
            config.api_base_url.clone_from(url);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    };
    if let Ok(path) = AppConfig::get_config_path() {
        info!("Config file: {}", path.display());
    }
    args.apply(&mut config);

    // Catalog polling and rotation run here; eframe owns the main thread
    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("Scene Rotator"),
        ..Default::default()
    };

    info!("Starting Scene Rotator...");
    eframe::run_native(
        "Scene Rotator",
        options,
        Box::new(move |cc| {
            let _guard = handle.enter();
            Ok(Box::new(SceneRotatorApp::new(&cc.egui_ctx, &config)?))
        }),
    )?;

    Ok(())
}
