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


use scene_catalog::InfoPanel;

/// Floating box with details of the scene on screen
pub struct InfoPane;

impl InfoPane {
    /// Render the info box, or a waiting message before the first scene
    pub fn render(ctx: &egui::Context, info: Option<&InfoPanel>, attribution: &str) {
        egui::Window::new("scene_info")
            .title_bar(false)
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
            .resizable(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 220))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                match info {
                    Some(info) => {
                        egui::Grid::new("scene_info_grid")
                            .num_columns(2)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                Self::row(ui, "Location", &info.location);
                                Self::row(ui, "Satellite", &info.satellite);
                                Self::row(ui, "Method", &info.method);
                                Self::row(ui, "Date captured", &info.date_captured);
                            });
                    }
                    None => {
                        ui.label(egui::RichText::new("Waiting for recent imagery...")
                            .color(egui::Color32::from_rgb(150, 200, 220)));
                    }
                }

                ui.add_space(4.0);
                ui.label(egui::RichText::new(attribution)
                    .size(9.0)
                    .color(egui::Color32::from_rgb(120, 120, 130)));
            });
    }

    fn row(ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(egui::RichText::new(label)
            .size(11.0)
            .color(egui::Color32::from_rgb(150, 150, 160)));
        ui.label(egui::RichText::new(value)
            .size(13.0)
            .strong()
            .color(egui::Color32::from_rgb(220, 230, 240)));
        ui.end_row();
    }
}
