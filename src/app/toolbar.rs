//! Toolbar rendering for `GalaxyApp`.
//!
//! Draws the title, pause/resume, camera reset, auto-rotate and zoom
//! toggles, the sidebar toggle and the simulation clock readout.

use eframe::egui;

use super::GalaxyApp;

impl GalaxyApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.strong("Skill Galaxy");
            ui.separator();

            if let Some(scene) = self.scene.as_mut() {
                let paused = scene.clock().is_paused();
                let label = if paused { "\u{25B6} Resume" } else { "\u{23F8} Pause" };
                if ui.button(label).clicked() {
                    scene.clock_mut().set_paused(!paused);
                }

                if ui.button("\u{27F2} Reset view").clicked() {
                    scene.camera_mut().reset();
                }

                let camera = scene.camera_mut();
                ui.checkbox(&mut camera.config.auto_rotate, "Auto-rotate");
                ui.checkbox(&mut camera.config.zoom_enabled, "Zoom");

                ui.separator();
                ui.monospace(format!("t = {:7.1}s", scene.clock().time()));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_sidebar, "Details");
            });
        });
    }
}
