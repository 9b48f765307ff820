//! Sidebar for `GalaxyApp`: legend, category filter, skill list and the
//! details of the page-level selection.

use eframe::egui;

use skill_galaxy::catalog::{Entity, LEVEL_MAX};
use skill_galaxy::render::panel::level_segments;

use super::GalaxyApp;

fn swatch(ui: &mut egui::Ui, entity: &Entity) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
    let c = entity.color;
    ui.painter()
        .circle_filled(rect.center(), 5.0, egui::Color32::from_rgb(c.r, c.g, c.b));
}

impl GalaxyApp {
    pub fn draw_sidebar(&mut self, ui: &mut egui::Ui) {
        let Some(scene) = self.scene.as_ref() else {
            ui.label("Waiting for the renderer\u{2026}");
            return;
        };

        // Snapshot what the list needs so the scene can be synced afterwards
        let selected_id = self.page_selection.borrow().clone();
        let categories: Vec<(String, String)> = scene
            .profiles()
            .rows()
            .iter()
            .filter(|row| scene.catalog().entities().iter().any(|e| e.category == row.category))
            .map(|row| (row.category.clone(), row.label.clone()))
            .collect();
        let entities: Vec<Entity> = scene.catalog().entities().to_vec();
        let mut request: Option<Option<String>> = None;

        ui.heading("Legend");
        ui.label("\u{2B50} featured skill");
        ui.label("\u{25EF} ring: featured orbit body");
        ui.label("Size and glow grow with mastery level");
        ui.separator();

        ui.horizontal_wrapped(|ui| {
            if ui.selectable_label(self.category_filter.is_none(), "All").clicked() {
                self.category_filter = None;
            }
            for (category, label) in &categories {
                let text = if label.is_empty() { category.as_str() } else { label.as_str() };
                let active = self.category_filter.as_deref() == Some(category.as_str());
                if ui.selectable_label(active, text).clicked() {
                    self.category_filter = if active { None } else { Some(category.clone()) };
                }
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() * 0.55)
            .show(ui, |ui| {
                for entity in entities
                    .iter()
                    .filter(|e| self.category_filter.as_ref().map_or(true, |c| &e.category == c))
                {
                    let is_selected = selected_id.as_deref() == Some(entity.id.as_str());
                    ui.horizontal(|ui| {
                        swatch(ui, entity);
                        let star = if entity.featured { " \u{2B50}" } else { "" };
                        let resp = ui.selectable_label(is_selected, format!("{}{}", entity.name, star));
                        if resp.clicked() {
                            request = Some(if is_selected { None } else { Some(entity.id.clone()) });
                        }
                    });
                }
            });

        ui.separator();
        match selected_id.as_deref().and_then(|id| entities.iter().find(|e| e.id == id)) {
            Some(entity) => {
                ui.horizontal(|ui| {
                    swatch(ui, entity);
                    ui.strong(&entity.name);
                });
                if !entity.description.is_empty() {
                    ui.label(&entity.description);
                }
                ui.horizontal(|ui| {
                    for filled in level_segments(entity.level) {
                        let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 6.0), egui::Sense::hover());
                        let c = entity.color;
                        let fill = if filled {
                            egui::Color32::from_rgb(c.r, c.g, c.b)
                        } else {
                            egui::Color32::from_gray(60)
                        };
                        ui.painter().rect_filled(rect, 2.0, fill);
                    }
                });
                ui.small(format!("Level {}/{}", entity.level, LEVEL_MAX));
                ui.small(format!("{} \u{2022} {}", entity.category, entity.color.to_hex()));
                if entity.featured {
                    ui.small("\u{2B50} Featured skill");
                }
            }
            None => {
                ui.weak("Click a skill to see its details");
            }
        }

        if let Some(id) = request {
            self.select_from_page(id);
        }
    }
}
