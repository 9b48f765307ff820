//! Content-area rendering for `GalaxyApp`.
//!
//! - `draw_content`: spinner when there is no render context or viewport,
//!   otherwise one frame of the galaxy: tick, input, paint, detail panel

use eframe::egui;

use skill_galaxy::render::clock::FrameSource;
use skill_galaxy::render::painter::paint_scene;
use skill_galaxy::render::panel::paint_detail_panel;

use super::GalaxyApp;

/// What the viewport shows this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentView {
    Loading,
    Galaxy,
}

/// The galaxy needs a mounted scene and a viewport with some area.
pub fn content_view(scene_mounted: bool, viewport: egui::Rect) -> ContentView {
    if !scene_mounted || viewport.width() < 1.0 || viewport.height() < 1.0 {
        ContentView::Loading
    } else {
        ContentView::Galaxy
    }
}

impl GalaxyApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let rect = ui.available_rect_before_wrap();
        let mounted = self.scene.as_ref().map_or(false, |s| s.is_mounted());
        let scene = match (content_view(mounted, rect), self.scene.as_mut()) {
            (ContentView::Galaxy, Some(scene)) => scene,
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.spinner();
                        if let Some(ref err) = self.render_error {
                            ui.colored_label(egui::Color32::GRAY, err);
                        }
                    });
                });
                return;
            }
        };

        scene.tick(self.wall.elapsed());

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let proj = scene.projection([rect.min.x, rect.min.y], [rect.width(), rect.height()]);

        // Drag to orbit, scroll to zoom; no pan
        if response.dragged() {
            let delta = response.drag_delta();
            scene.camera_mut().drag(delta.x, delta.y);
        } else if scene.camera().is_dragging() {
            scene.camera_mut().end_drag();
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                scene.camera_mut().zoom(scroll);
            }
        }

        // Hover / click
        let hit = response
            .hover_pos()
            .and_then(|p| scene.pick(&proj, [p.x, p.y]));
        scene.pointer_over(hit);
        if hit.is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            if let Some(key) = hit {
                scene.click(key);
            }
        }

        let painter = ui.painter_at(rect);
        paint_scene(&painter, rect, scene.graph(), &proj);

        if let Some(entity) = scene.selected_entity() {
            let anchor = scene
                .interaction()
                .selected()
                .and_then(|k| scene.entity_position(k))
                .and_then(|p| proj.project(p))
                .map(|at| egui::pos2(at.screen[0], at.screen[1]));
            if let Some(anchor) = anchor {
                paint_detail_panel(&painter, rect, anchor, entity);
            }
        }

        painter.text(
            rect.left_bottom() + egui::vec2(12.0, -12.0),
            egui::Align2::LEFT_BOTTOM,
            "Drag to rotate \u{2022} Scroll to zoom \u{2022} Click a skill for details",
            egui::FontId::proportional(11.0),
            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 90),
        );

        ctx.request_repaint();
    }
}
