//! `GalaxyApp`: the top-level egui application state.
//!
//! This module declares the `GalaxyApp` struct and its constructor.
//! All drawing is split across the sibling sub-modules:
//!
//! - `toolbar`: pause, camera reset and auto-rotate controls
//! - `sidebar`: legend, category filter, entity list and details
//! - `content`: the 3-D galaxy viewport (or the loading spinner)

pub mod content;
pub mod sidebar;
pub mod toolbar;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;

use skill_galaxy::catalog::Catalog;
use skill_galaxy::config::GalaxyConfig;
use skill_galaxy::error::GalaxyError;
use skill_galaxy::galaxy::GalaxyScene;
use skill_galaxy::render::clock::WallClock;
use skill_galaxy::render::orbit::ProfileTable;

/// Page-level selection, owned outside the scene.
pub type SharedSelection = Rc<RefCell<Option<String>>>;

// ─── Application state ───────────────────────────────────────────────────────

pub struct GalaxyApp {
    /// `None` while no render context is available
    pub scene: Option<GalaxyScene>,
    pub render_error: Option<String>,
    pub wall: WallClock,
    /// Selected entity id as the page sees it; written by the scene listener
    pub page_selection: SharedSelection,
    /// Category shown in the sidebar list (`None` = all)
    pub category_filter: Option<String>,
    pub show_sidebar: bool,
}

impl GalaxyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        catalog: Catalog,
        profiles: ProfileTable,
        config: GalaxyConfig,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::mount(acquire_render_context(cc.gl.as_ref()), catalog, profiles, config)
    }

    /// Build the app state; without a render context the scene is left
    /// unmounted and the viewport shows a spinner.
    pub fn mount(
        render: Result<(), GalaxyError>,
        catalog: Catalog,
        profiles: ProfileTable,
        config: GalaxyConfig,
    ) -> Self {
        let page_selection: SharedSelection = Rc::new(RefCell::new(None));
        let (scene, render_error) = match render {
            Ok(()) => {
                let mut scene = GalaxyScene::new(catalog, profiles, &config);
                let sink = Rc::clone(&page_selection);
                scene.on_selection_change(move |entity| {
                    *sink.borrow_mut() = entity.map(|e| e.id.clone());
                });
                (Some(scene), None)
            }
            Err(e) => {
                log::error!("{e}");
                (None, Some(e.to_string()))
            }
        };

        Self {
            scene,
            render_error,
            wall: WallClock::new(),
            page_selection,
            category_filter: None,
            show_sidebar: true,
        }
    }

    /// Selection requested by the page (sidebar list). The scene is synced
    /// without echoing the change back through its listener.
    pub fn select_from_page(&mut self, id: Option<String>) {
        if let Some(scene) = self.scene.as_mut() {
            scene.sync_selection_by_id(id.as_deref());
        }
        *self.page_selection.borrow_mut() = id;
    }
}

/// The galaxy is painted through egui's renderer; without a GL context
/// there is nothing to draw into.
pub fn acquire_render_context(gl: Option<&Arc<eframe::glow::Context>>) -> Result<(), GalaxyError> {
    if gl.is_some() {
        Ok(())
    } else {
        Err(GalaxyError::RenderContext("no OpenGL context from the host window".into()))
    }
}

impl eframe::App for GalaxyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        if self.show_sidebar {
            egui::SidePanel::right("sidebar")
                .default_width(240.0)
                .show(ctx, |ui| {
                    self.draw_sidebar(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_content(ui, ctx);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(mut scene) = self.scene.take() {
            scene.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(render: Result<(), GalaxyError>) -> GalaxyApp {
        GalaxyApp::mount(render, Catalog::builtin(), ProfileTable::default(), GalaxyConfig::default())
    }

    #[test]
    fn missing_gl_context_is_an_error() {
        let err = acquire_render_context(None).unwrap_err();
        assert!(matches!(err, GalaxyError::RenderContext(_)));
    }

    #[test]
    fn no_render_context_leaves_scene_unmounted() {
        let app = app(acquire_render_context(None));
        assert!(app.scene.is_none());
        assert!(app.render_error.as_deref().unwrap_or("").contains("render context"));
    }

    #[test]
    fn page_selection_is_not_echoed() {
        let mut app = app(Ok(()));
        app.select_from_page(Some("python".into()));
        assert_eq!(app.page_selection.borrow().as_deref(), Some("python"));
        let scene = app.scene.as_ref().unwrap();
        assert_eq!(scene.selected_entity().map(|e| e.id.as_str()), Some("python"));

        app.select_from_page(None);
        assert!(app.scene.as_ref().unwrap().selected_entity().is_none());
        assert!(app.page_selection.borrow().is_none());
    }

    #[test]
    fn scene_clicks_reach_the_page() {
        let mut app = app(Ok(()));
        let scene = app.scene.as_mut().unwrap();
        let key = scene.catalog().index_of("python").unwrap();
        scene.click(key);
        assert_eq!(app.page_selection.borrow().as_deref(), Some("python"));
    }
}
