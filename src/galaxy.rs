//! The mounted galaxy: catalog, layout, clock, scene graph, interaction and
//! camera behind one frame-driven object.
//!
//! The host calls [`GalaxyScene::tick`] once per display refresh and feeds
//! pointer results in between. Selection changes caused by clicks are
//! reported to the registered listener exactly once; selection pushed in
//! from outside through [`GalaxyScene::sync_selection`] is not echoed back.

use std::time::Duration;

use crate::catalog::{Catalog, Entity, EntityKey};
use crate::config::GalaxyConfig;
use crate::interaction::{InteractionState, SelectionChange};
use crate::render::animator::{animate_scene, FrameState};
use crate::render::camera::{OrbitCamera, Projection};
use crate::render::clock::{AnimationClock, Tick};
use crate::render::orbit::{layout_orbits, OrbitLayout, ProfileTable};
use crate::render::painter::pick;
use crate::render::scene::{build_scene, SceneGraph, SceneStyle};

/// Callback receiving the newly selected entity, or `None` when cleared.
pub type SelectionListener = Box<dyn FnMut(Option<&Entity>)>;

pub struct GalaxyScene {
    catalog: Catalog,
    profiles: ProfileTable,
    layout: OrbitLayout,
    graph: SceneGraph,
    style: SceneStyle,
    clock: AnimationClock,
    camera: OrbitCamera,
    interaction: InteractionState,
    listener: Option<SelectionListener>,
    mounted: bool,
}

impl GalaxyScene {
    /// Lay out the catalog and build the scene graph.
    pub fn new(catalog: Catalog, profiles: ProfileTable, config: &GalaxyConfig) -> Self {
        let layout = layout_orbits(catalog.entities(), &profiles);
        let graph = build_scene(&catalog, &layout, &profiles, &config.style);
        let mut scene = Self {
            catalog,
            profiles,
            layout,
            graph,
            style: config.style.clone(),
            clock: AnimationClock::new(config.spin),
            camera: OrbitCamera::new(config.camera),
            interaction: InteractionState::new(),
            listener: None,
            mounted: true,
        };
        scene.animate();
        log::info!(
            "galaxy mounted: {} entities ({} orbiting, {} anchored)",
            scene.catalog.len(),
            scene.layout.placements.len(),
            scene.layout.anchored.len()
        );
        scene
    }

    /// Register the page-level selection listener, replacing any previous one.
    pub fn on_selection_change(&mut self, listener: impl FnMut(Option<&Entity>) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Advance one frame from a wall-clock reading.
    pub fn tick(&mut self, wall: Duration) -> Tick {
        let tick = self.clock.tick(wall);
        if !self.mounted {
            return tick;
        }
        self.camera.update(tick.wall_dt);
        self.animate();
        tick
    }

    fn animate(&mut self) {
        let frame = FrameState {
            time: self.clock.time(),
            body_spin: self.clock.body_spin(),
            anchor_spin: self.clock.anchor_spin(),
            interaction: &self.interaction,
            style: &self.style,
        };
        animate_scene(&mut self.graph, &self.layout, &frame);
    }

    /// Per-frame pick result from the host.
    pub fn pointer_over(&mut self, hit: Option<EntityKey>) {
        if self.mounted {
            self.interaction.pointer_over(hit);
        }
    }

    /// Pointer pressed on `key`: toggle selection and notify the listener.
    pub fn click(&mut self, key: EntityKey) {
        if !self.mounted || self.catalog.get(key).is_none() {
            return;
        }
        let change = self.interaction.click(key);
        self.notify(change);
    }

    fn notify(&mut self, change: SelectionChange) {
        if change.from == change.to {
            return;
        }
        let entity = change.to.and_then(|k| self.catalog.get(k));
        log::debug!(
            "selection: {:?} -> {:?}",
            change.from.and_then(|k| self.catalog.get(k)).map(|e| e.id.as_str()),
            entity.map(|e| e.id.as_str())
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(entity);
        }
    }

    /// Authoritative selection from the page. Does not re-notify.
    pub fn sync_selection(&mut self, key: Option<EntityKey>) {
        if !self.mounted {
            return;
        }
        let key = key.filter(|k| self.catalog.get(*k).is_some());
        if let Some(change) = self.interaction.sync_selection(key) {
            log::debug!("selection synced: {:?} -> {:?}", change.from, change.to);
        }
    }

    /// [`sync_selection`](Self::sync_selection) by entity id; unknown ids clear.
    pub fn sync_selection_by_id(&mut self, id: Option<&str>) {
        let key = id.and_then(|id| self.catalog.index_of(id));
        self.sync_selection(key);
    }

    /// Entity under `pointer` in this frame's projection.
    pub fn pick(&self, proj: &Projection, pointer: [f32; 2]) -> Option<EntityKey> {
        pick(&self.graph, proj, pointer)
    }

    /// Projection for a viewport at `origin` with `size` pixels.
    pub fn projection(&self, origin: [f32; 2], size: [f32; 2]) -> Projection {
        Projection::new(&self.camera.params(), self.camera.config.fov_deg, origin, size)
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.interaction.selected().and_then(|k| self.catalog.get(k))
    }

    pub fn hovered_entity(&self) -> Option<&Entity> {
        self.interaction.hovered().and_then(|k| self.catalog.get(k))
    }

    /// Drawn position of an entity's body this frame.
    pub fn entity_position(&self, key: EntityKey) -> Option<[f32; 3]> {
        self.graph.center_of(key)
    }

    /// Stop the clock, clear interaction and release the scene graph.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.clock.stop();
        self.interaction.reset();
        self.graph.clear();
        self.listener = None;
        log::info!("galaxy torn down after {} ticks", self.clock.ticks());
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn layout(&self) -> &OrbitLayout {
        &self.layout
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}

impl Drop for GalaxyScene {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::catalog::Rgb;
    use crate::render::orbit::{CategoryProfile, OrbitalProfile};
    use crate::render::scene::ScenePrimitive;

    fn builtin_scene() -> GalaxyScene {
        GalaxyScene::new(Catalog::builtin(), ProfileTable::default(), &GalaxyConfig::default())
    }

    fn recorder(scene: &mut GalaxyScene) -> Rc<RefCell<Vec<Option<String>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        scene.on_selection_change(move |e| sink.borrow_mut().push(e.map(|e| e.id.clone())));
        log
    }

    #[test]
    fn click_twice_notifies_once_each() {
        let mut scene = builtin_scene();
        let calls = recorder(&mut scene);

        scene.click(2);
        assert_eq!(scene.selected_entity().map(|e| e.id.as_str()), Some("airflow"));
        assert_eq!(*calls.borrow(), vec![Some("airflow".to_string())]);

        scene.click(2);
        assert!(scene.selected_entity().is_none());
        assert_eq!(*calls.borrow(), vec![Some("airflow".to_string()), None]);
    }

    #[test]
    fn click_other_replaces_selection() {
        let mut scene = builtin_scene();
        let calls = recorder(&mut scene);
        scene.click(1);
        scene.click(5);
        assert_eq!(scene.interaction().selected(), Some(5));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn sync_does_not_echo() {
        let mut scene = builtin_scene();
        let calls = recorder(&mut scene);
        scene.sync_selection_by_id(Some("sql"));
        assert_eq!(scene.selected_entity().map(|e| e.id.as_str()), Some("sql"));
        scene.sync_selection(None);
        assert!(scene.selected_entity().is_none());
        scene.sync_selection_by_id(Some("cobol"));
        assert!(scene.selected_entity().is_none());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn hover_leaves_selection_alone() {
        let mut scene = builtin_scene();
        scene.click(3);
        scene.pointer_over(Some(4));
        scene.pointer_over(None);
        assert_eq!(scene.interaction().selected(), Some(3));
        assert_eq!(scene.interaction().hovered(), None);
    }

    #[test]
    fn empty_catalog_renders_anchor_only() {
        let mut scene = GalaxyScene::new(Catalog::default(), ProfileTable::default(), &GalaxyConfig::default());
        scene.tick(Duration::from_secs(0));
        scene.tick(Duration::from_secs(1));
        assert_eq!(scene.graph().body_count(), 0);
        assert!(scene.graph().anchor().is_some());
        assert!(scene.selected_entity().is_none());
    }

    #[test]
    fn single_entity_at_radius_on_x_axis() {
        let catalog = Catalog::new(vec![Entity::new("a", "A", 5, "X", Rgb::WHITE, "", false)]);
        let table = ProfileTable::from_profiles(vec![CategoryProfile {
            category: "X".into(),
            profile: OrbitalProfile::new(5.0, 0.0, 0.0),
            label: String::new(),
        }]);
        let scene = GalaxyScene::new(catalog, table, &GalaxyConfig::default());
        let p = scene.layout().position_of(0, 0.0);
        assert!((p[0] - 5.0).abs() < 1e-6 && p[1].abs() < 1e-6 && p[2].abs() < 1e-6);
    }

    #[test]
    fn tick_moves_bodies_with_time() {
        let mut scene = builtin_scene();
        scene.tick(Duration::from_secs(0));
        let before = scene.entity_position(1).unwrap();
        scene.tick(Duration::from_secs(4));
        let after = scene.entity_position(1).unwrap();
        assert_ne!(before, after);
        let orbit = scene.layout().position_of(1, scene.clock().time());
        assert!((after[0] - orbit[0]).abs() < 1e-5);
    }

    #[test]
    fn paused_clock_freezes_orbits() {
        let mut scene = builtin_scene();
        scene.tick(Duration::from_secs(0));
        scene.tick(Duration::from_secs(1));
        scene.clock_mut().set_paused(true);
        let before = scene.entity_position(1).unwrap();
        scene.tick(Duration::from_secs(5));
        assert_eq!(scene.entity_position(1).unwrap(), before);
    }

    #[test]
    fn orbits_keep_moving_after_a_week() {
        let mut scene = builtin_scene();
        scene.tick(Duration::ZERO);
        let week = Duration::from_secs(7 * 24 * 3600);
        scene.tick(week);
        let before = scene.entity_position(1).unwrap();
        let t0 = scene.clock().time();
        for i in 1..=60u32 {
            scene.tick(week + Duration::from_nanos(16_666_667) * i);
        }
        assert!((scene.clock().time() - t0 - 1.0).abs() < 1e-6);
        assert_ne!(scene.entity_position(1).unwrap(), before);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut scene = builtin_scene();
        let calls = recorder(&mut scene);
        scene.tick(Duration::from_secs(0));
        scene.tick(Duration::from_secs(1));
        scene.click(1);
        scene.teardown();

        assert!(!scene.is_mounted());
        assert!(scene.clock().is_stopped());
        assert!(scene.graph().is_empty());
        assert!(scene.interaction().selected().is_none());

        scene.click(2);
        let t = scene.tick(Duration::from_secs(9));
        assert!((t.time - 1.0).abs() < 1e-5);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn selected_body_glows_after_tick() {
        let mut scene = builtin_scene();
        scene.click(1);
        scene.tick(Duration::from_millis(16));
        let glow = scene.graph().nodes.iter().zip(&scene.graph().meta).find_map(|(n, m)| match n {
            ScenePrimitive::Glow { opacity, .. } if m.entity == Some(1) => Some(*opacity),
            _ => None,
        });
        assert_eq!(glow, Some(0.40));
    }

    #[test]
    fn pick_finds_anchor_at_viewport_center() {
        let scene = GalaxyScene::new(
            Catalog::new(vec![Entity::new("core", "Core", 10, "core", Rgb::WHITE, "", true)]),
            ProfileTable::default(),
            &GalaxyConfig::default(),
        );
        let proj = scene.projection([0.0, 0.0], [800.0, 600.0]);
        assert_eq!(scene.pick(&proj, [400.0, 300.0]), Some(0));
        assert_eq!(scene.pick(&proj, [2.0, 2.0]), None);
    }
}
