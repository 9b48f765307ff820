//! Orbit layout: category profiles and golden-angle placement.
//!
//! Every category maps to an [`OrbitalProfile`]. Radius 0 (or a category the
//! table does not know) anchors the entity at the origin; everything else
//! orbits on a tilted ellipse:
//!
//!   angle    = offset + t * speed
//!   position = (r cos(angle), r sin(angle) * tilt, r sin(angle))
//!
//! Initial offsets step by the golden angle over the orbiting subset, so
//! bodies sharing an orbit never re-cluster, whatever their count.

use std::f64::consts::{PI, TAU};

use serde::Deserialize;

use crate::catalog::{Entity, EntityKey};

/// π(3 − √5) radians, ≈ 137.5078°.
pub const GOLDEN_ANGLE: f64 = PI * (3.0 - 2.236_067_977_499_79);

/// Per-category orbit constants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OrbitalProfile {
    /// Orbit radius; 0 means anchored at the origin
    pub radius: f32,
    /// Angular speed in radians per second of simulation time
    #[serde(default)]
    pub speed: f32,
    /// Vertical displacement as a fraction of radius
    #[serde(default)]
    pub tilt: f32,
}

impl OrbitalProfile {
    pub const ANCHORED: Self = Self { radius: 0.0, speed: 0.0, tilt: 0.0 };

    pub const fn new(radius: f32, speed: f32, tilt: f32) -> Self {
        Self { radius, speed, tilt }
    }

    pub fn is_anchored(&self) -> bool {
        self.radius <= 0.0
    }
}

/// One row of the profile table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryProfile {
    pub category: String,
    #[serde(flatten)]
    pub profile: OrbitalProfile,
    /// Text drawn next to the orbit guide
    #[serde(default)]
    pub label: String,
}

/// Ordered category → profile table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    rows: Vec<CategoryProfile>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        let row = |category: &str, radius, speed, tilt, label: &str| CategoryProfile {
            category: category.into(),
            profile: OrbitalProfile::new(radius, speed, tilt),
            label: label.into(),
        };
        Self {
            rows: vec![
                row("core", 0.0, 0.0, 0.0, "Core"),
                row("bigdata", 4.5, 0.25, 0.1, "Big Data"),
                row("ml", 7.0, 0.18, 0.15, "ML / Deep Learning"),
                row("data", 5.5, 0.22, -0.12, "Databases"),
                row("viz", 8.5, 0.12, 0.2, "Visualisation"),
            ],
        }
    }
}

impl ProfileTable {
    /// Later rows with an already-seen category are ignored.
    pub fn from_profiles(profiles: Vec<CategoryProfile>) -> Self {
        let mut rows: Vec<CategoryProfile> = Vec::with_capacity(profiles.len());
        for p in profiles {
            if rows.iter().any(|r| r.category == p.category) {
                log::warn!("duplicate profile for category `{}` ignored", p.category);
                continue;
            }
            rows.push(p);
        }
        Self { rows }
    }

    pub fn row(&self, category: &str) -> Option<&CategoryProfile> {
        self.rows.iter().find(|r| r.category == category)
    }

    pub fn get(&self, category: &str) -> Option<&OrbitalProfile> {
        self.row(category).map(|r| &r.profile)
    }

    /// Profile for a category; unknown categories behave as anchored.
    pub fn resolve(&self, category: &str) -> OrbitalProfile {
        self.get(category).copied().unwrap_or(OrbitalProfile::ANCHORED)
    }

    pub fn label(&self, category: &str) -> &str {
        self.row(category).map(|r| r.label.as_str()).unwrap_or("")
    }

    pub fn rows(&self) -> &[CategoryProfile] {
        &self.rows
    }
}

/// Static placement of one orbiting entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub entity: EntityKey,
    /// Initial angle in `[0, 2π)`
    pub offset: f32,
    pub profile: OrbitalProfile,
}

impl Placement {
    /// Position at simulation time `t` (seconds). Pure in `t`.
    pub fn position_at(&self, t: f64) -> [f32; 3] {
        orbital_position(&self.profile, self.offset, t)
    }
}

/// A distinct orbit drawn as a guide curve.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitGuide {
    pub category: String,
    pub label: String,
    pub profile: OrbitalProfile,
}

/// Result of laying out a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbitLayout {
    pub placements: Vec<Placement>,
    /// Entities pinned at the origin, in catalog order
    pub anchored: Vec<EntityKey>,
    /// One guide per orbiting category, in profile-table order
    pub guides: Vec<OrbitGuide>,
}

impl OrbitLayout {
    pub fn placement_for(&self, entity: EntityKey) -> Option<&Placement> {
        self.placements.iter().find(|p| p.entity == entity)
    }

    /// The entity that the anchor body stands for, if any.
    pub fn anchor_entity(&self) -> Option<EntityKey> {
        self.anchored.first().copied()
    }

    /// Current position of an entity; anchored entities sit at the origin.
    pub fn position_of(&self, entity: EntityKey, t: f64) -> [f32; 3] {
        self.placement_for(entity)
            .map(|p| p.position_at(t))
            .unwrap_or([0.0, 0.0, 0.0])
    }
}

/// Golden-angle offset for the `index`-th orbiting entity. Index 0 → 0.
pub fn golden_offset(index: usize) -> f32 {
    let angle = (index as f64 * GOLDEN_ANGLE).rem_euclid(TAU) as f32;
    // f64 → f32 rounding can land exactly on 2π
    if angle >= std::f32::consts::TAU { 0.0 } else { angle }
}

/// Parametric orbit position. No integration, no accumulated state.
///
/// The phase is wrapped in f64 before narrowing, so large `t` keeps full
/// angular precision.
pub fn orbital_position(profile: &OrbitalProfile, offset: f32, t: f64) -> [f32; 3] {
    let angle = (f64::from(offset) + t * f64::from(profile.speed)).rem_euclid(TAU) as f32;
    let (s, c) = angle.sin_cos();
    let r = profile.radius;
    [r * c, r * s * profile.tilt, r * s]
}

/// Assign placements. Deterministic and idempotent for the same ordered input.
pub fn layout_orbits(entities: &[Entity], table: &ProfileTable) -> OrbitLayout {
    let mut layout = OrbitLayout::default();
    let mut orbit_index = 0usize;

    for (key, entity) in entities.iter().enumerate() {
        let profile = table.resolve(&entity.category);
        if profile.is_anchored() {
            if table.get(&entity.category).is_none() {
                log::debug!(
                    "entity `{}`: unknown category `{}`, anchored",
                    entity.id,
                    entity.category
                );
            }
            layout.anchored.push(key);
            continue;
        }
        layout.placements.push(Placement {
            entity: key,
            offset: golden_offset(orbit_index),
            profile,
        });
        orbit_index += 1;
    }

    for row in table.rows() {
        if row.profile.is_anchored() {
            continue;
        }
        let used = entities.iter().any(|e| e.category == row.category);
        if used {
            layout.guides.push(OrbitGuide {
                category: row.category.clone(),
                label: row.label.clone(),
                profile: row.profile,
            });
        }
    }

    layout
}

/// Closed guide loop: `samples + 1` points, first and last coincide.
pub fn guide_curve(profile: &OrbitalProfile, samples: usize) -> Vec<[f32; 3]> {
    let samples = samples.max(3);
    (0..=samples)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / samples as f32;
            orbital_position(profile, angle, 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rgb;
    use proptest::prelude::*;

    fn entity(id: &str, category: &str) -> Entity {
        Entity::new(id, id, 5, category, Rgb::WHITE, "", false)
    }

    fn single_orbit_table() -> ProfileTable {
        ProfileTable::from_profiles(vec![CategoryProfile {
            category: "X".into(),
            profile: OrbitalProfile::new(5.0, 0.0, 0.0),
            label: "X".into(),
        }])
    }

    fn angular_gap(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(std::f32::consts::TAU);
        d.min(std::f32::consts::TAU - d)
    }

    #[test]
    fn golden_angle_is_about_137_5_degrees() {
        assert!((GOLDEN_ANGLE.to_degrees() - 137.5078).abs() < 1e-3);
        assert_eq!(golden_offset(0), 0.0);
        assert!((golden_offset(1) as f64 - GOLDEN_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn single_entity_starts_on_positive_x() {
        let layout = layout_orbits(&[entity("a", "X")], &single_orbit_table());
        let p = layout.placements[0].position_at(0.0);
        assert!((p[0] - 5.0).abs() < 1e-6);
        assert!(p[1].abs() < 1e-6);
        assert!(p[2].abs() < 1e-6);
    }

    #[test]
    fn position_is_pure_in_time() {
        let table = ProfileTable::default();
        let entities: Vec<_> = ["bigdata", "ml", "data", "viz"]
            .iter()
            .enumerate()
            .map(|(i, c)| entity(&format!("e{i}"), c))
            .collect();
        let layout = layout_orbits(&entities, &table);
        for p in &layout.placements {
            for t in [0.0, 1.5, 37.25, 1000.0] {
                assert_eq!(p.position_at(t), p.position_at(t));
            }
        }
    }

    #[test]
    fn position_follows_tilted_ellipse() {
        let profile = OrbitalProfile::new(4.0, 0.5, 0.25);
        let p = orbital_position(&profile, 0.3, 1.0);
        let angle: f32 = 0.3 + 0.5;
        assert!((p[0] - 4.0 * angle.cos()).abs() < 1e-6);
        assert!((p[1] - 4.0 * angle.sin() * 0.25).abs() < 1e-6);
        assert!((p[2] - 4.0 * angle.sin()).abs() < 1e-6);
        // distance in the xz plane never leaves the radius
        assert!(((p[0] * p[0] + p[2] * p[2]).sqrt() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn position_stays_precise_at_large_time() {
        let profile = OrbitalProfile::new(5.0, 0.1, 0.0);
        // ~11.5 days; a whole number of turns lands back on the start
        let turns = 16_000.0;
        let t = turns * TAU / 0.1_f32 as f64;
        let p = orbital_position(&profile, 0.0, t);
        assert!((p[0] - 5.0).abs() < 1e-3, "{p:?}");
        assert!(p[2].abs() < 1e-3, "{p:?}");
        // and it still moves frame to frame
        assert_ne!(orbital_position(&profile, 0.0, t + 1.0 / 60.0), p);
    }

    #[test]
    fn anchored_and_unknown_categories_skip_placement() {
        let entities = vec![
            entity("core", "core"),
            entity("a", "bigdata"),
            entity("mystery", "quantum"),
            entity("b", "bigdata"),
        ];
        let layout = layout_orbits(&entities, &ProfileTable::default());
        assert_eq!(layout.anchored, vec![0, 2]);
        assert_eq!(layout.anchor_entity(), Some(0));
        let keys: Vec<_> = layout.placements.iter().map(|p| p.entity).collect();
        assert_eq!(keys, vec![1, 3]);
        // indexing counts orbiting entities only
        assert_eq!(layout.placements[0].offset, golden_offset(0));
        assert_eq!(layout.placements[1].offset, golden_offset(1));
        assert_eq!(layout.position_of(2, 12.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_input_is_empty_layout() {
        let layout = layout_orbits(&[], &ProfileTable::default());
        assert!(layout.placements.is_empty());
        assert!(layout.anchored.is_empty());
        assert!(layout.guides.is_empty());
        assert_eq!(layout.anchor_entity(), None);
    }

    #[test]
    fn layout_is_idempotent() {
        let cat = crate::catalog::Catalog::builtin();
        let table = ProfileTable::default();
        assert_eq!(
            layout_orbits(cat.entities(), &table),
            layout_orbits(cat.entities(), &table)
        );
    }

    #[test]
    fn guides_only_for_used_orbits() {
        let entities = vec![entity("a", "viz"), entity("b", "bigdata"), entity("c", "viz")];
        let layout = layout_orbits(&entities, &ProfileTable::default());
        let cats: Vec<_> = layout.guides.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(cats, ["bigdata", "viz"]);
        assert_eq!(layout.guides[0].label, "Big Data");
    }

    #[test]
    fn guide_curve_is_closed() {
        let pts = guide_curve(&OrbitalProfile::new(7.0, 0.18, 0.15), 64);
        assert_eq!(pts.len(), 65);
        let (first, last) = (pts[0], pts[64]);
        for k in 0..3 {
            assert!((first[k] - last[k]).abs() < 1e-4);
        }
    }

    #[test]
    fn duplicate_profile_rows_keep_first() {
        let row = |r: f32| CategoryProfile {
            category: "x".into(),
            profile: OrbitalProfile::new(r, 0.0, 0.0),
            label: String::new(),
        };
        let table = ProfileTable::from_profiles(vec![row(2.0), row(9.0)]);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.resolve("x").radius, 2.0);
        assert!(table.resolve("nope").is_anchored());
    }

    proptest! {
        #[test]
        fn golden_offsets_never_collide(n in 2usize..400) {
            let offsets: Vec<f32> = (0..n).map(golden_offset).collect();
            for i in 0..n {
                prop_assert!((0.0..std::f32::consts::TAU).contains(&offsets[i]));
                for j in (i + 1)..n {
                    prop_assert!(angular_gap(offsets[i], offsets[j]) > 1e-4);
                }
            }
        }
    }
}
