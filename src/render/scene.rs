//! Retained scene graph.
//!
//! Built once per mount from the catalog and its orbit layout, then mutated
//! in place by the animator every tick. Each node carries a [`NodeMeta`]
//! telling the animator which body it follows and which entity it reacts to.

use serde::Deserialize;

use crate::catalog::{Catalog, EntityKey, Rgb, LEVEL_MAX};
use crate::render::orbit::{guide_curve, OrbitLayout, ProfileTable};

/// Visual constants for bodies, halos, rings, guides and the anchor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub body_base_size: f32,
    /// Added at level 10, scaled linearly below
    pub body_level_size: f32,
    pub featured_size_factor: f32,

    /// Glow scale relative to body size: plain / featured / hovered / selected
    pub glow_scale: [f32; 4],
    pub glow_opacity: [f32; 4],
    /// Emissive intensity: plain / featured / selected
    pub emissive: [f32; 3],

    pub ring_inner: f32,
    pub ring_outer: f32,
    pub ring_opacity: f32,

    pub anchor_radius: f32,
    pub anchor_glow_scale: f32,
    pub anchor_glow_opacity: f32,
    /// Used when no entity is anchored
    pub anchor_color: Rgb,
    pub anchor_emissive: f32,

    pub guide_samples: usize,
    pub guide_opacity: f32,
    pub guide_label_offset: f32,

    /// Float bob: angular speed and vertical amplitude
    pub float_speed: f32,
    pub float_amplitude: f32,

    /// Label height above the body surface
    pub label_lift: f32,

    pub starfield: StarfieldConfig,
    pub background_color: [f32; 4],
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            body_base_size: 0.25,
            body_level_size: 0.35,
            featured_size_factor: 1.2,
            glow_scale: [1.5, 1.8, 1.9, 2.2],
            glow_opacity: [0.12, 0.25, 0.30, 0.40],
            emissive: [0.3, 0.5, 1.0],
            ring_inner: 1.4,
            ring_outer: 1.6,
            ring_opacity: 0.4,
            anchor_radius: 0.9,
            anchor_glow_scale: 1.5,
            anchor_glow_opacity: 0.2,
            anchor_color: Rgb::new(0x37, 0x76, 0xab),
            anchor_emissive: 0.6,
            guide_samples: 64,
            guide_opacity: 0.08,
            guide_label_offset: 0.5,
            float_speed: 1.5,
            float_amplitude: 0.1,
            label_lift: 0.35,
            starfield: StarfieldConfig::default(),
            background_color: [0.02, 0.02, 0.06, 1.0],
        }
    }
}

impl SceneStyle {
    /// `0.25 + level/10 × 0.35`, × 1.2 when featured.
    pub fn body_size(&self, level: u8, featured: bool) -> f32 {
        let size = self.body_base_size + level as f32 / LEVEL_MAX as f32 * self.body_level_size;
        if featured {
            size * self.featured_size_factor
        } else {
            size
        }
    }

    /// Glow (scale, opacity). Selected wins over hovered, hovered over featured.
    pub fn glow_for(&self, featured: bool, hovered: bool, selected: bool) -> (f32, f32) {
        let i = if selected {
            3
        } else if hovered {
            2
        } else if featured {
            1
        } else {
            0
        };
        (self.glow_scale[i], self.glow_opacity[i])
    }

    pub fn emissive_for(&self, featured: bool, selected: bool) -> f32 {
        if selected {
            self.emissive[2]
        } else if featured {
            self.emissive[1]
        } else {
            self.emissive[0]
        }
    }
}

/// Ambient star shell.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Inner radius of the shell
    pub radius: f32,
    /// Shell thickness
    pub depth: f32,
    /// Twinkle phase speed, radians per second
    pub twinkle_speed: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self { count: 1500, radius: 100.0, depth: 50.0, twinkle_speed: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: [f32; 3],
    /// Relative size in `[0.5, 1.5)`
    pub size: f32,
    pub phase: f32,
}

/// Scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePrimitive {
    /// Central non-orbiting body
    Anchor {
        center: [f32; 3],
        radius: f32,
        color: Rgb,
        emissive: f32,
        spin: f32,
    },
    /// Orbiting skill body
    Body {
        center: [f32; 3],
        radius: f32,
        color: Rgb,
        emissive: f32,
        spin: f32,
    },
    /// Translucent halo around a body or the anchor
    Glow {
        center: [f32; 3],
        radius: f32,
        color: Rgb,
        opacity: f32,
    },
    /// Flat ring in the body's horizontal plane (featured entities)
    Ring {
        center: [f32; 3],
        inner_radius: f32,
        outer_radius: f32,
        color: Rgb,
        opacity: f32,
    },
    /// Screen-facing name tag
    Label {
        position: [f32; 3],
        text: String,
        subtitle: Option<String>,
        color: Rgb,
        featured: bool,
    },
    /// Closed orbit guide with its category label
    GuideCurve {
        points: Vec<[f32; 3]>,
        label: String,
        label_position: [f32; 3],
        opacity: f32,
    },
    Starfield {
        stars: Vec<Star>,
        twinkle_phase: f32,
    },
}

/// What a node is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follows {
    /// Static (guides, starfield)
    Nothing,
    /// Pinned at the origin with the anchor body
    Anchor,
    /// Tracks an orbiting entity
    Body(EntityKey),
}

/// Per-node animation metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMeta {
    pub follows: Follows,
    /// Entity whose hover/selection drives this node's look
    pub entity: Option<EntityKey>,
    /// Unscaled body size of the followed body
    pub base_size: f32,
    /// Float bob phase
    pub float_phase: f32,
    pub featured: bool,
}

impl NodeMeta {
    fn fixed() -> Self {
        Self {
            follows: Follows::Nothing,
            entity: None,
            base_size: 0.0,
            float_phase: 0.0,
            featured: false,
        }
    }
}

/// Node list plus parallel metadata.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    pub nodes: Vec<ScenePrimitive>,
    pub meta: Vec<NodeMeta>,
    pub background_color: [f32; 4],
}

impl SceneGraph {
    fn push(&mut self, node: ScenePrimitive, meta: NodeMeta) {
        self.nodes.push(node);
        self.meta.push(meta);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node; used on teardown.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.meta.clear();
    }

    /// Number of `Body` nodes.
    pub fn body_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, ScenePrimitive::Body { .. }))
            .count()
    }

    pub fn anchor(&self) -> Option<&ScenePrimitive> {
        self.nodes.iter().find(|n| matches!(n, ScenePrimitive::Anchor { .. }))
    }

    /// Drawn center of the body (or anchor) standing for `entity`.
    pub fn center_of(&self, entity: EntityKey) -> Option<[f32; 3]> {
        self.nodes.iter().zip(&self.meta).find_map(|(node, meta)| match node {
            ScenePrimitive::Body { center, .. } | ScenePrimitive::Anchor { center, .. }
                if meta.entity == Some(entity) =>
            {
                Some(*center)
            }
            _ => None,
        })
    }
}

/// Build the graph for a laid-out catalog.
pub fn build_scene(
    catalog: &Catalog,
    layout: &OrbitLayout,
    table: &ProfileTable,
    style: &SceneStyle,
) -> SceneGraph {
    let mut graph = SceneGraph {
        background_color: style.background_color,
        ..Default::default()
    };

    graph.push(
        ScenePrimitive::Starfield { stars: starfield(&style.starfield), twinkle_phase: 0.0 },
        NodeMeta::fixed(),
    );

    for guide in &layout.guides {
        graph.push(
            ScenePrimitive::GuideCurve {
                points: guide_curve(&guide.profile, style.guide_samples),
                label: guide.label.clone(),
                label_position: [guide.profile.radius + style.guide_label_offset, 0.0, 0.0],
                opacity: style.guide_opacity,
            },
            NodeMeta::fixed(),
        );
    }

    // Anchor: stands for the first anchored entity, or is purely decorative
    let anchor_entity = layout.anchor_entity().and_then(|k| catalog.get(k).map(|e| (k, e)));
    let anchor_meta = NodeMeta {
        follows: Follows::Anchor,
        entity: anchor_entity.map(|(k, _)| k),
        base_size: style.anchor_radius,
        float_phase: 0.0,
        featured: anchor_entity.map_or(false, |(_, e)| e.featured),
    };
    let anchor_color = anchor_entity.map_or(style.anchor_color, |(_, e)| e.color);
    graph.push(
        ScenePrimitive::Glow {
            center: [0.0; 3],
            radius: style.anchor_radius * style.anchor_glow_scale,
            color: anchor_color,
            opacity: style.anchor_glow_opacity,
        },
        anchor_meta,
    );
    graph.push(
        ScenePrimitive::Anchor {
            center: [0.0; 3],
            radius: style.anchor_radius,
            color: anchor_color,
            emissive: style.anchor_emissive,
            spin: 0.0,
        },
        anchor_meta,
    );
    if let Some((_, entity)) = anchor_entity {
        let subtitle = table.label(&entity.category);
        graph.push(
            ScenePrimitive::Label {
                position: [0.0, style.anchor_radius + style.label_lift, 0.0],
                text: entity.name.clone(),
                subtitle: (!subtitle.is_empty()).then(|| subtitle.to_string()),
                color: entity.color,
                featured: entity.featured,
            },
            anchor_meta,
        );
    }

    for placement in &layout.placements {
        let Some(entity) = catalog.get(placement.entity) else {
            continue;
        };
        let size = style.body_size(entity.level, entity.featured);
        let meta = NodeMeta {
            follows: Follows::Body(placement.entity),
            entity: Some(placement.entity),
            base_size: size,
            float_phase: float_phase(placement.entity),
            featured: entity.featured,
        };
        let center = placement.position_at(0.0);
        let (glow_scale, glow_opacity) = style.glow_for(entity.featured, false, false);

        graph.push(
            ScenePrimitive::Glow {
                center,
                radius: size * glow_scale,
                color: entity.color,
                opacity: glow_opacity,
            },
            meta,
        );
        graph.push(
            ScenePrimitive::Body {
                center,
                radius: size,
                color: entity.color,
                emissive: style.emissive_for(entity.featured, false),
                spin: 0.0,
            },
            meta,
        );
        if entity.featured {
            graph.push(
                ScenePrimitive::Ring {
                    center,
                    inner_radius: size * style.ring_inner,
                    outer_radius: size * style.ring_outer,
                    color: entity.color,
                    opacity: style.ring_opacity,
                },
                meta,
            );
        }
        graph.push(
            ScenePrimitive::Label {
                position: [center[0], center[1] + size + style.label_lift, center[2]],
                text: entity.name.clone(),
                subtitle: None,
                color: entity.color,
                featured: entity.featured,
            },
            meta,
        );
    }

    log::info!(
        "scene built: {} nodes, {} orbiting bodies, {} guides",
        graph.len(),
        layout.placements.len(),
        layout.guides.len()
    );
    graph
}

/// Cheap deterministic hash in `[0, 1]`.
fn hash01(seed: usize) -> f32 {
    let x = seed.wrapping_mul(2654435761) ^ seed.wrapping_mul(340573321).rotate_left(13);
    ((x & 0xFFFF) as f32) / 65535.0
}

fn float_phase(entity: EntityKey) -> f32 {
    hash01(entity.wrapping_add(7919)) * std::f32::consts::TAU
}

/// Stars uniformly spread over directions, radius in `[radius, radius + depth]`.
pub fn starfield(config: &StarfieldConfig) -> Vec<Star> {
    (0..config.count)
        .map(|i| {
            let u = hash01(i * 4 + 1);
            let v = hash01(i * 4 + 2);
            let w = hash01(i * 4 + 3);
            let theta = std::f32::consts::TAU * u;
            let cos_phi = 2.0 * v - 1.0;
            let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
            let r = config.radius + config.depth * w;
            Star {
                position: [
                    r * sin_phi * theta.cos(),
                    r * cos_phi,
                    r * sin_phi * theta.sin(),
                ],
                size: 0.5 + hash01(i * 4 + 4),
                phase: std::f32::consts::TAU * hash01(i * 4 + 5),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Entity;
    use crate::render::orbit::layout_orbits;

    fn scene_for(catalog: &Catalog) -> SceneGraph {
        let table = ProfileTable::default();
        let layout = layout_orbits(catalog.entities(), &table);
        build_scene(catalog, &layout, &table, &SceneStyle::default())
    }

    #[test]
    fn body_size_formula() {
        let style = SceneStyle::default();
        assert!((style.body_size(10, false) - 0.6).abs() < 1e-6);
        assert!((style.body_size(5, false) - 0.425).abs() < 1e-6);
        assert!((style.body_size(10, true) - 0.72).abs() < 1e-6);
    }

    #[test]
    fn glow_priority() {
        let style = SceneStyle::default();
        assert_eq!(style.glow_for(false, false, false), (1.5, 0.12));
        assert_eq!(style.glow_for(true, false, false), (1.8, 0.25));
        assert_eq!(style.glow_for(true, true, false), (1.9, 0.30));
        assert_eq!(style.glow_for(false, true, true), (2.2, 0.40));
        assert_eq!(style.emissive_for(true, false), 0.5);
        assert_eq!(style.emissive_for(false, true), 1.0);
    }

    #[test]
    fn empty_catalog_draws_only_anchor() {
        let graph = scene_for(&Catalog::default());
        assert_eq!(graph.body_count(), 0);
        assert!(graph.anchor().is_some());
        assert!(!graph.nodes.iter().any(|n| matches!(n, ScenePrimitive::GuideCurve { .. })));
        assert!(!graph.nodes.iter().any(|n| matches!(n, ScenePrimitive::Label { .. })));
    }

    #[test]
    fn builtin_catalog_node_counts() {
        let catalog = Catalog::builtin();
        let graph = scene_for(&catalog);
        assert_eq!(graph.nodes.len(), graph.meta.len());
        assert_eq!(graph.body_count(), 15);
        let featured_orbiters = catalog.entities()[1..].iter().filter(|e| e.featured).count();
        let rings = graph.nodes.iter().filter(|n| matches!(n, ScenePrimitive::Ring { .. })).count();
        assert_eq!(rings, featured_orbiters);
        let guides = graph
            .nodes
            .iter()
            .filter(|n| matches!(n, ScenePrimitive::GuideCurve { .. }))
            .count();
        assert_eq!(guides, 4);
    }

    #[test]
    fn anchor_stands_for_core_entity() {
        let catalog = Catalog::builtin();
        let graph = scene_for(&catalog);
        match graph.anchor() {
            Some(ScenePrimitive::Anchor { radius, color, .. }) => {
                assert_eq!(*radius, 0.9);
                assert_eq!(*color, catalog.entities()[0].color);
            }
            other => panic!("unexpected anchor {other:?}"),
        }
        assert_eq!(graph.center_of(0), Some([0.0; 3]));
        let label = graph.nodes.iter().find_map(|n| match n {
            ScenePrimitive::Label { text, subtitle, .. } if text == "Python" => subtitle.clone(),
            _ => None,
        });
        assert_eq!(label.as_deref(), Some("Core"));
    }

    #[test]
    fn guide_label_sits_past_radius() {
        let catalog = Catalog::new(vec![Entity::new("a", "A", 5, "ml", Rgb::WHITE, "", false)]);
        let graph = scene_for(&catalog);
        let pos = graph.nodes.iter().find_map(|n| match n {
            ScenePrimitive::GuideCurve { label_position, points, .. } => {
                assert_eq!(points.len(), 65);
                Some(*label_position)
            }
            _ => None,
        });
        assert_eq!(pos, Some([7.5, 0.0, 0.0]));
    }

    #[test]
    fn starfield_stays_in_shell() {
        let config = StarfieldConfig::default();
        let stars = starfield(&config);
        assert_eq!(stars.len(), 1500);
        for s in &stars {
            let r = (s.position[0].powi(2) + s.position[1].powi(2) + s.position[2].powi(2)).sqrt();
            assert!(r >= config.radius - 1e-2 && r <= config.radius + config.depth + 1e-2);
        }
        assert_eq!(stars, starfield(&config));
    }

    #[test]
    fn clear_releases_nodes() {
        let mut graph = scene_for(&Catalog::builtin());
        graph.clear();
        assert!(graph.is_empty());
        assert!(graph.meta.is_empty());
    }
}
