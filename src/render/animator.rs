/// Per-tick scene animation.
///
/// Updates the retained [`SceneGraph`] in place at simulation time `t`:
/// - Orbit: bodies and everything attached to them move to their orbital position
/// - Floating: gentle sine-wave vertical drift, per-body phase, drawn nodes only
/// - Spin: accumulated self-rotation from the clock
/// - Interaction: glow scale/opacity and emissive follow hover/selection
/// - Twinkle: starfield phase
use std::f64::consts::TAU;

use crate::interaction::InteractionState;
use crate::render::orbit::OrbitLayout;
use crate::render::scene::{Follows, NodeMeta, SceneGraph, ScenePrimitive, SceneStyle};

/// Everything the animator reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    /// Simulation seconds
    pub time: f64,
    pub body_spin: f32,
    pub anchor_spin: f32,
    pub interaction: &'a InteractionState,
    pub style: &'a SceneStyle,
}

/// Vertical float offset for a body with the given phase.
pub fn float_offset(style: &SceneStyle, phase: f32, t: f64) -> f32 {
    wrapped_phase(t, style.float_speed, phase).sin() * style.float_amplitude
}

/// `t * rate + phase` reduced to `[0, 2π)` before narrowing to f32.
fn wrapped_phase(t: f64, rate: f32, phase: f32) -> f32 {
    (t * f64::from(rate) + f64::from(phase)).rem_euclid(TAU) as f32
}

/// Animate the scene at `frame.time`.
pub fn animate_scene(graph: &mut SceneGraph, layout: &OrbitLayout, frame: &FrameState<'_>) {
    let style = frame.style;
    let t = frame.time;

    for (node, meta) in graph.nodes.iter_mut().zip(graph.meta.iter()) {
        let anchor = meta.follows == Follows::Anchor;
        let hovered = meta.entity.map_or(false, |e| frame.interaction.is_hovered(e));
        let selected = meta.entity.map_or(false, |e| frame.interaction.is_selected(e));
        let target = follow_center(meta, layout, style, t);

        match node {
            ScenePrimitive::Anchor { spin, emissive, .. } => {
                *spin = frame.anchor_spin;
                *emissive = if selected { style.emissive[2] } else { style.anchor_emissive };
            }
            ScenePrimitive::Body { center, spin, emissive, .. } => {
                if let Some(c) = target {
                    *center = c;
                }
                *spin = frame.body_spin;
                *emissive = style.emissive_for(meta.featured, selected);
            }
            ScenePrimitive::Glow { center, radius, opacity, .. } => {
                if let Some(c) = target {
                    *center = c;
                }
                let (scale, alpha) = if anchor && !hovered && !selected {
                    (style.anchor_glow_scale, style.anchor_glow_opacity)
                } else {
                    style.glow_for(meta.featured, hovered, selected)
                };
                *radius = meta.base_size * scale;
                *opacity = alpha;
            }
            ScenePrimitive::Ring { center, .. } => {
                if let Some(c) = target {
                    *center = c;
                }
            }
            ScenePrimitive::Label { position, .. } => {
                if let Some(c) = target {
                    *position = [c[0], c[1] + meta.base_size + style.label_lift, c[2]];
                }
            }
            ScenePrimitive::Starfield { twinkle_phase, .. } => {
                *twinkle_phase = wrapped_phase(t, style.starfield.twinkle_speed, 0.0);
            }
            ScenePrimitive::GuideCurve { .. } => {}
        }
    }
}

/// Drawn center of whatever the node follows. Orbital position stays pure;
/// the float bob is added here only.
fn follow_center(meta: &NodeMeta, layout: &OrbitLayout, style: &SceneStyle, t: f64) -> Option<[f32; 3]> {
    match meta.follows {
        Follows::Nothing => None,
        Follows::Anchor => Some([0.0; 3]),
        Follows::Body(entity) => {
            let mut p = layout.position_of(entity, t);
            p[1] += float_offset(style, meta.float_phase, t);
            Some(p)
        }
    }
}
