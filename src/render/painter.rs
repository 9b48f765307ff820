//! egui Painter-based scene rendering and picking.
//!
//! Projects the retained scene graph through a [`Projection`] and draws it
//! back to front: background, starfield, orbit guides, then bodies, halos
//! and rings sorted far-first, then labels on top.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Shape, Stroke, Vec2};

use crate::catalog::{EntityKey, Rgb};
use crate::render::camera::{Projected, Projection};
use crate::render::scene::{SceneGraph, ScenePrimitive, Star};

/// Smallest pick disc in pixels, so far-away bodies stay clickable.
const MIN_PICK_RADIUS: f32 = 4.0;
/// Segments used to draw a featured ring.
const RING_SEGMENTS: usize = 40;

/// Colors that do not come from entities.
struct Theme {
    guide: Color32,
    guide_label: Color32,
    star: Color32,
    label_text: Color32,
    subtitle_text: Color32,
}

impl Theme {
    fn space() -> Self {
        Self {
            guide: Color32::WHITE,
            guide_label: Color32::from_rgb(150, 150, 170),
            star: Color32::from_rgb(235, 235, 255),
            label_text: Color32::WHITE,
            subtitle_text: Color32::from_rgb(180, 180, 195),
        }
    }
}

/// A node ready to draw.
struct DrawItem<'a> {
    node: &'a ScenePrimitive,
    at: Projected,
}

/// Draw the whole scene into `rect`.
pub fn paint_scene(painter: &egui::Painter, rect: Rect, graph: &SceneGraph, proj: &Projection) {
    let theme = Theme::space();
    painter.rect_filled(rect, Rounding::ZERO, color4(graph.background_color));

    let mut solids: Vec<DrawItem<'_>> = Vec::new();
    let mut labels: Vec<DrawItem<'_>> = Vec::new();

    for node in &graph.nodes {
        match node {
            ScenePrimitive::Starfield { stars, twinkle_phase } => {
                draw_stars(painter, proj, stars, *twinkle_phase, &theme);
            }
            ScenePrimitive::GuideCurve { points, label, label_position, opacity } => {
                draw_guide(painter, proj, points, label, *label_position, *opacity, &theme);
            }
            ScenePrimitive::Anchor { center, .. }
            | ScenePrimitive::Body { center, .. }
            | ScenePrimitive::Glow { center, .. }
            | ScenePrimitive::Ring { center, .. } => {
                if let Some(at) = proj.project(*center) {
                    solids.push(DrawItem { node, at });
                }
            }
            ScenePrimitive::Label { position, .. } => {
                if let Some(at) = proj.project(*position) {
                    labels.push(DrawItem { node, at });
                }
            }
        }
    }

    // Stable sort: a body's glow, body and ring share a depth and keep build order
    solids.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));
    labels.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));

    for item in &solids {
        let pos = Pos2::new(item.at.screen[0], item.at.screen[1]);
        match item.node {
            ScenePrimitive::Glow { radius, color, opacity, .. } => {
                draw_glow(painter, pos, radius * item.at.scale, *color, *opacity);
            }
            ScenePrimitive::Anchor { radius, color, emissive, spin, .. }
            | ScenePrimitive::Body { radius, color, emissive, spin, .. } => {
                draw_body(painter, pos, radius * item.at.scale, *color, *emissive, *spin);
            }
            ScenePrimitive::Ring { center, inner_radius, outer_radius, color, opacity } => {
                draw_ring(painter, proj, *center, *inner_radius, *outer_radius, *color, *opacity);
            }
            _ => {}
        }
    }

    for item in &labels {
        if let ScenePrimitive::Label { text, subtitle, color, featured, .. } = item.node {
            let pos = Pos2::new(item.at.screen[0], item.at.screen[1]);
            draw_label(painter, pos, text, subtitle.as_deref(), *color, *featured, &theme);
        }
    }
}

/// Front-most entity whose projected disc contains `pointer`.
pub fn pick(graph: &SceneGraph, proj: &Projection, pointer: [f32; 2]) -> Option<EntityKey> {
    let mut best: Option<(f32, EntityKey)> = None;
    for (node, meta) in graph.nodes.iter().zip(&graph.meta) {
        let (center, radius) = match node {
            ScenePrimitive::Body { center, radius, .. } | ScenePrimitive::Anchor { center, radius, .. } => {
                (*center, *radius)
            }
            _ => continue,
        };
        let Some(entity) = meta.entity else { continue };
        let Some(at) = proj.project(center) else { continue };

        let r = (radius * at.scale).max(MIN_PICK_RADIUS);
        let dx = pointer[0] - at.screen[0];
        let dy = pointer[1] - at.screen[1];
        if dx * dx + dy * dy > r * r {
            continue;
        }
        if best.map_or(true, |(depth, _)| at.depth < depth) {
            best = Some((at.depth, entity));
        }
    }
    best.map(|(_, e)| e)
}

pub fn color4(c: [f32; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
        (c[3] * 255.0) as u8,
    )
}

pub fn rgb_alpha(c: Rgb, alpha: f32) -> Color32 {
    color4(c.to_f32(alpha.clamp(0.0, 1.0)))
}

pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let m = |a: u8, b: u8| ((a as f32) * (1.0 - t) + (b as f32) * t) as u8;
    Color32::from_rgba_unmultiplied(m(a.r(), b.r()), m(a.g(), b.g()), m(a.b(), b.b()), m(a.a(), b.a()))
}

// ── Drawing functions ──

fn draw_stars(painter: &egui::Painter, proj: &Projection, stars: &[Star], twinkle: f32, theme: &Theme) {
    for star in stars {
        let Some(at) = proj.project(star.position) else { continue };
        let brightness = 0.55 + 0.45 * (star.phase + twinkle).sin();
        let c = theme.star;
        painter.circle_filled(
            Pos2::new(at.screen[0], at.screen[1]),
            star.size,
            Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), (brightness * 200.0) as u8),
        );
    }
}

fn draw_guide(
    painter: &egui::Painter,
    proj: &Projection,
    points: &[[f32; 3]],
    label: &str,
    label_position: [f32; 3],
    opacity: f32,
    theme: &Theme,
) {
    let g = theme.guide;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(g.r(), g.g(), g.b(), (opacity * 255.0) as u8));

    // Break the polyline wherever a sample falls behind the near plane
    let mut run: Vec<Pos2> = Vec::with_capacity(points.len());
    for p in points {
        match proj.project(*p) {
            Some(at) => run.push(Pos2::new(at.screen[0], at.screen[1])),
            None => {
                if run.len() > 1 {
                    painter.add(Shape::line(std::mem::take(&mut run), stroke));
                }
                run.clear();
            }
        }
    }
    if run.len() > 1 {
        painter.add(Shape::line(run, stroke));
    }

    if !label.is_empty() {
        if let Some(at) = proj.project(label_position) {
            painter.text(
                Pos2::new(at.screen[0], at.screen[1]),
                Align2::LEFT_CENTER,
                label,
                FontId::proportional(11.0),
                theme.guide_label,
            );
        }
    }
}

fn draw_glow(painter: &egui::Painter, pos: Pos2, radius: f32, color: Rgb, opacity: f32) {
    // Three stacked discs approximate a soft falloff toward the rim
    for (i, k) in [1.0_f32, 0.8, 0.6].iter().enumerate() {
        let alpha = opacity / 3.0 * (1.0 + i as f32 * 0.25);
        painter.circle_filled(pos, radius * k, rgb_alpha(color, alpha));
    }
}

fn draw_body(painter: &egui::Painter, pos: Pos2, radius: f32, color: Rgb, emissive: f32, spin: f32) {
    let base = Color32::from_rgb(color.r, color.g, color.b);
    let shadow = lerp_color(base, Color32::BLACK, 0.45);
    let light = color.lighten(0.35);
    let lit = Color32::from_rgb(light.r, light.g, light.b);
    painter.circle_filled(pos, radius, lerp_color(shadow, lit, emissive.clamp(0.0, 1.0)));

    // Specular highlight, upper left
    painter.circle_filled(
        pos + Vec2::new(-radius * 0.35, -radius * 0.35),
        radius * 0.3,
        Color32::from_rgba_unmultiplied(255, 255, 255, (40.0 + emissive * 50.0) as u8),
    );

    // Surface mark carried around by the self-rotation
    let (s, c) = spin.sin_cos();
    let facing = 0.5 + 0.5 * s;
    if radius > 2.0 {
        painter.circle_filled(
            pos + Vec2::new(c * radius * 0.6, radius * 0.1),
            radius * 0.12,
            Color32::from_rgba_unmultiplied(255, 255, 255, (facing * 70.0) as u8),
        );
    }
}

fn draw_ring(
    painter: &egui::Painter,
    proj: &Projection,
    center: [f32; 3],
    inner: f32,
    outer: f32,
    color: Rgb,
    opacity: f32,
) {
    let mid = (inner + outer) * 0.5;
    let mut points = Vec::with_capacity(RING_SEGMENTS);
    let mut scale = 0.0_f32;
    for i in 0..RING_SEGMENTS {
        let a = std::f32::consts::TAU * i as f32 / RING_SEGMENTS as f32;
        let p = [center[0] + mid * a.cos(), center[1], center[2] + mid * a.sin()];
        let Some(at) = proj.project(p) else { return };
        scale = scale.max(at.scale);
        points.push(Pos2::new(at.screen[0], at.screen[1]));
    }
    let width = ((outer - inner) * scale).max(1.0);
    painter.add(Shape::closed_line(points, Stroke::new(width, rgb_alpha(color, opacity))));
}

fn draw_label(
    painter: &egui::Painter,
    pos: Pos2,
    text: &str,
    subtitle: Option<&str>,
    color: Rgb,
    featured: bool,
    theme: &Theme,
) {
    let title = if featured { format!("\u{2B50} {text}") } else { text.to_string() };
    let galley = painter.layout_no_wrap(title, FontId::proportional(12.0), theme.label_text);
    let sub = subtitle.map(|s| painter.layout_no_wrap(s.to_string(), FontId::proportional(10.0), theme.subtitle_text));

    let pad = Vec2::new(8.0, 3.0);
    let sub_h = sub.as_ref().map_or(0.0, |g| g.size().y);
    let width = galley.size().x.max(sub.as_ref().map_or(0.0, |g| g.size().x));
    let size = Vec2::new(width, galley.size().y + sub_h) + pad * 2.0;
    let pill = Rect::from_center_size(pos - Vec2::new(0.0, size.y * 0.5), size);

    painter.rect(pill, Rounding::same(size.y.min(24.0) * 0.5), rgb_alpha(color, 0.25), Stroke::new(1.0, rgb_alpha(color, 0.38)));
    let title_pos = Pos2::new(pill.center().x - galley.size().x * 0.5, pill.top() + pad.y);
    painter.galley(title_pos, galley, theme.label_text);
    if let Some(sub) = sub {
        let sub_pos = Pos2::new(pill.center().x - sub.size().x * 0.5, pill.top() + pad.y + size.y - pad.y * 2.0 - sub_h);
        painter.galley(sub_pos, sub, theme.subtitle_text);
    }
}
