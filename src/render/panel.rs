//! Detail panel for the selected entity.
//!
//! A small card anchored near the selected body's screen position: name,
//! description, a 10-segment mastery bar and a "featured" line.

use std::sync::Arc;

use egui::{Align2, Color32, FontId, Galley, Pos2, Rect, Stroke, Vec2};

use crate::catalog::{Entity, LEVEL_MAX};
use crate::render::painter::rgb_alpha;

pub const LEVEL_SEGMENTS: usize = LEVEL_MAX as usize;

const PANEL_WIDTH: f32 = 230.0;
const PADDING: f32 = 14.0;
/// Padding, name, bar and level line; the description comes on top
const PANEL_BASE_HEIGHT: f32 = 74.0;
const DESCRIPTION_GAP: f32 = 6.0;
const FEATURED_LINE: f32 = 18.0;
/// Gap between the body and the card
const ANCHOR_GAP: f32 = 60.0;
const MARGIN: f32 = 8.0;

/// Filled flags for the mastery bar: the first `level` segments are lit.
pub fn level_segments(level: u8) -> [bool; LEVEL_SEGMENTS] {
    let mut out = [false; LEVEL_SEGMENTS];
    for (i, seg) in out.iter_mut().enumerate() {
        *seg = i < level as usize;
    }
    out
}

/// Card size for `entity` given the laid-out height of its description.
pub fn panel_size(entity: &Entity, description_height: f32) -> Vec2 {
    let desc = if description_height > 0.0 { description_height + DESCRIPTION_GAP } else { 0.0 };
    let h = PANEL_BASE_HEIGHT + desc + if entity.featured { FEATURED_LINE } else { 0.0 };
    Vec2::new(PANEL_WIDTH, h)
}

/// The full description wrapped to the card's inner width.
pub fn description_galley(painter: &egui::Painter, entity: &Entity) -> Option<Arc<Galley>> {
    if entity.description.is_empty() {
        return None;
    }
    Some(painter.layout(
        entity.description.clone(),
        FontId::proportional(12.0),
        Color32::from_rgb(200, 200, 210),
        PANEL_WIDTH - 2.0 * PADDING,
    ))
}

/// Place the card below the body when it sits in the upper half of the
/// viewport, above it otherwise, and keep it inside the viewport.
pub fn panel_rect(anchor: Pos2, size: Vec2, viewport: Rect) -> Rect {
    let x = (anchor.x - size.x * 0.5)
        .max(viewport.left() + MARGIN)
        .min(viewport.right() - size.x - MARGIN);
    let y = if anchor.y < viewport.center().y {
        (anchor.y + ANCHOR_GAP).min(viewport.bottom() - size.y - MARGIN)
    } else {
        (anchor.y - size.y - ANCHOR_GAP).max(viewport.top() + MARGIN)
    };
    Rect::from_min_size(Pos2::new(x, y), size)
}

/// Draw the card for `entity` anchored at `anchor` (screen position of its body).
pub fn paint_detail_panel(painter: &egui::Painter, viewport: Rect, anchor: Pos2, entity: &Entity) {
    let description = description_galley(painter, entity);
    let desc_height = description.as_ref().map_or(0.0, |g| g.size().y);
    let rect = panel_rect(anchor, panel_size(entity, desc_height), viewport);
    let accent = rgb_alpha(entity.color, 1.0);

    painter.rect(
        rect,
        6.0,
        Color32::from_rgba_unmultiplied(12, 12, 24, 225),
        Stroke::new(1.5, rgb_alpha(entity.color, 0.7)),
    );
    painter.rect_filled(Rect::from_min_size(rect.left_top(), Vec2::new(rect.width(), 2.0)), 0.0, accent);

    let left = rect.left() + PADDING;
    let mut y = rect.top() + 12.0;

    painter.text(Pos2::new(left, y), Align2::LEFT_TOP, &entity.name, FontId::proportional(16.0), accent);
    y += 22.0;

    if let Some(galley) = description {
        let h = galley.size().y;
        painter.galley(Pos2::new(left, y), galley, Color32::from_rgb(200, 200, 210));
        y += h + DESCRIPTION_GAP;
    }

    // Mastery bar
    let bar_w = rect.width() - 2.0 * PADDING;
    let gap = 3.0;
    let seg_w = (bar_w - gap * (LEVEL_SEGMENTS as f32 - 1.0)) / LEVEL_SEGMENTS as f32;
    for (i, filled) in level_segments(entity.level).iter().enumerate() {
        let seg = Rect::from_min_size(
            Pos2::new(left + i as f32 * (seg_w + gap), y),
            Vec2::new(seg_w, 8.0),
        );
        let fill = if *filled { accent } else { Color32::from_rgba_unmultiplied(255, 255, 255, 25) };
        painter.rect_filled(seg, 2.0, fill);
    }
    y += 14.0;

    painter.text(
        Pos2::new(left, y),
        Align2::LEFT_TOP,
        format!("Level {}/{}", entity.level, LEVEL_MAX),
        FontId::proportional(11.0),
        Color32::from_rgb(150, 150, 165),
    );

    if entity.featured {
        y += FEATURED_LINE;
        painter.text(
            Pos2::new(left, y),
            Align2::LEFT_TOP,
            "\u{2B50} Featured skill",
            FontId::proportional(11.0),
            Color32::from_rgb(250, 204, 21),
        );
    }
}
