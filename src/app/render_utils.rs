use std::collections::BTreeSet;

use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use thread_arcs::{Chain, Coord};

pub(super) const POINT_COLOR: Color32 = Color32::from_rgb(178, 188, 204);
pub(super) const ARC_COLOR: Color32 = Color32::from_rgba_premultiplied(110, 122, 138, 200);
pub(super) const DESCENDANT_COLOR: Color32 = Color32::from_rgb(246, 137, 92);
pub(super) const PREDECESSOR_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
pub(super) const ACTIVE_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 50));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Canvas coordinates relative to the canvas centre, which the view keeps
/// at the middle of the panel before panning.
pub(super) fn canvas_to_world(canvas: (f64, f64), coord: Coord) -> Vec2 {
    vec2(
        (coord.x - canvas.0 / 2.0) as f32,
        (coord.y - canvas.1 / 2.0) as f32,
    )
}

pub(super) fn world_to_canvas(canvas: (f64, f64), world: Vec2) -> Coord {
    Coord::new(
        world.x as f64 + canvas.0 / 2.0,
        world.y as f64 + canvas.1 / 2.0,
    )
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Shifts `panel` so it stays within `bounds` where it fits.
pub(super) fn keep_inside(panel: Rect, bounds: Rect) -> Rect {
    let mut offset = Vec2::ZERO;
    if panel.right() > bounds.right() {
        offset.x = bounds.right() - panel.right();
    }
    if panel.left() + offset.x < bounds.left() {
        offset.x = bounds.left() - panel.left();
    }
    if panel.bottom() > bounds.bottom() {
        offset.y = bounds.bottom() - panel.bottom();
    }
    if panel.top() + offset.y < bounds.top() {
        offset.y = bounds.top() - panel.top();
    }
    panel.translate(offset)
}

/// What the class list of a surface element says about its emphasis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct ElementStyle {
    pub descendant: Option<usize>,
    pub predecessor: Option<usize>,
    pub focal: bool,
    pub active: bool,
}

impl ElementStyle {
    pub(super) fn from_classes(classes: &BTreeSet<String>) -> Self {
        let mut style = Self::default();
        for class in classes {
            match class.as_str() {
                "highlight" => style.focal = true,
                "active" => style.active = true,
                other => match Chain::parse_class(other) {
                    Some((Chain::Descendants, depth)) => style.descendant = Some(depth),
                    Some((Chain::Predecessors, depth)) => style.predecessor = Some(depth),
                    None => {}
                },
            }
        }
        style
    }

    pub(super) fn is_tagged(&self) -> bool {
        self.focal || self.descendant.is_some() || self.predecessor.is_some()
    }

    /// Tagged elements fade from the chain colour towards `base` the further
    /// they are from the focal node; untagged ones are dimmed while anything
    /// is highlighted.
    pub(super) fn color(&self, base: Color32, emphasis_active: bool) -> Color32 {
        let tint = |accent: Color32, depth: usize| {
            blend_color(accent, base, (depth as f32 * 0.18).min(0.7))
        };

        match (self.descendant, self.predecessor) {
            (Some(down), Some(up)) => blend_color(
                tint(DESCENDANT_COLOR, down),
                tint(PREDECESSOR_COLOR, up),
                0.5,
            ),
            (Some(down), None) => tint(DESCENDANT_COLOR, down),
            (None, Some(up)) => tint(PREDECESSOR_COLOR, up),
            (None, None) if self.focal => Color32::WHITE,
            (None, None) if emphasis_active => dim_color(base, 0.45),
            (None, None) => base,
        }
    }
}
