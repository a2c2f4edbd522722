use std::collections::{HashMap, HashSet};
use std::time::Duration;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};
use thread_arcs::tooltip::HIDE_DELAY;
use thread_arcs::{Coord, Element, Orientation, Shape};

use super::super::ViewModel;
use super::super::render_utils::{
    ACTIVE_COLOR, ARC_COLOR, ElementStyle, POINT_COLOR, canvas_to_world, draw_background,
    keep_inside, world_to_screen,
};

/// Line segments per arc curve.
const ARC_SEGMENTS: usize = 32;
/// Minimum on-screen gap between neighbouring points before labels show.
const LABEL_MIN_GAP: f32 = 26.0;

/// Current value of an animated numeric attribute. Attributes hold the end
/// value; the start time of each animation is taken from the first frame
/// that sees it.
fn animated_number(
    clock: &mut HashMap<u64, Duration>,
    element: &Element,
    name: &str,
    target: f64,
    now: Duration,
) -> (f64, bool) {
    let Some(animation) = &element.animation else {
        return (target, false);
    };
    let Some(from) = animation
        .from
        .iter()
        .find(|(attribute, _)| attribute == name)
        .and_then(|(_, value)| value.as_number())
    else {
        return (target, false);
    };

    let started = *clock.entry(animation.serial).or_insert(now);
    let elapsed = now.saturating_sub(started);
    if animation.duration.is_zero() || elapsed >= animation.duration {
        return (target, false);
    }

    let progress = elapsed.as_secs_f64() / animation.duration.as_secs_f64();
    (from + (target - from) * animation.easing.apply(progress), true)
}

impl ViewModel {
    pub(in crate::app) fn draw_diagram(&mut self, ui: &mut Ui, now: Duration) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.fit_pending {
            self.fit_to(rect);
        }
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_diagram_zoom(ui, rect, &response);
        self.handle_diagram_pan(&response);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        self.track_pointer(rect, pointer, now);

        if self.pointer_node.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(index) = self.pointer_node
        {
            self.toggle_pin(index);
        }

        let canvas = self.diagram.canvas_size();
        let (pan, zoom) = (self.pan, self.zoom);
        let project = |coord: Coord| world_to_screen(rect, pan, zoom, canvas_to_world(canvas, coord));

        let layout = self.diagram.layout();
        painter.line_segment(
            [project(layout.xy(0.0)), project(layout.xy(layout.axis_length()))],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(70, 80, 92, 160)),
        );

        let surface = self.diagram.surface();
        let emphasis_active = surface.with_class("highlight").next().is_some();
        let zoom_sqrt = zoom.sqrt();
        let clock = &mut self.animation_clock;
        let mut live_animations = HashSet::new();
        let mut animating = false;

        for (_, element) in surface.iter() {
            if let Some(animation) = &element.animation {
                live_animations.insert(animation.serial);
            }
            let style = ElementStyle::from_classes(&element.classes);

            match &element.shape {
                Shape::Path(path) => {
                    let width = if style.is_tagged() {
                        (2.2 * zoom_sqrt).clamp(1.2, 4.5)
                    } else {
                        (1.1 * zoom_sqrt).clamp(0.6, 2.6)
                    };
                    let stroke = Stroke::new(width, style.color(ARC_COLOR, emphasis_active));
                    let points = (0..=ARC_SEGMENTS)
                        .map(|step| project(path.sample(step as f64 / ARC_SEGMENTS as f64)))
                        .collect::<Vec<_>>();
                    for pair in points.windows(2) {
                        painter.line_segment([pair[0], pair[1]], stroke);
                    }
                }
                Shape::Circle => {
                    let Some(center) = element.center() else {
                        continue;
                    };
                    let target = element.number("r").unwrap_or_default();
                    let (radius, running) = animated_number(clock, element, "r", target, now);
                    animating |= running;

                    let position = project(center);
                    let radius = (radius as f32 * zoom).max(1.5);
                    painter.circle_filled(position, radius, style.color(POINT_COLOR, emphasis_active));
                    let outline = if style.active {
                        Stroke::new(1.8, ACTIVE_COLOR)
                    } else {
                        Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
                    };
                    painter.circle_stroke(position, radius, outline);
                }
            }
        }
        clock.retain(|serial, _| live_animations.contains(serial));

        self.draw_labels(&painter, rect);
        self.draw_tooltip(ui, &painter, rect);

        if let Some(error) = &self.last_error {
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                error,
                FontId::proportional(13.0),
                Color32::from_rgb(240, 110, 100),
            );
        }

        if animating || response.dragged() {
            ui.ctx().request_repaint();
        }
    }

    fn draw_labels(&self, painter: &egui::Painter, rect: Rect) {
        let canvas = self.diagram.canvas_size();
        let config = self.diagram.layout().config();
        let show_all = config.space as f32 * self.zoom >= LABEL_MIN_GAP;

        for point in self.diagram.scene().points() {
            let pinned = self.diagram.active().contains(&point.index);
            if !show_all && !pinned && self.pointer_node != Some(point.index) {
                continue;
            }
            let Some(node) = self.diagram.node(point.index) else {
                continue;
            };

            let position: Pos2 =
                world_to_screen(rect, self.pan, self.zoom, canvas_to_world(canvas, point.center));
            let gap = point.radius as f32 * self.zoom + 6.0;
            let (offset, align) = match config.orientation {
                Orientation::Horizontal => (vec2(0.0, gap), Align2::CENTER_TOP),
                Orientation::Vertical => (vec2(-gap, 0.0), Align2::RIGHT_CENTER),
            };
            painter.text(
                position + offset,
                align,
                node.id.as_str(),
                FontId::proportional(11.0),
                Color32::from_gray(if pinned { 240 } else { 170 }),
            );
        }
    }

    fn draw_tooltip(&mut self, ui: &Ui, painter: &egui::Painter, rect: Rect) {
        let Some(state) = self.diagram.tooltip().filter(|state| state.is_visible()) else {
            self.tooltip_rect = None;
            return;
        };

        let opacity = ui.ctx().animate_value_with_time(
            ui.make_persistent_id("tooltip-opacity"),
            state.opacity(),
            HIDE_DELAY.as_secs_f32(),
        );
        let galley = painter.layout(
            state.content.clone(),
            FontId::proportional(13.0),
            Color32::from_gray(238).gamma_multiply(opacity),
            280.0,
        );

        let canvas = self.diagram.canvas_size();
        let anchor = world_to_screen(rect, self.pan, self.zoom, canvas_to_world(canvas, state.anchor));
        let size = galley.size() + vec2(16.0, 12.0);
        let min = match self.diagram.layout().config().orientation {
            Orientation::Horizontal => anchor + vec2(-size.x / 2.0, 8.0),
            Orientation::Vertical => anchor + vec2(8.0, -size.y / 2.0),
        };
        let panel = keep_inside(Rect::from_min_size(min, size), rect);

        painter.rect_filled(
            panel,
            6.0,
            Color32::from_rgba_unmultiplied(30, 36, 44, 235).gamma_multiply(opacity),
        );
        painter.galley(panel.min + vec2(8.0, 6.0), galley, Color32::from_gray(238));

        self.tooltip_rect = Some(panel);
    }
}
