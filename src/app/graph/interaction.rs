use std::time::Duration;

use eframe::egui::{self, Pos2, Rect, Ui, Vec2};
use tracing::debug;

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, world_to_canvas};

/// Extra pick distance around a point, in screen pixels.
const POINT_PICK_SLACK: f32 = 4.0;

impl ViewModel {
    pub(in crate::app) fn handle_diagram_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 8.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_diagram_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Primary)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn fit_to(&mut self, rect: Rect) {
        let (width, height) = self.diagram.canvas_size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let zoom = (rect.width() / width as f32).min(rect.height() / height as f32) * 0.92;
        self.zoom = zoom.clamp(0.05, 8.0);
        self.pan = Vec2::ZERO;
        self.fit_pending = false;
    }

    pub(in crate::app) fn point_under(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let world = screen_to_world(rect, self.pan, self.zoom, pointer);
        let at = world_to_canvas(self.diagram.canvas_size(), world);
        self.diagram
            .scene()
            .point_at(at, f64::from(POINT_PICK_SLACK / self.zoom))
    }

    /// Turns the pointer position of this frame into enter/leave events for
    /// points and for the tooltip panel.
    pub(in crate::app) fn track_pointer(&mut self, rect: Rect, pointer: Option<Pos2>, now: Duration) {
        let on_tooltip = pointer
            .zip(self.tooltip_rect)
            .is_some_and(|(pointer, panel)| panel.contains(pointer));
        let hovered = if on_tooltip {
            None
        } else {
            pointer
                .filter(|pointer| rect.contains(*pointer))
                .and_then(|pointer| self.point_under(rect, pointer))
        };

        let point_changed = hovered != self.pointer_node;
        let tooltip_changed = on_tooltip != self.pointer_on_tooltip;

        // Leaves first, so an enter in the same frame is not undone.
        if point_changed && self.pointer_node.is_some() {
            self.diagram.pointer_leave(now);
        }
        if tooltip_changed && !on_tooltip {
            self.diagram.pointer_leave_tooltip(now);
        }

        if tooltip_changed && on_tooltip {
            self.diagram.pointer_enter_tooltip();
        }
        if point_changed
            && let Some(index) = hovered
            && let Err(error) = self.diagram.pointer_enter(index)
        {
            self.report(error);
        }

        if point_changed {
            debug!(from = ?self.pointer_node, to = ?hovered, "pointer moved between points");
        }
        self.pointer_node = hovered;
        self.pointer_on_tooltip = on_tooltip;
    }

    pub(in crate::app) fn toggle_pin(&mut self, index: usize) {
        match self.diagram.toggle(index) {
            Ok(pinned) => {
                debug!(index, pinned, "pin toggled");
                self.focused = Some(index);
                self.last_error = None;
            }
            Err(error) => self.report(error),
        }
    }
}
