use std::time::Duration;

use tracing::debug;

use crate::scene::{Chain, Scene};
use crate::surface::{AttrValue, DrawingSurface, Easing};
use crate::timer::Deferred;

mod propagate;

use self::propagate::{clear_all, tag_chain};

/// Delay before the active set's highlighting comes back after the pointer
/// leaves a point; long enough to cross from a point into its tooltip.
pub const RESTORE_DELAY: Duration = Duration::from_millis(300);

pub const ACTIVE_RADIUS_SCALE: f64 = 1.5;
pub const ACTIVE_ANIMATION: Duration = Duration::from_millis(150);

/// Highlight state of one diagram: the pinned nodes, the hovered node and
/// the pending restore after a hover ends.
#[derive(Clone, Debug)]
pub struct HighlightController {
    active: Vec<usize>,
    hovered: Option<usize>,
    restore: Deferred,
    restore_delay: Duration,
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new(RESTORE_DELAY)
    }
}

impl HighlightController {
    pub fn new(restore_delay: Duration) -> Self {
        Self {
            active: Vec::new(),
            hovered: None,
            restore: Deferred::new(),
            restore_delay,
        }
    }

    pub fn active(&self) -> &[usize] {
        &self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.contains(&index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn restore_pending(&self) -> bool {
        self.restore.is_pending()
    }

    /// Marks `index` as the focal point and tags its descendants and
    /// predecessors with their distance from it.
    pub fn highlight<S: DrawingSurface>(
        &self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        index: usize,
    ) {
        let Some(point) = scene.point(index) else {
            return;
        };
        surface.add_class(point.handle, "highlight");
        tag_chain(scene, surface, index, Chain::Descendants);
        tag_chain(scene, surface, index, Chain::Predecessors);
    }

    pub fn reset_highlighting<S: DrawingSurface>(&self, scene: &mut Scene<S::Handle>, surface: &mut S) {
        clear_all(scene, surface);
    }

    pub fn activate<S: DrawingSurface>(
        &mut self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        index: usize,
    ) {
        if !self.active.contains(&index) {
            self.active.push(index);
        }
        self.apply_active(scene, surface, index);
    }

    /// Unpins `index`. The remaining active nodes are highlighted again from
    /// a clean slate so the result is exactly their union.
    pub fn deactivate<S: DrawingSurface>(
        &mut self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        index: usize,
    ) {
        self.active.retain(|&active| active != index);

        if let Some(point) = scene.point(index) {
            surface.remove_class(point.handle, "active");
            surface.animate(
                point.handle,
                &[("r", AttrValue::Number(point.radius))],
                ACTIVE_ANIMATION,
                Easing::EaseOut,
            );
        }

        self.reset_highlighting(scene, surface);
        self.show_active(scene, surface);
    }

    pub fn show_active<S: DrawingSurface>(&self, scene: &mut Scene<S::Handle>, surface: &mut S) {
        for &index in &self.active {
            self.apply_active(scene, surface, index);
        }
    }

    fn apply_active<S: DrawingSurface>(
        &self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        index: usize,
    ) {
        let Some(point) = scene.point(index) else {
            return;
        };
        let handle = point.handle;
        let radius = point.radius * ACTIVE_RADIUS_SCALE;

        if !surface.has_class(handle, "active") {
            surface.add_class(handle, "active");
            surface.animate(
                handle,
                &[("r", AttrValue::Number(radius))],
                ACTIVE_ANIMATION,
                Easing::EaseOut,
            );
        }
        self.highlight(scene, surface, index);
    }

    pub fn pointer_enter<S: DrawingSurface>(
        &mut self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        index: usize,
    ) {
        if !self.active.is_empty() {
            self.restore.cancel();
            self.reset_highlighting(scene, surface);
        }
        self.hovered = Some(index);
        self.highlight(scene, surface, index);
    }

    pub fn pointer_leave<S: DrawingSurface>(
        &mut self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        now: Duration,
    ) {
        self.hovered = None;
        self.reset_highlighting(scene, surface);
        self.restore.schedule(now, self.restore_delay);
    }

    /// Runs the pending restore once it is due. Returns whether it ran.
    pub fn tick<S: DrawingSurface>(
        &mut self,
        scene: &mut Scene<S::Handle>,
        surface: &mut S,
        now: Duration,
    ) -> bool {
        if self.restore.fire(now).is_none() {
            return false;
        }
        debug!(active = self.active.len(), "restoring active highlighting");
        self.show_active(scene, surface);
        true
    }

    /// Follows a reorder: `positions[old] = new`.
    pub fn remap(&mut self, positions: &[usize]) {
        self.active = self
            .active
            .iter()
            .filter_map(|&old| positions.get(old).copied())
            .collect();
        self.hovered = None;
        self.restore.cancel();
    }

    /// Forgets hover state and pending restores, keeping the active set.
    pub fn interrupt(&mut self) {
        self.hovered = None;
        self.restore.cancel();
    }
}
