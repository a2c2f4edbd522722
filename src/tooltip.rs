use std::time::Duration;

use crate::layout::Coord;
use crate::timer::Deferred;

pub const FADE_DELAY: Duration = Duration::from_millis(300);
pub const HIDE_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipPhase {
    #[default]
    Hidden,
    Shown,
    /// Fading out; the panel is still there and can be re-entered.
    Fading,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    pub node: Option<usize>,
    pub anchor: Coord,
    pub content: String,
    pub phase: TooltipPhase,
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        self.phase != TooltipPhase::Hidden
    }

    /// Opacity a host should paint the panel with.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            TooltipPhase::Shown => 1.0,
            TooltipPhase::Fading | TooltipPhase::Hidden => 0.0,
        }
    }
}

/// Floating info panel for the hovered or active node. Hiding goes through a
/// fade first so the pointer can move onto the panel without losing it.
#[derive(Clone, Debug)]
pub struct TooltipController {
    state: TooltipState,
    fade: Deferred,
    hide: Deferred,
    fade_delay: Duration,
    hide_delay: Duration,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(FADE_DELAY, HIDE_DELAY)
    }
}

impl TooltipController {
    pub fn new(fade_delay: Duration, hide_delay: Duration) -> Self {
        Self {
            state: TooltipState::default(),
            fade: Deferred::new(),
            hide: Deferred::new(),
            fade_delay,
            hide_delay,
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    pub fn hide_pending(&self) -> bool {
        self.fade.is_pending() || self.hide.is_pending()
    }

    pub fn show(&mut self, node: usize, anchor: Coord, content: String) {
        self.fade.cancel();
        self.hide.cancel();
        self.state = TooltipState {
            node: Some(node),
            anchor,
            content,
            phase: TooltipPhase::Shown,
        };
    }

    pub fn request_hide(&mut self, now: Duration) {
        if self.state.phase == TooltipPhase::Shown && !self.hide.is_pending() {
            self.fade.schedule(now, self.fade_delay);
        }
    }

    /// The pointer moved onto the panel. Cancels a pending hide and returns
    /// the node the panel belongs to, if it is still up.
    pub fn pointer_enter(&mut self) -> Option<usize> {
        if !self.state.is_visible() {
            return None;
        }
        self.fade.cancel();
        self.hide.cancel();
        self.state.phase = TooltipPhase::Shown;
        self.state.node
    }

    pub fn hide_now(&mut self) {
        self.fade.cancel();
        self.hide.cancel();
        self.state.phase = TooltipPhase::Hidden;
        self.state.node = None;
    }

    /// Advances the two hide stages. Returns whether the phase changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut changed = false;
        if self.fade.fire(now).is_some() {
            self.state.phase = TooltipPhase::Fading;
            self.hide.schedule(now, self.hide_delay);
            changed = true;
        }
        if self.hide.fire(now).is_some() {
            self.state.phase = TooltipPhase::Hidden;
            self.state.node = None;
            changed = true;
        }
        changed
    }
}
