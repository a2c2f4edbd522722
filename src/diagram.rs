use std::time::Duration;

use tracing::{debug, info};

use crate::config::{LayoutConfig, ThreadArcsOptions};
use crate::error::{Result, ThreadArcsError};
use crate::graph::{Adjacency, GraphIndex};
use crate::highlight::HighlightController;
use crate::layout::{LayoutEngine, SortStrategy};
use crate::scene::Scene;
use crate::surface::DrawingSurface;
use crate::tooltip::{TooltipController, TooltipState};

pub type TooltipFormatter<T> = Box<dyn Fn(&T) -> String>;

/// A thread arc diagram bound to one drawing surface.
///
/// Graph analysis and layout are rebuilt in full on construction and after
/// every [`ThreadArcs::sort`]. Points and arcs exist between [`ThreadArcs::draw`]
/// and the next redraw. Pointer handling is driven by the host: it reports
/// enter/leave events and advances time through [`ThreadArcs::tick`].
pub struct ThreadArcs<S: DrawingSurface, T> {
    nodes: Vec<T>,
    graph: GraphIndex,
    layout: LayoutEngine,
    scene: Scene<S::Handle>,
    surface: S,
    highlight: HighlightController,
    tooltip: TooltipController,
    formatter: Option<TooltipFormatter<T>>,
}

impl<S: DrawingSurface, T> ThreadArcs<S, T> {
    pub fn new(
        surface: S,
        nodes: Vec<T>,
        adjacency: Adjacency,
        options: &ThreadArcsOptions,
    ) -> Result<Self> {
        if nodes.len() != adjacency.len() {
            return Err(ThreadArcsError::LengthMismatch {
                nodes: nodes.len(),
                links: adjacency.len(),
            });
        }
        Self::with_graph(surface, nodes, GraphIndex::new(adjacency)?, options.resolve()?)
    }

    /// Links in signed form: magnitude is the target, sign the arc side.
    pub fn from_signed(
        surface: S,
        nodes: Vec<T>,
        links: &[Vec<i64>],
        options: &ThreadArcsOptions,
    ) -> Result<Self> {
        if nodes.len() != links.len() {
            return Err(ThreadArcsError::LengthMismatch {
                nodes: nodes.len(),
                links: links.len(),
            });
        }
        Self::with_graph(surface, nodes, GraphIndex::from_signed(links)?, options.resolve()?)
    }

    /// Parent lists as primary input; forward links are derived.
    pub fn from_parents(
        surface: S,
        nodes: Vec<T>,
        parents: &[Vec<usize>],
        options: &ThreadArcsOptions,
    ) -> Result<Self> {
        if nodes.len() != parents.len() {
            return Err(ThreadArcsError::LengthMismatch {
                nodes: nodes.len(),
                links: parents.len(),
            });
        }
        Self::with_graph(surface, nodes, GraphIndex::from_parents(parents)?, options.resolve()?)
    }

    fn with_graph(
        surface: S,
        nodes: Vec<T>,
        graph: GraphIndex,
        config: LayoutConfig,
    ) -> Result<Self> {
        let layout = LayoutEngine::new(config, &graph);
        Ok(Self {
            nodes,
            graph,
            layout,
            scene: Scene::new(),
            surface,
            highlight: HighlightController::default(),
            tooltip: TooltipController::default(),
            formatter: None,
        })
    }

    /// Enables the tooltip with `formatter` producing its content, unless
    /// the options disabled tooltips.
    pub fn with_tooltip(mut self, formatter: impl Fn(&T) -> String + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&T> {
        self.nodes.get(index)
    }

    pub fn graph(&self) -> &GraphIndex {
        &self.graph
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn scene(&self) -> &Scene<S::Handle> {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn active(&self) -> &[usize] {
        self.highlight.active()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.highlight.hovered()
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        self.layout.canvas_size()
    }

    pub fn is_drawn(&self) -> bool {
        self.scene.is_drawn()
    }

    fn tooltip_enabled(&self) -> bool {
        self.formatter.is_some() && !self.layout.config().disable_tooltip
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip_enabled().then(|| self.tooltip.state())
    }

    /// Draws every point and arc, replacing any earlier draw pass, and
    /// re-applies the active set.
    pub fn draw(&mut self) {
        let placement = self.layout.config().placement;
        self.scene
            .draw_all(&mut self.surface, &self.layout, &self.graph, placement);
        self.highlight.interrupt();
        self.tooltip.hide_now();
        self.highlight.show_active(&mut self.scene, &mut self.surface);
    }

    /// Reorders the nodes and rebuilds depths, arc directions and layout.
    /// A drawn diagram is redrawn in the new order. On error nothing changes.
    pub fn sort(&mut self, strategy: &SortStrategy) -> Result<()> {
        let order = strategy.order(&self.graph);
        let (graph, positions) = self.graph.reorder(&order)?;

        let mut slots = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();
        self.nodes = order
            .iter()
            .filter_map(|&old| slots.get_mut(old).and_then(Option::take))
            .collect();

        self.layout = LayoutEngine::new(*self.layout.config(), &graph);
        self.graph = graph;
        self.highlight.remap(&positions);
        self.tooltip.hide_now();

        info!(strategy = strategy.label(), ?order, "thread reordered");

        if self.scene.is_drawn() {
            self.draw();
        }
        Ok(())
    }

    pub fn highlight(&mut self, index: usize) -> Result<()> {
        self.check_drawn(index)?;
        self.highlight
            .highlight(&mut self.scene, &mut self.surface, index);
        Ok(())
    }

    pub fn reset_highlighting(&mut self) {
        self.highlight
            .reset_highlighting(&mut self.scene, &mut self.surface);
    }

    /// Pins `index` and moves the tooltip to it. Before the first draw only
    /// membership is recorded.
    pub fn activate(&mut self, index: usize) -> Result<()> {
        self.graph.check_node(index)?;
        self.highlight
            .activate(&mut self.scene, &mut self.surface, index);
        if self.scene.is_drawn() {
            self.show_tooltip(index);
        }
        Ok(())
    }

    /// Unpins `index`. A tooltip left on it by activation goes away unless
    /// the pointer is over the node.
    pub fn deactivate(&mut self, index: usize) -> Result<()> {
        self.graph.check_node(index)?;
        self.highlight
            .deactivate(&mut self.scene, &mut self.surface, index);
        if self.tooltip.state().node == Some(index) && self.highlight.hovered() != Some(index) {
            self.tooltip.hide_now();
        }
        Ok(())
    }

    /// Flips the pin on `index`; returns whether it is now active.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        if self.highlight.is_active(index) {
            self.deactivate(index)?;
            Ok(false)
        } else {
            self.activate(index)?;
            Ok(true)
        }
    }

    pub fn pointer_enter(&mut self, index: usize) -> Result<()> {
        self.check_drawn(index)?;
        self.highlight
            .pointer_enter(&mut self.scene, &mut self.surface, index);
        self.show_tooltip(index);
        Ok(())
    }

    pub fn pointer_leave(&mut self, now: Duration) {
        self.highlight
            .pointer_leave(&mut self.scene, &mut self.surface, now);
        self.tooltip.request_hide(now);
    }

    /// The pointer reached the tooltip panel: keeps it up and brings back the
    /// hover highlighting of its node.
    pub fn pointer_enter_tooltip(&mut self) {
        if !self.tooltip_enabled() {
            return;
        }
        if let Some(node) = self.tooltip.pointer_enter() {
            self.highlight
                .pointer_enter(&mut self.scene, &mut self.surface, node);
        }
    }

    pub fn pointer_leave_tooltip(&mut self, now: Duration) {
        self.pointer_leave(now);
    }

    /// Runs due timers. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let restored = self
            .highlight
            .tick(&mut self.scene, &mut self.surface, now);
        let tooltip_changed = self.tooltip.tick(now);
        if restored || tooltip_changed {
            debug!(restored, tooltip_changed, "timers fired");
        }
        restored || tooltip_changed
    }

    /// Whether a timer is still waiting, so hosts know to keep ticking.
    pub fn has_pending_timers(&self) -> bool {
        self.highlight.restore_pending() || self.tooltip.hide_pending()
    }

    fn show_tooltip(&mut self, index: usize) {
        if self.tooltip_enabled()
            && let (Some(formatter), Some(node)) = (&self.formatter, self.nodes.get(index))
        {
            let anchor = self.layout.tooltip_anchor(self.layout.position(index));
            self.tooltip.show(index, anchor, formatter(node));
        }
    }

    fn check_drawn(&self, index: usize) -> Result<()> {
        self.graph.check_node(index)?;
        if self.scene.is_drawn() {
            Ok(())
        } else {
            Err(ThreadArcsError::NotDrawn)
        }
    }
}
