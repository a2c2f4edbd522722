use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use thread_arcs::{RetainedSurface, SortStrategy, ThreadArcs, ThreadArcsError, ThreadArcsOptions};
use tracing::{info, warn};

use crate::input::{self, Thread};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        thread: Thread,
        options: ThreadArcsOptions,
        sort: Option<&SortStrategy>,
    ) -> Result<Self, String> {
        let mut diagram = input::build_diagram(RetainedSurface::new(), thread, &options)
            .map_err(|error| format!("{error:#}"))?;
        if let Some(strategy) = sort {
            diagram
                .sort(strategy)
                .map_err(|error| format!("failed to apply {} order: {error}", strategy.label()))?;
        }
        diagram.draw();

        info!(
            nodes = diagram.graph().len(),
            arcs = diagram.scene().arcs().len(),
            "thread ready"
        );

        Ok(Self {
            diagram,
            options,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            fit_pending: true,
            pointer_node: None,
            pointer_on_tooltip: false,
            tooltip_rect: None,
            focused: None,
            last_error: None,
            animation_clock: HashMap::new(),
        })
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_label: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        let now = Duration::from_secs_f64(ctx.input(|input| input.time).max(0.0));
        if self.diagram.tick(now) {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("thread-arcs");
                    ui.separator();
                    ui.label(format!("file: {source_label}"));
                    ui.label(format!("nodes: {}", self.diagram.graph().len()));
                    ui.label(format!("arcs: {}", self.diagram.scene().arcs().len()));
                    ui.label(format!(
                        "generations: {}",
                        self.diagram
                            .graph()
                            .depths()
                            .iter()
                            .max()
                            .map_or(0, |depth| depth + 1)
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload thread"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Fit view").clicked() {
                        self.fit_pending = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "{}  ·  zoom {:.0}%",
                            self.diagram.layout().config().orientation.label(),
                            self.zoom * 100.0
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading thread...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_diagram(ui, now);
            }
        });

        if self.diagram.has_pending_timers() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }

    pub(in crate::app) fn report(&mut self, error: ThreadArcsError) {
        warn!(%error, "diagram operation failed");
        self.last_error = Some(error.to_string());
    }

    pub(in crate::app) fn apply_sort(&mut self, strategy: &SortStrategy) {
        match self.diagram.sort(strategy) {
            Ok(()) => {
                self.pointer_node = None;
                self.pointer_on_tooltip = false;
                self.focused = None;
                self.last_error = None;
            }
            Err(error) => self.report(error),
        }
    }

    /// Order that puts every node back at its position in the input file.
    pub(in crate::app) fn input_order(&self) -> SortStrategy {
        let mut order = (0..self.diagram.nodes().len()).collect::<Vec<_>>();
        order.sort_by_key(|&index| self.diagram.nodes()[index].ordinal);
        SortStrategy::Permutation(order)
    }

    /// Rebuilds the diagram from the current nodes and links with new
    /// options, keeping the pinned nodes.
    pub(in crate::app) fn relayout(&mut self, options: ThreadArcsOptions) {
        let nodes = self.diagram.nodes().to_vec();
        let adjacency = self.diagram.graph().adjacency().clone();
        let active = self.diagram.active().to_vec();

        let rebuilt = ThreadArcs::new(RetainedSurface::new(), nodes, adjacency, &options)
            .map(|diagram| diagram.with_tooltip(crate::input::ThreadNode::summary));
        match rebuilt {
            Ok(mut diagram) => {
                for index in active {
                    if let Err(error) = diagram.activate(index) {
                        warn!(%error, index, "dropping pin after relayout");
                    }
                }
                diagram.draw();
                self.diagram = diagram;
                self.options = options;
                self.pointer_node = None;
                self.pointer_on_tooltip = false;
                self.tooltip_rect = None;
                self.animation_clock.clear();
                self.last_error = None;
            }
            Err(error) => self.report(error),
        }
    }
}
