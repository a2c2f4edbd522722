use eframe::egui::{self, Align, Layout, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use thread_arcs::{ArcPlacement, Orientation, SortStrategy};

use super::super::ViewModel;

const SEARCH_RESULT_ROWS: usize = 200;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    /// Nodes whose id, author or text fuzzily match the search box, best
    /// match first.
    fn search_matches(&self) -> Vec<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .diagram
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.search_text(), query).map(|score| (index, score))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.into_iter().map(|(index, _)| index).collect()
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Controls");
        ui.add_space(6.0);

        self.draw_layout_controls(ui);
        ui.separator();
        self.draw_order_controls(ui);
        ui.separator();
        self.draw_search(ui);
        ui.separator();
        self.draw_pinned(ui);
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        let config = *self.diagram.layout().config();
        let mut space = config.space;
        let mut max_arc_height = config.max_arc_height;
        let mut lambda = config.lambda;
        let mut radius = config.radius;
        let mut orientation = config.orientation;
        let mut placement = config.placement;
        let mut changed = false;

        egui::CollapsingHeader::new("Layout")
            .default_open(true)
            .show(ui, |ui| {
                changed |= ui
                    .add(egui::Slider::new(&mut space, 8.0..=120.0).text("Spacing"))
                    .on_hover_text("Distance between neighbouring nodes on the axis.")
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut max_arc_height, 20.0..=400.0).text("Max arc height"))
                    .on_hover_text("Height of the arc spanning the longest distance.")
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut lambda, 0.05..=2.0).text("Height exponent"))
                    .on_hover_text("Below 1 short arcs grow faster; above 1 they stay flat.")
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut radius, 2.0..=12.0).text("Node radius"))
                    .changed();

                ui.horizontal(|ui| {
                    changed |= ui
                        .selectable_value(&mut orientation, Orientation::Horizontal, "Horizontal")
                        .changed();
                    changed |= ui
                        .selectable_value(&mut orientation, Orientation::Vertical, "Vertical")
                        .changed();
                });
                ui.horizontal(|ui| {
                    changed |= ui
                        .selectable_value(&mut placement, ArcPlacement::Signed, "Signed arcs")
                        .on_hover_text("Arc sides follow each node's generation.")
                        .changed();
                    changed |= ui
                        .selectable_value(&mut placement, ArcPlacement::Alternating, "Alternating")
                        .on_hover_text("Replies above, parents below, first drawn wins.")
                        .changed();
                });
            });

        if changed {
            let mut options = self.options.clone();
            options.space = Some(space);
            options.max_arc_height = Some(max_arc_height);
            options.lambda = Some(lambda);
            options.radius = Some(radius);
            options.orientation = Some(orientation);
            options.placement = Some(placement);
            if orientation != config.orientation {
                self.fit_pending = true;
            }
            self.relayout(options);
        }
    }

    fn draw_order_controls(&mut self, ui: &mut Ui) {
        ui.label("Order");
        let mut pending = None;
        ui.horizontal_wrapped(|ui| {
            if ui
                .button("By generation")
                .on_hover_text("Older generations first, busier nodes first within one.")
                .clicked()
            {
                pending = Some(SortStrategy::ByGeneration);
            }
            if ui
                .button("Roots first")
                .on_hover_text("Thread starters to the front.")
                .clicked()
            {
                pending = Some(SortStrategy::DepthZeroFirst);
            }
            if ui.button("Input order").clicked() {
                pending = Some(self.input_order());
            }
            if ui.button("Reverse").clicked() {
                pending = Some(SortStrategy::Permutation(
                    (0..self.diagram.nodes().len()).rev().collect(),
                ));
            }
        });

        if let Some(strategy) = pending {
            self.apply_sort(&strategy);
        }
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search (id, author or text)")
            .on_hover_text("Click a match to pin or unpin it.");
        ui.text_edit_singleline(&mut self.search);

        let matches = self.search_matches();
        if self.search.trim().is_empty() {
            return;
        }

        let mut pin_all = false;
        ui.horizontal(|ui| {
            ui.label(format!("{} matches", matches.len()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                pin_all = ui
                    .add_enabled(!matches.is_empty(), egui::Button::new("Pin all"))
                    .clicked();
            });
        });

        let row_count = matches.len().min(SEARCH_RESULT_ROWS);
        let mut toggled = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results")
            .max_height(220.0)
            .auto_shrink([false, true])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                for row in row_range {
                    let Some(&index) = matches.get(row) else {
                        continue;
                    };
                    let Some(node) = self.diagram.node(index) else {
                        continue;
                    };
                    let pinned = self.diagram.active().contains(&index);
                    let label = match &node.author {
                        Some(author) => format!("{}  ·  {author}", node.id),
                        None => node.id.clone(),
                    };
                    if ui.selectable_label(pinned, label).clicked() {
                        toggled = Some(index);
                    }
                }
            });

        if pin_all {
            for index in matches {
                if let Err(error) = self.diagram.activate(index) {
                    self.report(error);
                    break;
                }
            }
        } else if let Some(index) = toggled {
            self.toggle_pin(index);
        }
    }

    fn draw_pinned(&mut self, ui: &mut Ui) {
        let pinned = self.diagram.active().to_vec();
        ui.horizontal(|ui| {
            ui.label(format!("Pinned ({})", pinned.len()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui
                    .add_enabled(!pinned.is_empty(), egui::Button::new("Clear"))
                    .clicked()
                {
                    for &index in &pinned {
                        if let Err(error) = self.diagram.deactivate(index) {
                            self.report(error);
                        }
                    }
                }
            });
        });

        if pinned.is_empty() {
            ui.small("Click a node to pin its reply chain.");
            return;
        }

        let mut unpin = None;
        let mut focus = None;
        for &index in &pinned {
            let Some(node) = self.diagram.node(index) else {
                continue;
            };
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.focused == Some(index), node.id.as_str())
                    .clicked()
                {
                    focus = Some(index);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("Unpin").clicked() {
                        unpin = Some(index);
                    }
                });
            });
        }

        if let Some(index) = focus {
            self.focused = Some(index);
        }
        if let Some(index) = unpin
            && let Err(error) = self.diagram.deactivate(index)
        {
            self.report(error);
        }
    }
}
