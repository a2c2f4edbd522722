use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Message Details");
        ui.add_space(6.0);

        let Some(index) = self.pointer_node.or(self.focused) else {
            ui.label("Hover a node to inspect it, click to pin it.");
            return;
        };
        let Some(node) = self.diagram.node(index) else {
            ui.label("Selected node no longer exists in the thread.");
            return;
        };

        let graph = self.diagram.graph();
        let depth = graph.depth(index).unwrap_or_default();
        let replies = graph
            .adjacency()
            .get(index)
            .map(|targets| targets.iter().map(|target| target.index).collect::<Vec<_>>())
            .unwrap_or_default();
        let parents = graph.inverse().get(index).cloned().unwrap_or_default();

        ui.label(RichText::new(node.id.as_str()).strong());
        if let Some(author) = &node.author {
            ui.small(author.as_str());
        }
        ui.add_space(6.0);
        ui.label(format!("Position: {index} (input #{})", node.ordinal));
        ui.label(format!("Generation: {depth}"));
        ui.label(format!("Replies: {}", graph.children(index)));
        ui.label(format!("In reply to: {}", graph.parents(index)));
        if self.diagram.active().contains(&index) {
            ui.label(RichText::new("Pinned").strong());
        }

        if !node.text.is_empty() {
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("message_text")
                .max_height(200.0)
                .show(ui, |ui| {
                    ui.label(node.text.as_str());
                });
        }

        let mut focus = None;
        ui.separator();
        for (title, related) in [("In reply to", &parents), ("Replies", &replies)] {
            ui.label(RichText::new(title).strong());
            if related.is_empty() {
                ui.small("none");
            }
            for &other in related {
                if let Some(other_node) = self.diagram.node(other)
                    && ui.link(other_node.id.as_str()).clicked()
                {
                    focus = Some(other);
                }
            }
            ui.add_space(4.0);
        }

        if let Some(index) = focus {
            self.focused = Some(index);
        }
    }
}
