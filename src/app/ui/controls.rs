use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Id, RichText, Ui};

use crate::catalog::{BusinessModelId, StageId};

use super::super::ViewModel;
use super::super::search::{SearchMatchCache, rank_stages};

const SEARCH_RESULT_ROWS: usize = 8;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Business model");
        ui.separator();
        ui.add_space(4.0);

        self.draw_model_selector(ui);
        ui.add_space(6.0);
        self.draw_model_context(ui);

        ui.separator();
        self.draw_stage_search(ui);

        ui.separator();
        self.draw_secondary_metrics(ui);
    }

    pub(in crate::app) fn draw_model_selector(&mut self, ui: &mut Ui) {
        let current = self.controller.model();
        let mut selected = None;

        ui.horizontal_wrapped(|ui| {
            for model in BusinessModelId::ALL {
                let label = self
                    .controller
                    .dataset()
                    .catalog()
                    .model(model)
                    .map(|entry| entry.label.clone())
                    .unwrap_or_else(|| model.to_string());
                if ui
                    .selectable_label(current == model, label)
                    .on_hover_text("Swap the flywheel metrics; the funnel stays the same.")
                    .clicked()
                {
                    selected = Some(model);
                }
            }
        });

        if let Some(model) = selected {
            self.controller.select_model(model);
        }
    }

    fn draw_model_context(&self, ui: &mut Ui) {
        let Some(model) = self.controller.dataset().model_info() else {
            return;
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(RichText::new(model.label.as_str()).strong());
            if !model.summary.is_empty() {
                ui.label(model.summary.as_str());
            }
            for focus in &model.focus {
                ui.label(format!("- {focus}"));
            }
        });
    }

    fn draw_stage_search(&mut self, ui: &mut Ui) {
        ui.label("Find a stage")
            .on_hover_text("Fuzzy-match labels and metric ids; matches stay lit in the diagram.");
        ui.text_edit_singleline(&mut self.search);

        let results = rank_stages(self.controller.dataset().stages(), &self.search)
            .into_iter()
            .take(SEARCH_RESULT_ROWS)
            .map(|(stage, _)| (stage.id.clone(), stage.label.clone(), stage.metric_id.clone()))
            .collect::<Vec<_>>();

        if self.search.trim().is_empty() {
            return;
        }
        if results.is_empty() {
            ui.weak("No stage matches the query.");
            return;
        }

        let active = self.controller.coordinator().render_state();
        let mut pending_open: Option<(StageId, Id)> = None;
        for (id, label, metric_id) in results {
            let response = ui.selectable_label(
                active.is_active(&id),
                format!("{metric_id}  {label}"),
            );
            self.focusable.insert(response.id);
            if response.clicked() {
                pending_open = Some((id, response.id));
            }
        }

        if let Some((id, trigger)) = pending_open {
            self.controller
                .coordinator_mut()
                .open_from(&id, Some(trigger));
        }
    }

    fn draw_secondary_metrics(&self, ui: &mut Ui) {
        let groups = &self.controller.dataset().catalog().secondary_groups;
        if groups.is_empty() {
            return;
        }

        ui.label(RichText::new("Secondary metrics").strong());
        for group in groups {
            egui::CollapsingHeader::new(group.title.as_str())
                .default_open(false)
                .show(ui, |ui| {
                    for metric in &group.metrics {
                        ui.label(format!("- {metric}"));
                    }
                });
        }
    }

    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<StageId>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let revision = self.controller.dataset().revision();
        if let Some(cached) = &self.search_match_cache
            && cached.dataset_revision == revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matches = rank_stages(self.controller.dataset().stages(), query)
            .into_iter()
            .map(|(stage, _)| stage.id.clone())
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            dataset_revision: revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}
