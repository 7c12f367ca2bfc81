use eframe::egui::{self, Id, RichText, Ui};

use crate::catalog::StageId;
use crate::dataset::StageSlot;

use super::ViewModel;

struct StageRow {
    id: StageId,
    slot: StageSlot,
    metric_id: String,
    label: String,
}

impl ViewModel {
    pub(in crate::app) fn draw_mobile(&mut self, ui: &mut Ui) {
        egui::CollapsingHeader::new("Business model")
            .default_open(false)
            .show(ui, |ui| self.draw_model_selector(ui));
        ui.separator();

        let dataset = self.controller.dataset();
        let lookup = dataset.lookup();
        let rows = dataset
            .stages()
            .filter_map(|stage| {
                Some(StageRow {
                    id: stage.id.clone(),
                    slot: lookup.slot(&stage.id)?,
                    metric_id: stage.metric_id.clone(),
                    label: stage.label.clone(),
                })
            })
            .collect::<Vec<_>>();
        let flywheel_heading = dataset
            .model_info()
            .map(|model| format!("Retention flywheel: {}", model.label))
            .unwrap_or_else(|| "Retention flywheel".to_owned());

        let render = self.controller.coordinator().render_state();
        let mut pending_open: Option<(StageId, Id)> = None;

        egui::ScrollArea::vertical()
            .id_salt("stage_list_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut section = None;
                for row in &rows {
                    let heading = match row.slot {
                        StageSlot::Funnel(_) => "Acquisition funnel",
                        StageSlot::Bridge => "Bridge",
                        StageSlot::Flywheel(_) => flywheel_heading.as_str(),
                    };
                    if section != Some(heading) {
                        ui.add_space(6.0);
                        ui.label(RichText::new(heading).strong());
                        section = Some(heading);
                    }

                    let text = format!("{}  {}", row.metric_id, row.label);
                    let response = ui.selectable_label(render.is_active(&row.id), text);
                    self.focusable.insert(response.id);
                    if response.clicked() {
                        pending_open = Some((row.id.clone(), response.id));
                    }
                }
            });

        if let Some((id, trigger)) = pending_open {
            self.controller
                .coordinator_mut()
                .open_from(&id, Some(trigger));
        }
    }
}
