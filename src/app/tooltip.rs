use eframe::egui::{self, Context, Id, Order, RichText, vec2};

use super::ViewModel;

const TOOLTIP_OFFSET: f32 = 14.0;
const TOOLTIP_WIDTH: f32 = 280.0;

impl ViewModel {
    pub(in crate::app) fn show_tooltip(&self, ctx: &Context) {
        let render = self.controller.coordinator().render_state();
        let Some((stage_id, position)) = render.tooltip() else {
            return;
        };
        let Some(stage) = self.controller.stage(stage_id) else {
            return;
        };

        egui::Area::new(Id::new("stage_tooltip"))
            .order(Order::Tooltip)
            .fixed_pos(position + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(TOOLTIP_WIDTH);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(stage.metric_id.as_str()).monospace().weak());
                        ui.label(RichText::new(stage.label.as_str()).strong());
                    });
                    if !stage.definition.is_empty() {
                        ui.label(stage.definition.as_str());
                    }
                    if !stage.insight.is_empty() {
                        ui.add_space(4.0);
                        ui.label(RichText::new(stage.insight.as_str()).italics());
                    }
                    ui.add_space(4.0);
                    ui.weak("Click for details");
                });
            });
    }
}
