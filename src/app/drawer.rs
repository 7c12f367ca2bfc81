use eframe::egui::{
    self, Align, Color32, Context, Id, Layout, Order, Rect, RichText, Sense, Ui, pos2,
};

use crate::catalog::{Stage, StageId};
use crate::dataset::DatasetSwitcher;
use crate::diagram::DiagramController;
use crate::interaction::DetailTicket;

use super::ViewModel;

const DRAWER_WIDTH: f32 = 420.0;
const BACKDROP_ALPHA: f32 = 140.0;

enum DrawerAction {
    Close,
    Open(StageId),
}

impl ViewModel {
    pub(in crate::app) fn show_drawer(&mut self, ctx: &Context) {
        let coordinator = self.controller.coordinator();
        let open = coordinator.state().open().is_some();
        let (duration, easing) = coordinator.drawer_motion();
        let progress = ctx.animate_bool_with_time(
            Id::new("stage_drawer_progress"),
            open,
            duration.as_secs_f32(),
        );
        if !open {
            self.drawer_detail = None;
            return;
        }
        if progress < 1.0 {
            ctx.request_repaint();
        }

        refresh_detail(&mut self.drawer_detail, &self.controller);
        let Some((_, stage)) = &self.drawer_detail else {
            return;
        };

        let eased = easing.apply(progress);
        let window = self.window_rect;
        let width = DRAWER_WIDTH.min(window.width() * 0.92);
        let dataset = self.controller.dataset();
        let mut action = None;

        egui::Area::new(Id::new("stage_drawer_backdrop"))
            .order(Order::Middle)
            .fixed_pos(window.min)
            .show(ctx, |ui| {
                let backdrop = Rect::from_min_size(window.min, window.size());
                let response = ui.allocate_rect(backdrop, Sense::click());
                ui.painter().rect_filled(
                    backdrop,
                    0.0,
                    Color32::from_black_alpha((BACKDROP_ALPHA * eased) as u8),
                );
                if response.clicked() {
                    action = Some(DrawerAction::Close);
                }
            });

        let left = window.right() - width * eased;
        egui::Area::new(Id::new("stage_drawer"))
            .order(Order::Foreground)
            .fixed_pos(pos2(left, window.top()))
            .show(ctx, |ui| {
                egui::Frame::window(ui.style()).show(ui, |ui| {
                    ui.set_width(width);
                    ui.set_min_height(window.height() - 16.0);

                    ui.horizontal(|ui| {
                        ui.label(RichText::new(stage.metric_id.as_str()).monospace().weak());
                        ui.heading(stage.label.as_str());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let dismiss = ui.button("Close");
                            if self.dismiss_focus_pending {
                                dismiss.request_focus();
                                self.dismiss_focus_pending = false;
                            }
                            if dismiss.clicked() {
                                action = Some(DrawerAction::Close);
                            }
                        });
                    });
                    ui.separator();

                    egui::ScrollArea::vertical()
                        .id_salt("stage_drawer_scroll")
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            if let Some(next) = draw_stage_detail(ui, dataset, stage) {
                                action = Some(DrawerAction::Open(next));
                            }
                        });
                });
            });

        match action {
            Some(DrawerAction::Close) => self.controller.coordinator_mut().close_drawer(),
            Some(DrawerAction::Open(id)) => self.controller.coordinator_mut().open(&id),
            None => {}
        }
    }
}

/// Keeps the resolved stage while its ticket is current and re-resolves it
/// once the coordinator has moved on.
fn refresh_detail(cached: &mut Option<(DetailTicket, Stage)>, controller: &DiagramController) {
    let coordinator = controller.coordinator();
    if cached
        .as_ref()
        .is_some_and(|(ticket, _)| coordinator.accepts(ticket))
    {
        return;
    }
    *cached = coordinator.detail_ticket().and_then(|ticket| {
        let stage = controller.stage(&ticket.stage_id)?.clone();
        Some((ticket, stage))
    });
}

fn draw_stage_detail(ui: &mut Ui, dataset: &DatasetSwitcher, stage: &Stage) -> Option<StageId> {
    let sections = [
        ("Definition", &stage.definition),
        ("Why it matters", &stage.insight),
        ("Where it leaks", &stage.leakage),
        ("How to activate", &stage.activation),
        ("Next step", &stage.next_step),
        ("Bitrix24 object", &stage.bitrix_object),
    ];
    for (title, body) in sections {
        if body.is_empty() {
            continue;
        }
        ui.label(RichText::new(title).strong());
        ui.label(body.as_str());
        ui.add_space(6.0);
    }

    if !stage.examples.is_empty() {
        ui.label(RichText::new("Examples").strong());
        for example in &stage.examples {
            ui.label(format!("- {example}"));
        }
        ui.add_space(6.0);
    }

    let connections = stage.connections.as_ref()?;
    let mut next = None;
    for (title, references) in [
        ("Upstream", &connections.upstream),
        ("Downstream", &connections.downstream),
    ] {
        if references.is_empty() {
            continue;
        }
        ui.label(RichText::new(title).strong());
        ui.horizontal_wrapped(|ui| {
            for reference in references {
                match dataset.resolve_reference(reference) {
                    Some(target) => {
                        if ui
                            .link(target.label.as_str())
                            .on_hover_text(target.metric_id.as_str())
                            .clicked()
                        {
                            next = Some(target.id.clone());
                        }
                    }
                    None => {
                        ui.label(reference.as_str());
                    }
                }
            }
        });
    }
    next
}
