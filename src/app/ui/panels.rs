use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Key, Layout, Rect};

use crate::catalog::{BusinessModelId, StageCatalog};
use crate::config::AppConfig;
use crate::diagram::{DiagramController, Presentation};
use crate::interaction::{FocusRequest, TracingSink};

use super::super::{ViewModel, diagram_root_id};

impl ViewModel {
    pub(in crate::app) fn new(
        catalog: Arc<StageCatalog>,
        config: AppConfig,
        model: BusinessModelId,
    ) -> Self {
        let controller = DiagramController::new(
            catalog,
            model,
            Rc::new(TracingSink),
            config.transitions.timings(),
        );

        Self {
            controller,
            config,
            search: String::new(),
            search_match_cache: None,
            focusable: HashSet::new(),
            last_focusable: HashSet::new(),
            desktop_hovered: None,
            dismiss_focus_pending: false,
            drawer_detail: None,
            window_rect: Rect::NOTHING,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.window_rect = ctx.available_rect();
        self.last_focusable = std::mem::take(&mut self.focusable);

        let drawer_open = self.controller.coordinator().state().open().is_some();
        if drawer_open && ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.controller.coordinator_mut().escape_key();
        }

        let presentation = Presentation::for_width(
            self.window_rect.width(),
            self.config.viewport.mobile_breakpoint,
        );
        if presentation == Presentation::Mobile
            && let Some(previous) = self.desktop_hovered.take()
        {
            self.controller.coordinator_mut().leave(&previous);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Growth flywheel");
                    ui.separator();
                    let model_label = self
                        .controller
                        .dataset()
                        .model_info()
                        .map(|model| model.label.clone())
                        .unwrap_or_else(|| self.controller.model().to_string());
                    ui.label(format!("model: {model_label}"));
                    ui.label(format!(
                        "funnel stages: {}",
                        self.controller.dataset().funnel().len()
                    ));
                    ui.label(format!(
                        "flywheel metrics: {}",
                        self.controller.dataset().flywheel().len()
                    ));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let layout = match presentation {
                            Presentation::Desktop => "diagram",
                            Presentation::Mobile => "list",
                        };
                        ui.weak(format!("layout: {layout}"));
                    });
                });
            });

        if presentation == Presentation::Desktop {
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_controls(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| match presentation {
            Presentation::Desktop => self.draw_desktop(ui),
            Presentation::Mobile => self.draw_mobile(ui),
        });

        self.show_tooltip(ctx);
        self.drain_focus_request(ctx);
        self.show_drawer(ctx);
        self.drain_focus_request(ctx);
    }

    fn drain_focus_request(&mut self, ctx: &Context) {
        let Some(request) = self.controller.coordinator_mut().take_focus_request() else {
            return;
        };

        match request {
            FocusRequest::DrawerDismiss => self.dismiss_focus_pending = true,
            FocusRequest::Restore(restore) => {
                self.dismiss_focus_pending = false;
                let target = restore.resolve(
                    |id| self.focusable.contains(&id) || self.last_focusable.contains(&id),
                    diagram_root_id(),
                );
                ctx.memory_mut(|memory| memory.request_focus(target));
            }
        }
    }
}
