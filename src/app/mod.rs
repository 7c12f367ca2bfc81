use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui::{self, Context, Id, Rect};

use crate::catalog::{BusinessModelId, Stage, StageId, load_catalog};
use crate::config::AppConfig;
use crate::diagram::DiagramController;
use crate::interaction::DetailTicket;

mod desktop;
mod drawer;
mod mobile;
mod render_utils;
mod search;
mod tooltip;
mod ui;

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub catalog_path: Option<PathBuf>,
    pub config: AppConfig,
    pub model: BusinessModelId,
}

pub struct GrowthFlywheelApp {
    options: LaunchOptions,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    controller: DiagramController,
    config: AppConfig,
    search: String,
    search_match_cache: Option<search::SearchMatchCache>,
    focusable: HashSet<Id>,
    last_focusable: HashSet<Id>,
    desktop_hovered: Option<StageId>,
    dismiss_focus_pending: bool,
    drawer_detail: Option<(DetailTicket, Stage)>,
    window_rect: Rect,
}

impl GrowthFlywheelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::load(&options);
        Self { options, state }
    }

    fn load(options: &LaunchOptions) -> AppState {
        match load_catalog(options.catalog_path.as_deref()) {
            Ok(catalog) => {
                tracing::info!(
                    funnel = catalog.funnel.len(),
                    model = %options.model,
                    "stage catalog ready"
                );
                AppState::Ready(Box::new(ViewModel::new(
                    Arc::new(catalog),
                    options.config.clone(),
                    options.model,
                )))
            }
            Err(error) => {
                tracing::error!(error = %format!("{error:#}"), "failed to load stage catalog");
                AppState::Error(format!("{error:#}"))
            }
        }
    }
}

impl eframe::App for GrowthFlywheelApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Ready(model) => model.show(ctx),
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the stage catalog");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::load(&self.options));
                    }
                });
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

fn diagram_root_id() -> Id {
    Id::new("growth_flywheel_diagram")
}
