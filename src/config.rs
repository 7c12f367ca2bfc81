use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use eframe::egui::{Pos2, pos2};
use serde::{Deserialize, Serialize};

use crate::catalog::BusinessModelId;
use crate::interaction::{Easing, TransitionTimings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub design_width: f32,
    pub design_height: f32,
    pub funnel_x: f32,
    pub funnel_y: f32,
    pub funnel_width: f32,
    pub funnel_height: f32,
    pub taper: f32,
    pub funnel_label_offset: f32,
    pub bridge_node_radius: f32,
    pub bridge_arrow_size: f32,
    pub bridge_clearance: f32,
    pub flywheel_center_x: f32,
    pub flywheel_center_y: f32,
    pub flywheel_inner_radius: f32,
    pub flywheel_outer_radius: f32,
    pub sector_gap_deg: f32,
    pub flywheel_start_deg: f32,
    pub flywheel_label_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            design_width: 1180.0,
            design_height: 470.0,
            funnel_x: 40.0,
            funnel_y: 105.0,
            funnel_width: 520.0,
            funnel_height: 260.0,
            taper: 0.65,
            funnel_label_offset: 22.0,
            bridge_node_radius: 26.0,
            bridge_arrow_size: 11.0,
            bridge_clearance: 8.0,
            flywheel_center_x: 900.0,
            flywheel_center_y: 235.0,
            flywheel_inner_radius: 92.0,
            flywheel_outer_radius: 150.0,
            sector_gap_deg: 1.2,
            flywheel_start_deg: 0.0,
            flywheel_label_offset: 18.0,
        }
    }
}

impl LayoutConfig {
    pub fn funnel_origin(&self) -> Pos2 {
        pos2(self.funnel_x, self.funnel_y)
    }

    pub fn flywheel_center(&self) -> Pos2 {
        pos2(self.flywheel_center_x, self.flywheel_center_y)
    }

    /// Replaces non-finite values with their defaults and returns the names
    /// of the fields that were replaced.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let defaults = Self::default();
        let fields = [
            ("design_width", &mut self.design_width, defaults.design_width),
            ("design_height", &mut self.design_height, defaults.design_height),
            ("funnel_x", &mut self.funnel_x, defaults.funnel_x),
            ("funnel_y", &mut self.funnel_y, defaults.funnel_y),
            ("funnel_width", &mut self.funnel_width, defaults.funnel_width),
            ("funnel_height", &mut self.funnel_height, defaults.funnel_height),
            ("taper", &mut self.taper, defaults.taper),
            (
                "funnel_label_offset",
                &mut self.funnel_label_offset,
                defaults.funnel_label_offset,
            ),
            (
                "bridge_node_radius",
                &mut self.bridge_node_radius,
                defaults.bridge_node_radius,
            ),
            (
                "bridge_arrow_size",
                &mut self.bridge_arrow_size,
                defaults.bridge_arrow_size,
            ),
            (
                "bridge_clearance",
                &mut self.bridge_clearance,
                defaults.bridge_clearance,
            ),
            (
                "flywheel_center_x",
                &mut self.flywheel_center_x,
                defaults.flywheel_center_x,
            ),
            (
                "flywheel_center_y",
                &mut self.flywheel_center_y,
                defaults.flywheel_center_y,
            ),
            (
                "flywheel_inner_radius",
                &mut self.flywheel_inner_radius,
                defaults.flywheel_inner_radius,
            ),
            (
                "flywheel_outer_radius",
                &mut self.flywheel_outer_radius,
                defaults.flywheel_outer_radius,
            ),
            ("sector_gap_deg", &mut self.sector_gap_deg, defaults.sector_gap_deg),
            (
                "flywheel_start_deg",
                &mut self.flywheel_start_deg,
                defaults.flywheel_start_deg,
            ),
            (
                "flywheel_label_offset",
                &mut self.flywheel_label_offset,
                defaults.flywheel_label_offset,
            ),
        ];

        let mut replaced = Vec::new();
        for (name, value, fallback) in fields {
            if !value.is_finite() {
                *value = fallback;
                replaced.push(name);
            }
        }
        replaced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Windows narrower than this (logical points) use the list presentation.
    pub mobile_breakpoint: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 760.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub hover_ms: u64,
    pub drawer_ms: u64,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        let timings = TransitionTimings::default();
        Self {
            hover_ms: timings.hover.as_millis() as u64,
            drawer_ms: timings.drawer.as_millis() as u64,
            easing: timings.easing,
        }
    }
}

impl TransitionConfig {
    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings {
            hover: Duration::from_millis(self.hover_ms),
            drawer: Duration::from_millis(self.drawer_ms),
            easing: self.easing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_model: BusinessModelId,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub transitions: TransitionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_model: BusinessModelId::Services,
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
            transitions: TransitionConfig::default(),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "growth-flywheel")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Explicit paths win over the platform config directory. Missing or invalid
/// files fall back to defaults.
pub fn load_or_default(explicit: Option<&Path>) -> AppConfig {
    match explicit {
        Some(path) => load_or_default_from_path(path),
        None => match config_file_path() {
            Some(path) => load_or_default_from_path(&path),
            None => AppConfig::default(),
        },
    }
}

fn load_or_default_from_path(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "no config file, using defaults");
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(mut config) => {
            let replaced = config.layout.sanitize();
            if !replaced.is_empty() {
                tracing::warn!(
                    path = %path.display(),
                    fields = ?replaced,
                    "non-finite layout values, using defaults for them"
                );
            }
            if !config.viewport.mobile_breakpoint.is_finite() {
                tracing::warn!(path = %path.display(), "non-finite mobile breakpoint, using default");
                config.viewport.mobile_breakpoint = ViewportConfig::default().mobile_breakpoint;
            }
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "invalid config, using defaults");
            AppConfig::default()
        }
    }
}

pub fn save_to_path(cfg: &AppConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize config")?;
    fs::write(path, data).with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}
