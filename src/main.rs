use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use growth_flywheel::app::{GrowthFlywheelApp, LaunchOptions};
use growth_flywheel::catalog::{BusinessModelId, load_catalog};
use growth_flywheel::config::{self, AppConfig};
use growth_flywheel::dataset::DatasetSwitcher;
use growth_flywheel::export::write_svg;
use growth_flywheel::geometry::DiagramGeometry;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Stage catalog JSON; the built-in catalog is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Business model shown first (services, ecommerce or subscription).
    #[arg(long)]
    model: Option<BusinessModelId>,

    /// Write the desktop diagram as SVG and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    export_svg: Option<PathBuf>,

    /// Write the default config file and exit.
    #[arg(long)]
    init_config: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.init_config {
        let path = args
            .config
            .clone()
            .or_else(config::config_file_path)
            .context("no config directory available; pass --config")?;
        config::save_to_path(&AppConfig::default(), &path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(());
    }

    let config = config::load_or_default(args.config.as_deref());
    let model = args.model.unwrap_or(config.default_model);

    if let Some(path) = &args.export_svg {
        let catalog = load_catalog(args.catalog.as_deref())?;
        let dataset = DatasetSwitcher::new(Arc::new(catalog), model);
        let geometry = DiagramGeometry::build(
            &config.layout,
            dataset.funnel().len(),
            dataset.flywheel().len(),
        );
        return write_svg(path, &geometry, &dataset);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 860.0]),
        ..Default::default()
    };
    let launch = LaunchOptions {
        catalog_path: args.catalog,
        config,
        model,
    };

    eframe::run_native(
        "Growth flywheel",
        options,
        Box::new(move |cc| Ok(Box::new(GrowthFlywheelApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow!("failed to start the window: {error}"))
}
