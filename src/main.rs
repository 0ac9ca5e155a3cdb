mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use app::ListingExplorerApp;
use data::model::ListingTable;
use eframe::egui;

const APP_TITLE: &str = "Search Airbnb Amsterdam Listings";

/// Dataset read at startup, relative to the working directory.
const DATASET_PATH: &str = "WK2_Airbnb_Amsterdam_listings_proj_solution.csv";

fn load_dataset(path: &Path) -> anyhow::Result<Arc<ListingTable>> {
    let table = data::loader::load_file(path)
        .with_context(|| format!("loading listings from {}", path.display()))
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;
    log::info!("Loaded {} listings from {}", table.len(), path.display());
    Ok(Arc::new(table))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A dataset that fails to load ends the session before any window opens.
    let table = load_dataset(Path::new(DATASET_PATH))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ListingExplorerApp::new(table)))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
