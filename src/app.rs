use std::sync::Arc;

use eframe::egui;

use crate::data::model::ListingTable;
use crate::data::view::MAP_HEIGHT;
use crate::state::AppState;
use crate::ui::{map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ListingExplorerApp {
    pub state: AppState,
}

impl ListingExplorerApp {
    pub fn new(table: Arc<ListingTable>) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl eframe::App for ListingExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: map ----
        egui::TopBottomPanel::bottom("map_panel")
            .resizable(true)
            .default_height(MAP_HEIGHT + 40.0)
            .show(ctx, |ui| {
                ui.heading("Map");
                map::listings_map(ui, &mut self.state);
            });

        // ---- Central panel: table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Table");
            table::listings_table(ui, &self.state);
        });
    }
}
