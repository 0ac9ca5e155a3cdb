use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listings table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered listings, one row per listing.
pub fn listings_table(ui: &mut Ui, state: &AppState) {
    let view = state.view();
    let counts = view.counts();

    ui.label(format!("Total Number of Listings: {}", counts.total));
    ui.label(format!("Number of Filtered Listings: {}", counts.filtered));
    ui.add_space(4.0);

    if view.is_empty() {
        ui.label("No listings match the current filters.");
        return;
    }

    let columns = view.columns();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .columns(Column::auto().at_least(48.0), columns.len())
            .header(20.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.header.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, view.len(), |mut row| {
                    let Some(listing) = view.row(row.index()) else {
                        return;
                    };
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(listing.cell_text(col.column));
                        });
                    }
                });
            });
    });
}
