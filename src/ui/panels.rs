use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::{snap_to_bounds, Category, RangeSelection, PRICE_STEP, RATING_STEP};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for category in [Category::RoomType, Category::Superhost] {
                category_filter(ui, state, category);
            }
            ui.separator();

            let mut min_guests = state.filters.min_guests;
            let guests = Slider::new(&mut min_guests, state.bounds.guests.clone())
                .text("Number of Guests");
            if ui.add(guests).changed() {
                state.set_min_guests(min_guests);
            }
            ui.separator();

            ui.strong("Price per Night (US$)");
            let bounds = state.bounds.price.clone();
            if let Some((low, high)) = range_sliders(ui, state.filters.price, bounds, PRICE_STEP) {
                state.set_price(low, high);
            }
            ui.separator();

            ui.strong("Rating Score");
            let bounds = state.bounds.rating.clone();
            if let Some((low, high)) = range_sliders(ui, state.filters.rating, bounds, RATING_STEP) {
                state.set_rating(low, high);
            }
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Reset filters").clicked() {
                    state.reset_filters();
                }
                if ui.button("Show all").clicked() {
                    state.clear_filters();
                }
            });
        });
}

/// Checkbox list with All/None buttons for one multi-select control.
fn category_filter(ui: &mut Ui, state: &mut AppState, category: Category) {
    let table = Arc::clone(&state.table);
    let options = category.options(&table);

    // Show count of selected / total in the header
    let n_selected = state.filters.selection(category).len();
    let header_text = format!("{}  ({n_selected}/{})", category.label(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(category.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(category);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(category);
                }
            });

            for value in options {
                let mut checked = state.filters.selection(category).contains(value);

                // Room types carry their map colour
                let mut text = RichText::new(value);
                if category == Category::RoomType {
                    text = text.color(state.color_map.color_for(value));
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(category, value);
                }
            }
        });
}

/// Two sliders for the ends of a range; returns the new ends if either moved.
///
/// The upper end is snapped onto the maximum so it stays selectable.
fn range_sliders(
    ui: &mut Ui,
    current: RangeSelection,
    bounds: RangeInclusive<f64>,
    step: f64,
) -> Option<(f64, f64)> {
    let RangeSelection { mut low, mut high } = current;
    let low_moved = ui
        .add(Slider::new(&mut low, bounds.clone()).step_by(step).text("from"))
        .changed();
    let high_moved = ui
        .add(Slider::new(&mut high, bounds.clone()).step_by(step).text("to"))
        .changed();
    (low_moved || high_moved).then(|| {
        (
            low.clamp(*bounds.start(), *bounds.end()),
            snap_to_bounds(high, &bounds, step),
        )
    })
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong(crate::APP_TITLE);

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match load(&path) {
            Ok(table) => {
                log::info!("Loaded {} listings from {}", table.len(), path.display());
                state.set_table(Arc::new(table));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn load(path: &Path) -> anyhow::Result<crate::data::model::ListingTable> {
    crate::data::loader::load_file(path).with_context(|| format!("loading {}", path.display()))
}
