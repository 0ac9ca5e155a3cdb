use std::sync::Arc;

use eframe::egui::{FontId, TextStyle, Ui};
use egui_plot::{Corner, Legend, Plot, PlotBounds, PlotPoints, Points};

use crate::data::view::{LegendAnchor, MapPoint};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listings map (bottom panel)
// ---------------------------------------------------------------------------

/// Render one point per filtered listing, coloured by room type.
pub fn listings_map(ui: &mut Ui, state: &mut AppState) {
    let config = Arc::clone(&state.map);
    let recenter = std::mem::take(&mut state.recenter_map);
    let color_map = &state.color_map;

    let legend = match config.legend {
        LegendAnchor::TopLeft => Legend::default().position(Corner::LeftTop),
    };

    // Hover labels look up the listing under the cursor by its coordinates.
    let hover = Arc::clone(&config);

    ui.scope(|ui: &mut Ui| {
        ui.style_mut()
            .text_styles
            .insert(TextStyle::Body, FontId::proportional(config.hover_font_size));

        Plot::new("listings_map")
            .legend(legend)
            .height(config.height)
            .data_aspect(config.data_aspect())
            .x_axis_label("longitude")
            .y_axis_label("latitude")
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .label_formatter(move |name, value| {
                if name.is_empty() {
                    return String::new();
                }
                hover
                    .nearest([value.x, value.y])
                    .map(MapPoint::hover_text)
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                if recenter {
                    if let Some((min, max)) = config.viewport() {
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
                    }
                }

                for (room_type, members) in config.series() {
                    let points: PlotPoints = members.iter().map(|p| p.xy()).collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(room_type)
                            .color(color_map.color_for(room_type))
                            .radius(3.0)
                            .filled(true),
                    );
                }
            });
    });
}
