use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{
    inclusive_filter_state, init_filter_state, Category, ControlBounds, FilterState, RangeSelection,
};
use crate::data::model::ListingTable;
use crate::data::view::{recompute, FilteredView, MapConfig};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One dashboard session: the shared base table plus this session's controls.
pub struct AppState {
    /// Base table; read-only, so it can be shared between sessions.
    pub table: Arc<ListingTable>,

    /// Current control values.
    pub filters: FilterState,

    /// Slider limits derived from the base table.
    pub bounds: ControlBounds,

    /// Indices of listings passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Map of the current view, rebuilt with `visible_indices`.
    pub map: Arc<MapConfig>,

    /// Room type → colour, shared by the checkboxes and the map.
    pub color_map: ColorMap,

    /// Set after each recomputation; the map consumes it and snaps back to
    /// the base table's reference point.
    pub recenter_map: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<ListingTable>) -> Self {
        let filters = init_filter_state(&table);
        let visible_indices = recompute(&table, &filters);
        let map = Arc::new(FilteredView::new(&table, &visible_indices).map_config());
        Self {
            bounds: ControlBounds::of(&table),
            color_map: ColorMap::new(table.room_types()),
            table,
            filters,
            visible_indices,
            map,
            recenter_map: true,
            status_message: None,
        }
    }

    /// Replace the base table and reset every control to its default.
    pub fn set_table(&mut self, table: Arc<ListingTable>) {
        *self = AppState::new(table);
    }

    /// The filtered rows for the two render sinks.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.table, &self.visible_indices)
    }

    /// Recompute `visible_indices` after a control change.
    pub fn refilter(&mut self) {
        self.visible_indices = recompute(&self.table, &self.filters);
        let map = self.view().map_config();
        self.map = Arc::new(map);
        self.recenter_map = true;
    }

    pub fn reset_filters(&mut self) {
        self.filters = init_filter_state(&self.table);
        self.refilter();
    }

    /// Open every control to its full range.
    pub fn clear_filters(&mut self) {
        self.filters = inclusive_filter_state(&self.table);
        self.refilter();
    }

    /// Toggle a single value in a multi-select control.
    pub fn toggle(&mut self, category: Category, value: &str) {
        let selected = self.filters.selection_mut(category);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every option of a multi-select control.
    pub fn select_all(&mut self, category: Category) {
        *self.filters.selection_mut(category) = category.options(&self.table).iter().cloned().collect();
        self.refilter();
    }

    /// Deselect every option of a multi-select control.
    pub fn select_none(&mut self, category: Category) {
        self.filters.selection_mut(category).clear();
        self.refilter();
    }

    pub fn set_min_guests(&mut self, min_guests: u32) {
        self.filters.min_guests = min_guests;
        self.refilter();
    }

    /// Set the price range.  Moving one end past the other drags it along.
    pub fn set_price(&mut self, low: f64, high: f64) {
        self.filters.price = ordered(self.filters.price, low, high);
        self.refilter();
    }

    /// Set the rating range.  Moving one end past the other drags it along.
    pub fn set_rating(&mut self, low: f64, high: f64) {
        self.filters.rating = ordered(self.filters.rating, low, high);
        self.refilter();
    }
}

/// Keep `low <= high`: whichever end moved wins and pushes the other.
fn ordered(previous: RangeSelection, low: f64, high: f64) -> RangeSelection {
    if low <= high {
        RangeSelection::new(low, high)
    } else if low != previous.low {
        RangeSelection::new(low, low)
    } else {
        RangeSelection::new(high, high)
    }
}
