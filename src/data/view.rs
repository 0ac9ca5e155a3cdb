use super::filter::{filtered_indices, FilterState};
use super::model::{DisplayColumn, GeoPoint, Listing, ListingTable};

// ---------------------------------------------------------------------------
// Map layout
// ---------------------------------------------------------------------------

/// Web-mercator style zoom level of the initial map view.
pub const MAP_ZOOM: f64 = 11.0;
pub const MAP_WIDTH: f32 = 800.0;
pub const MAP_HEIGHT: f32 = 500.0;
pub const HOVER_FONT_SIZE: f32 = 14.0;

/// Pixel size of one map tile at zoom 0.
const TILE_SIZE: f64 = 256.0;

// ---------------------------------------------------------------------------
// FilteredView – the filtered subset handed to both render sinks
// ---------------------------------------------------------------------------

/// Total and filtered row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub total: usize,
    pub filtered: usize,
}

/// A borrowed selection of base-table rows, in base order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    table: &'a ListingTable,
    indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a ListingTable, indices: &'a [usize]) -> Self {
        Self { table, indices }
    }

    pub fn counts(&self) -> RowCounts {
        RowCounts {
            total: self.table.len(),
            filtered: self.indices.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `n`-th filtered row.
    pub fn row(&self, n: usize) -> Option<&'a Listing> {
        self.indices.get(n).and_then(|&i| self.table.get(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Listing> + 'a {
        let table = self.table;
        self.indices.iter().filter_map(move |&i| table.get(i))
    }

    /// Columns of the table view; `price_string` is never among them.
    pub fn columns(&self) -> &'a [DisplayColumn] {
        self.table.columns()
    }

    /// Scatter-map configuration for the filtered rows.
    ///
    /// The center is the first row of the *base* table, not of the filtered
    /// rows, so the map does not move while filters change.
    pub fn map_config(&self) -> MapConfig {
        let points = self
            .rows()
            .filter_map(|listing| {
                let position = listing.position()?;
                let room_type = listing.room_type.clone()?;
                Some(MapPoint {
                    position,
                    room_type,
                    hover_name: listing.price_string.clone(),
                    accommodates: listing.accommodates,
                    available_pct: listing.available_pct,
                    five_day_dollar_price: listing.five_day_dollar_price,
                })
            })
            .collect();

        MapConfig {
            points,
            center: self.table.map_center(),
            zoom: MAP_ZOOM,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            legend: LegendAnchor::TopLeft,
            hover_font_size: HOVER_FONT_SIZE,
        }
    }
}

/// Filter `table` and return the matching indices.
pub fn recompute(table: &ListingTable, filters: &FilterState) -> Vec<usize> {
    let indices = filtered_indices(table, filters);
    log::debug!("filtered {} of {} listings", indices.len(), table.len());
    indices
}

// ---------------------------------------------------------------------------
// MapConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendAnchor {
    TopLeft,
}

/// One scatter point with its hover data.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub position: GeoPoint,
    pub room_type: String,
    pub hover_name: String,
    pub accommodates: Option<u32>,
    pub available_pct: Option<f64>,
    pub five_day_dollar_price: Option<f64>,
}

impl MapPoint {
    /// Plot coordinates: x is longitude, y is latitude.
    pub fn xy(&self) -> [f64; 2] {
        [self.position.lon, self.position.lat]
    }

    pub fn hover_text(&self) -> String {
        fn show<T: ToString>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
        }
        format!(
            "{}\nroom_type: {}\naccommodates: {}\navailable_%: {}\nfive_day_dollar_price: {}",
            self.hover_name,
            self.room_type,
            show(self.accommodates),
            show(self.available_pct),
            show(self.five_day_dollar_price),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub points: Vec<MapPoint>,
    pub center: Option<GeoPoint>,
    pub zoom: f64,
    pub width: f32,
    pub height: f32,
    pub legend: LegendAnchor,
    pub hover_font_size: f32,
}

impl MapConfig {
    /// Points grouped by room type, groups in order of first appearance.
    pub fn series(&self) -> Vec<(&str, Vec<&MapPoint>)> {
        let mut groups: Vec<(&str, Vec<&MapPoint>)> = Vec::new();
        for point in &self.points {
            match groups.iter_mut().find(|(name, _)| *name == point.room_type) {
                Some((_, members)) => members.push(point),
                None => groups.push((point.room_type.as_str(), vec![point])),
            }
        }
        groups
    }

    /// Degrees of longitude and latitude covered by the nominal viewport.
    ///
    /// Web-mercator pixels shrink in latitude by `cos(lat)` at the center;
    /// without a center the equator is assumed.
    pub fn span(&self) -> [f64; 2] {
        let degrees_per_pixel = 360.0 / (TILE_SIZE * 2f64.powf(self.zoom));
        [
            self.width as f64 * degrees_per_pixel,
            self.height as f64 * degrees_per_pixel * self.latitude_scale(),
        ]
    }

    /// Plot units of latitude per unit of longitude that keep the map
    /// undistorted around the center.
    pub fn data_aspect(&self) -> f32 {
        (1.0 / self.latitude_scale()) as f32
    }

    fn latitude_scale(&self) -> f64 {
        self.center.map_or(1.0, |c| c.lat.to_radians().cos())
    }

    /// `[min, max]` corners of the initial view around the center.
    pub fn viewport(&self) -> Option<([f64; 2], [f64; 2])> {
        let center = self.center?;
        let [w, h] = self.span();
        Some((
            [center.lon - w / 2.0, center.lat - h / 2.0],
            [center.lon + w / 2.0, center.lat + h / 2.0],
        ))
    }

    /// The point closest to `[lon, lat]`, for hover labels.
    pub fn nearest(&self, xy: [f64; 2]) -> Option<&MapPoint> {
        let dist = |p: &MapPoint| {
            let [x, y] = p.xy();
            (x - xy[0]).powi(2) + (y - xy[1]).powi(2)
        };
        self.points
            .iter()
            .min_by(|a, b| dist(*a).total_cmp(&dist(*b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{inclusive_filter_state, FilterState, RangeSelection};
    use crate::data::model::fixtures::{listing, scenario, table};
    use crate::data::model::PRICE_STRING;

    fn scenario_filters() -> FilterState {
        FilterState {
            room_types: ["Entire home".to_string()].into(),
            superhosts: ["true".to_string()].into(),
            min_guests: 2,
            price: RangeSelection::new(50.0, 200.0),
            rating: RangeSelection::new(4.0, 5.0),
        }
    }

    #[test]
    fn counts_report_total_and_filtered() {
        let table = scenario();
        let indices = recompute(&table, &scenario_filters());
        let view = FilteredView::new(&table, &indices);
        assert_eq!(
            view.counts(),
            RowCounts {
                total: 3,
                filtered: 2
            }
        );
    }

    #[test]
    fn rows_are_base_rows_in_order() {
        let table = scenario();
        let indices = recompute(&table, &scenario_filters());
        let view = FilteredView::new(&table, &indices);

        let rows: Vec<&Listing> = view.rows().collect();
        assert_eq!(rows, vec![&table.listings()[0], &table.listings()[2]]);
        assert_eq!(view.row(1), Some(&table.listings()[2]));
        assert_eq!(view.row(2), None);
    }

    #[test]
    fn table_columns_exclude_price_string() {
        let table = scenario();
        let view = FilteredView::new(&table, &[]);
        assert!(view.columns().iter().all(|c| c.header != PRICE_STRING));
    }

    #[test]
    fn map_has_one_point_per_filtered_row() {
        let table = scenario();
        let indices = recompute(&table, &scenario_filters());
        let config = FilteredView::new(&table, &indices).map_config();

        assert_eq!(config.points.len(), 2);
        let first = &config.points[0];
        assert_eq!(first.xy(), [4.90, 52.37]);
        assert_eq!(first.room_type, "Entire home");
        assert_eq!(first.hover_name, "Price per night: $80");
        assert_eq!(first.accommodates, Some(2));
        assert_eq!(config.legend, LegendAnchor::TopLeft);
        assert_eq!(config.zoom, 11.0);
    }

    #[test]
    fn map_center_ignores_the_filter() {
        let table = scenario();
        let only_last = [2];
        let config = FilteredView::new(&table, &only_last).map_config();
        assert_eq!(
            config.center,
            Some(GeoPoint {
                lat: 52.37,
                lon: 4.90
            })
        );

        let none = FilteredView::new(&table, &[]).map_config();
        assert!(none.points.is_empty());
        assert_eq!(none.center, config.center);
    }

    #[test]
    fn rows_without_coordinates_are_not_plotted() {
        let mut unplaced = listing("Private room", "f", 2, 60.0, 4.2, 0.0, 0.0);
        unplaced.latitude = None;
        let table = table(vec![listing("Entire home", "t", 2, 80.0, 4.5, 52.37, 4.9), unplaced]);
        let indices = recompute(&table, &inclusive_filter_state(&table));
        let view = FilteredView::new(&table, &indices);

        assert_eq!(view.len(), 2);
        assert_eq!(view.map_config().points.len(), 1);
    }

    #[test]
    fn series_group_by_room_type_in_first_appearance_order() {
        let table = table(vec![
            listing("Private room", "f", 2, 60.0, 4.2, 52.36, 4.89),
            listing("Entire home", "t", 2, 80.0, 4.5, 52.37, 4.90),
            listing("Private room", "t", 2, 70.0, 4.4, 52.35, 4.88),
        ]);
        let indices = recompute(&table, &inclusive_filter_state(&table));
        let config = FilteredView::new(&table, &indices).map_config();
        let series = config.series();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "Private room");
        assert_eq!(series[0].1.len(), 2);
        assert_eq!(series[1].0, "Entire home");
    }

    #[test]
    fn viewport_is_centered_on_the_reference_point() {
        let table = scenario();
        let config = FilteredView::new(&table, &[]).map_config();
        let (min, max) = config.viewport().expect("center present");

        assert!(((min[0] + max[0]) / 2.0 - 4.90).abs() < 1e-9);
        assert!(((min[1] + max[1]) / 2.0 - 52.37).abs() < 1e-9);
        let [w, h] = config.span();
        assert!((w - 0.5493).abs() < 1e-3);
        assert!(w > h);
    }

    #[test]
    fn latitude_span_shrinks_with_mercator_scale() {
        let table = scenario();
        let config = FilteredView::new(&table, &[]).map_config();

        let [_, h] = config.span();
        assert!((h - 0.2096).abs() < 1e-3, "latitude span {h}");
        let expected_aspect = 1.0 / 52.37_f64.to_radians().cos();
        assert!((config.data_aspect() as f64 - expected_aspect).abs() < 1e-4);
    }

    #[test]
    fn span_without_center_uses_equator_scale() {
        let mut config = FilteredView::new(&scenario(), &[]).map_config();
        config.center = None;

        let [w, h] = config.span();
        assert!((h / w - 500.0 / 800.0).abs() < 1e-9);
        assert_eq!(config.data_aspect(), 1.0);
        assert!(config.viewport().is_none());
    }

    #[test]
    fn nearest_point_drives_the_hover_label() {
        let table = scenario();
        let indices = [0, 1, 2];
        let config = FilteredView::new(&table, &indices).map_config();

        let hit = config.nearest([4.889, 52.361]).expect("points present");
        assert_eq!(hit.hover_name, "Price per night: $40");
        let text = hit.hover_text();
        assert!(text.starts_with("Price per night: $40\n"));
        assert!(text.contains("accommodates: 1"));
        assert!(text.contains("available_%: 0.5"));
        assert!(text.contains("five_day_dollar_price: 200"));
    }
}
