use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{Listing, ListingTable};

// ---------------------------------------------------------------------------
// Control defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_MIN_GUESTS: u32 = 2;
pub const DEFAULT_MIN_PRICE: f64 = 50.0;
pub const DEFAULT_MIN_RATING: f64 = 4.0;

pub const PRICE_STEP: f64 = 25.0;
pub const RATING_STEP: f64 = 0.1;

// ---------------------------------------------------------------------------
// Control values
// ---------------------------------------------------------------------------

/// Closed interval `[low, high]`.  `low > high` selects nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelection {
    pub low: f64,
    pub high: f64,
}

impl RangeSelection {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `NaN` is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The two multi-select controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    RoomType,
    Superhost,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::RoomType => "Room Type",
            Category::Superhost => "Host is Superhost",
        }
    }

    /// Every option the dataset offers for this control.
    pub fn options(self, table: &ListingTable) -> &[String] {
        match self {
            Category::RoomType => table.room_types(),
            Category::Superhost => table.superhost_values(),
        }
    }
}

/// Current value of every control.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub room_types: BTreeSet<String>,
    pub superhosts: BTreeSet<String>,
    pub min_guests: u32,
    pub price: RangeSelection,
    pub rating: RangeSelection,
}

impl FilterState {
    pub fn selection(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::RoomType => &self.room_types,
            Category::Superhost => &self.superhosts,
        }
    }

    pub fn selection_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::RoomType => &mut self.room_types,
            Category::Superhost => &mut self.superhosts,
        }
    }

    /// One predicate per control.  A row is kept only if all of them hold.
    pub fn predicates(&self) -> [Predicate<'_>; 5] {
        [
            Predicate::RoomType(&self.room_types),
            Predicate::Superhost(&self.superhosts),
            Predicate::MinGuests(self.min_guests),
            Predicate::Price(self.price),
            Predicate::Rating(self.rating),
        ]
    }
}

// ---------------------------------------------------------------------------
// Control bounds, derived from the data's extrema
// ---------------------------------------------------------------------------

/// Slider limits for the numeric controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBounds {
    pub guests: RangeInclusive<u32>,
    pub price: RangeInclusive<f64>,
    pub rating: RangeInclusive<f64>,
}

impl ControlBounds {
    pub fn of(table: &ListingTable) -> Self {
        let stats = table.stats();
        ControlBounds {
            guests: 1..=stats.max_accommodates.max(1),
            price: 0.0..=stats.max_price,
            rating: stats.min_rating..=stats.max_rating,
        }
    }
}

/// Pull a stepped slider value onto the range ends.
///
/// Slider steps are multiples of `step` and usually miss the observed
/// maximum; anything within one step of an end, or past it, becomes that end.
pub fn snap_to_bounds(value: f64, bounds: &RangeInclusive<f64>, step: f64) -> f64 {
    let (start, end) = (*bounds.start(), *bounds.end());
    if value > end - step {
        end
    } else if value < start {
        start
    } else {
        value
    }
}

/// Initial control values: every category selected, at least
/// [`DEFAULT_MIN_GUESTS`] guests, price from [`DEFAULT_MIN_PRICE`] and rating
/// from [`DEFAULT_MIN_RATING`] up to the observed maxima.
///
/// Defaults outside the observed bounds are pulled back inside them.
pub fn init_filter_state(table: &ListingTable) -> FilterState {
    let bounds = ControlBounds::of(table);
    let (price_max, rating_min, rating_max) =
        (*bounds.price.end(), *bounds.rating.start(), *bounds.rating.end());

    FilterState {
        room_types: table.room_types().iter().cloned().collect(),
        superhosts: table.superhost_values().iter().cloned().collect(),
        min_guests: DEFAULT_MIN_GUESTS.min(*bounds.guests.end()),
        price: RangeSelection::new(DEFAULT_MIN_PRICE.min(price_max), price_max),
        rating: RangeSelection::new(DEFAULT_MIN_RATING.max(rating_min).min(rating_max), rating_max),
    }
}

/// Every control opened to its full range.
pub fn inclusive_filter_state(table: &ListingTable) -> FilterState {
    let bounds = ControlBounds::of(table);
    FilterState {
        room_types: table.room_types().iter().cloned().collect(),
        superhosts: table.superhost_values().iter().cloned().collect(),
        min_guests: *bounds.guests.start(),
        price: RangeSelection::new(*bounds.price.start(), *bounds.price.end()),
        rating: RangeSelection::new(*bounds.rating.start(), *bounds.rating.end()),
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A per-row test for one control.  A missing value never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<'a> {
    RoomType(&'a BTreeSet<String>),
    Superhost(&'a BTreeSet<String>),
    MinGuests(u32),
    Price(RangeSelection),
    Rating(RangeSelection),
}

impl Predicate<'_> {
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Predicate::RoomType(selected) => is_selected(selected, &listing.room_type),
            Predicate::Superhost(selected) => is_selected(selected, &listing.host_is_superhost),
            Predicate::MinGuests(min) => listing.accommodates.is_some_and(|n| n >= *min),
            Predicate::Price(range) => range.contains(listing.price_in_dollar),
            Predicate::Rating(range) => listing
                .review_scores_rating
                .is_some_and(|r| range.contains(r)),
        }
    }
}

fn is_selected(selected: &BTreeSet<String>, value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| selected.contains(v))
}

/// Indices of listings that satisfy every control, in table order.
pub fn filtered_indices(table: &ListingTable, filters: &FilterState) -> Vec<usize> {
    matching_indices(table, &filters.predicates())
}

/// Indices of listings that satisfy all of `predicates`, in table order.
pub fn matching_indices(table: &ListingTable, predicates: &[Predicate<'_>]) -> Vec<usize> {
    table
        .listings()
        .iter()
        .enumerate()
        .filter(|(_, listing)| predicates.iter().all(|p| p.matches(listing)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{listing, scenario, table};

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn scenario_controls() -> FilterState {
        FilterState {
            room_types: set(&["Entire home"]),
            superhosts: set(&["true"]),
            min_guests: 2,
            price: RangeSelection::new(50.0, 200.0),
            rating: RangeSelection::new(4.0, 5.0),
        }
    }

    fn varied_table() -> ListingTable {
        table(vec![
            listing("Entire home", "t", 2, 80.0, 4.5, 52.37, 4.90),
            listing("Private room", "f", 1, 40.0, 3.9, 52.36, 4.89),
            listing("Entire home", "t", 4, 150.0, 4.8, 52.35, 4.91),
            listing("Hotel room", "f", 6, 300.0, 4.1, 52.38, 4.92),
            listing("Shared room", "t", 6, 25.0, 5.0, 52.34, 4.87),
            listing("Private room", "t", 3, 95.5, 4.0, 52.33, 4.86),
        ])
    }

    #[test]
    fn scenario_keeps_first_and_third_rows() {
        let table = scenario();
        assert_eq!(filtered_indices(&table, &scenario_controls()), vec![0, 2]);
    }

    #[test]
    fn defaults_select_everything_and_clamp_to_data() {
        let table = scenario();
        let filters = init_filter_state(&table);

        assert_eq!(filters.room_types, set(&["Entire home", "Private room"]));
        assert_eq!(filters.superhosts, set(&["true", "false"]));
        assert_eq!(filters.min_guests, 2);
        assert_eq!(filters.price, RangeSelection::new(50.0, 150.0));
        assert_eq!(filters.rating, RangeSelection::new(4.0, 4.8));
    }

    #[test]
    fn defaults_outside_observed_bounds_are_pulled_in() {
        let table = table(vec![
            listing("Private room", "f", 1, 30.0, 3.0, 52.0, 4.0),
            listing("Private room", "f", 1, 45.0, 3.5, 52.0, 4.0),
        ]);
        let filters = init_filter_state(&table);

        assert_eq!(filters.min_guests, 1);
        assert_eq!(filters.price, RangeSelection::new(45.0, 45.0));
        assert_eq!(filters.rating, RangeSelection::new(3.5, 3.5));
    }

    #[test]
    fn bounds_follow_observed_extrema() {
        let bounds = ControlBounds::of(&varied_table());
        assert_eq!(bounds.guests, 1..=6);
        assert_eq!(bounds.price, 0.0..=300.0);
        assert_eq!(bounds.rating, 3.9..=5.0);
    }

    #[test]
    fn inclusive_controls_keep_every_row() {
        let table = varied_table();
        let filters = inclusive_filter_state(&table);
        assert_eq!(filtered_indices(&table, &filters), (0..table.len()).collect::<Vec<_>>());
    }

    #[test]
    fn result_is_an_ordered_subset_of_the_base_rows() {
        let table = varied_table();
        let mut filters = init_filter_state(&table);
        filters.rating = RangeSelection::new(4.0, 4.8);
        let indices = filtered_indices(&table, &filters);

        assert!(indices.len() <= table.len());
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        for &i in &indices {
            assert!(filters.predicates().iter().all(|p| p.matches(&table.listings()[i])));
        }
    }

    #[test]
    fn predicate_order_does_not_matter() {
        let table = varied_table();
        let filters = init_filter_state(&table);
        let predicates = filters.predicates();
        let expected = matching_indices(&table, &predicates);

        let mut reversed = predicates.to_vec();
        reversed.reverse();
        assert_eq!(matching_indices(&table, &reversed), expected);

        let rotated: Vec<_> = predicates.iter().cycle().skip(2).take(5).cloned().collect();
        assert_eq!(matching_indices(&table, &rotated), expected);
    }

    #[test]
    fn recomputing_is_idempotent() {
        let table = varied_table();
        let filters = init_filter_state(&table);
        assert_eq!(filtered_indices(&table, &filters), filtered_indices(&table, &filters));
    }

    #[test]
    fn min_guests_at_maximum_keeps_only_the_largest() {
        let table = varied_table();
        let mut filters = inclusive_filter_state(&table);
        filters.min_guests = table.stats().max_accommodates;

        let indices = filtered_indices(&table, &filters);
        assert_eq!(indices, vec![3, 4]);
        for i in indices {
            assert_eq!(table.listings()[i].accommodates, Some(6));
        }
    }

    #[test]
    fn empty_category_selection_yields_nothing() {
        let table = varied_table();
        let mut filters = inclusive_filter_state(&table);
        filters.room_types.clear();
        assert!(filtered_indices(&table, &filters).is_empty());

        let mut filters = inclusive_filter_state(&table);
        filters.superhosts.clear();
        assert!(filtered_indices(&table, &filters).is_empty());
    }

    #[test]
    fn degenerate_range_matches_exactly() {
        let table = varied_table();
        let mut filters = inclusive_filter_state(&table);
        filters.price = RangeSelection::new(150.0, 150.0);
        assert_eq!(filtered_indices(&table, &filters), vec![2]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let table = varied_table();
        let mut filters = inclusive_filter_state(&table);
        filters.rating = RangeSelection::new(4.8, 4.0);
        assert!(filtered_indices(&table, &filters).is_empty());
    }

    #[test]
    fn missing_values_never_match() {
        let mut unrated = listing("Entire home", "t", 2, 80.0, 0.0, 52.0, 4.0);
        unrated.review_scores_rating = None;
        let mut no_host = listing("Entire home", "t", 2, 80.0, 4.5, 52.0, 4.0);
        no_host.host_is_superhost = None;
        let mut no_guests = listing("Entire home", "t", 2, 80.0, 4.5, 52.0, 4.0);
        no_guests.accommodates = None;
        let complete = listing("Entire home", "t", 2, 80.0, 4.5, 52.0, 4.0);

        let table = table(vec![unrated, no_host, no_guests, complete]);
        let filters = inclusive_filter_state(&table);
        assert_eq!(filtered_indices(&table, &filters), vec![3]);
    }

    #[test]
    fn nan_never_falls_inside_a_range() {
        let range = RangeSelection::new(f64::NEG_INFINITY, f64::INFINITY);
        assert!(!range.contains(f64::NAN));
        assert!(range.contains(0.0));
    }

    #[test]
    fn stepped_values_reach_the_observed_maximum() {
        let price = 0.0..=487.0;
        assert_eq!(snap_to_bounds(475.0, &price, PRICE_STEP), 487.0);
        assert_eq!(snap_to_bounds(500.0, &price, PRICE_STEP), 487.0);
        assert_eq!(snap_to_bounds(450.0, &price, PRICE_STEP), 450.0);
        assert_eq!(snap_to_bounds(-25.0, &price, PRICE_STEP), 0.0);

        let rating = 3.9..=4.97;
        assert_eq!(snap_to_bounds(4.9, &rating, RATING_STEP), 4.97);
        assert_eq!(snap_to_bounds(4.8, &rating, RATING_STEP), 4.8);
    }

    #[test]
    fn snapped_maximum_keeps_the_priciest_listing() {
        let table = table(vec![
            listing("Entire home", "t", 2, 80.0, 4.5, 52.37, 4.90),
            listing("Entire home", "t", 2, 487.0, 4.5, 52.37, 4.90),
        ]);
        let bounds = ControlBounds::of(&table);
        let mut filters = inclusive_filter_state(&table);

        // The largest multiple of the step below the maximum.
        filters.price.high = snap_to_bounds(475.0, &bounds.price, PRICE_STEP);
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1]);
    }

    #[test]
    fn category_options_come_from_the_table() {
        let table = scenario();
        assert_eq!(Category::RoomType.options(&table), ["Entire home", "Private room"]);
        assert_eq!(Category::Superhost.options(&table), ["true", "false"]);
    }
}
