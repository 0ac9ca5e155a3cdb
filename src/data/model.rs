use super::error::DataLoadError;

// ---------------------------------------------------------------------------
// Column names of the source file
// ---------------------------------------------------------------------------

pub const ROOM_TYPE: &str = "room_type";
pub const HOST_IS_SUPERHOST: &str = "host_is_superhost";
pub const ACCOMMODATES: &str = "accommodates";
pub const PRICE_IN_DOLLAR: &str = "price_in_dollar";
pub const REVIEW_SCORES_RATING: &str = "review_scores_rating";
pub const AVAILABLE: &str = "available";
pub const FIVE_DAY_DOLLAR_PRICE: &str = "five_day_dollar_price";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Display header of the renamed `available` column.
pub const AVAILABLE_PCT: &str = "available_%";

/// Helper column that only feeds the map hover label.
pub const PRICE_STRING: &str = "price_string";

const PRICE_LABEL_PREFIX: &str = "Price per night: $";

/// Map label for a nightly price. The price is truncated, never rounded.
pub fn price_label(price: f64) -> String {
    format!("{PRICE_LABEL_PREFIX}{}", price.trunc() as i64)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Listing – one row of the base table
// ---------------------------------------------------------------------------

/// A single rental listing with typed columns.
///
/// `None` marks a missing cell. Missing values never satisfy a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Row label (first CSV column, or the row ordinal for JSON input).
    pub index: String,
    pub room_type: Option<String>,
    /// Raw text as found in the source, e.g. `t`/`f` or `True`/`False`.
    pub host_is_superhost: Option<String>,
    pub accommodates: Option<u32>,
    pub price_in_dollar: f64,
    pub review_scores_rating: Option<f64>,
    /// `available`, rounded to 2 decimals.
    pub available_pct: Option<f64>,
    /// Rounded to 2 decimals.
    pub five_day_dollar_price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Derived from `price_in_dollar` at load time.
    pub price_string: String,
    /// Non-schema columns, aligned with [`Column::Extra`] indices.
    pub extra: Vec<Option<String>>,
}

impl Listing {
    /// Text shown in the table for one display column.
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Index => self.index.clone(),
            Column::RoomType => self.room_type.clone().unwrap_or_default(),
            Column::Superhost => self.host_is_superhost.clone().unwrap_or_default(),
            Column::Accommodates => self
                .accommodates
                .map(|n| n.to_string())
                .unwrap_or_default(),
            Column::Price => self.price_in_dollar.to_string(),
            Column::Rating => number_text(self.review_scores_rating),
            Column::AvailablePct => number_text(self.available_pct),
            Column::FiveDayPrice => number_text(self.five_day_dollar_price),
            Column::Latitude => number_text(self.latitude),
            Column::Longitude => number_text(self.longitude),
            Column::Extra(i) => self.extra.get(i).cloned().flatten().unwrap_or_default(),
        }
    }

    /// Coordinates, if both are present.
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            lat: self.latitude?,
            lon: self.longitude?,
        })
    }
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Display layout
// ---------------------------------------------------------------------------

/// Which field of a [`Listing`] a table column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Index,
    RoomType,
    Superhost,
    Accommodates,
    Price,
    Rating,
    AvailablePct,
    FiveDayPrice,
    Latitude,
    Longitude,
    Extra(usize),
}

/// A table column: header text plus the field it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayColumn {
    pub header: String,
    pub column: Column,
}

impl DisplayColumn {
    pub fn new(header: impl Into<String>, column: Column) -> Self {
        Self {
            header: header.into(),
            column,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnStats – observed extrema that bound the controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub max_accommodates: u32,
    pub max_price: f64,
    pub min_rating: f64,
    pub max_rating: f64,
}

impl ColumnStats {
    fn observe(listings: &[Listing]) -> Result<Self, DataLoadError> {
        let max_accommodates = listings
            .iter()
            .filter_map(|l| l.accommodates)
            .max()
            .ok_or_else(|| DataLoadError::EmptyColumn(ACCOMMODATES.to_string()))?;

        let max_price = listings
            .iter()
            .map(|l| l.price_in_dollar)
            .fold(f64::NEG_INFINITY, f64::max);

        let (min_rating, max_rating) = listings
            .iter()
            .filter_map(|l| l.review_scores_rating)
            .fold(None, |acc: Option<(f64, f64)>, r| match acc {
                None => Some((r, r)),
                Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
            })
            .ok_or_else(|| DataLoadError::EmptyColumn(REVIEW_SCORES_RATING.to_string()))?;

        Ok(ColumnStats {
            max_accommodates,
            max_price,
            min_rating,
            max_rating,
        })
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the immutable base table
// ---------------------------------------------------------------------------

/// The complete loaded dataset. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingTable {
    listings: Vec<Listing>,
    columns: Vec<DisplayColumn>,
    room_types: Vec<String>,
    superhost_values: Vec<String>,
    stats: ColumnStats,
}

impl ListingTable {
    /// Index the category options and extrema of `listings`.
    ///
    /// Fails on an empty row set, or when a numeric control column has no
    /// value at all to derive slider bounds from.
    pub fn new(listings: Vec<Listing>, columns: Vec<DisplayColumn>) -> Result<Self, DataLoadError> {
        if listings.is_empty() {
            return Err(DataLoadError::NoRows);
        }
        let stats = ColumnStats::observe(&listings)?;
        let room_types = distinct_in_order(listings.iter().map(|l| l.room_type.as_deref()));
        let superhost_values =
            distinct_in_order(listings.iter().map(|l| l.host_is_superhost.as_deref()));

        Ok(ListingTable {
            listings,
            columns,
            room_types,
            superhost_values,
            stats,
        })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, index: usize) -> Option<&Listing> {
        self.listings.get(index)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Table columns in file order, without the `price_string` helper.
    pub fn columns(&self) -> &[DisplayColumn] {
        &self.columns
    }

    /// Distinct room types in order of first appearance.
    pub fn room_types(&self) -> &[String] {
        &self.room_types
    }

    /// Distinct superhost values in order of first appearance.
    pub fn superhost_values(&self) -> &[String] {
        &self.superhost_values
    }

    pub fn stats(&self) -> ColumnStats {
        self.stats
    }

    /// Map reference point: the first row of the unfiltered table.
    ///
    /// Deliberately independent of the current filters.
    pub fn map_center(&self) -> Option<GeoPoint> {
        self.listings.first().and_then(Listing::position)
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for v in values.flatten() {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------
