/// Data layer: core types, loading, filtering and the derived view.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingTable (derived columns, extrema)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ListingTable  │  immutable Vec<Listing>, display layout
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  five control predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  row counts, table rows, map configuration
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
