/// Data layer: core types, loading, cleaning and filtering.
///
/// Architecture:
/// ```text
///   dataclean_analisis.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable   (NotFound / Empty are fatal)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cleaner  │  parse dates, code seasons, derive year_month → RecordTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  season code → SeasonView (order-preserving subset)
///   └──────────┘
/// ```

pub mod cleaner;
pub mod filter;
pub mod loader;
pub mod model;
