/// Data layer: core types, loading, column selection and result writing.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CurveBatch (NaN for non-numeric cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop the time column / select curves
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CurveBatch  │  Vec<Curve>, shared index  ──▶ pipeline
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  normalized batch + annotations → CSV / JSON records
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
