/// Data layer: loading, normalization, row selection, and grouping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawPosting>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  ctc text → f64, location → leading segment
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, immutable
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate  │  │  filter   │  top-N rows, skill/location subsets
///   └───────────┘  └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
