/// Data layer: sources, aggregation and export.
///
/// Architecture:
/// ```text
///  search URLs (JSON)        .xlsx / .csv / .parquet
///        │                          │
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │  remote   │              │  loader   │  file → Grid
///   └──────────┘              └──────────┘
///        │                          │
///        │                          ▼
///        │                    ┌──────────┐
///        │                    │  tabular  │  Authors column → normalize
///        │                    └──────────┘
///        ▼                          ▼
///   ┌─────────────────────────────────────┐
///   │  aggregate   author × label counts   │
///   └─────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  header + rows → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod remote;
pub mod tabular;
