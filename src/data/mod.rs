/// Data layer: core types, loading, filtering, projection and export.
///
/// Architecture:
/// ```text
///   MEAS log (.txt, tab-separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse lines → Reading, keep those inside the TimeWindow
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Reading>, immutable once loaded
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌────────────┐        ┌──────────┐
///   │ projection │        │  export   │  CSV rows for enabled metrics
///   └────────────┘        └──────────┘
///   headers + rows (table / chart)
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
pub mod timekey;
