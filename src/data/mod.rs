/// Data layer: typed RTO records, loading, caching, filtering and the
/// derived dashboard views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RtoDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<RtoDataset> per path, per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ aggregate │  geo subset, counts, contacts
///   └──────────┘      └───────────┘
///        │                  │
///        └──────┬───────────┘
///               ▼
///         DashboardView
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
