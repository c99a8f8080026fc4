//! emberview-core — the query-parameter state synchronizer behind the
//! emberview profile explorer.
//!
//! The explorer keeps all of its view state in URL query parameters so
//! views are shareable and the browser's back/forward navigation just
//! works. A flat, suffix-tagged bag (`expression_a`, `from_b`, …) is
//! parsed into structured per-side queries and drill-down selections,
//! the `compare_a`/`compare_b` flag pair decides whether the single or
//! the side-by-side view renders, and every user intent is answered
//! with the complete next bag to navigate to.
//!
//! The crate computes state; it performs no data fetching and no
//! rendering. Those live behind the [`Navigator`], [`ExplorerStore`]
//! and [`DateRangeResolver`] seams.

pub mod controller;
pub mod intents;
pub mod params;
pub mod query;
pub mod selection;
pub mod store;
pub mod time;
pub mod view;

pub use controller::{Navigator, ProfileExplorer};
pub use params::{ParamValue, ParameterBag, Side, filter_suffix, suffix_params, swap_suffix};
pub use query::{Query, SideState, parse_side, sanitize_date_range};
pub use selection::ProfileSelection;
pub use store::{CompareTransition, ExplorerStore, MemoryStore};
pub use time::{
    DEFAULT_RANGE_KEY, DateRangeResolver, FixedClockResolver, RangeKey, RelativeRangeResolver,
    ResolvedRange,
};
pub use view::{ExplorerView, ViewMode, resolve_view_mode};
