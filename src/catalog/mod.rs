//! The destination catalog
//!
//! Pure functions over collections that are already fetched: scoring departure dates,
//! reconciling the dynamic and bundled destinations, filtering and ordering. Nothing in here does
//! any I/O or fails.

pub use admin::AdminStats;
pub use admin::AdminTable;
pub use date::MONTH_NAMES;
pub use date::date_score;
pub use filter::Filter;
pub use public::DisplayMode;
pub use public::PublicCatalog;
pub use ranking::related;
pub use ranking::sort_catalog;
pub use reconcile::MergePolicy;
pub use reconcile::reconcile;

mod admin;
mod date;
mod filter;
mod public;
mod ranking;
mod reconcile;
