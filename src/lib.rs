//! NASCAR Stats - Cup Series race result aggregation
//!
//! This library provides:
//! - JSON snapshot loading for race results, standings, and reference tables
//! - Per-race feature extraction with derived fantasy and pass statistics
//! - Averages, sums, percentages, and cross-season comparisons
//! - Driver, team, and manufacturer rankings over any record set
//!
//! # Example
//!
//! ```no_run
//! use nascar_stats::data::{filter_by_driver, DriverFilter, SnapshotStore};
//! use nascar_stats::stats::{average, Feature};
//!
//! let store = SnapshotStore::new("data");
//! let season = store.season_results(2025, None)?;
//!
//! let races = filter_by_driver(&season, "Kyle Larson", DriverFilter::default());
//! if let Some(avg) = average(&races, Feature::RacePos) {
//!     println!("Average finish: {:.1}", avg);
//! }
//! # Ok::<(), nascar_stats::StatsError>(())
//! ```

pub mod data;
pub mod error;
pub mod models;
pub mod stats;

// Re-export commonly used types
pub use data::{DriverFilter, EntityType, SnapshotStore, TrackMatch};
pub use error::StatsError;
pub use models::{
    CalendarEntry, NextRace, RaceResult, StandingsRow, REGULAR_SEASON_RACES, SEASON_RACES,
};
pub use stats::{Aggregator, Feature, SortDirection, StandingsField};
