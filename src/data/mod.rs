//! Snapshot loading and record store access.

pub mod filter;
pub mod loader;

// Re-export commonly used types
pub use filter::{
    filter_by_driver, filter_by_entity, filter_by_track, list_distinct_entities,
    truncate_to_race, DriverFilter, EntityType, TrackMatch,
};
pub use loader::{ReferenceTables, SnapshotStore, FIRST_SNAPSHOT_YEAR};
