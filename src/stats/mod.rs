//! Statistical calculations over race result records.

pub mod aggregate;
pub mod compare;
pub mod features;
pub mod rank;
pub mod standings;

// Re-export commonly used types
pub use aggregate::{
    average, percentage_matching, ratio_to_reference_group, stage_points_percentage, sum,
};
pub use compare::{compare_across_periods, compare_to_other_entities, Aggregator};
pub use features::Feature;
pub use rank::{entity_averages, rank_entities, rank_of, SortDirection};
pub use standings::{best_finish, round_wins, standing_value, StandingsField};
