//! Record types deserialized from the JSON snapshot files.
//!
//! Every per-race statistic is an `Option`: absent and `null` JSON fields
//! both normalize to `None`, so "no data" can never be confused with a
//! stored zero downstream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of races in a full Cup season (regular season + playoffs).
pub const SEASON_RACES: u32 = 36;

/// Last race of the regular season.
pub const REGULAR_SEASON_RACES: u32 = 26;

/// One driver's result row for one race, from `data_<year>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    // Identity
    pub driver_name: String,
    pub team_name: String,
    pub manufacturer: String,
    #[serde(default)]
    pub car_number: Option<u32>,

    // Scheduling
    pub season_year: i32,
    pub race_number: u32,
    pub track_name: String,
    pub race_date: NaiveDate,

    // Outcome
    #[serde(default)]
    pub race_pos: Option<u32>,
    #[serde(default)]
    pub quali_pos: Option<u32>,
    #[serde(default)]
    pub avg_pos: Option<f64>,
    /// Terminal status: `"finished"` or a did-not-finish reason.
    pub status: String,
    /// `"season"` for regular-season races, playoff round labels otherwise.
    pub season_stage: String,

    // Scoring
    #[serde(default)]
    pub race_finish_points: Option<f64>,
    #[serde(default)]
    pub race_stage_points: Option<f64>,
    #[serde(default)]
    pub race_playoff_points: Option<f64>,
    #[serde(default)]
    pub season_points: Option<f64>,
    #[serde(default)]
    pub stage_1_pts: Option<f64>,
    #[serde(default)]
    pub stage_2_pts: Option<f64>,
    #[serde(default)]
    pub stage_3_pts: Option<f64>,

    // Overtaking
    #[serde(default)]
    pub green_flag_passes: Option<f64>,
    #[serde(default)]
    pub green_flag_times_passed: Option<f64>,
    #[serde(default)]
    pub quality_passes: Option<f64>,
    #[serde(default)]
    pub pass_diff: Option<f64>,

    // Laps
    #[serde(default)]
    pub laps_led: Option<f64>,
    #[serde(default)]
    pub top_15_laps: Option<f64>,
    #[serde(default)]
    pub total_laps: Option<f64>,
}

impl RaceResult {
    /// Whether the driver ran the full race distance.
    pub fn is_finished(&self) -> bool {
        self.status == "finished"
    }

    /// Whether this row belongs to the regular season (not a playoff round).
    pub fn is_regular_season(&self) -> bool {
        self.season_stage == "season"
    }
}

/// Cumulative standings snapshot for one (driver, race_number), from
/// `standings_<year>.json`. Produced externally per race, consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsRow {
    pub driver_name: String,
    #[serde(default)]
    pub race_number: Option<u32>,
    #[serde(default)]
    pub season_points: Option<f64>,
    #[serde(default)]
    pub wins: Option<f64>,
    #[serde(default)]
    pub season_wins: Option<f64>,
    #[serde(default)]
    pub playoff_16_wins: Option<f64>,
    #[serde(default)]
    pub playoff_12_wins: Option<f64>,
    #[serde(default)]
    pub playoff_8_wins: Option<f64>,
    /// 0/1 flag set on the season champion's final snapshot.
    #[serde(default)]
    pub champion: Option<f64>,
    #[serde(default)]
    pub best_position: Option<u32>,
    #[serde(default)]
    pub point_gap_to_bubble: Option<f64>,
}

/// One scheduled race from `calendar.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub season_year: i32,
    pub race_number: u32,
    pub race_name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub race_date: NaiveDate,
    pub stage: String,
}

/// Upcoming-race singleton from `next_race_data.json`, the source of the
/// "current season/race" context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRace {
    pub next_race_season: i32,
    pub next_race_number: u32,
    pub next_race_track: String,
    pub next_race_date: NaiveDate,
}
