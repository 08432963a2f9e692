//! Feature Extraction
//!
//! Maps a record and a named feature to a numeric value. This is the single
//! point that normalizes absence: missing inputs propagate as `None`, never
//! as a panic or a silent zero, and aggregation excludes `None` values.

use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;
use crate::models::RaceResult;

/// A named numeric quantity derived from or stored on a race record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    RacePos,
    QualiPos,
    AvgPos,
    RaceFinishPoints,
    RaceStagePoints,
    RacePlayoffPoints,
    SeasonPoints,
    Stage1Pts,
    Stage2Pts,
    Stage3Pts,
    GreenFlagPasses,
    GreenFlagTimesPassed,
    QualityPasses,
    PassDiff,
    LapsLed,
    Top15Laps,
    TotalLaps,
    /// Synthetic: `race_finish_points + race_stage_points`. Never stored.
    FantasyPoints,
    /// Synthetic: `top_15_laps / total_laps * 100`.
    PctTop15Laps,
    /// Synthetic: `laps_led / total_laps * 100`.
    PctLapsLed,
}

impl Feature {
    /// Extract this feature's value from a record, or `None` if the inputs
    /// are absent (or a percentage denominator is zero).
    pub fn value(&self, record: &RaceResult) -> Option<f64> {
        match self {
            Feature::RacePos => record.race_pos.map(f64::from),
            Feature::QualiPos => record.quali_pos.map(f64::from),
            Feature::AvgPos => record.avg_pos,
            Feature::RaceFinishPoints => record.race_finish_points,
            Feature::RaceStagePoints => record.race_stage_points,
            Feature::RacePlayoffPoints => record.race_playoff_points,
            Feature::SeasonPoints => record.season_points,
            Feature::Stage1Pts => record.stage_1_pts,
            Feature::Stage2Pts => record.stage_2_pts,
            Feature::Stage3Pts => record.stage_3_pts,
            Feature::GreenFlagPasses => record.green_flag_passes,
            Feature::GreenFlagTimesPassed => record.green_flag_times_passed,
            Feature::QualityPasses => record.quality_passes,
            Feature::PassDiff => pass_diff(record),
            Feature::LapsLed => record.laps_led,
            Feature::Top15Laps => record.top_15_laps,
            Feature::TotalLaps => record.total_laps,
            Feature::FantasyPoints => fantasy_points(record),
            Feature::PctTop15Laps => pct_of_laps(record.top_15_laps, record.total_laps),
            Feature::PctLapsLed => pct_of_laps(record.laps_led, record.total_laps),
        }
    }

    /// Whether a smaller value is the better one. Determines the default
    /// ranking direction: ascending for positions, descending otherwise.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Feature::RacePos | Feature::QualiPos)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::RacePos => "race_pos",
            Feature::QualiPos => "quali_pos",
            Feature::AvgPos => "avg_pos",
            Feature::RaceFinishPoints => "race_finish_points",
            Feature::RaceStagePoints => "race_stage_points",
            Feature::RacePlayoffPoints => "race_playoff_points",
            Feature::SeasonPoints => "season_points",
            Feature::Stage1Pts => "stage_1_pts",
            Feature::Stage2Pts => "stage_2_pts",
            Feature::Stage3Pts => "stage_3_pts",
            Feature::GreenFlagPasses => "green_flag_passes",
            Feature::GreenFlagTimesPassed => "green_flag_times_passed",
            Feature::QualityPasses => "quality_passes",
            Feature::PassDiff => "pass_diff",
            Feature::LapsLed => "laps_led",
            Feature::Top15Laps => "top_15_laps",
            Feature::TotalLaps => "total_laps",
            Feature::FantasyPoints => "fantasy_points",
            Feature::PctTop15Laps => "pct_top_15_laps",
            Feature::PctLapsLed => "pct_laps_led",
        }
    }

    /// Every known feature name, stored and synthetic.
    pub fn all() -> &'static [Feature] {
        &[
            Feature::RacePos,
            Feature::QualiPos,
            Feature::AvgPos,
            Feature::RaceFinishPoints,
            Feature::RaceStagePoints,
            Feature::RacePlayoffPoints,
            Feature::SeasonPoints,
            Feature::Stage1Pts,
            Feature::Stage2Pts,
            Feature::Stage3Pts,
            Feature::GreenFlagPasses,
            Feature::GreenFlagTimesPassed,
            Feature::QualityPasses,
            Feature::PassDiff,
            Feature::LapsLed,
            Feature::Top15Laps,
            Feature::TotalLaps,
            Feature::FantasyPoints,
            Feature::PctTop15Laps,
            Feature::PctLapsLed,
        ]
    }
}

impl FromStr for Feature {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::all()
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| StatsError::InvalidArgument(format!("unknown feature: {}", s)))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fantasy points are always derived at read time, never read from a stored
/// field. A missing addend counts as 0; only both addends missing is no data.
fn fantasy_points(record: &RaceResult) -> Option<f64> {
    match (record.race_finish_points, record.race_stage_points) {
        (None, None) => None,
        (finish, stage) => Some(finish.unwrap_or(0.0) + stage.unwrap_or(0.0)),
    }
}

/// Prefer the stored pass balance; derive it from the raw pass counts when
/// the snapshot predates the stored column.
fn pass_diff(record: &RaceResult) -> Option<f64> {
    record.pass_diff.or_else(|| {
        record
            .green_flag_passes
            .zip(record.green_flag_times_passed)
            .map(|(passes, passed)| passes - passed)
    })
}

fn pct_of_laps(laps: Option<f64>, total: Option<f64>) -> Option<f64> {
    match (laps, total) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d * 100.0),
        _ => None,
    }
}
