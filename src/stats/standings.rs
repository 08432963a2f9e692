//! Standings snapshot lookups
//!
//! Point-in-time reads over the cumulative standings rows. Callers pass a
//! slice already scoped to one snapshot (one race's standings), so a driver
//! appears at most once; the first match wins.

use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;
use crate::models::StandingsRow;

/// A column of the standings snapshot addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsField {
    SeasonPoints,
    Wins,
    SeasonWins,
    Playoff16Wins,
    Playoff12Wins,
    Playoff8Wins,
    Champion,
    BestPosition,
    PointGapToBubble,
}

impl StandingsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandingsField::SeasonPoints => "season_points",
            StandingsField::Wins => "wins",
            StandingsField::SeasonWins => "season_wins",
            StandingsField::Playoff16Wins => "playoff_16_wins",
            StandingsField::Playoff12Wins => "playoff_12_wins",
            StandingsField::Playoff8Wins => "playoff_8_wins",
            StandingsField::Champion => "champion",
            StandingsField::BestPosition => "best_position",
            StandingsField::PointGapToBubble => "point_gap_to_bubble",
        }
    }

    fn value_of(&self, row: &StandingsRow) -> Option<f64> {
        match self {
            StandingsField::SeasonPoints => row.season_points,
            StandingsField::Wins => row.wins,
            StandingsField::SeasonWins => row.season_wins,
            StandingsField::Playoff16Wins => row.playoff_16_wins,
            StandingsField::Playoff12Wins => row.playoff_12_wins,
            StandingsField::Playoff8Wins => row.playoff_8_wins,
            StandingsField::Champion => row.champion,
            StandingsField::BestPosition => row.best_position.map(f64::from),
            StandingsField::PointGapToBubble => row.point_gap_to_bubble,
        }
    }
}

impl FromStr for StandingsField {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "season_points" => Ok(StandingsField::SeasonPoints),
            "wins" => Ok(StandingsField::Wins),
            "season_wins" => Ok(StandingsField::SeasonWins),
            "playoff_16_wins" => Ok(StandingsField::Playoff16Wins),
            "playoff_12_wins" => Ok(StandingsField::Playoff12Wins),
            "playoff_8_wins" => Ok(StandingsField::Playoff8Wins),
            "champion" => Ok(StandingsField::Champion),
            "best_position" => Ok(StandingsField::BestPosition),
            "point_gap_to_bubble" => Ok(StandingsField::PointGapToBubble),
            other => Err(StatsError::InvalidArgument(format!(
                "unknown standings field: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StandingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field from the driver's snapshot row. `None` when the driver has no
/// row or the field is empty.
pub fn standing_value(
    rows: &[StandingsRow],
    driver: &str,
    field: StandingsField,
) -> Option<f64> {
    rows.iter()
        .find(|row| row.driver_name == driver)
        .and_then(|row| field.value_of(row))
}

/// Best championship position the driver has held across all given rows.
pub fn best_finish(rows: &[StandingsRow], driver: &str) -> Option<u32> {
    rows.iter()
        .filter(|row| row.driver_name == driver)
        .filter_map(|row| row.best_position)
        .min()
}

/// Win count for the playoff round that `race_number` falls in.
///
/// Through race 26 that is the regular-season tally, then the round-of-16,
/// round-of-12, and round-of-8 tallies. The championship race (36) has no
/// win counter of its own.
pub fn round_wins(rows: &[StandingsRow], driver: &str, race_number: u32) -> Option<f64> {
    let field = match race_number {
        0..=26 => StandingsField::SeasonWins,
        27..=29 => StandingsField::Playoff16Wins,
        30..=32 => StandingsField::Playoff12Wins,
        33..=35 => StandingsField::Playoff8Wins,
        _ => return None,
    };
    standing_value(rows, driver, field)
}
