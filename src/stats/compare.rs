//! Cross-Period Comparison
//!
//! Percent deltas of an entity's aggregate against a reference population:
//! the previous season, or every other entity in the same period.
//!
//! When the current season is partial, the caller must truncate the
//! reference season to the same number of races first (see
//! [`crate::data::filter::truncate_to_race`]); this function does not infer
//! the truncation.

use std::fmt;
use std::str::FromStr;

use crate::data::filter::{filter_by_entity, EntityType};
use crate::error::StatsError;
use crate::models::RaceResult;
use crate::stats::aggregate::{average, ratio_to_reference_group, sum};
use crate::stats::features::Feature;

/// Which aggregate a comparison is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregator {
    Sum,
    Average,
}

impl Aggregator {
    fn apply(&self, records: &[RaceResult], feature: Feature) -> Option<f64> {
        match self {
            Aggregator::Sum => sum(records, feature),
            Aggregator::Average => average(records, feature),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Average => "average",
        }
    }
}

impl FromStr for Aggregator {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Aggregator::Sum),
            "average" => Ok(Aggregator::Average),
            other => Err(StatsError::InvalidArgument(format!(
                "unknown aggregator: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent delta of an entity's aggregate between two record sets:
/// `100 * (current - reference) / reference`.
///
/// `None` when the entity has no records on either side or the reference
/// aggregate is exactly zero.
pub fn compare_across_periods(
    current: &[RaceResult],
    reference: &[RaceResult],
    entity: &str,
    entity_type: EntityType,
    feature: Feature,
    aggregator: Aggregator,
) -> Option<f64> {
    let entity_current = filter_by_entity(current, entity_type, entity);
    let entity_reference = filter_by_entity(reference, entity_type, entity);
    if entity_current.is_empty() || entity_reference.is_empty() {
        return None;
    }

    let current_value = aggregator.apply(&entity_current, feature)?;
    let reference_value = aggregator.apply(&entity_reference, feature)?;
    if reference_value == 0.0 {
        return None;
    }
    Some(100.0 * (current_value - reference_value) / reference_value)
}

/// Percent delta of an entity's average against the average of all other
/// records in the same set ("vs. the field").
pub fn compare_to_other_entities(
    records: &[RaceResult],
    entity: &str,
    entity_type: EntityType,
    feature: Feature,
) -> Option<f64> {
    let entity_records = filter_by_entity(records, entity_type, entity);
    let other_records: Vec<RaceResult> = records
        .iter()
        .filter(|r| entity_type.value_of(r) != entity)
        .cloned()
        .collect();
    if entity_records.is_empty() || other_records.is_empty() {
        return None;
    }

    ratio_to_reference_group(&entity_records, &other_records, feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::truncate_to_race;
    use chrono::NaiveDate;

    fn row(driver: &str, race_number: u32, avg_pos: Option<f64>, finish: Option<f64>) -> RaceResult {
        RaceResult {
            driver_name: driver.to_string(),
            team_name: "Hendrick Motorsports".to_string(),
            manufacturer: "Chevrolet".to_string(),
            car_number: Some(5),
            season_year: 2025,
            race_number,
            track_name: "Daytona International Speedway".to_string(),
            race_date: NaiveDate::from_ymd_opt(2025, 2, 16).unwrap(),
            race_pos: None,
            quali_pos: None,
            avg_pos,
            status: "finished".to_string(),
            season_stage: "season".to_string(),
            race_finish_points: finish,
            race_stage_points: None,
            race_playoff_points: None,
            season_points: None,
            stage_1_pts: None,
            stage_2_pts: None,
            stage_3_pts: None,
            green_flag_passes: None,
            green_flag_times_passed: None,
            quality_passes: None,
            pass_diff: None,
            laps_led: None,
            top_15_laps: None,
            total_laps: None,
        }
    }

    #[test]
    fn test_aggregator_from_str() {
        assert_eq!("sum".parse::<Aggregator>().unwrap(), Aggregator::Sum);
        assert_eq!("average".parse::<Aggregator>().unwrap(), Aggregator::Average);
        assert!(matches!(
            "median".parse::<Aggregator>(),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_compare_sum_across_seasons() {
        let current = vec![
            row("Kyle Larson", 1, None, Some(40.0)),
            row("Kyle Larson", 2, None, Some(20.0)),
        ];
        let reference = vec![
            row("Kyle Larson", 1, None, Some(25.0)),
            row("Kyle Larson", 2, None, Some(25.0)),
        ];

        let delta = compare_across_periods(
            &current,
            &reference,
            "Kyle Larson",
            EntityType::Driver,
            Feature::RaceFinishPoints,
            Aggregator::Sum,
        )
        .unwrap();
        assert!((delta - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_requires_entity_on_both_sides() {
        let current = vec![row("Kyle Larson", 1, None, Some(40.0))];
        let reference = vec![row("Denny Hamlin", 1, None, Some(40.0))];

        assert_eq!(
            compare_across_periods(
                &current,
                &reference,
                "Kyle Larson",
                EntityType::Driver,
                Feature::RaceFinishPoints,
                Aggregator::Sum,
            ),
            None
        );
    }

    #[test]
    fn test_compare_zero_reference_is_no_data() {
        let current = vec![row("Kyle Larson", 1, None, Some(40.0))];
        let reference = vec![row("Kyle Larson", 1, None, Some(0.0))];

        assert_eq!(
            compare_across_periods(
                &current,
                &reference,
                "Kyle Larson",
                EntityType::Driver,
                Feature::RaceFinishPoints,
                Aggregator::Sum,
            ),
            None
        );
    }

    #[test]
    fn test_partial_season_compares_against_truncated_reference() {
        // 10 races run now; the full 36-race reference must be cut to its
        // first 10 races before comparing averages.
        let current: Vec<RaceResult> = (1..=10)
            .map(|n| row("Kyle Larson", n, Some(10.0), None))
            .collect();
        let reference_full: Vec<RaceResult> = (1..=36)
            .map(|n| {
                // Early races strong, late races weak: truncation matters.
                let pos = if n <= 10 { 5.0 } else { 20.0 };
                row("Kyle Larson", n, Some(pos), None)
            })
            .collect();

        let reference = truncate_to_race(&reference_full, 10);
        let delta = compare_across_periods(
            &current,
            &reference,
            "Kyle Larson",
            EntityType::Driver,
            Feature::AvgPos,
            Aggregator::Average,
        )
        .unwrap();
        // 10.0 vs 5.0 -> +100%; against the untruncated set it would differ.
        assert!((delta - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_to_other_entities() {
        let records = vec![
            row("Kyle Larson", 1, Some(6.0), None),
            row("Denny Hamlin", 1, Some(4.0), None),
            row("Tyler Reddick", 1, Some(4.0), None),
        ];

        let delta = compare_to_other_entities(
            &records,
            "Kyle Larson",
            EntityType::Driver,
            Feature::AvgPos,
        )
        .unwrap();
        assert!((delta - 50.0).abs() < 1e-9);

        // A lone entity has no field to compare against.
        let solo = vec![row("Kyle Larson", 1, Some(6.0), None)];
        assert_eq!(
            compare_to_other_entities(&solo, "Kyle Larson", EntityType::Driver, Feature::AvgPos),
            None
        );
    }
}
