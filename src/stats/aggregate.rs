//! Aggregation Engine
//!
//! Pure summary statistics over a filtered record set. All functions return
//! `Option<f64>`: `None` is the no-data marker, kept strictly distinct from
//! a legitimate 0 computed over real records.

use crate::models::RaceResult;
use crate::stats::features::Feature;

/// Mean of the feature over records where it has a value. Records whose
/// extracted value is `None` are excluded from both the total and the count.
pub fn average(records: &[RaceResult], feature: Feature) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| feature.value(r)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of the feature's non-`None` values.
///
/// `None` only for an empty input slice: a driver who scored nothing still
/// has a real sum of 0.
pub fn sum(records: &[RaceResult], feature: Feature) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().filter_map(|r| feature.value(r)).sum())
}

/// Share of records (in percent) whose feature value equals `target`.
/// Records without a value stay in the denominator as non-matches.
pub fn percentage_matching(records: &[RaceResult], feature: Feature, target: f64) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let matching = records
        .iter()
        .filter(|r| feature.value(r) == Some(target))
        .count();
    Some(100.0 * matching as f64 / records.len() as f64)
}

/// Stage points as a percentage of all race points
/// (`stage / (stage + finish)`), the fantasy-relevant split of where a
/// driver's points come from. `None` when no points were scored at all.
pub fn stage_points_percentage(records: &[RaceResult]) -> Option<f64> {
    let stage: f64 = records
        .iter()
        .map(|r| r.race_stage_points.unwrap_or(0.0))
        .sum();
    let all: f64 = records
        .iter()
        .map(|r| r.race_stage_points.unwrap_or(0.0) + r.race_finish_points.unwrap_or(0.0))
        .sum();
    if all == 0.0 {
        return None;
    }
    Some(100.0 * stage / all)
}

/// Percent delta of the records' average against a reference group's
/// average: `100 * (avg - ref_avg) / ref_avg`.
///
/// `None` when either average is absent or the reference average is exactly
/// zero — never `NaN` or an infinity.
pub fn ratio_to_reference_group(
    records: &[RaceResult],
    reference: &[RaceResult],
    feature: Feature,
) -> Option<f64> {
    let avg = average(records, feature)?;
    let ref_avg = average(reference, feature)?;
    if ref_avg == 0.0 {
        return None;
    }
    Some(100.0 * (avg - ref_avg) / ref_avg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(driver: &str, race_pos: Option<u32>, finish: Option<f64>, stage: Option<f64>) -> RaceResult {
        RaceResult {
            driver_name: driver.to_string(),
            team_name: "Hendrick Motorsports".to_string(),
            manufacturer: "Chevrolet".to_string(),
            car_number: Some(5),
            season_year: 2025,
            race_number: 1,
            track_name: "Daytona International Speedway".to_string(),
            race_date: NaiveDate::from_ymd_opt(2025, 2, 16).unwrap(),
            race_pos,
            quali_pos: None,
            avg_pos: None,
            status: "finished".to_string(),
            season_stage: "season".to_string(),
            race_finish_points: finish,
            race_stage_points: stage,
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
    fn test_average_and_sum_skip_missing_values() {
        // average(race_pos) = 3, sum(fantasy_points) = 75
        let records = vec![
            row("A", Some(1), Some(40.0), Some(10.0)),
            row("A", Some(5), Some(25.0), Some(0.0)),
        ];

        let avg = average(&records, Feature::RacePos).unwrap();
        assert!((avg - 3.0).abs() < 1e-9);

        let fantasy = sum(&records, Feature::FantasyPoints).unwrap();
        assert!((fantasy - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_excludes_missing_values() {
        let records = vec![
            row("A", Some(2), None, None),
            row("A", None, None, None),
            row("A", Some(4), None, None),
        ];

        let avg = average(&records, Feature::RacePos).unwrap();
        assert!((avg - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_no_data_not_zero() {
        let empty: Vec<RaceResult> = Vec::new();
        assert_eq!(average(&empty, Feature::RacePos), None);
        assert_eq!(sum(&empty, Feature::RacePos), None);
        assert_eq!(percentage_matching(&empty, Feature::RacePos, 1.0), None);

        // A real zero stays a Some(0.0), distinguishable from no data.
        let zeros = vec![row("A", None, Some(0.0), Some(0.0))];
        assert_eq!(sum(&zeros, Feature::RaceFinishPoints), Some(0.0));
    }

    #[test]
    fn test_sum_equals_average_times_count_without_nulls() {
        let records = vec![
            row("A", Some(1), None, None),
            row("A", Some(7), None, None),
            row("A", Some(13), None, None),
        ];

        let s = sum(&records, Feature::RacePos).unwrap();
        let a = average(&records, Feature::RacePos).unwrap();
        assert!((s - a * records.len() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_matching_counts_wins() {
        let records = vec![
            row("A", Some(1), None, None),
            row("A", Some(1), None, None),
            row("A", Some(12), None, None),
            row("A", None, None, None),
        ];

        let pct = percentage_matching(&records, Feature::RacePos, 1.0).unwrap();
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_stage_points_percentage() {
        let records = vec![
            row("A", None, Some(30.0), Some(10.0)),
            row("A", None, Some(50.0), Some(10.0)),
        ];

        let pct = stage_points_percentage(&records).unwrap();
        assert!((pct - 20.0).abs() < 1e-9);

        let scoreless = vec![row("A", None, Some(0.0), Some(0.0))];
        assert_eq!(stage_points_percentage(&scoreless), None);
    }

    #[test]
    fn test_ratio_to_reference_group() {
        let current = vec![row("A", Some(6), None, None)];
        let reference = vec![row("B", Some(4), None, None), row("C", Some(4), None, None)];

        let delta = ratio_to_reference_group(&current, &reference, Feature::RacePos).unwrap();
        assert!((delta - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_guards_zero_and_missing_reference() {
        let current = vec![row("A", Some(6), Some(20.0), None)];

        let zero_ref = vec![row("B", None, Some(0.0), None)];
        assert_eq!(
            ratio_to_reference_group(&current, &zero_ref, Feature::RaceFinishPoints),
            None
        );

        let empty_ref: Vec<RaceResult> = Vec::new();
        assert_eq!(
            ratio_to_reference_group(&current, &empty_ref, Feature::RacePos),
            None
        );
    }
}
