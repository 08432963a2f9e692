//! JSON snapshot loading.
//!
//! Snapshots are produced by an external ETL job and copied into a static
//! data directory, one file per (dataset, season). The store reads them
//! synchronously; a missing or malformed file is surfaced once and never
//! retried.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::data::filter::{filter_by_track, TrackMatch};
use crate::error::StatsError;
use crate::models::{CalendarEntry, NextRace, RaceResult, StandingsRow, SEASON_RACES};

/// Earliest season with snapshot data.
pub const FIRST_SNAPSHOT_YEAR: i32 = 2016;

/// Read-only access to the snapshot directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Race results for one season, optionally truncated to the races run
    /// so far (`race_number <= up_to_race`).
    pub fn season_results(
        &self,
        year: i32,
        up_to_race: Option<u32>,
    ) -> Result<Vec<RaceResult>, StatsError> {
        let results: Vec<RaceResult> = self.read_json(&format!("data_{}.json", year))?;
        let limit = up_to_race.unwrap_or(SEASON_RACES);
        Ok(results
            .into_iter()
            .filter(|r| r.race_number <= limit)
            .collect())
    }

    /// Race results for a span of seasons, newest first.
    ///
    /// Seasons whose snapshot is missing or unreadable are skipped with a
    /// warning; a multi-season view should degrade, not fail, when one
    /// year's file is absent.
    pub fn many_season_results(&self, start_year: i32, end_year: i32) -> Vec<RaceResult> {
        let start = start_year.max(FIRST_SNAPSHOT_YEAR);
        let mut all = Vec::new();

        for year in (start..=end_year).rev() {
            match self.season_results(year, None) {
                Ok(mut results) => all.append(&mut results),
                Err(err) => warn!("skipping season {}: {}", year, err),
            }
        }

        info!(
            "loaded {} records across seasons {}-{}",
            all.len(),
            start,
            end_year
        );
        all
    }

    /// Multi-season results restricted to one track (exact, similar, or
    /// both, per the similarity mapping).
    pub fn track_results(
        &self,
        start_year: i32,
        end_year: i32,
        track: &str,
        mode: TrackMatch,
        similarity: &HashMap<String, Vec<String>>,
    ) -> Vec<RaceResult> {
        let all = self.many_season_results(start_year, end_year);
        filter_by_track(&all, track, mode, similarity)
    }

    /// Standings snapshots for one season.
    pub fn standings(&self, year: i32) -> Result<Vec<StandingsRow>, StatsError> {
        self.read_json(&format!("standings_{}.json", year))
    }

    /// Load the externally-maintained reference tables once at startup.
    pub fn reference_tables(&self) -> Result<ReferenceTables, StatsError> {
        Ok(ReferenceTables {
            entry_list: self.read_json("entry_list.json")?,
            track_similarity: self.read_json("track_similarity.json")?,
            track_types: self.read_json("track_types.json")?,
            calendar: self.read_json("calendar.json")?,
            next_race: self.read_json("next_race_data.json")?,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, filename: &str) -> Result<T, StatsError> {
        let path = self.dir.join(filename);
        let content = fs::read_to_string(&path).map_err(|source| {
            StatsError::SourceUnavailable {
                path: path.clone(),
                source,
            }
        })?;
        serde_json::from_str(&content).map_err(|source| StatsError::SourceMalformed {
            path: path.clone(),
            source,
        })
    }
}

/// Externally-loaded reference tables, loaded once and passed by reference
/// into aggregation calls. Never mutated after load.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// Season year (string key, as stored) -> eligible driver names.
    pub entry_list: HashMap<String, Vec<String>>,
    /// Track name -> related track names.
    pub track_similarity: HashMap<String, Vec<String>>,
    /// Track-type label -> track names.
    pub track_types: HashMap<String, Vec<String>>,
    pub calendar: Vec<CalendarEntry>,
    pub next_race: NextRace,
}

impl ReferenceTables {
    /// Entry list for a season, if one is maintained for that year.
    pub fn eligible_drivers(&self, year: i32) -> Option<&[String]> {
        self.entry_list.get(&year.to_string()).map(Vec::as_slice)
    }

    /// Season the dashboard should open on: the next race's season, unless
    /// the upcoming race number runs past a full season (off-season), in
    /// which case the season that just ended.
    pub fn current_season(&self) -> i32 {
        if self.next_race.next_race_number <= SEASON_RACES {
            self.next_race.next_race_season
        } else {
            self.next_race.next_race_season - 1
        }
    }

    /// Highest race number in `year` already run as of `today`.
    pub fn latest_race_number(&self, year: i32, today: NaiveDate) -> Option<u32> {
        self.calendar
            .iter()
            .filter(|r| r.season_year == year && r.race_date <= today)
            .map(|r| r.race_number)
            .max()
    }

    /// Calendar entry for one scheduled race.
    pub fn race_info(&self, year: i32, race_number: u32) -> Option<&CalendarEntry> {
        self.calendar
            .iter()
            .find(|r| r.season_year == year && r.race_number == race_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn race_json(driver: &str, race_number: u32, year: i32) -> String {
        format!(
            r#"{{
                "driver_name": "{}",
                "team_name": "Hendrick Motorsports",
                "manufacturer": "Chevrolet",
                "season_year": {},
                "race_number": {},
                "track_name": "Daytona International Speedway",
                "race_date": "{}-02-16",
                "race_pos": 1,
                "status": "finished",
                "season_stage": "season"
            }}"#,
            driver, year, race_number, year
        )
    }

    #[test]
    fn test_season_results_truncates_to_up_to_race() {
        let tmp = tempfile::tempdir().unwrap();
        let rows: Vec<String> = (1..=5).map(|n| race_json("Kyle Larson", n, 2025)).collect();
        write_file(tmp.path(), "data_2025.json", &format!("[{}]", rows.join(",")));

        let store = SnapshotStore::new(tmp.path());
        let all = store.season_results(2025, None).unwrap();
        assert_eq!(all.len(), 5);

        let truncated = store.season_results(2025, Some(3)).unwrap();
        assert_eq!(truncated.len(), 3);
        assert!(truncated.iter().all(|r| r.race_number <= 3));
    }

    #[test]
    fn test_season_results_missing_file_is_source_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path());

        let err = store.season_results(2025, None).unwrap_err();
        assert!(matches!(err, StatsError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_season_results_bad_json_is_source_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "data_2025.json", "{not json");

        let store = SnapshotStore::new(tmp.path());
        let err = store.season_results(2025, None).unwrap_err();
        assert!(matches!(err, StatsError::SourceMalformed { .. }));
    }

    #[test]
    fn test_many_season_results_skips_missing_years_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "data_2025.json",
            &format!("[{}]", race_json("Kyle Larson", 1, 2025)),
        );
        write_file(
            tmp.path(),
            "data_2023.json",
            &format!("[{}]", race_json("Kyle Larson", 1, 2023)),
        );
        // 2024 intentionally absent.

        let store = SnapshotStore::new(tmp.path());
        let all = store.many_season_results(2023, 2025);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].season_year, 2025);
        assert_eq!(all[1].season_year, 2023);
    }

    #[test]
    fn test_reference_tables_context() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "entry_list.json",
            r#"{"2025": ["Kyle Larson", "Denny Hamlin"]}"#,
        );
        write_file(
            tmp.path(),
            "track_similarity.json",
            r#"{"Daytona International Speedway": ["Talladega Superspeedway"]}"#,
        );
        write_file(
            tmp.path(),
            "track_types.json",
            r#"{"superspeedway": ["Daytona International Speedway"]}"#,
        );
        write_file(
            tmp.path(),
            "calendar.json",
            r#"[
                {"season_year": 2025, "race_number": 1, "race_name": "Daytona 500",
                 "race_date": "2025-02-16", "stage": "season"},
                {"season_year": 2025, "race_number": 2, "race_name": "Ambetter Health 400",
                 "race_date": "2025-02-23", "stage": "season"}
            ]"#,
        );
        write_file(
            tmp.path(),
            "next_race_data.json",
            r#"{"next_race_season": 2025, "next_race_number": 2,
                "next_race_track": "Atlanta Motor Speedway",
                "next_race_date": "2025-02-23"}"#,
        );

        let store = SnapshotStore::new(tmp.path());
        let tables = store.reference_tables().unwrap();

        assert_eq!(tables.current_season(), 2025);
        assert_eq!(tables.eligible_drivers(2025).unwrap().len(), 2);
        assert_eq!(tables.eligible_drivers(2019), None);

        let today = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
        assert_eq!(tables.latest_race_number(2025, today), Some(1));
        assert_eq!(
            tables.race_info(2025, 1).unwrap().race_name,
            "Daytona 500"
        );
    }

    #[test]
    fn test_current_season_rolls_back_in_off_season() {
        let next_race: NextRace = serde_json::from_str(
            r#"{"next_race_season": 2026, "next_race_number": 37,
                "next_race_track": "Daytona International Speedway",
                "next_race_date": "2026-02-15"}"#,
        )
        .unwrap();

        let tables = ReferenceTables {
            entry_list: HashMap::new(),
            track_similarity: HashMap::new(),
            track_types: HashMap::new(),
            calendar: Vec::new(),
            next_race,
        };

        assert_eq!(tables.current_season(), 2025);
    }
}
