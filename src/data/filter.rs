//! Record Store Access
//!
//! Filtering and entity listing over an already-loaded collection of race
//! rows. Every function returns a fresh filtered copy; the input slice is
//! never mutated.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;
use crate::models::RaceResult;

/// Grouping key for aggregation: which identity column an entity name is
/// compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Driver,
    Team,
    Manufacturer,
}

impl EntityType {
    /// Value of this entity column on a record.
    pub fn value_of<'a>(&self, record: &'a RaceResult) -> &'a str {
        match self {
            EntityType::Driver => &record.driver_name,
            EntityType::Team => &record.team_name,
            EntityType::Manufacturer => &record.manufacturer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Driver => "driver",
            EntityType::Team => "team",
            EntityType::Manufacturer => "manufacturer",
        }
    }
}

impl FromStr for EntityType {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(EntityType::Driver),
            "team" => Ok(EntityType::Team),
            "manufacturer" => Ok(EntityType::Manufacturer),
            other => Err(StatsError::InvalidArgument(format!(
                "unknown entity type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track matching mode for [`filter_by_track`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMatch {
    /// `track_name` equals the requested track.
    Exact,
    /// `track_name` is in the similarity mapping for the requested track.
    /// The requested track itself does not match.
    Similar,
    /// Union of `Exact` and `Similar`.
    Both,
}

impl TrackMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackMatch::Exact => "exact",
            TrackMatch::Similar => "similar",
            TrackMatch::Both => "both",
        }
    }
}

impl FromStr for TrackMatch {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(TrackMatch::Exact),
            "similar" => Ok(TrackMatch::Similar),
            "both" => Ok(TrackMatch::Both),
            other => Err(StatsError::InvalidArgument(format!(
                "unknown track match mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TrackMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`filter_by_driver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverFilter {
    /// Keep regular-season races only.
    pub exclude_playoffs: bool,
    /// Keep races the driver finished only.
    pub exclude_dnf: bool,
}

/// Races for one driver, optionally restricted to the regular season and to
/// finished races.
pub fn filter_by_driver(
    records: &[RaceResult],
    driver: &str,
    opts: DriverFilter,
) -> Vec<RaceResult> {
    records
        .iter()
        .filter(|r| {
            r.driver_name == driver
                && (!opts.exclude_playoffs || r.is_regular_season())
                && (!opts.exclude_dnf || r.is_finished())
        })
        .cloned()
        .collect()
}

/// All races where the given entity column matches `name`.
pub fn filter_by_entity(
    records: &[RaceResult],
    entity_type: EntityType,
    name: &str,
) -> Vec<RaceResult> {
    records
        .iter()
        .filter(|r| entity_type.value_of(r) == name)
        .cloned()
        .collect()
}

/// Races at a track, at tracks similar to it, or both.
///
/// A track with no entry in the similarity mapping has an empty similar-set;
/// that is an expected condition, not an error.
pub fn filter_by_track(
    records: &[RaceResult],
    track: &str,
    mode: TrackMatch,
    similarity: &HashMap<String, Vec<String>>,
) -> Vec<RaceResult> {
    let similar: &[String] = similarity.get(track).map(Vec::as_slice).unwrap_or(&[]);

    records
        .iter()
        .filter(|r| {
            let is_exact = r.track_name == track;
            let is_similar = similar.iter().any(|t| *t == r.track_name);
            match mode {
                TrackMatch::Exact => is_exact,
                TrackMatch::Similar => is_similar,
                TrackMatch::Both => is_exact || is_similar,
            }
        })
        .cloned()
        .collect()
}

/// Distinct values of the entity column, in first-appearance order.
///
/// Drivers are optionally intersected with an allow-list (the season's entry
/// list) to drop one-off substitutes; team rows named "unknown" are dropped.
pub fn list_distinct_entities(
    records: &[RaceResult],
    entity_type: EntityType,
    allow_list: Option<&[String]>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for record in records {
        let name = entity_type.value_of(record);
        if entity_type == EntityType::Team && name.eq_ignore_ascii_case("unknown") {
            continue;
        }
        if entity_type == EntityType::Driver {
            if let Some(allowed) = allow_list {
                if !allowed.iter().any(|a| a == name) {
                    continue;
                }
            }
        }
        if seen.insert(name.to_string()) {
            entities.push(name.to_string());
        }
    }

    entities
}

/// Races up to and including `race_number`.
///
/// This is the same-length truncation helper for cross-season comparisons:
/// a partial current season must be compared against the same number of
/// races from the reference season.
pub fn truncate_to_race(records: &[RaceResult], race_number: u32) -> Vec<RaceResult> {
    records
        .iter()
        .filter(|r| r.race_number <= race_number)
        .cloned()
        .collect()
}
