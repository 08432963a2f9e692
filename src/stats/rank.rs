//! Ranking / Sorting
//!
//! Orders entities by their average feature value. The sort is stable and
//! copy-on-sort: the caller's entity list is never reordered in place, and
//! entities without data always land after entities with a real value.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::data::filter::EntityType;
use crate::models::RaceResult;
use crate::stats::features::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Average feature value per entity, batched in a single pass over the
/// records instead of one filtering pass per entity.
///
/// Entities with no matching records (or no extractable values) map to
/// `None`; results are identical to [`average`] over a per-entity filter.
pub fn entity_averages(
    entities: &[String],
    records: &[RaceResult],
    entity_type: EntityType,
    feature: Feature,
) -> HashMap<String, Option<f64>> {
    let mut acc: HashMap<&str, (f64, usize)> = HashMap::new();
    for entity in entities {
        acc.insert(entity.as_str(), (0.0, 0));
    }

    for record in records {
        let name = entity_type.value_of(record);
        if let Some((total, count)) = acc.get_mut(name) {
            if let Some(value) = feature.value(record) {
                *total += value;
                *count += 1;
            }
        }
    }

    entities
        .iter()
        .map(|entity| {
            let avg = match acc[entity.as_str()] {
                (_, 0) => None,
                (total, count) => Some(total / count as f64),
            };
            (entity.clone(), avg)
        })
        .collect()
}

/// Entities reordered by their average feature value.
///
/// Direction defaults to ascending for lower-is-better features
/// (`race_pos`, `quali_pos`) and descending otherwise; an explicit
/// `direction` overrides the default. No-data entities sort strictly last
/// in both directions, keeping their input order.
pub fn rank_entities(
    entities: &[String],
    records: &[RaceResult],
    entity_type: EntityType,
    feature: Feature,
    direction: Option<SortDirection>,
) -> Vec<String> {
    let direction = direction.unwrap_or(if feature.lower_is_better() {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    });

    let averages = entity_averages(entities, records, entity_type, feature);

    let mut ranked = entities.to_vec();
    // Vec::sort_by is stable, which the no-data tie-break relies on.
    ranked.sort_by(|a, b| match (averages[a], averages[b]) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    });
    ranked
}

/// 1-based rank of one entity within its group under the feature's default
/// direction. An entity absent from the group ranks after everyone.
pub fn rank_of(
    entities: &[String],
    records: &[RaceResult],
    entity_type: EntityType,
    feature: Feature,
    entity: &str,
) -> usize {
    let ranked = rank_entities(entities, records, entity_type, feature, None);
    ranked
        .iter()
        .position(|e| e == entity)
        .map(|i| i + 1)
        .unwrap_or(entities.len() + 1)
}
