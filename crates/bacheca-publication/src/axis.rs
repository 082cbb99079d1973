//! Dimension resolver
//!
//! Resolves the raw comma-delimited id lists of one submission against the
//! dimension hierarchies. Each axis is resolved with a single batched query
//! constrained by both the leaf id set and the parent id set, so a leaf
//! whose parent falls outside the submitted parent set is rejected as a
//! cardinality shortfall rather than silently resolved. Read-only.

use std::collections::HashMap;

use sea_orm::*;

use bacheca_common::{PublishError, parse_id_list};
use bacheca_persistence::entity::{sub_category, sub_city};

/// One resolved location leaf with its ancestor id and display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationTuple {
    pub city_id: i64,
    pub sub_city_id: i64,
    pub sub_city_name: String,
}

/// One resolved category leaf with its ancestor id and display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTuple {
    pub category_id: i64,
    pub sub_category_id: i64,
    pub sub_category_name: String,
}

/// Resolve the location axis: every submitted sub-city id must exist and
/// belong to one of the submitted cities. Output order follows input order.
pub async fn resolve_locations(
    db: &DatabaseConnection,
    raw_city_ids: &str,
    raw_sub_city_ids: &str,
) -> Result<Vec<LocationTuple>, PublishError> {
    let city_ids = parse_id_list(raw_city_ids);
    let sub_city_ids = parse_id_list(raw_sub_city_ids);
    if city_ids.is_empty() || sub_city_ids.is_empty() {
        return Err(PublishError::EmptySelection);
    }

    let rows = sub_city::Entity::find()
        .filter(sub_city::Column::Id.is_in(sub_city_ids.clone()))
        .filter(sub_city::Column::CityId.is_in(city_ids))
        .all(db)
        .await?;

    let by_id: HashMap<i64, sub_city::Model> =
        rows.into_iter().map(|m| (m.id, m)).collect();

    let mut resolved = Vec::with_capacity(sub_city_ids.len());
    for id in &sub_city_ids {
        match by_id.get(id) {
            Some(m) => resolved.push(LocationTuple {
                city_id: m.city_id,
                sub_city_id: m.id,
                sub_city_name: m.name.clone(),
            }),
            None => {
                return Err(PublishError::InvalidAxisValue {
                    axis: "sub_city",
                    requested: sub_city_ids.len(),
                    resolved: by_id.len(),
                });
            }
        }
    }

    Ok(resolved)
}

/// Resolve the category axis: every submitted sub-category id must exist
/// and belong to one of the submitted categories. Output order follows
/// input order.
pub async fn resolve_categories(
    db: &DatabaseConnection,
    raw_category_ids: &str,
    raw_sub_category_ids: &str,
) -> Result<Vec<CategoryTuple>, PublishError> {
    let category_ids = parse_id_list(raw_category_ids);
    let sub_category_ids = parse_id_list(raw_sub_category_ids);
    if category_ids.is_empty() || sub_category_ids.is_empty() {
        return Err(PublishError::EmptySelection);
    }

    let rows = sub_category::Entity::find()
        .filter(sub_category::Column::Id.is_in(sub_category_ids.clone()))
        .filter(sub_category::Column::CategoryId.is_in(category_ids))
        .all(db)
        .await?;

    let by_id: HashMap<i64, sub_category::Model> =
        rows.into_iter().map(|m| (m.id, m)).collect();

    let mut resolved = Vec::with_capacity(sub_category_ids.len());
    for id in &sub_category_ids {
        match by_id.get(id) {
            Some(m) => resolved.push(CategoryTuple {
                category_id: m.category_id,
                sub_category_id: m.id,
                sub_category_name: m.name.clone(),
            }),
            None => {
                return Err(PublishError::InvalidAxisValue {
                    axis: "sub_category",
                    requested: sub_category_ids.len(),
                    resolved: by_id.len(),
                });
            }
        }
    }

    Ok(resolved)
}
