//! Duplicate guard
//!
//! Probes for existing records per combination before any transaction is
//! opened. The probe is one batched query over the whole combination set,
//! not one round trip per tuple. The check is advisory: it produces the
//! user-facing error in the common case, while the composite unique index on
//! `listing` is what actually enforces the invariant under a race.

use std::collections::HashMap;

use sea_orm::*;

use bacheca_common::PublishError;
use bacheca_persistence::entity::listing;

use crate::combination::Combination;

/// Map from combination leaf-id key to the id of the existing record.
pub type ExistingMap = HashMap<(i64, i64), i64>;

/// Fetch all existing records for the combination set in one query.
pub async fn probe_existing(
    db: &DatabaseConnection,
    kind: &str,
    combinations: &[Combination],
) -> Result<ExistingMap, DbErr> {
    if combinations.is_empty() {
        return Ok(ExistingMap::new());
    }

    let mut tuples = Condition::any();
    for c in combinations {
        tuples = tuples.add(
            Condition::all()
                .add(listing::Column::SubCityId.eq(c.sub_city_id))
                .add(listing::Column::SubCategoryId.eq(c.sub_category_id)),
        );
    }

    let rows = listing::Entity::find()
        .select_only()
        .column(listing::Column::Id)
        .column(listing::Column::SubCityId)
        .column(listing::Column::SubCategoryId)
        .filter(listing::Column::Kind.eq(kind))
        .filter(tuples)
        .into_tuple::<(i64, i64, i64)>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, sub_city_id, sub_category_id)| ((sub_city_id, sub_category_id), id))
        .collect())
}

/// Abort the submission if any combination already has a record other than
/// the one being edited. The error names the colliding axis labels.
pub fn check_duplicates(
    existing: &ExistingMap,
    editing_id: Option<i64>,
    combinations: &[Combination],
) -> Result<(), PublishError> {
    for c in combinations {
        if let Some(&record_id) = existing.get(&c.key()) {
            if editing_id != Some(record_id) {
                return Err(PublishError::DuplicateCombination {
                    sub_city: c.sub_city_name.clone(),
                    sub_category: c.sub_category_name.clone(),
                });
            }
        }
    }
    Ok(())
}
