//! Cascading deletion coordinator
//!
//! Batch-deletes listings together with their dependent image rows and, for
//! image groups left without any surviving owner, the on-disk files. Group
//! ids are shared across submissions and no lock is held on them, so group
//! ownership is re-read at deletion time instead of trusting a cached
//! count. A group's files are deleted exactly once per batch, and never
//! while a referencing listing outside the batch survives.

use std::collections::{BTreeSet, HashSet};

use sea_orm::*;
use tracing::{info, warn};

use bacheca_common::PublishError;
use bacheca_persistence::entity::{listing, listing_image};

use crate::model::DeletionOutcome;
use crate::resources::ResourceStore;

/// Delete the given listings, cascading to image metadata rows and orphaned
/// groups' files. A file-deletion failure (e.g. already missing) is logged
/// and does not abort the row deletion; the rows are the authoritative
/// state.
pub async fn delete_listings(
    db: &DatabaseConnection,
    store: &dyn ResourceStore,
    ids: &[i64],
) -> Result<DeletionOutcome, PublishError> {
    if ids.is_empty() {
        return Err(PublishError::EmptySelection);
    }

    let rows = listing::Entity::find()
        .filter(listing::Column::Id.is_in(ids.to_vec()))
        .all(db)
        .await?;
    if rows.is_empty() {
        return Ok(DeletionOutcome {
            rows_deleted: 0,
            files_deleted: 0,
        });
    }

    let batch: HashSet<i64> = rows.iter().map(|r| r.id).collect();
    // BTreeSet for a deterministic per-group deletion order.
    let groups: BTreeSet<String> = rows
        .iter()
        .filter_map(|r| r.image_group_id.clone())
        .collect();

    // A group is orphaned only if every referencing listing anywhere in
    // the store, not just within the batch, is part of this batch.
    let mut orphaned = Vec::new();
    for group_id in &groups {
        let owners: Vec<i64> = listing::Entity::find()
            .select_only()
            .column(listing::Column::Id)
            .filter(listing::Column::ImageGroupId.eq(group_id))
            .into_tuple()
            .all(db)
            .await?;
        if owners.iter().all(|id| batch.contains(id)) {
            orphaned.push(group_id.clone());
        }
    }

    // Files first, once per orphaned group. Missing files are tolerated.
    let mut files_deleted = 0u64;
    for group_id in &orphaned {
        let images = listing_image::Entity::find()
            .filter(listing_image::Column::GroupId.eq(group_id))
            .all(db)
            .await?;
        for image in &images {
            match store.delete(&image.path).await {
                Ok(()) => files_deleted += 1,
                Err(e) => {
                    warn!(path = %image.path, error = %e, "failed to delete group file");
                }
            }
        }
    }

    // Dependent rows, then primary rows, in one transaction.
    let tx = db.begin().await?;
    for group_id in &orphaned {
        listing_image::Entity::delete_many()
            .filter(listing_image::Column::GroupId.eq(group_id))
            .exec(&tx)
            .await?;
    }
    let deleted = listing::Entity::delete_many()
        .filter(listing::Column::Id.is_in(batch.iter().copied().collect::<Vec<_>>()))
        .exec(&tx)
        .await?;
    tx.commit().await?;

    info!(
        rows = deleted.rows_affected,
        files = files_deleted,
        orphaned_groups = orphaned.len(),
        "deletion batch completed"
    );

    Ok(DeletionOutcome {
        rows_deleted: deleted.rows_affected,
        files_deleted,
    })
}
