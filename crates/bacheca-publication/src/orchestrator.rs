//! Transactional write orchestrator
//!
//! Drives one submission end to end: resolve axes, run the duplicate guard,
//! stage uploads, then apply the whole cartesian expansion inside a single
//! transaction with one commit. The write loop decides insert vs. update per
//! combination from the guard's map; any error rolls back the session and
//! triggers staged-file compensation before it propagates, so no caller ever
//! observes a partially-applied expansion.
//!
//! State machine per submission: `validated → writing → {committed |
//! rolled_back}`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use sea_orm::*;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bacheca_common::{KIND_POST, PublicationSettings, PublishError, RESOURCE_COMMITTED};
use bacheca_persistence::entity::{listing, listing_image};

use crate::axis;
use crate::combination::{self, Combination};
use crate::deletion;
use crate::guard::{self, ExistingMap};
use crate::model::{DeletionOutcome, PublishOutcome, Submission};
use crate::notify::NotificationSender;
use crate::resources::{ResourceGroupController, ResourceStore, StagedUpload};

/// Outcome of the committed write section, handed out of the timed part of
/// the pipeline for post-commit processing.
struct Written<'a> {
    record_ids: Vec<i64>,
    replaced_paths: Vec<String>,
    group_id: Option<String>,
    controller: Option<ResourceGroupController<'a>>,
}

/// Publication facade owning the database handle, the resource store, the
/// notification collaborator, and the settings.
pub struct PublicationService {
    db: DatabaseConnection,
    store: Arc<dyn ResourceStore>,
    notifier: Arc<dyn NotificationSender>,
    settings: PublicationSettings,
}

impl PublicationService {
    pub fn new(
        db: DatabaseConnection,
        store: Arc<dyn ResourceStore>,
        notifier: Arc<dyn NotificationSender>,
        settings: PublicationSettings,
    ) -> Self {
        Self {
            db,
            store,
            notifier,
            settings,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Publish one submission under the per-request deadline. The deadline
    /// bounds resolution, the guard, staging, and the transactional write
    /// loop; on timeout the in-flight pipeline is cancelled (an open
    /// transaction rolls back when its session drops) and any files staged
    /// before cancellation are compensated here, exactly as on any other
    /// failure. Post-commit work runs outside the timed section: once the
    /// commit has succeeded, compensation must never run, or it would
    /// delete files the committed rows reference.
    pub async fn publish(&self, submission: Submission) -> Result<PublishOutcome, PublishError> {
        let deadline = Duration::from_secs(self.settings.request_deadline_secs);
        let staged_log: Mutex<Vec<String>> = Mutex::new(Vec::new());

        let written = match tokio::time::timeout(
            deadline,
            self.prepare_and_write(&submission, &staged_log),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                let paths = staged_log.lock().await;
                for path in paths.iter() {
                    if let Err(e) = self.store.delete(path).await {
                        warn!(path = %path, error = %e, "failed to delete staged file after timeout");
                    }
                }
                return Err(PublishError::DeadlineExceeded);
            }
        };

        if let Some(controller) = written.controller {
            controller.into_committed();
        }
        // Old files of replaced slots stay on disk until the commit has
        // confirmed the new paths are the rows' paths of record.
        for path in &written.replaced_paths {
            if let Err(e) = self.store.delete(path).await {
                warn!(path = %path, error = %e, "failed to delete replaced file");
            }
        }
        if let Err(e) = self
            .notifier
            .publication_succeeded(&submission.kind, &written.record_ids)
            .await
        {
            warn!(error = %e, "notification send failed");
        }
        info!(
            kind = %submission.kind,
            records = written.record_ids.len(),
            "submission committed"
        );
        Ok(PublishOutcome {
            record_ids: written.record_ids,
            image_group_id: written.group_id,
        })
    }

    /// Everything up to and including the commit. Cancellation-safe: until
    /// the commit succeeds there is nothing to keep, and on error the
    /// staged files are discarded before the error propagates.
    async fn prepare_and_write<'a>(
        &'a self,
        submission: &Submission,
        staged_log: &Mutex<Vec<String>>,
    ) -> Result<Written<'a>, PublishError> {
        let locations =
            axis::resolve_locations(&self.db, &submission.city_ids, &submission.sub_city_ids)
                .await?;
        let categories = axis::resolve_categories(
            &self.db,
            &submission.category_ids,
            &submission.sub_category_ids,
        )
        .await?;
        let combinations = combination::expand(&locations, &categories);
        debug!(
            kind = %submission.kind,
            combinations = combinations.len(),
            "submission expanded"
        );

        // The edit target must exist; its image group is reused for any
        // newly staged files.
        let existing_group = match submission.id {
            Some(id) => listing::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(PublishError::RecordNotFound(id))?
                .image_group_id,
            None => None,
        };

        // Advisory duplicate check, before any transaction or file write.
        let existing_map =
            guard::probe_existing(&self.db, &submission.kind, &combinations).await?;
        guard::check_duplicates(&existing_map, submission.id, &combinations)?;

        let controller = if submission.files.is_empty() {
            None
        } else {
            let controller = ResourceGroupController::stage(
                self.store.as_ref(),
                &submission.files,
                existing_group.clone(),
            )
            .await?;
            let mut log = staged_log.lock().await;
            log.extend(controller.staged().iter().map(|s| s.path.clone()));
            Some(controller)
        };

        let group_id = controller
            .as_ref()
            .map(|c| c.group_id().to_string())
            .or(existing_group);

        let staged: Vec<StagedUpload> = controller
            .as_ref()
            .map(|c| c.staged().to_vec())
            .unwrap_or_default();

        match self
            .write_combinations(submission, &combinations, &existing_map, group_id.as_deref(), &staged)
            .await
        {
            Ok((record_ids, replaced_paths)) => Ok(Written {
                record_ids,
                replaced_paths,
                group_id,
                controller,
            }),
            Err(e) => {
                if let Some(controller) = controller {
                    controller.discard().await;
                }
                Err(e)
            }
        }
    }

    /// Apply a pre-resolved combination set in one transaction with a single
    /// commit after the loop. Returns the written record ids and the old
    /// paths of replaced upload slots (deleted by the caller after commit).
    ///
    /// The guard map may be stale by the time the loop runs; the composite
    /// unique index backstops it, and a violation surfaces as
    /// [`PublishError::DuplicateCombination`] with nothing persisted.
    pub async fn write_combinations(
        &self,
        submission: &Submission,
        combinations: &[Combination],
        existing: &ExistingMap,
        group_id: Option<&str>,
        staged: &[StagedUpload],
    ) -> Result<(Vec<i64>, Vec<String>), PublishError> {
        let now = Local::now().naive_local();
        let expires_at = self.expiry_for(submission, now);

        let tx = self.db.begin().await?;
        let mut record_ids = Vec::with_capacity(combinations.len());

        let result = Self::apply_writes(
            &tx,
            submission,
            combinations,
            existing,
            group_id,
            staged,
            now,
            expires_at,
            &mut record_ids,
        )
        .await;

        match result {
            Ok(replaced_paths) => {
                tx.commit().await?;
                Ok((record_ids, replaced_paths))
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Posts carry a validity window; content blocks do not expire.
    fn expiry_for(&self, submission: &Submission, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if submission.kind == KIND_POST {
            let days = submission
                .validity_days
                .unwrap_or(self.settings.default_validity_days);
            Some(now + chrono::Duration::days(days))
        } else {
            None
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_writes(
        tx: &DatabaseTransaction,
        submission: &Submission,
        combinations: &[Combination],
        existing: &ExistingMap,
        group_id: Option<&str>,
        staged: &[StagedUpload],
        now: NaiveDateTime,
        expires_at: Option<NaiveDateTime>,
        record_ids: &mut Vec<i64>,
    ) -> Result<Vec<String>, PublishError> {
        for combo in combinations {
            match existing.get(&combo.key()) {
                // The guard map points this combination at the record being
                // edited: update it in place.
                Some(&record_id) if submission.id == Some(record_id) => {
                    let active = listing::ActiveModel {
                        id: Set(record_id),
                        city_id: Set(combo.city_id),
                        sub_city_id: Set(combo.sub_city_id),
                        category_id: Set(combo.category_id),
                        sub_category_id: Set(combo.sub_category_id),
                        title: Set(submission.payload.title.clone()),
                        body: Set(submission.payload.body.clone()),
                        attrs: Set(submission.payload.attrs.clone()),
                        image_group_id: Set(group_id.map(str::to_string)),
                        expires_at: Set(expires_at),
                        gmt_modified: Set(now),
                        ..Default::default()
                    };
                    active
                        .update(tx)
                        .await
                        .map_err(|e| map_write_err(e, combo))?;
                    record_ids.push(record_id);
                }
                // No record for this combination (or a stale map entry the
                // unique index will catch): insert.
                _ => {
                    let active = listing::ActiveModel {
                        id: NotSet,
                        kind: Set(submission.kind.clone()),
                        city_id: Set(combo.city_id),
                        sub_city_id: Set(combo.sub_city_id),
                        category_id: Set(combo.category_id),
                        sub_category_id: Set(combo.sub_category_id),
                        title: Set(submission.payload.title.clone()),
                        body: Set(submission.payload.body.clone()),
                        attrs: Set(submission.payload.attrs.clone()),
                        image_group_id: Set(group_id.map(str::to_string)),
                        created_by: Set(submission.actor.clone()),
                        expires_at: Set(expires_at),
                        gmt_create: Set(now),
                        gmt_modified: Set(now),
                    };
                    let inserted = listing::Entity::insert(active)
                        .exec(tx)
                        .await
                        .map_err(|e| map_write_err(e, combo))?;
                    record_ids.push(inserted.last_insert_id);
                }
            }
        }

        // Image rows for the staged uploads: update the slot's row when the
        // group already has one (capturing the old path for post-commit
        // deletion), insert otherwise.
        let mut replaced_paths = Vec::new();
        if let Some(group_id) = group_id {
            for upload in staged {
                let slot_row = listing_image::Entity::find()
                    .filter(listing_image::Column::GroupId.eq(group_id))
                    .filter(listing_image::Column::Slot.eq(&upload.slot))
                    .one(tx)
                    .await?;
                match slot_row {
                    Some(row) => {
                        if row.path != upload.path {
                            replaced_paths.push(row.path.clone());
                        }
                        let mut active: listing_image::ActiveModel = row.into();
                        active.path = Set(upload.path.clone());
                        active.status = Set(RESOURCE_COMMITTED.to_string());
                        active.update(tx).await?;
                    }
                    None => {
                        let active = listing_image::ActiveModel {
                            id: NotSet,
                            group_id: Set(group_id.to_string()),
                            slot: Set(upload.slot.clone()),
                            path: Set(upload.path.clone()),
                            status: Set(RESOURCE_COMMITTED.to_string()),
                            gmt_create: Set(now),
                        };
                        listing_image::Entity::insert(active).exec(tx).await?;
                    }
                }
            }
        }

        Ok(replaced_paths)
    }

    /// Batch-delete listings through the cascading deletion coordinator.
    pub async fn delete(&self, ids: &[i64]) -> Result<DeletionOutcome, PublishError> {
        deletion::delete_listings(&self.db, self.store.as_ref(), ids).await
    }
}

/// A unique-constraint violation inside the write loop means the advisory
/// guard raced a concurrent submission; surface it as the same typed error
/// the guard itself produces.
fn map_write_err(e: DbErr, combo: &Combination) -> PublishError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        PublishError::DuplicateCombination {
            sub_city: combo.sub_city_name.clone(),
            sub_category: combo.sub_category_name.clone(),
        }
    } else {
        PublishError::TransactionFailure(e)
    }
}
