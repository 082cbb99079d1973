//! Resource store and staged upload lifecycle
//!
//! Uploaded files are a side effect outside the relational transaction
//! boundary, so every write path shares one compensation routine here
//! instead of per-call-site cleanup. A `ResourceGroupController` stages the
//! files of one submission; the caller either consumes it with
//! [`ResourceGroupController::into_committed`] after the transaction commits
//! or calls [`ResourceGroupController::discard`] on any failure, which
//! deletes exactly the paths staged by that call and nothing else.

use std::io;
use std::path::PathBuf;

use tracing::warn;
use uuid::Uuid;

use bacheca_common::PublishError;

use crate::model::UploadedFile;

/// Filesystem abstraction for uploaded resources. Paths are relative to the
/// store's root.
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    async fn save(&self, path: &str, bytes: &[u8]) -> io::Result<()>;
    async fn delete(&self, path: &str) -> io::Result<()>;
    async fn exists(&self, path: &str) -> bool;
}

/// Local-filesystem resource store with an explicitly injected root
/// directory.
pub struct LocalResourceStore {
    root: PathBuf,
}

impl LocalResourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait::async_trait]
impl ResourceStore for LocalResourceStore {
    async fn save(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await
    }

    async fn delete(&self, path: &str) -> io::Result<()> {
        let full = self.full_path(path);
        tokio::fs::remove_file(&full).await?;
        // Drop the group directory once its last file is gone.
        if let Some(parent) = full.parent() {
            let _ = tokio::fs::remove_dir(parent).await;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.full_path(path))
            .await
            .unwrap_or(false)
    }
}

/// One staged file: the slot it fills and its store-relative path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedUpload {
    pub slot: String,
    pub path: String,
}

/// Stages the uploads of one submission under a shared group id and owns
/// their compensation until the enclosing transaction commits.
pub struct ResourceGroupController<'a> {
    store: &'a dyn ResourceStore,
    group_id: String,
    staged: Vec<StagedUpload>,
}

impl<'a> ResourceGroupController<'a> {
    /// Stage all uploads, reusing `existing_group` in the edit case or
    /// allocating a fresh group id otherwise. Each file gets a unique name
    /// within the group directory, so a replaced slot never overwrites the
    /// old file before commit. If any write fails, files staged so far are
    /// deleted before the error is returned.
    pub async fn stage(
        store: &'a dyn ResourceStore,
        files: &[UploadedFile],
        existing_group: Option<String>,
    ) -> Result<ResourceGroupController<'a>, PublishError> {
        let group_id = existing_group.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut controller = Self {
            store,
            group_id,
            staged: Vec::with_capacity(files.len()),
        };

        for file in files {
            let name = format!("{}-{}.{}", file.slot, Uuid::new_v4().simple(), file.ext);
            let path = format!("{}/{}", controller.group_id, name);
            match store.save(&path, &file.bytes).await {
                Ok(()) => controller.staged.push(StagedUpload {
                    slot: file.slot.clone(),
                    path,
                }),
                Err(source) => {
                    controller.discard().await;
                    return Err(PublishError::ResourceStageFailure { path, source });
                }
            }
        }

        Ok(controller)
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn staged(&self) -> &[StagedUpload] {
        &self.staged
    }

    /// Compensation: delete every path staged by this call. Missing files
    /// are logged and skipped; compensation is best effort by contract.
    pub async fn discard(self) {
        for upload in &self.staged {
            if let Err(e) = self.store.delete(&upload.path).await {
                warn!(path = %upload.path, error = %e, "failed to delete staged file");
            }
        }
    }

    /// Consume the controller after a successful commit: staged paths are
    /// retained and become the group's committed files.
    pub fn into_committed(self) -> (String, Vec<StagedUpload>) {
        (self.group_id, self.staged)
    }
}
