//! Submission and outcome types
//!
//! `Submission` is the ephemeral input shape produced by the (out-of-scope)
//! request handlers: raw comma-delimited axis id lists in transport form, a
//! content payload, and zero or more uploaded blobs. It is never persisted.

use serde::{Deserialize, Serialize};

/// One admin submission, covering both the create case (`id` absent) and the
/// edit case (`id` present).
#[derive(Clone, Debug, Default)]
pub struct Submission {
    /// Edit target; `None` means create.
    pub id: Option<i64>,
    /// Discriminator scoping the uniqueness invariant (see
    /// [`bacheca_common::KIND_PAGE_CONTENT`] / [`bacheca_common::KIND_POST`]).
    pub kind: String,
    /// Raw comma-delimited id lists, one per axis level.
    pub city_ids: String,
    pub sub_city_ids: String,
    pub category_ids: String,
    pub sub_category_ids: String,
    pub payload: Payload,
    pub files: Vec<UploadedFile>,
    /// Acting principal id, supplied by the auth layer, stored in the audit
    /// columns.
    pub actor: String,
    /// Validity window override; when `None`, posts fall back to the
    /// settings default.
    pub validity_days: Option<i64>,
}

/// Content fields persisted on every row of the expansion.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Payload {
    pub title: String,
    pub body: String,
    /// Free-form scalar fields the handler passes through untyped.
    pub attrs: Option<serde_json::Value>,
}

/// One uploaded blob, keyed by its form slot.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Upload slot the file fills (e.g. "main", "thumb").
    pub slot: String,
    /// File extension the derived path keeps (e.g. "jpg").
    pub ext: String,
    pub bytes: Vec<u8>,
}

/// Successful publication result.
#[derive(Clone, Debug, Serialize)]
pub struct PublishOutcome {
    /// Ids of the rows created or updated, in combination order.
    pub record_ids: Vec<i64>,
    /// Image group the rows reference, when files were involved.
    pub image_group_id: Option<String>,
}

/// Batch-deletion result: row and file counts are the only partial-success
/// signal the caller gets.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeletionOutcome {
    pub rows_deleted: u64,
    pub files_deleted: u64,
}
