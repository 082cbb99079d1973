//! `SeaORM` Entity for listing_image table
//!
//! One row per uploaded file. Files belonging to one submission share a
//! `group_id`; on-disk paths are derived from the group id and the upload
//! slot name.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "listing_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: String,
    /// Upload slot the file fills (e.g. "main", "thumb").
    pub slot: String,
    /// Path relative to the resource store root.
    pub path: String,
    /// Always "committed": rows are written only after the transaction that
    /// owns them commits. Staged files have no row yet.
    pub status: String,
    pub gmt_create: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
