//! `SeaORM` Entity for listing table
//!
//! One row per combination of sub-city and sub-category produced by a
//! submission. Dimension ids are denormalized: every row carries its leaf
//! ids and their ancestors, not just leaf foreign keys. The combination is
//! guarded by a composite unique index on `(kind, sub_city_id,
//! sub_category_id)` in addition to the advisory pre-check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discriminator scoping the uniqueness invariant (page_content, post).
    pub kind: String,
    pub city_id: i64,
    pub sub_city_id: i64,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// Free-form scalar fields carried by the submission payload.
    #[sea_orm(column_type = "Json", nullable)]
    pub attrs: Option<Json>,
    /// Shared image-group id; many listings from one submission point at
    /// the same group.
    pub image_group_id: Option<String>,
    pub created_by: String,
    pub expires_at: Option<DateTime>,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sub_city::Entity",
        from = "Column::SubCityId",
        to = "super::sub_city::Column::Id"
    )]
    SubCity,
    #[sea_orm(
        belongs_to = "super::sub_category::Entity",
        from = "Column::SubCategoryId",
        to = "super::sub_category::Column::Id"
    )]
    SubCategory,
}

impl Related<super::sub_city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCity.def()
    }
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
