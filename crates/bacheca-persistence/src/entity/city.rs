//! `SeaORM` Entity for city table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "city")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_city::Entity")]
    SubCity,
}

impl Related<super::sub_city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
