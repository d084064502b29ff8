//! Room entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rate_plan::Entity")]
    RatePlan,
    #[sea_orm(has_many = "super::blocked_range::Entity")]
    BlockedRange,
}

impl Related<super::rate_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatePlan.def()
    }
}

impl Related<super::blocked_range::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlockedRange.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
