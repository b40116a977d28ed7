//! Service type entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business vertical (e.g. "grocery", "handyman")
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_types")]
pub struct Model {
    /// Stable machine key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Inactive types are never offered to customers
    pub is_active: bool,

    /// Position in customer-facing lists
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attribute_binding::Entity")]
    AttributeBindings,
}

impl Related<super::attribute_binding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeBindings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
