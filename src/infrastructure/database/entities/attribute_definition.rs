//! Attribute definition entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reusable custom field definition
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_definitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Machine key, unique
    #[sea_orm(unique)]
    pub name: String,

    pub label: Option<String>,

    /// "text", "number", "decimal", "boolean", "date" or "json"
    pub data_type: String,

    /// "text", "number", "textarea", "boolean" or "select"
    pub input_type: String,

    /// JSON array of select options
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,

    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub group_name: Option<String>,
    pub default_value: Option<String>,

    /// JSON array of entity type keys
    #[sea_orm(column_type = "Text")]
    pub applicable_entity_types: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
