//! Attribute binding entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attachment of an attribute definition to a service type
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_bindings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service_type_id: String,
    pub attribute_id: i32,

    pub is_required: bool,
    pub is_visible: bool,

    /// Dense 0..n-1 after normalization
    pub display_order: i32,

    pub field_group: String,

    pub override_label: Option<String>,
    pub override_placeholder: Option<String>,
    pub override_help_text: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_type::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_type::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceType,
    #[sea_orm(
        belongs_to = "super::attribute_definition::Entity",
        from = "Column::AttributeId",
        to = "super::attribute_definition::Column::Id",
        on_delete = "Restrict"
    )]
    AttributeDefinition,
}

impl Related<super::service_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceType.def()
    }
}

impl Related<super::attribute_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
