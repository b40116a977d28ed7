//! Offering entity (product or service in the global catalog)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offerings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service_type_id: String,
    pub category_id: Option<i32>,
    pub name: String,

    /// Minor currency units
    pub base_price: i64,

    /// NULL means stock is not tracked
    pub stock: Option<i64>,

    pub is_active: bool,
    pub primary_image_url: Option<String>,

    /// JSON object of custom field values
    #[sea_orm(column_type = "Text")]
    pub custom_fields: String,

    // Pre-custom-field columns still populated for older offerings
    pub brand: Option<String>,
    pub rating: Option<String>,
    pub seats: Option<String>,
    pub transmission: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::area_offering::Entity")]
    AreaOfferings,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::area_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AreaOfferings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
