//! Service area entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Postal-code region
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_areas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub pincode: String,

    pub city: String,
    pub state: String,
    pub country: String,

    pub is_serviceable: bool,

    /// JSON array of service type ids offered here
    #[sea_orm(column_type = "Text")]
    pub service_types: String,

    pub delivery_time_hours: Option<i32>,

    /// Minor currency units
    pub delivery_charge: Option<i64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::area_offering::Entity")]
    AreaOfferings,
}

impl Related<super::area_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AreaOfferings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
