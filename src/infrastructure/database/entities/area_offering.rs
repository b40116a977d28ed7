//! Per-area price and stock of an offering

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "area_offerings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service_area_id: i32,
    pub offering_id: i32,

    /// Minor currency units
    pub price: i64,
    pub stock: Option<i64>,
    pub is_available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_area::Entity",
        from = "Column::ServiceAreaId",
        to = "super::service_area::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceArea,
    #[sea_orm(
        belongs_to = "super::offering::Entity",
        from = "Column::OfferingId",
        to = "super::offering::Column::Id",
        on_delete = "Cascade"
    )]
    Offering,
}

impl Related<super::service_area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceArea.def()
    }
}

impl Related<super::offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offering.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
