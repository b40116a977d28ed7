//! SeaORM implementation of ServiceAreaRepository

use std::collections::BTreeSet;

use async_trait::async_trait;
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set,
};

use super::db_err;
use crate::domain::service_area::{GeoPoint, ServiceArea, ServiceAreaRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::service_area;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: service_area::Model) -> ServiceArea {
    let service_types = match serde_json::from_str::<BTreeSet<String>>(&m.service_types) {
        Ok(types) => types,
        Err(e) => {
            warn!("Service area {} has unreadable service types: {}", m.pincode, e);
            BTreeSet::new()
        }
    };

    ServiceArea {
        id: m.id,
        pincode: m.pincode,
        city: m.city,
        state: m.state,
        country: m.country,
        is_serviceable: m.is_serviceable,
        service_types,
        delivery_time_hours: m.delivery_time_hours.and_then(|h| u32::try_from(h).ok()),
        delivery_charge: m.delivery_charge,
        location: match (m.latitude, m.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        },
    }
}

fn service_types_json(types: &BTreeSet<String>) -> String {
    serde_json::Value::from(types.iter().cloned().collect::<Vec<_>>()).to_string()
}

fn hours_to_entity(hours: Option<u32>) -> Option<i32> {
    hours.map(|h| i32::try_from(h).unwrap_or(i32::MAX))
}

// ── SeaOrmServiceAreaRepository ─────────────────────────────────

pub struct SeaOrmServiceAreaRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceAreaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceAreaRepository for SeaOrmServiceAreaRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ServiceArea>> {
        let model = service_area::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_pincode(&self, pincode: &str) -> DomainResult<Option<ServiceArea>> {
        let model = service_area::Entity::find()
            .filter(service_area::Column::Pincode.eq(pincode))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_geolocated(&self) -> DomainResult<Vec<ServiceArea>> {
        let models = service_area::Entity::find()
            .filter(service_area::Column::Latitude.is_not_null())
            .filter(service_area::Column::Longitude.is_not_null())
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, area: ServiceArea) -> DomainResult<ServiceArea> {
        let location = area.location;
        let service_types = service_types_json(&area.service_types);

        if area.id == 0 {
            let model = service_area::ActiveModel {
                id: NotSet,
                pincode: Set(area.pincode),
                city: Set(area.city),
                state: Set(area.state),
                country: Set(area.country),
                is_serviceable: Set(area.is_serviceable),
                service_types: Set(service_types),
                delivery_time_hours: Set(hours_to_entity(area.delivery_time_hours)),
                delivery_charge: Set(area.delivery_charge),
                latitude: Set(location.map(|p| p.latitude)),
                longitude: Set(location.map(|p| p.longitude)),
            };
            let result = model.insert(&self.db).await.map_err(db_err)?;
            info!("Service area saved: {} ({})", result.pincode, result.id);
            return Ok(entity_to_domain(result));
        }

        let existing = service_area::Entity::find_by_id(area.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("ServiceArea", "id", area.id));
        };

        let mut active: service_area::ActiveModel = existing.into();
        active.pincode = Set(area.pincode);
        active.city = Set(area.city);
        active.state = Set(area.state);
        active.country = Set(area.country);
        active.is_serviceable = Set(area.is_serviceable);
        active.service_types = Set(service_types);
        active.delivery_time_hours = Set(hours_to_entity(area.delivery_time_hours));
        active.delivery_charge = Set(area.delivery_charge);
        active.latitude = Set(location.map(|p| p.latitude));
        active.longitude = Set(location.map(|p| p.longitude));

        let result = active.update(&self.db).await.map_err(db_err)?;
        info!("Service area {} updated", result.id);
        Ok(entity_to_domain(result))
    }
}
