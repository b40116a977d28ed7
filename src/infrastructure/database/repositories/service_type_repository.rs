//! SeaORM implementation of ServiceTypeRepository

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::db_err;
use crate::domain::service_type::{ServiceType, ServiceTypeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{attribute_binding, service_type};

fn entity_to_domain(m: service_type::Model) -> ServiceType {
    ServiceType {
        id: m.id,
        name: m.name,
        is_active: m.is_active,
        sort_order: m.sort_order,
    }
}

pub struct SeaOrmServiceTypeRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceTypeRepository for SeaOrmServiceTypeRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceType>> {
        let model = service_type::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<ServiceType>> {
        let models = service_type::Entity::find()
            .filter(service_type::Column::IsActive.eq(true))
            .order_by_asc(service_type::Column::SortOrder)
            .order_by_asc(service_type::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, st: ServiceType) -> DomainResult<()> {
        let existing = service_type::Entity::find_by_id(st.id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match existing {
            Some(existing) => {
                let mut active: service_type::ActiveModel = existing.into();
                active.name = Set(st.name);
                active.is_active = Set(st.is_active);
                active.sort_order = Set(st.sort_order);
                active.update(&self.db).await.map_err(db_err)?;
                info!("Service type {} updated", st.id);
            }
            None => {
                let model = service_type::ActiveModel {
                    id: Set(st.id.clone()),
                    name: Set(st.name),
                    is_active: Set(st.is_active),
                    sort_order: Set(st.sort_order),
                };
                model.insert(&self.db).await.map_err(db_err)?;
                info!("Service type {} created", st.id);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let bindings = attribute_binding::Entity::delete_many()
            .filter(attribute_binding::Column::ServiceTypeId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = service_type::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ServiceType", "id", id));
        }

        txn.commit().await.map_err(db_err)?;
        info!(
            "Service type {} deleted with {} binding(s)",
            id, bindings.rows_affected
        );
        Ok(())
    }
}
