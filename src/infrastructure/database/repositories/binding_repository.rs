//! SeaORM implementation of AttributeBindingRepository
//!
//! Every multi-row write runs in one database transaction; dropping the
//! transaction on an early `?` rolls it back.

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::binding::{AttributeBinding, AttributeBindingRepository, FieldGroup, NewBinding};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::attribute_binding;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: attribute_binding::Model) -> AttributeBinding {
    AttributeBinding {
        id: m.id,
        service_type_id: m.service_type_id,
        attribute_id: m.attribute_id,
        is_required: m.is_required,
        is_visible: m.is_visible,
        display_order: u32::try_from(m.display_order).unwrap_or(0),
        field_group: FieldGroup::parse(&m.field_group).unwrap_or_default(),
        override_label: m.override_label,
        override_placeholder: m.override_placeholder,
        override_help_text: m.override_help_text,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn order_to_entity(order: u32) -> i32 {
    i32::try_from(order).unwrap_or(i32::MAX)
}

// ── SeaOrmBindingRepository ─────────────────────────────────────

pub struct SeaOrmBindingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBindingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttributeBindingRepository for SeaOrmBindingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeBinding>> {
        let model = attribute_binding::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_service_type(&self, service_type_id: &str) -> DomainResult<Vec<AttributeBinding>> {
        let models = attribute_binding::Entity::find()
            .filter(attribute_binding::Column::ServiceTypeId.eq(service_type_id))
            .order_by_asc(attribute_binding::Column::DisplayOrder)
            .order_by_asc(attribute_binding::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn count_for_attribute(&self, attribute_id: i32) -> DomainResult<u64> {
        attribute_binding::Entity::find()
            .filter(attribute_binding::Column::AttributeId.eq(attribute_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn insert_batch(&self, bindings: Vec<NewBinding>) -> DomainResult<Vec<AttributeBinding>> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut inserted = Vec::with_capacity(bindings.len());
        for b in bindings {
            let model = attribute_binding::ActiveModel {
                id: NotSet,
                service_type_id: Set(b.service_type_id),
                attribute_id: Set(b.attribute_id),
                is_required: Set(b.is_required),
                is_visible: Set(b.is_visible),
                display_order: Set(order_to_entity(b.display_order)),
                field_group: Set(b.field_group.as_str().to_string()),
                override_label: Set(None),
                override_placeholder: Set(None),
                override_help_text: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let result = model.insert(&txn).await.map_err(db_err)?;
            inserted.push(entity_to_domain(result));
        }

        txn.commit().await.map_err(db_err)?;
        info!("Inserted {} attribute binding(s)", inserted.len());
        Ok(inserted)
    }

    async fn update(&self, b: AttributeBinding) -> DomainResult<()> {
        let existing = attribute_binding::Entity::find_by_id(b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("AttributeBinding", "id", b.id));
        };

        let mut active: attribute_binding::ActiveModel = existing.into();
        active.is_required = Set(b.is_required);
        active.is_visible = Set(b.is_visible);
        active.display_order = Set(order_to_entity(b.display_order));
        active.field_group = Set(b.field_group.as_str().to_string());
        active.override_label = Set(b.override_label);
        active.override_placeholder = Set(b.override_placeholder);
        active.override_help_text = Set(b.override_help_text);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(db_err)?;
        info!("Attribute binding {} updated", b.id);
        Ok(())
    }

    async fn swap_display_order(&self, first_id: i32, second_id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let first = attribute_binding::Entity::find_by_id(first_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("AttributeBinding", "id", first_id))?;
        let second = attribute_binding::Entity::find_by_id(second_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("AttributeBinding", "id", second_id))?;

        let now = Utc::now();
        let (first_order, second_order) = (first.display_order, second.display_order);

        let mut a: attribute_binding::ActiveModel = first.into();
        a.display_order = Set(second_order);
        a.updated_at = Set(now);
        a.update(&txn).await.map_err(db_err)?;

        let mut b: attribute_binding::ActiveModel = second.into();
        b.display_order = Set(first_order);
        b.updated_at = Set(now);
        b.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!("Swapped display order of bindings {} and {}", first_id, second_id);
        Ok(())
    }

    async fn renumber(&self, orders: &[(i32, u32)]) -> DomainResult<()> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        for (id, order) in orders {
            let result = attribute_binding::Entity::update_many()
                .col_expr(
                    attribute_binding::Column::DisplayOrder,
                    Expr::value(order_to_entity(*order)),
                )
                .col_expr(attribute_binding::Column::UpdatedAt, Expr::value(now))
                .filter(attribute_binding::Column::Id.eq(*id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            if result.rows_affected == 0 {
                return Err(DomainError::not_found("AttributeBinding", "id", id));
            }
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_batch(&self, service_type_id: &str, attribute_ids: &[i32]) -> DomainResult<u64> {
        if attribute_ids.is_empty() {
            return Ok(0);
        }
        let result = attribute_binding::Entity::delete_many()
            .filter(attribute_binding::Column::ServiceTypeId.eq(service_type_id))
            .filter(attribute_binding::Column::AttributeId.is_in(attribute_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        info!(
            "Removed {} binding(s) from service type {}",
            result.rows_affected, service_type_id
        );
        Ok(result.rows_affected)
    }
}
