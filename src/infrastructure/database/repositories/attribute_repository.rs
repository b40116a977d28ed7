//! SeaORM implementation of AttributeDefinitionRepository

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::db_err;
use crate::domain::attribute::{
    AttributeDefinition, AttributeDefinitionRepository, DataType, EntityType, InputType,
    NewAttributeDefinition,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::attribute_definition;

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: attribute_definition::Model) -> AttributeDefinition {
    AttributeDefinition {
        id: m.id,
        data_type: DataType::parse(&m.data_type),
        input_type: InputType::from_parts(&m.input_type, m.options.as_deref()),
        applicable_entity_types: parse_entity_types(m.id, &m.applicable_entity_types),
        name: m.name,
        label: m.label,
        placeholder: m.placeholder,
        help_text: m.help_text,
        group_name: m.group_name,
        default_value: m.default_value,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn parse_entity_types(id: i32, raw: &str) -> BTreeSet<EntityType> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keys) => keys.iter().filter_map(|k| EntityType::parse(k)).collect(),
        Err(e) => {
            warn!("Attribute {} has unreadable entity types {:?}: {}", id, raw, e);
            BTreeSet::new()
        }
    }
}

fn entity_types_json(types: &BTreeSet<EntityType>) -> String {
    serde_json::Value::from(types.iter().map(|t| t.as_str()).collect::<Vec<_>>()).to_string()
}

// ── SeaOrmAttributeRepository ───────────────────────────────────

pub struct SeaOrmAttributeRepository {
    db: DatabaseConnection,
}

impl SeaOrmAttributeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttributeDefinitionRepository for SeaOrmAttributeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeDefinition>> {
        let model = attribute_definition::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AttributeDefinition>> {
        let model = attribute_definition::Entity::find()
            .filter(attribute_definition::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<AttributeDefinition>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = attribute_definition::Entity::find()
            .filter(attribute_definition::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<AttributeDefinition>> {
        let models = attribute_definition::Entity::find()
            .order_by_asc(attribute_definition::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, d: NewAttributeDefinition) -> DomainResult<AttributeDefinition> {
        let now = Utc::now();
        let model = attribute_definition::ActiveModel {
            id: NotSet,
            name: Set(d.name),
            label: Set(d.label),
            data_type: Set(d.data_type.as_str().to_string()),
            input_type: Set(d.input_type.kind().to_string()),
            options: Set(d.input_type.options_json()),
            placeholder: Set(d.placeholder),
            help_text: Set(d.help_text),
            group_name: Set(d.group_name),
            default_value: Set(d.default_value),
            applicable_entity_types: Set(entity_types_json(&d.applicable_entity_types)),
            is_active: Set(d.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!("Attribute definition saved: {} ({})", result.name, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, d: AttributeDefinition) -> DomainResult<()> {
        let existing = attribute_definition::Entity::find_by_id(d.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("AttributeDefinition", "id", d.id));
        };

        let mut active: attribute_definition::ActiveModel = existing.into();
        active.name = Set(d.name);
        active.label = Set(d.label);
        active.data_type = Set(d.data_type.as_str().to_string());
        active.input_type = Set(d.input_type.kind().to_string());
        active.options = Set(d.input_type.options_json());
        active.placeholder = Set(d.placeholder);
        active.help_text = Set(d.help_text);
        active.group_name = Set(d.group_name);
        active.default_value = Set(d.default_value);
        active.applicable_entity_types = Set(entity_types_json(&d.applicable_entity_types));
        active.is_active = Set(d.is_active);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(db_err)?;
        info!("Attribute definition {} updated", d.id);
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = attribute_definition::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("AttributeDefinition", "id", id));
        }
        info!("Attribute definition {} deleted", id);
        Ok(())
    }
}
