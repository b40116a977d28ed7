//! Attribute registry service
//!
//! Administers attribute definitions independently of any service type.
//! A definition's `name` is frozen once a binding references it.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::domain::attribute::{
    AttributeDefinition, AttributeDefinitionPatch, EntityType, NewAttributeDefinition,
};
use crate::domain::binding::is_mandatory_key;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct AttributeRegistryService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AttributeRegistryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_definition(
        &self,
        definition: NewAttributeDefinition,
    ) -> DomainResult<AttributeDefinition> {
        definition.validate()?;
        reject_reserved(&definition.name)?;

        if self
            .repos
            .attributes()
            .find_by_name(&definition.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "attribute '{}' already exists",
                definition.name
            )));
        }

        let saved = self.repos.attributes().save(definition).await?;
        info!(attribute_id = saved.id, name = saved.name.as_str(), "Attribute definition created");
        Ok(saved)
    }

    pub async fn get_definition(&self, id: i32) -> DomainResult<AttributeDefinition> {
        self.repos
            .attributes()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("AttributeDefinition", "id", id))
    }

    pub async fn update_definition(
        &self,
        id: i32,
        mut patch: AttributeDefinitionPatch,
    ) -> DomainResult<AttributeDefinition> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(DomainError::Validation("patch has no fields".to_string()));
        }

        let mut definition = self.get_definition(id).await?;

        if let Some(name) = patch.name.take().filter(|n| *n != definition.name) {
            reject_reserved(&name)?;
            let bound = self.repos.bindings().count_for_attribute(id).await?;
            if bound > 0 {
                return Err(DomainError::Conflict(format!(
                    "attribute '{}' is bound to {} service type(s) and cannot be renamed",
                    definition.name, bound
                )));
            }
            if self.repos.attributes().find_by_name(&name).await?.is_some() {
                return Err(DomainError::Conflict(format!("attribute '{}' already exists", name)));
            }
            definition.name = name;
        }

        patch.apply_to(&mut definition);
        self.repos.attributes().update(definition.clone()).await?;
        info!(attribute_id = id, "Attribute definition updated");
        Ok(definition)
    }

    pub async fn set_active(&self, id: i32, active: bool) -> DomainResult<AttributeDefinition> {
        let mut definition = self.get_definition(id).await?;
        if definition.is_active != active {
            definition.is_active = active;
            definition.updated_at = chrono::Utc::now();
            self.repos.attributes().update(definition.clone()).await?;
            info!(attribute_id = id, active, "Attribute definition activation changed");
        }
        Ok(definition)
    }

    /// Deleting is refused while any service type still binds the definition.
    pub async fn delete_definition(&self, id: i32) -> DomainResult<()> {
        let definition = self.get_definition(id).await?;
        let bound = self.repos.bindings().count_for_attribute(id).await?;
        if bound > 0 {
            return Err(DomainError::Conflict(format!(
                "attribute '{}' is still bound to {} service type(s)",
                definition.name, bound
            )));
        }
        self.repos.attributes().delete(id).await?;
        info!(attribute_id = id, name = definition.name.as_str(), "Attribute definition deleted");
        Ok(())
    }

    /// Definitions sorted by name, optionally restricted to one entity type.
    pub async fn list_definitions(
        &self,
        entity_type: Option<EntityType>,
    ) -> DomainResult<Vec<AttributeDefinition>> {
        let mut definitions: Vec<AttributeDefinition> = self
            .repos
            .attributes()
            .find_all()
            .await?
            .into_iter()
            .filter(|d| entity_type.map_or(true, |t| d.applies_to(t)))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(definitions)
    }

    /// Active product/service definitions not yet bound to the service type;
    /// what an admin may still pass to `add_bindings`.
    pub async fn available_for(&self, service_type_id: &str) -> DomainResult<Vec<AttributeDefinition>> {
        self.repos
            .service_types()
            .find_by_id(service_type_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceType", "id", service_type_id))?;

        let bound: HashSet<i32> = self
            .repos
            .bindings()
            .find_by_service_type(service_type_id)
            .await?
            .into_iter()
            .map(|b| b.attribute_id)
            .collect();

        Ok(self
            .list_definitions(None)
            .await?
            .into_iter()
            .filter(|d| d.is_active && !bound.contains(&d.id))
            .filter(|d| d.applies_to(EntityType::Product) || d.applies_to(EntityType::Service))
            .collect())
    }
}

fn reject_reserved(name: &str) -> DomainResult<()> {
    if is_mandatory_key(name) {
        return Err(DomainError::Validation(format!(
            "'{}' is reserved for a mandatory field",
            name
        )));
    }
    Ok(())
}
