//! In-memory repositories for development and testing
//!
//! Multi-row binding writes run under one mutex so they are all-or-nothing,
//! mirroring the transactional SeaORM implementation. An [`UpstreamSwitch`]
//! lets tests simulate the backend going away.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::attribute::{AttributeDefinition, AttributeDefinitionRepository, NewAttributeDefinition};
use crate::domain::binding::{AttributeBinding, AttributeBindingRepository, NewBinding};
use crate::domain::catalog::{
    AreaPricing, CatalogQuery, CatalogRepository, CatalogRow, Category, Offering,
};
use crate::domain::service_area::{ServiceArea, ServiceAreaRepository};
use crate::domain::service_type::{ServiceType, ServiceTypeRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

// ── Failure injection ───────────────────────────────────────────

/// Simulated backend health shared by all in-memory repositories
#[derive(Debug, Default)]
pub struct UpstreamSwitch {
    down: AtomicBool,
    failures: AtomicU32,
}

impl UpstreamSwitch {
    fn check(&self) -> DomainResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(DomainError::UpstreamUnavailable("in-memory store is down".to_string()));
        }
        let consumed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if consumed {
            return Err(DomainError::UpstreamUnavailable("injected transient failure".to_string()));
        }
        Ok(())
    }
}

// ── Attribute definitions ───────────────────────────────────────

pub struct InMemoryAttributeRepository {
    upstream: Arc<UpstreamSwitch>,
    definitions: DashMap<i32, AttributeDefinition>,
    counter: AtomicI32,
}

impl InMemoryAttributeRepository {
    fn insert(&self, new: NewAttributeDefinition) -> DomainResult<AttributeDefinition> {
        if self.definitions.iter().any(|d| d.name == new.name) {
            return Err(DomainError::Conflict(format!("attribute '{}' already exists", new.name)));
        }
        let now = Utc::now();
        let definition = AttributeDefinition {
            id: self.counter.fetch_add(1, Ordering::SeqCst),
            name: new.name,
            label: new.label,
            data_type: new.data_type,
            input_type: new.input_type,
            placeholder: new.placeholder,
            help_text: new.help_text,
            group_name: new.group_name,
            default_value: new.default_value,
            applicable_entity_types: new.applicable_entity_types,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        self.definitions.insert(definition.id, definition.clone());
        Ok(definition)
    }
}

#[async_trait]
impl AttributeDefinitionRepository for InMemoryAttributeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeDefinition>> {
        self.upstream.check()?;
        Ok(self.definitions.get(&id).map(|d| d.clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AttributeDefinition>> {
        self.upstream.check()?;
        Ok(self
            .definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<AttributeDefinition>> {
        self.upstream.check()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.definitions.get(id).map(|d| d.clone()))
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<AttributeDefinition>> {
        self.upstream.check()?;
        Ok(self.definitions.iter().map(|d| d.value().clone()).collect())
    }

    async fn save(&self, definition: NewAttributeDefinition) -> DomainResult<AttributeDefinition> {
        self.upstream.check()?;
        self.insert(definition)
    }

    async fn update(&self, definition: AttributeDefinition) -> DomainResult<()> {
        self.upstream.check()?;
        if !self.definitions.contains_key(&definition.id) {
            return Err(DomainError::not_found("AttributeDefinition", "id", definition.id));
        }
        self.definitions.insert(definition.id, definition);
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.upstream.check()?;
        self.definitions
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("AttributeDefinition", "id", id))?;
        Ok(())
    }
}

// ── Bindings ────────────────────────────────────────────────────

#[derive(Debug)]
struct BindingTable {
    rows: BTreeMap<i32, AttributeBinding>,
    next_id: i32,
}

fn lock(table: &Mutex<BindingTable>) -> MutexGuard<'_, BindingTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct InMemoryBindingRepository {
    upstream: Arc<UpstreamSwitch>,
    table: Arc<Mutex<BindingTable>>,
}

#[async_trait]
impl AttributeBindingRepository for InMemoryBindingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeBinding>> {
        self.upstream.check()?;
        Ok(lock(&self.table).rows.get(&id).cloned())
    }

    async fn find_by_service_type(&self, service_type_id: &str) -> DomainResult<Vec<AttributeBinding>> {
        self.upstream.check()?;
        let mut rows: Vec<AttributeBinding> = lock(&self.table)
            .rows
            .values()
            .filter(|b| b.service_type_id == service_type_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.display_order, b.id));
        Ok(rows)
    }

    async fn count_for_attribute(&self, attribute_id: i32) -> DomainResult<u64> {
        self.upstream.check()?;
        Ok(lock(&self.table)
            .rows
            .values()
            .filter(|b| b.attribute_id == attribute_id)
            .count() as u64)
    }

    async fn insert_batch(&self, bindings: Vec<NewBinding>) -> DomainResult<Vec<AttributeBinding>> {
        self.upstream.check()?;
        let mut table = lock(&self.table);

        for (i, new) in bindings.iter().enumerate() {
            let taken = table
                .rows
                .values()
                .any(|b| b.service_type_id == new.service_type_id && b.attribute_id == new.attribute_id)
                || bindings[..i]
                    .iter()
                    .any(|o| o.service_type_id == new.service_type_id && o.attribute_id == new.attribute_id);
            if taken {
                return Err(DomainError::Conflict(format!(
                    "attribute #{} already bound to {}",
                    new.attribute_id, new.service_type_id
                )));
            }
        }

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(bindings.len());
        for new in bindings {
            let binding = AttributeBinding {
                id: table.next_id,
                service_type_id: new.service_type_id,
                attribute_id: new.attribute_id,
                is_required: new.is_required,
                is_visible: new.is_visible,
                display_order: new.display_order,
                field_group: new.field_group,
                override_label: None,
                override_placeholder: None,
                override_help_text: None,
                created_at: now,
                updated_at: now,
            };
            table.next_id += 1;
            table.rows.insert(binding.id, binding.clone());
            inserted.push(binding);
        }
        Ok(inserted)
    }

    async fn update(&self, binding: AttributeBinding) -> DomainResult<()> {
        self.upstream.check()?;
        let mut table = lock(&self.table);
        match table.rows.get_mut(&binding.id) {
            Some(row) => {
                *row = binding;
                Ok(())
            }
            None => Err(DomainError::not_found("AttributeBinding", "id", binding.id)),
        }
    }

    async fn swap_display_order(&self, first_id: i32, second_id: i32) -> DomainResult<()> {
        self.upstream.check()?;
        let mut table = lock(&self.table);
        let first = table
            .rows
            .get(&first_id)
            .map(|b| b.display_order)
            .ok_or_else(|| DomainError::not_found("AttributeBinding", "id", first_id))?;
        let second = table
            .rows
            .get(&second_id)
            .map(|b| b.display_order)
            .ok_or_else(|| DomainError::not_found("AttributeBinding", "id", second_id))?;

        let now = Utc::now();
        for (id, order) in [(first_id, second), (second_id, first)] {
            if let Some(row) = table.rows.get_mut(&id) {
                row.display_order = order;
                row.updated_at = now;
            }
        }
        Ok(())
    }

    async fn renumber(&self, orders: &[(i32, u32)]) -> DomainResult<()> {
        self.upstream.check()?;
        let mut table = lock(&self.table);
        if let Some((missing, _)) = orders.iter().find(|(id, _)| !table.rows.contains_key(id)) {
            return Err(DomainError::not_found("AttributeBinding", "id", missing));
        }
        let now = Utc::now();
        for (id, order) in orders {
            if let Some(row) = table.rows.get_mut(id) {
                row.display_order = *order;
                row.updated_at = now;
            }
        }
        Ok(())
    }

    async fn delete_batch(&self, service_type_id: &str, attribute_ids: &[i32]) -> DomainResult<u64> {
        self.upstream.check()?;
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table
            .rows
            .retain(|_, b| !(b.service_type_id == service_type_id && attribute_ids.contains(&b.attribute_id)));
        Ok((before - table.rows.len()) as u64)
    }
}

// ── Service types ───────────────────────────────────────────────

pub struct InMemoryServiceTypeRepository {
    upstream: Arc<UpstreamSwitch>,
    service_types: DashMap<String, ServiceType>,
    bindings: Arc<Mutex<BindingTable>>,
}

#[async_trait]
impl ServiceTypeRepository for InMemoryServiceTypeRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceType>> {
        self.upstream.check()?;
        Ok(self.service_types.get(id).map(|s| s.clone()))
    }

    async fn find_active(&self) -> DomainResult<Vec<ServiceType>> {
        self.upstream.check()?;
        let mut active: Vec<ServiceType> = self
            .service_types
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.value().clone())
            .collect();
        active.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn save(&self, service_type: ServiceType) -> DomainResult<()> {
        self.upstream.check()?;
        self.service_types.insert(service_type.id.clone(), service_type);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.upstream.check()?;
        let mut bindings = lock(&self.bindings);
        self.service_types
            .remove(id)
            .ok_or_else(|| DomainError::not_found("ServiceType", "id", id))?;
        bindings.rows.retain(|_, b| b.service_type_id != id);
        Ok(())
    }
}

// ── Service areas ───────────────────────────────────────────────

pub struct InMemoryServiceAreaRepository {
    upstream: Arc<UpstreamSwitch>,
    areas: DashMap<i32, ServiceArea>,
    counter: AtomicI32,
}

impl InMemoryServiceAreaRepository {
    fn store(&self, mut area: ServiceArea) -> ServiceArea {
        if area.id == 0 {
            area.id = self.counter.fetch_add(1, Ordering::SeqCst);
        }
        self.areas.insert(area.id, area.clone());
        area
    }
}

#[async_trait]
impl ServiceAreaRepository for InMemoryServiceAreaRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ServiceArea>> {
        self.upstream.check()?;
        Ok(self.areas.get(&id).map(|a| a.clone()))
    }

    async fn find_by_pincode(&self, pincode: &str) -> DomainResult<Option<ServiceArea>> {
        self.upstream.check()?;
        Ok(self
            .areas
            .iter()
            .find(|a| a.pincode == pincode)
            .map(|a| a.value().clone()))
    }

    async fn find_geolocated(&self) -> DomainResult<Vec<ServiceArea>> {
        self.upstream.check()?;
        Ok(self
            .areas
            .iter()
            .filter(|a| a.location.is_some())
            .map(|a| a.value().clone())
            .collect())
    }

    async fn save(&self, area: ServiceArea) -> DomainResult<ServiceArea> {
        self.upstream.check()?;
        Ok(self.store(area))
    }
}

// ── Catalog ─────────────────────────────────────────────────────

pub struct InMemoryCatalogRepository {
    upstream: Arc<UpstreamSwitch>,
    offerings: DashMap<i32, Offering>,
    categories: DashMap<i32, Category>,
    pricing: DashMap<(i32, i32), AreaPricing>,
    counter: AtomicI32,
}

impl InMemoryCatalogRepository {
    fn row(&self, offering: &Offering, price: i64, stock: Option<i64>, is_available: bool) -> CatalogRow {
        CatalogRow {
            offering_id: offering.id,
            offering_name: offering.name.clone(),
            category_name: offering
                .category_id
                .and_then(|id| self.categories.get(&id).map(|c| c.name.clone())),
            price,
            stock,
            is_available,
            primary_image_url: offering.primary_image_url.clone(),
            custom_fields: offering.custom_fields.clone(),
            legacy: offering.legacy.clone(),
        }
    }

    fn listed(offering: &Offering, query: &CatalogQuery) -> bool {
        offering.is_active
            && offering.service_type == query.service_type
            && query.category_id.map_or(true, |c| offering.category_id == Some(c))
            && query.matches_name(&offering.name)
    }

    fn page(mut rows: Vec<CatalogRow>, query: &CatalogQuery) -> Vec<CatalogRow> {
        rows.sort_by(|a, b| {
            a.offering_name
                .cmp(&b.offering_name)
                .then_with(|| a.offering_id.cmp(&b.offering_id))
        });
        query.window.slice(rows)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn area_catalog(&self, service_area_id: i32, query: &CatalogQuery) -> DomainResult<Vec<CatalogRow>> {
        self.upstream.check()?;
        let rows: Vec<CatalogRow> = self
            .pricing
            .iter()
            .filter(|p| p.service_area_id == service_area_id)
            .filter_map(|p| {
                let offering = self.offerings.get(&p.offering_id)?;
                Self::listed(&offering, query)
                    .then(|| self.row(&offering, p.price, p.stock, p.is_available))
            })
            .collect();
        Ok(Self::page(rows, query))
    }

    async fn has_area_pricing(&self, service_area_id: i32, service_type: &str) -> DomainResult<bool> {
        self.upstream.check()?;
        Ok(self.pricing.iter().any(|p| {
            p.service_area_id == service_area_id
                && self
                    .offerings
                    .get(&p.offering_id)
                    .map_or(false, |o| o.service_type == service_type)
        }))
    }

    async fn global_catalog(&self, query: &CatalogQuery) -> DomainResult<Vec<CatalogRow>> {
        self.upstream.check()?;
        let rows: Vec<CatalogRow> = self
            .offerings
            .iter()
            .filter(|o| Self::listed(o, query))
            .map(|o| self.row(&o, o.base_price, o.stock, o.in_stock()))
            .collect();
        Ok(Self::page(rows, query))
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory [`RepositoryProvider`] with synchronous seeding helpers
pub struct InMemoryRepositoryProvider {
    upstream: Arc<UpstreamSwitch>,
    attributes: InMemoryAttributeRepository,
    bindings: InMemoryBindingRepository,
    service_types: InMemoryServiceTypeRepository,
    service_areas: InMemoryServiceAreaRepository,
    catalog: InMemoryCatalogRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let upstream = Arc::new(UpstreamSwitch::default());
        let table = Arc::new(Mutex::new(BindingTable {
            rows: BTreeMap::new(),
            next_id: 1,
        }));

        Self {
            attributes: InMemoryAttributeRepository {
                upstream: upstream.clone(),
                definitions: DashMap::new(),
                counter: AtomicI32::new(1),
            },
            bindings: InMemoryBindingRepository {
                upstream: upstream.clone(),
                table: table.clone(),
            },
            service_types: InMemoryServiceTypeRepository {
                upstream: upstream.clone(),
                service_types: DashMap::new(),
                bindings: table,
            },
            service_areas: InMemoryServiceAreaRepository {
                upstream: upstream.clone(),
                areas: DashMap::new(),
                counter: AtomicI32::new(1),
            },
            catalog: InMemoryCatalogRepository {
                upstream: upstream.clone(),
                offerings: DashMap::new(),
                categories: DashMap::new(),
                pricing: DashMap::new(),
                counter: AtomicI32::new(1),
            },
            upstream,
        }
    }

    /// Every call fails with `UpstreamUnavailable` while set.
    pub fn set_unavailable(&self, down: bool) {
        self.upstream.down.store(down, Ordering::SeqCst);
    }

    /// The next `n` calls fail with `UpstreamUnavailable`.
    pub fn fail_next(&self, n: u32) {
        self.upstream.failures.store(n, Ordering::SeqCst);
    }

    pub fn seed_service_type(&self, service_type: ServiceType) {
        self.service_types
            .service_types
            .insert(service_type.id.clone(), service_type);
    }

    pub fn seed_definition(&self, definition: NewAttributeDefinition) -> DomainResult<AttributeDefinition> {
        self.attributes.insert(definition)
    }

    pub fn seed_area(&self, area: ServiceArea) -> ServiceArea {
        self.service_areas.store(area)
    }

    pub fn seed_category(&self, name: &str) -> i32 {
        let id = self.catalog.counter.fetch_add(1, Ordering::SeqCst);
        self.catalog.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn seed_offering(&self, mut offering: Offering) -> Offering {
        if offering.id == 0 {
            offering.id = self.catalog.counter.fetch_add(1, Ordering::SeqCst);
        }
        self.catalog.offerings.insert(offering.id, offering.clone());
        offering
    }

    pub fn seed_area_pricing(&self, pricing: AreaPricing) {
        self.catalog
            .pricing
            .insert((pricing.service_area_id, pricing.offering_id), pricing);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn attributes(&self) -> &dyn AttributeDefinitionRepository {
        &self.attributes
    }

    fn bindings(&self) -> &dyn AttributeBindingRepository {
        &self.bindings
    }

    fn service_types(&self) -> &dyn ServiceTypeRepository {
        &self.service_types
    }

    fn service_areas(&self) -> &dyn ServiceAreaRepository {
        &self.service_areas
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_bindings() -> InMemoryRepositoryProvider {
        let p = InMemoryRepositoryProvider::new();
        p.seed_service_type(ServiceType::new("handyman", "Handyman", 1));
        p
    }

    #[tokio::test]
    async fn insert_batch_is_all_or_nothing() {
        let p = provider_with_bindings();
        p.bindings()
            .insert_batch(vec![NewBinding::new("handyman", 1, 0)])
            .await
            .unwrap();

        let result = p
            .bindings()
            .insert_batch(vec![NewBinding::new("handyman", 2, 1), NewBinding::new("handyman", 1, 2)])
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(p.bindings().find_by_service_type("handyman").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn swap_exchanges_stored_orders() {
        let p = provider_with_bindings();
        let rows = p
            .bindings()
            .insert_batch(vec![NewBinding::new("handyman", 1, 0), NewBinding::new("handyman", 2, 1)])
            .await
            .unwrap();
        p.bindings().swap_display_order(rows[0].id, rows[1].id).await.unwrap();

        let after = p.bindings().find_by_service_type("handyman").await.unwrap();
        assert_eq!(after[0].attribute_id, 2);
        assert_eq!(after[1].attribute_id, 1);
    }

    #[tokio::test]
    async fn renumber_with_unknown_id_changes_nothing() {
        let p = provider_with_bindings();
        let rows = p
            .bindings()
            .insert_batch(vec![NewBinding::new("handyman", 1, 0)])
            .await
            .unwrap();
        let result = p.bindings().renumber(&[(rows[0].id, 7), (999, 0)]).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(
            p.bindings().find_by_id(rows[0].id).await.unwrap().unwrap().display_order,
            0
        );
    }

    #[tokio::test]
    async fn deleting_service_type_cascades_to_bindings() {
        let p = provider_with_bindings();
        p.seed_service_type(ServiceType::new("grocery", "Grocery", 2));
        p.bindings()
            .insert_batch(vec![NewBinding::new("handyman", 1, 0), NewBinding::new("grocery", 1, 0)])
            .await
            .unwrap();

        p.service_types().delete("handyman").await.unwrap();
        assert!(p.service_types().find_by_id("handyman").await.unwrap().is_none());
        assert!(p.bindings().find_by_service_type("handyman").await.unwrap().is_empty());
        assert_eq!(p.bindings().count_for_attribute(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let p = provider_with_bindings();
        p.fail_next(1);
        assert!(p.service_types().find_active().await.is_err());
        assert!(p.service_types().find_active().await.is_ok());
    }
}
