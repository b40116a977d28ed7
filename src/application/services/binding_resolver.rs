//! Attribute binding resolver
//!
//! Composes a service type's product form: mandatory fields first, then the
//! bound registry attributes in `display_order`, with per-binding overrides
//! applied. Bindings are re-read on every call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::attribute::AttributeDefinition;
use crate::domain::binding::{
    is_mandatory_key, AttributeBinding, BindingPatch, Direction, FieldRef, FieldSource,
    NewBinding, ResolvedField, MANDATORY_FIELDS,
};
use crate::domain::service_type::ServiceType;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::utills::Coalesce;

/// Resolver and mutation entry point for attribute bindings
pub struct BindingResolver {
    repos: Arc<dyn RepositoryProvider>,
}

impl BindingResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Ordered form fields for a service type.
    pub async fn resolve_bindings(&self, service_type_id: &str) -> DomainResult<Vec<ResolvedField>> {
        self.require_service_type(service_type_id).await?;
        let bindings = self.normalized_bindings(service_type_id).await?;

        let mut fields: Vec<ResolvedField> =
            MANDATORY_FIELDS.iter().map(ResolvedField::mandatory).collect();
        fields.extend(
            bindings
                .active
                .iter()
                .map(|(binding, definition)| resolve_field(binding, definition)),
        );

        debug!(
            service_type_id,
            fields = fields.len(),
            inactive = bindings.inactive.len(),
            "Bindings resolved"
        );
        Ok(fields)
    }

    /// Attach definitions to a service type, appended after the existing ones
    /// in the given order. The whole batch is rejected if any definition is
    /// already bound or repeated.
    pub async fn add_bindings(
        &self,
        service_type_id: &str,
        fields: &[FieldRef],
    ) -> DomainResult<Vec<AttributeBinding>> {
        reject_mandatory(fields, "bind")?;
        self.require_service_type(service_type_id).await?;
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        let definitions = self.lookup_definitions(fields).await?;

        let mut seen = HashSet::new();
        if let Some(dup) = definitions.iter().find(|d| !seen.insert(d.id)) {
            return Err(DomainError::Conflict(format!(
                "attribute '{}' appears more than once in the request",
                dup.name
            )));
        }
        if let Some(inactive) = definitions.iter().find(|d| !d.is_active) {
            return Err(DomainError::Validation(format!(
                "attribute '{}' is inactive",
                inactive.name
            )));
        }

        let existing = self.normalized_bindings(service_type_id).await?;
        let bound: HashSet<i32> = existing.attribute_ids().collect();
        let already: Vec<&str> = definitions
            .iter()
            .filter(|d| bound.contains(&d.id))
            .map(|d| d.name.as_str())
            .collect();
        if !already.is_empty() {
            return Err(DomainError::Conflict(format!(
                "already configured for {}: {}",
                service_type_id,
                already.join(", ")
            )));
        }

        // New rows follow the active ones; inactive rows move past them.
        let next = existing.active.len() as u32;
        let added = definitions.len() as u32;
        if !existing.inactive.is_empty() {
            let shifted: Vec<(i32, u32)> = existing
                .inactive
                .iter()
                .enumerate()
                .map(|(i, b)| (b.id, next + added + i as u32))
                .collect();
            self.repos.bindings().renumber(&shifted).await?;
        }

        let rows: Vec<NewBinding> = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| NewBinding::new(service_type_id, d.id, next + i as u32))
            .collect();

        let inserted = self.repos.bindings().insert_batch(rows).await?;
        info!(service_type_id, added = inserted.len(), "Attribute bindings added");
        Ok(inserted)
    }

    /// Partial update of overrides, `is_required`, `is_visible` and `field_group`.
    pub async fn update_binding(
        &self,
        binding_id: i32,
        patch: BindingPatch,
    ) -> DomainResult<AttributeBinding> {
        patch.validate()?;
        if patch.display_order.is_some() {
            return Err(DomainError::Validation(
                "display_order cannot be patched; use reorder".to_string(),
            ));
        }
        if patch.is_empty() {
            return Err(DomainError::Validation("patch has no fields".to_string()));
        }

        let mut binding = self
            .repos
            .bindings()
            .find_by_id(binding_id)
            .await?
            .ok_or_else(|| DomainError::not_found("AttributeBinding", "id", binding_id))?;

        patch.apply_to(&mut binding);
        self.repos.bindings().update(binding.clone()).await?;

        info!(
            binding_id,
            service_type_id = binding.service_type_id.as_str(),
            "Attribute binding updated"
        );
        Ok(binding)
    }

    /// Swap a field with its neighbour. Returns `false` when the field is
    /// already at the boundary in that direction.
    pub async fn reorder(
        &self,
        service_type_id: &str,
        field: &FieldRef,
        direction: Direction,
    ) -> DomainResult<bool> {
        reject_mandatory(std::slice::from_ref(field), "reorder")?;
        self.require_service_type(service_type_id).await?;

        let definition = self.lookup_definition(field).await?;
        let bindings = self.normalized_bindings(service_type_id).await?;

        let Some(pos) = bindings
            .active
            .iter()
            .position(|(b, _)| b.attribute_id == definition.id)
        else {
            if bindings.inactive.iter().any(|b| b.attribute_id == definition.id) {
                return Err(DomainError::Validation(format!(
                    "attribute '{}' is inactive",
                    definition.name
                )));
            }
            return Err(DomainError::NotFound {
                entity: "AttributeBinding",
                field: "attribute",
                value: format!("{} in {}", field, service_type_id),
            });
        };

        let neighbour = match direction {
            Direction::Up => pos.checked_sub(1),
            Direction::Down => (pos + 1 < bindings.active.len()).then_some(pos + 1),
        };
        let Some(neighbour) = neighbour else {
            debug!(service_type_id, %field, ?direction, "Reorder at boundary, nothing to do");
            return Ok(false);
        };

        self.repos
            .bindings()
            .swap_display_order(bindings.active[pos].0.id, bindings.active[neighbour].0.id)
            .await?;

        info!(service_type_id, %field, ?direction, "Attribute binding reordered");
        Ok(true)
    }

    /// Detach definitions from a service type; the definitions stay in the
    /// registry. Returns the number of bindings removed.
    pub async fn remove_bindings(
        &self,
        service_type_id: &str,
        fields: &[FieldRef],
    ) -> DomainResult<u64> {
        reject_mandatory(fields, "remove")?;
        self.require_service_type(service_type_id).await?;
        if fields.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i32> = self
            .lookup_definitions(fields)
            .await?
            .iter()
            .map(|d| d.id)
            .collect();
        let removed = self
            .repos
            .bindings()
            .delete_batch(service_type_id, &ids)
            .await?;

        // Close the gaps left behind.
        self.normalized_bindings(service_type_id).await?;

        info!(service_type_id, removed, "Attribute bindings removed");
        Ok(removed)
    }

    async fn require_service_type(&self, id: &str) -> DomainResult<ServiceType> {
        self.repos
            .service_types()
            .find_by_id(id)
            .await?
            .filter(|st| st.is_active)
            .ok_or_else(|| DomainError::not_found("ServiceType", "id", id))
    }

    /// Bindings sorted by `(display_order, id)` and renumbered so the active
    /// ones hold `0..k-1` and the inactive ones `k..n-1`. Stored values that
    /// drifted (duplicates, gaps, inactive rows in between) are rewritten.
    async fn normalized_bindings(&self, service_type_id: &str) -> DomainResult<NormalizedBindings> {
        let mut bindings = self
            .repos
            .bindings()
            .find_by_service_type(service_type_id)
            .await?;
        bindings.sort_by_key(|b| (b.display_order, b.id));

        let ids: Vec<i32> = bindings.iter().map(|b| b.attribute_id).collect();
        let mut definitions: HashMap<i32, AttributeDefinition> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.repos
                .attributes()
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        let mut normalized = NormalizedBindings::default();
        for binding in bindings {
            match definitions.remove(&binding.attribute_id) {
                Some(definition) if definition.is_active => normalized.active.push((binding, definition)),
                Some(_) => normalized.inactive.push(binding),
                None => {
                    warn!(
                        service_type_id,
                        binding_id = binding.id,
                        attribute_id = binding.attribute_id,
                        "Binding references a missing attribute definition"
                    );
                    normalized.inactive.push(binding);
                }
            }
        }

        let drift: Vec<(i32, u32)> = normalized
            .iter()
            .enumerate()
            .filter(|(i, b)| b.display_order != *i as u32)
            .map(|(i, b)| (b.id, i as u32))
            .collect();

        if !drift.is_empty() {
            warn!(
                service_type_id,
                rows = drift.len(),
                "Display order drifted, renormalizing"
            );
            metrics::counter!("binding_renormalizations_total").increment(1);
            self.repos.bindings().renumber(&drift).await?;
            for (i, b) in normalized.iter_mut().enumerate() {
                b.display_order = i as u32;
            }
        }
        Ok(normalized)
    }

    async fn lookup_definitions(&self, fields: &[FieldRef]) -> DomainResult<Vec<AttributeDefinition>> {
        let mut out = Vec::with_capacity(fields.len());
        for field in fields {
            out.push(self.lookup_definition(field).await?);
        }
        Ok(out)
    }

    async fn lookup_definition(&self, field: &FieldRef) -> DomainResult<AttributeDefinition> {
        let attributes = self.repos.attributes();
        match field {
            FieldRef::Attribute(id) => attributes
                .find_by_id(*id)
                .await?
                .ok_or_else(|| DomainError::not_found("AttributeDefinition", "id", id)),
            FieldRef::Key(name) => attributes
                .find_by_name(name)
                .await?
                .ok_or_else(|| DomainError::not_found("AttributeDefinition", "name", name)),
        }
    }
}

/// Bindings of one service type split by whether the form shows them
#[derive(Default)]
struct NormalizedBindings {
    /// Active definitions, in form order
    active: Vec<(AttributeBinding, AttributeDefinition)>,
    /// Inactive or missing definitions, numbered after the active ones
    inactive: Vec<AttributeBinding>,
}

impl NormalizedBindings {
    fn iter(&self) -> impl Iterator<Item = &AttributeBinding> {
        self.active.iter().map(|(b, _)| b).chain(self.inactive.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut AttributeBinding> {
        self.active.iter_mut().map(|(b, _)| b).chain(self.inactive.iter_mut())
    }

    fn attribute_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.iter().map(|b| b.attribute_id)
    }
}

fn reject_mandatory(fields: &[FieldRef], action: &str) -> DomainResult<()> {
    for field in fields {
        if let FieldRef::Key(key) = field {
            if is_mandatory_key(key) {
                return Err(DomainError::Forbidden(format!(
                    "cannot {} mandatory field '{}'",
                    action, key
                )));
            }
        }
    }
    Ok(())
}

/// Apply the override → definition → name chain to one binding.
pub(crate) fn resolve_field(binding: &AttributeBinding, definition: &AttributeDefinition) -> ResolvedField {
    let effective = |override_value: &Option<String>, definition_value: &Option<String>| {
        Coalesce::first(override_value.as_deref())
            .or(definition_value.as_deref())
            .or_default(&definition.name)
            .to_string()
    };

    ResolvedField {
        name: definition.name.clone(),
        label: effective(&binding.override_label, &definition.label),
        placeholder: effective(&binding.override_placeholder, &definition.placeholder),
        help_text: effective(&binding.override_help_text, &definition.help_text),
        data_type: definition.data_type,
        input_type: definition.input_type.clone(),
        required: binding.is_required,
        visible: binding.is_visible,
        locked: false,
        field_group: binding.field_group,
        default_value: definition.default_value.clone(),
        source: FieldSource::Binding {
            binding_id: binding.id,
            attribute_id: binding.attribute_id,
            display_order: binding.display_order,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{fixture, Fixture};
    use crate::domain::attribute::NewAttributeDefinition;

    fn custom_names(fields: &[ResolvedField]) -> Vec<String> {
        fields.iter().filter(|f| !f.locked).map(|f| f.name.clone()).collect()
    }

    fn custom_orders(fields: &[ResolvedField]) -> Vec<u32> {
        fields.iter().filter_map(|f| f.display_order()).collect()
    }

    async fn handyman_with(fx: &Fixture, names: &[&str]) -> BindingResolver {
        let resolver = BindingResolver::new(fx.repos.clone());
        let refs: Vec<FieldRef> = names.iter().map(|n| FieldRef::from(*n)).collect();
        resolver.add_bindings("handyman", &refs).await.unwrap();
        resolver
    }

    #[tokio::test]
    async fn mandatory_fields_come_first_and_locked() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr"]).await;

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        let prefix: Vec<&str> = fields.iter().take(4).map(|f| f.name.as_str()).collect();
        assert_eq!(prefix, vec!["name", "description", "price", "vendor"]);
        assert!(fields[..4].iter().all(|f| f.locked && f.required));
        assert_eq!(custom_names(&fields), vec!["urgency", "addr"]);
        assert_eq!(custom_orders(&fields), vec![0, 1]);
    }

    #[tokio::test]
    async fn reorder_down_swaps_with_next() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr"]).await;

        let moved = resolver
            .reorder("handyman", &FieldRef::from("urgency"), Direction::Down)
            .await
            .unwrap();
        assert!(moved);

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["addr", "urgency"]);
        assert_eq!(custom_orders(&fields), vec![0, 1]);
    }

    #[tokio::test]
    async fn reorder_at_boundaries_is_a_no_op() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr"]).await;

        assert!(!resolver
            .reorder("handyman", &FieldRef::from("urgency"), Direction::Up)
            .await
            .unwrap());
        assert!(!resolver
            .reorder("handyman", &FieldRef::from("addr"), Direction::Down)
            .await
            .unwrap());

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["urgency", "addr"]);
    }

    #[tokio::test]
    async fn any_reorder_sequence_keeps_orders_contiguous() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr", "brand", "tools"]).await;

        let steps = [
            ("tools", Direction::Up),
            ("tools", Direction::Up),
            ("urgency", Direction::Down),
            ("brand", Direction::Down),
            ("addr", Direction::Up),
            ("addr", Direction::Up),
            ("tools", Direction::Down),
        ];
        for (name, dir) in steps {
            resolver
                .reorder("handyman", &FieldRef::from(name), dir)
                .await
                .unwrap();
        }

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_orders(&fields), vec![0, 1, 2, 3]);
        assert_eq!(fields.iter().take(4).filter(|f| f.locked).count(), 4);
    }

    #[tokio::test]
    async fn concurrent_reorders_never_duplicate_orders() {
        let fx = fixture();
        let resolver = Arc::new(handyman_with(&fx, &["urgency", "addr", "brand", "tools"]).await);

        let mut handles = Vec::new();
        for (name, dir) in [
            ("addr", Direction::Up),
            ("brand", Direction::Up),
            ("urgency", Direction::Down),
            ("tools", Direction::Up),
        ] {
            let resolver = resolver.clone();
            handles.push(tokio::spawn(async move {
                resolver
                    .reorder("handyman", &FieldRef::from(name), dir)
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        let mut orders = custom_orders(&fields);
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn drifted_orders_are_renormalized_on_read() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr", "brand"]).await;
        let rows = fx.repos.bindings().find_by_service_type("handyman").await.unwrap();

        // Simulate a lost update: two rows end up sharing order 5.
        fx.repos
            .bindings()
            .renumber(&[(rows[0].id, 5), (rows[1].id, 5), (rows[2].id, 9)])
            .await
            .unwrap();

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["urgency", "addr", "brand"]);
        assert_eq!(custom_orders(&fields), vec![0, 1, 2]);

        let stored: Vec<u32> = fx
            .repos
            .bindings()
            .find_by_service_type("handyman")
            .await
            .unwrap()
            .iter()
            .map(|b| b.display_order)
            .collect();
        assert_eq!(stored, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn label_falls_back_override_then_definition_then_name() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["brand", "addr"]).await;

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        let brand = fields.iter().find(|f| f.name == "brand").unwrap();
        assert_eq!(brand.label, "Brand");
        // `addr` has no label on the definition
        let addr = fields.iter().find(|f| f.name == "addr").unwrap();
        assert_eq!(addr.label, "addr");
        assert_eq!(addr.placeholder, "addr");

        let binding_id = brand.binding_id().unwrap();
        resolver
            .update_binding(
                binding_id,
                BindingPatch {
                    override_label: Some("Make".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(fields.iter().find(|f| f.name == "brand").unwrap().label, "Make");

        // Clearing the override shows the definition label again
        resolver
            .update_binding(
                binding_id,
                BindingPatch {
                    override_label: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(fields.iter().find(|f| f.name == "brand").unwrap().label, "Brand");
    }

    #[tokio::test]
    async fn mandatory_fields_cannot_be_mutated() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency"]).await;

        for key in ["name", "description", "price", "vendor"] {
            let field = FieldRef::from(key);
            assert!(matches!(
                resolver.remove_bindings("handyman", &[field.clone()]).await,
                Err(DomainError::Forbidden(_))
            ));
            assert!(matches!(
                resolver.reorder("handyman", &field, Direction::Up).await,
                Err(DomainError::Forbidden(_))
            ));
            assert!(matches!(
                resolver.add_bindings("handyman", &[field]).await,
                Err(DomainError::Forbidden(_))
            ));
        }

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(fields.len(), 5);
    }

    #[tokio::test]
    async fn duplicate_batch_is_rejected_without_partial_insert() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency"]).await;
        resolver
            .add_bindings("grocery", &[FieldRef::from("brand")])
            .await
            .unwrap();

        let result = resolver
            .add_bindings(
                "grocery",
                &[FieldRef::from("addr"), FieldRef::from("brand"), FieldRef::from("brand")],
            )
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let result = resolver
            .add_bindings("grocery", &[FieldRef::from("addr"), FieldRef::from("brand")])
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let rows = fx.repos.bindings().find_by_service_type("grocery").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn added_bindings_append_in_input_order() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency"]).await;
        let added = resolver
            .add_bindings("handyman", &[FieldRef::from("tools"), FieldRef::from("addr")])
            .await
            .unwrap();
        let orders: Vec<u32> = added.iter().map(|b| b.display_order).collect();
        assert_eq!(orders, vec![1, 2]);

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["urgency", "tools", "addr"]);
    }

    #[tokio::test]
    async fn unknown_or_inactive_service_type_is_not_found() {
        let fx = fixture();
        let resolver = BindingResolver::new(fx.repos.clone());
        assert!(matches!(
            resolver.resolve_bindings("plumbing").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            resolver.resolve_bindings("legacy").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn inactive_definitions_are_not_resolved() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr"]).await;
        set_active(&fx, "urgency", false).await;

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["addr"]);
        assert_eq!(custom_orders(&fields), vec![0]);
    }

    async fn set_active(fx: &Fixture, name: &str, active: bool) {
        let mut def = fx.repos.attributes().find_by_name(name).await.unwrap().unwrap();
        def.is_active = active;
        fx.repos.attributes().update(def).await.unwrap();
    }

    async fn stored_orders(fx: &Fixture, service_type_id: &str) -> Vec<u32> {
        fx.repos
            .bindings()
            .find_by_service_type(service_type_id)
            .await
            .unwrap()
            .iter()
            .map(|b| b.display_order)
            .collect()
    }

    #[tokio::test]
    async fn reorder_moves_past_inactive_definitions() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr", "brand"]).await;
        set_active(&fx, "addr", false).await;

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["urgency", "brand"]);
        assert_eq!(custom_orders(&fields), vec![0, 1]);

        let moved = resolver
            .reorder("handyman", &FieldRef::from("brand"), Direction::Up)
            .await
            .unwrap();
        assert!(moved);

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["brand", "urgency"]);
        assert_eq!(custom_orders(&fields), vec![0, 1]);

        // The inactive binding cannot be moved and never becomes a neighbour
        assert!(matches!(
            resolver
                .reorder("handyman", &FieldRef::from("addr"), Direction::Up)
                .await,
            Err(DomainError::Validation(_))
        ));
        assert!(!resolver
            .reorder("handyman", &FieldRef::from("urgency"), Direction::Down)
            .await
            .unwrap());

        // Reactivated definitions come back after the visible ones
        set_active(&fx, "addr", true).await;
        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["brand", "urgency", "addr"]);
        assert_eq!(custom_orders(&fields), vec![0, 1, 2]);
        assert_eq!(stored_orders(&fx, "handyman").await, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn orders_stay_contiguous_with_inactive_definitions() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr", "brand", "tools"]).await;
        set_active(&fx, "brand", false).await;

        let steps = [
            ("tools", Direction::Up),
            ("urgency", Direction::Down),
            ("addr", Direction::Down),
            ("tools", Direction::Up),
            ("urgency", Direction::Up),
        ];
        for (name, dir) in steps {
            resolver
                .reorder("handyman", &FieldRef::from(name), dir)
                .await
                .unwrap();
            let fields = resolver.resolve_bindings("handyman").await.unwrap();
            assert_eq!(custom_orders(&fields), vec![0, 1, 2]);
        }

        // New bindings follow the active ones; the inactive row stays last
        let added = resolver
            .add_bindings("handyman", &[FieldRef::from("fuel")])
            .await
            .unwrap();
        assert_eq!(added[0].display_order, 3);
        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_orders(&fields), vec![0, 1, 2, 3]);
        assert_eq!(custom_names(&fields).last().map(String::as_str), Some("fuel"));
        assert_eq!(stored_orders(&fx, "handyman").await, vec![0, 1, 2, 3, 4]);

        let last = fx
            .repos
            .bindings()
            .find_by_service_type("handyman")
            .await
            .unwrap()
            .pop()
            .unwrap();
        let brand = fx.repos.attributes().find_by_name("brand").await.unwrap().unwrap();
        assert_eq!(last.attribute_id, brand.id);
    }

    #[tokio::test]
    async fn hidden_binding_stays_resolved_but_not_previewed() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr"]).await;
        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        let addr = fields.iter().find(|f| f.name == "addr").unwrap().binding_id().unwrap();

        let updated = resolver
            .update_binding(
                addr,
                BindingPatch {
                    is_visible: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_visible);

        let fields = resolver.resolve_bindings("handyman").await.unwrap();
        assert_eq!(custom_names(&fields), vec!["urgency", "addr"]);
        assert!(!fields.iter().find(|f| f.name == "addr").unwrap().visible);

        let preview = crate::application::services::generate_preview(&fields);
        let names: Vec<&str> = preview.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "description", "price", "vendor", "urgency"]);
    }

    #[tokio::test]
    async fn remove_closes_gaps_and_keeps_definitions() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency", "addr", "brand"]).await;

        let removed = resolver
            .remove_bindings("handyman", &[FieldRef::from("addr")])
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let stored: Vec<u32> = fx
            .repos
            .bindings()
            .find_by_service_type("handyman")
            .await
            .unwrap()
            .iter()
            .map(|b| b.display_order)
            .collect();
        assert_eq!(stored, vec![0, 1]);
        assert!(fx.repos.attributes().find_by_name("addr").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn patch_validation() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency"]).await;
        let id = fx.repos.bindings().find_by_service_type("handyman").await.unwrap()[0].id;

        let negative = BindingPatch {
            display_order: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            resolver.update_binding(id, negative).await,
            Err(DomainError::Validation(_))
        ));

        let reorder_via_patch = BindingPatch {
            display_order: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            resolver.update_binding(id, reorder_via_patch).await,
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            resolver.update_binding(id, BindingPatch::default()).await,
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            resolver
                .update_binding(
                    9999,
                    BindingPatch {
                        is_required: Some(true),
                        ..Default::default()
                    }
                )
                .await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn inactive_definition_cannot_be_bound() {
        let fx = fixture();
        let mut def = NewAttributeDefinition::text("retired", Some("Retired"));
        def.is_active = false;
        fx.memory.seed_definition(def).unwrap();

        let resolver = BindingResolver::new(fx.repos.clone());
        assert!(matches!(
            resolver.add_bindings("handyman", &[FieldRef::from("retired")]).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn upstream_failure_is_surfaced() {
        let fx = fixture();
        let resolver = handyman_with(&fx, &["urgency"]).await;
        fx.memory.set_unavailable(true);
        assert!(matches!(
            resolver.resolve_bindings("handyman").await,
            Err(DomainError::UpstreamUnavailable(_))
        ));
    }
}
