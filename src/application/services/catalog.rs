//! Area-scoped catalog resolution
//!
//! The heavy join lives in the persistence layer; this service owns the
//! serviceability gate, the global fallback for areas without local
//! pricing, and the display-field derivation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CatalogSection;
use crate::domain::catalog::{
    CatalogEntry, CatalogFilters, CatalogQuery, CatalogRow, DisplayAttributes, DisplayField,
    PriceSource,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::utills::Coalesce;
use crate::shared::validations::validate_page;

pub struct CatalogResolver {
    repos: Arc<dyn RepositoryProvider>,
    config: CatalogSection,
}

impl CatalogResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: CatalogSection) -> Self {
        Self { repos, config }
    }

    /// Catalog of one service type as seen from one service area.
    ///
    /// Areas that are not serviceable, or do not offer the service type,
    /// never yield entries. Areas with no local pricing at all for the
    /// service type get the global catalog at base price.
    pub async fn resolve_catalog(
        &self,
        service_area_id: i32,
        service_type: &str,
        filters: &CatalogFilters,
    ) -> DomainResult<Vec<CatalogEntry>> {
        let window = validate_page(
            filters.limit,
            filters.offset,
            self.config.default_limit,
            self.config.max_limit,
        )?;

        self.repos
            .service_types()
            .find_by_id(service_type)
            .await?
            .filter(|st| st.is_active)
            .ok_or_else(|| DomainError::not_found("ServiceType", "id", service_type))?;

        let area = self
            .repos
            .service_areas()
            .find_by_id(service_area_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceArea", "id", service_area_id))?;

        if !area.offers(service_type) {
            debug!(
                service_area_id,
                service_type,
                serviceable = area.is_serviceable,
                "Service type not offered in area"
            );
            return Ok(Vec::new());
        }

        let query = CatalogQuery {
            service_type: service_type.to_string(),
            category_id: filters.category_id,
            search_term: filters
                .search_term
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            window,
        };

        let catalog = self.repos.catalog();
        let rows = catalog.area_catalog(area.id, &query).await?;
        if !rows.is_empty() {
            return Ok(to_entries(rows, PriceSource::Location));
        }

        if !self.config.global_fallback || catalog.has_area_pricing(area.id, service_type).await? {
            return Ok(Vec::new());
        }

        let rows = catalog.global_catalog(&query).await?;
        metrics::counter!("catalog_global_fallback_total").increment(1);
        info!(
            service_area_id,
            service_type,
            entries = rows.len(),
            "No local pricing for area, serving global catalog"
        );
        Ok(to_entries(rows, PriceSource::Base))
    }
}

fn to_entries(rows: Vec<CatalogRow>, price_source: PriceSource) -> Vec<CatalogEntry> {
    rows.into_iter()
        .map(|row| entry_from_row(row, price_source))
        .collect()
}

fn entry_from_row(row: CatalogRow, price_source: PriceSource) -> CatalogEntry {
    let display = DisplayAttributes {
        brand: display_value(&row, DisplayField::Brand),
        rating: display_value(&row, DisplayField::Rating),
        seats: display_value(&row, DisplayField::Seats),
        transmission: display_value(&row, DisplayField::Transmission),
    };

    CatalogEntry {
        offering_id: row.offering_id,
        name: row.offering_name,
        category_name: row.category_name,
        location_price: row.price,
        location_stock: row.stock,
        is_available: row.is_available,
        price_source,
        primary_image_url: row.primary_image_url,
        custom_fields: row.custom_fields,
        display,
    }
}

/// Custom field, then legacy column, then the field's default.
fn display_value(row: &CatalogRow, field: DisplayField) -> String {
    Coalesce::first(row.custom_fields.get(field.custom_key()).map(String::as_str))
        .or(field.legacy_value(&row.legacy))
        .or_default(field.default_value())
        .to_string()
}
