//! Catalog rows, offerings and the area-scoped entry view

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::pagination::PageWindow;

/// Caller-supplied catalog filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogFilters {
    pub category_id: Option<i32>,
    pub search_term: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Validated query handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub service_type: String,
    pub category_id: Option<i32>,
    /// Trimmed, non-empty; a literal substring of the name, ignoring ASCII case
    pub search_term: Option<String>,
    pub window: PageWindow,
}

impl CatalogQuery {
    pub fn matches_name(&self, name: &str) -> bool {
        match &self.search_term {
            Some(term) => name.to_ascii_lowercase().contains(&term.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// Pre-attribute-registry columns some verticals still populate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyColumns {
    pub brand: Option<String>,
    pub rating: Option<String>,
    pub seats: Option<String>,
    pub transmission: Option<String>,
}

/// Denormalized row as returned by the catalog queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub offering_id: i32,
    pub offering_name: String,
    pub category_name: Option<String>,
    /// Minor currency units; area price or base price depending on the query
    pub price: i64,
    pub stock: Option<i64>,
    pub is_available: bool,
    pub primary_image_url: Option<String>,
    pub custom_fields: BTreeMap<String, String>,
    pub legacy: LegacyColumns,
}

/// Global (area-agnostic) product or service offering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offering {
    pub id: i32,
    pub service_type: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub base_price: i64,
    /// `None` for untracked stock (services)
    pub stock: Option<i64>,
    pub is_active: bool,
    pub primary_image_url: Option<String>,
    pub custom_fields: BTreeMap<String, String>,
    pub legacy: LegacyColumns,
}

impl Offering {
    pub fn new(service_type: impl Into<String>, name: impl Into<String>, base_price: i64) -> Self {
        Self {
            id: 0,
            service_type: service_type.into(),
            category_id: None,
            name: name.into(),
            base_price,
            stock: None,
            is_active: true,
            primary_image_url: None,
            custom_fields: BTreeMap::new(),
            legacy: LegacyColumns::default(),
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |s| s > 0)
    }
}

/// Local price/stock override of an offering inside one service area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaPricing {
    pub service_area_id: i32,
    pub offering_id: i32,
    pub price: i64,
    pub stock: Option<i64>,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Which price an entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Location,
    Base,
}

/// Display fields that may come from custom fields, legacy columns or defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayField {
    Brand,
    Rating,
    Seats,
    Transmission,
}

impl DisplayField {
    pub fn custom_key(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Rating => "rating",
            Self::Seats => "seats",
            Self::Transmission => "transmission",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            Self::Brand => "Unbranded",
            Self::Rating => "4.5",
            Self::Seats => "5",
            Self::Transmission => "Automatic",
        }
    }

    pub fn legacy_value<'a>(&self, legacy: &'a LegacyColumns) -> Option<&'a str> {
        match self {
            Self::Brand => legacy.brand.as_deref(),
            Self::Rating => legacy.rating.as_deref(),
            Self::Seats => legacy.seats.as_deref(),
            Self::Transmission => legacy.transmission.as_deref(),
        }
    }
}

/// Resolved display attributes of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayAttributes {
    pub brand: String,
    pub rating: String,
    pub seats: String,
    pub transmission: String,
}

/// Area-scoped, price/stock-resolved view of an offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub offering_id: i32,
    pub name: String,
    pub category_name: Option<String>,
    pub location_price: i64,
    pub location_stock: Option<i64>,
    pub is_available: bool,
    pub price_source: PriceSource,
    pub primary_image_url: Option<String>,
    pub custom_fields: BTreeMap<String, String>,
    pub display: DisplayAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searching(term: &str) -> CatalogQuery {
        CatalogQuery {
            service_type: "grocery".into(),
            category_id: None,
            search_term: Some(term.into()),
            window: PageWindow::new(50, 0),
        }
    }

    #[test]
    fn name_match_is_literal_and_ignores_ascii_case() {
        assert!(searching("TOOR").matches_name("Toor Dal 1kg"));
        assert!(searching("0% o").matches_name("Jaggery 100% Organic"));
        assert!(!searching("1_g").matches_name("Toor Dal 1kg"));
        assert!(!searching("%").matches_name("Toor Dal 1kg"));
        // Non-ASCII letters compare exactly, as SQLite LIKE does
        assert!(!searching("É").matches_name("éclair"));
        assert!(searching("é").matches_name("éclair"));
    }
}
