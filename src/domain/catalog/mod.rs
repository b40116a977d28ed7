//! Catalog aggregate: offerings, area pricing and the entry view

pub mod model;
pub mod repository;

pub use model::{
    AreaPricing, CatalogEntry, CatalogFilters, CatalogQuery, CatalogRow, Category,
    DisplayAttributes, DisplayField, LegacyColumns, Offering, PriceSource,
};
pub use repository::CatalogRepository;
