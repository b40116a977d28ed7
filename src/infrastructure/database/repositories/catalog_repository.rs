//! SeaORM implementation of CatalogRepository
//!
//! Area rows come from `area_offerings` joined with `offerings`; the global
//! catalog reads `offerings` alone at base price.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use log::warn;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use sea_orm::sea_query::{JoinType, LikeExpr};

use super::db_err;
use crate::domain::catalog::{CatalogQuery, CatalogRepository, CatalogRow, LegacyColumns};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{area_offering, category, offering};

// ── Conversion helpers ──────────────────────────────────────────

/// Non-string JSON values (numbers, booleans) are kept in their textual form.
fn parse_custom_fields(offering_id: i32, raw: &str) -> BTreeMap<String, String> {
    match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect(),
        Err(e) => {
            warn!("Offering {} has unreadable custom fields: {}", offering_id, e);
            BTreeMap::new()
        }
    }
}

fn to_row(
    o: offering::Model,
    categories: &HashMap<i32, String>,
    price: i64,
    stock: Option<i64>,
    is_available: bool,
) -> CatalogRow {
    CatalogRow {
        offering_id: o.id,
        category_name: o.category_id.and_then(|id| categories.get(&id).cloned()),
        custom_fields: parse_custom_fields(o.id, &o.custom_fields),
        offering_name: o.name,
        price,
        stock,
        is_available,
        primary_image_url: o.primary_image_url,
        legacy: LegacyColumns {
            brand: o.brand,
            rating: o.rating,
            seats: o.seats,
            transmission: o.transmission,
        },
    }
}

const LIKE_ESCAPE: char = '\\';

/// `%term%` with the term's own wildcards matched literally.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Offering filters shared by the area and global queries.
fn listed<S>(select: S, query: &CatalogQuery) -> S
where
    S: QueryFilter + QueryOrder + QuerySelect,
{
    let mut select = select
        .filter(offering::Column::ServiceTypeId.eq(query.service_type.as_str()))
        .filter(offering::Column::IsActive.eq(true));
    if let Some(category_id) = query.category_id {
        select = select.filter(offering::Column::CategoryId.eq(category_id));
    }
    if let Some(term) = &query.search_term {
        select = select.filter(offering::Column::Name.like(contains_pattern(term)));
    }
    select
        .order_by_asc(offering::Column::Name)
        .order_by_asc(offering::Column::Id)
        .limit(query.window.limit)
        .offset(query.window.offset)
}

// ── SeaOrmCatalogRepository ─────────────────────────────────────

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn category_names(&self, offerings: &[&offering::Model]) -> DomainResult<HashMap<i32, String>> {
        let ids: Vec<i32> = offerings.iter().filter_map(|o| o.category_id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(|c| (c.id, c.name)).collect())
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn area_catalog(&self, service_area_id: i32, query: &CatalogQuery) -> DomainResult<Vec<CatalogRow>> {
        let select = area_offering::Entity::find()
            .find_also_related(offering::Entity)
            .filter(area_offering::Column::ServiceAreaId.eq(service_area_id));

        let rows: Vec<(area_offering::Model, offering::Model)> = listed(select, query)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .filter_map(|(pricing, offering)| offering.map(|o| (pricing, o)))
            .collect();

        let categories = self
            .category_names(&rows.iter().map(|(_, o)| o).collect::<Vec<_>>())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(p, o)| to_row(o, &categories, p.price, p.stock, p.is_available))
            .collect())
    }

    async fn has_area_pricing(&self, service_area_id: i32, service_type: &str) -> DomainResult<bool> {
        let count = area_offering::Entity::find()
            .join(JoinType::InnerJoin, area_offering::Relation::Offering.def())
            .filter(area_offering::Column::ServiceAreaId.eq(service_area_id))
            .filter(offering::Column::ServiceTypeId.eq(service_type))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn global_catalog(&self, query: &CatalogQuery) -> DomainResult<Vec<CatalogRow>> {
        let models = listed(offering::Entity::find(), query)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let categories = self
            .category_names(&models.iter().collect::<Vec<_>>())
            .await?;

        Ok(models
            .into_iter()
            .map(|o| {
                let stock = o.stock;
                let price = o.base_price;
                to_row(o, &categories, price, stock, stock.map_or(true, |s| s > 0))
            })
            .collect())
    }
}

