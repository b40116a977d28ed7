//! Service type domain entity

use serde::{Deserialize, Serialize};

/// A marketplace vertical, e.g. `handyman`, `grocery`, `fashion`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    /// Slug shared by bindings, service areas and offerings
    pub id: String,
    pub name: String,
    pub is_active: bool,
    /// Storefront ordering of verticals
    pub sort_order: i32,
}

impl ServiceType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_active: true,
            sort_order,
        }
    }
}
