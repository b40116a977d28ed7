//! Seeded in-memory repositories shared by the service tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::domain::attribute::{EntityType, InputType, NewAttributeDefinition, SelectOption};
use crate::domain::catalog::{AreaPricing, LegacyColumns, Offering};
use crate::domain::service_area::ServiceArea;
use crate::domain::service_type::ServiceType;
use crate::domain::RepositoryProvider;
use crate::infrastructure::storage::InMemoryRepositoryProvider;

pub(crate) struct Fixture {
    pub repos: Arc<dyn RepositoryProvider>,
    pub memory: Arc<InMemoryRepositoryProvider>,
    /// Serviceable, local pricing for grocery
    pub bengaluru: i32,
    /// Serviceable, no local pricing
    pub chennai: i32,
    /// Not serviceable, has raw pricing rows
    pub delhi: i32,
    pub pulses: i32,
}

fn definition(name: &str, label: Option<&str>, input: InputType, types: &[EntityType]) -> NewAttributeDefinition {
    let mut def = NewAttributeDefinition::text(name, label);
    def.input_type = input;
    def.applicable_entity_types = types.iter().copied().collect::<BTreeSet<_>>();
    def
}

fn seed_definition(memory: &InMemoryRepositoryProvider, definition: NewAttributeDefinition) {
    memory.seed_definition(definition).expect("seed definition");
}

pub(crate) fn fixture() -> Fixture {
    let memory = Arc::new(InMemoryRepositoryProvider::new());

    memory.seed_service_type(ServiceType::new("grocery", "Grocery", 1));
    memory.seed_service_type(ServiceType::new("handyman", "Handyman", 2));
    memory.seed_service_type(ServiceType::new("fashion", "Fashion", 3));
    memory.seed_service_type(ServiceType {
        is_active: false,
        ..ServiceType::new("legacy", "Legacy rentals", 4)
    });

    seed_definition(&memory, definition(
        "urgency",
        Some("Urgency"),
        InputType::Textarea,
        &[EntityType::Product, EntityType::Booking],
    ));
    seed_definition(&memory, definition(
        "addr",
        None,
        InputType::Text,
        &[EntityType::Product, EntityType::Booking],
    ));
    seed_definition(&memory, definition("brand", Some("Brand"), InputType::Text, &[EntityType::Product]));
    seed_definition(&memory, definition("tools", Some("Tools needed"), InputType::Boolean, &[EntityType::Service]));
    seed_definition(&memory, definition(
        "fuel",
        Some("Fuel"),
        InputType::Select(vec![
            SelectOption::new("petrol", "Petrol"),
            SelectOption::new("diesel", "Diesel"),
        ]),
        &[EntityType::Product],
    ));

    let bengaluru = memory
        .seed_area(
            ServiceArea::new("560001", "Bengaluru", "Karnataka")
                .with_service_types(["grocery", "handyman", "fashion", "legacy"])
                .with_location(12.9716, 77.5946),
        )
        .id;
    let delhi = memory
        .seed_area(ServiceArea {
            is_serviceable: false,
            ..ServiceArea::new("110001", "New Delhi", "Delhi")
                .with_service_types(["grocery"])
                .with_location(28.6315, 77.2167)
        })
        .id;
    memory.seed_area(
        ServiceArea::new("400001", "Mumbai", "Maharashtra")
            .with_service_types(["legacy"])
            .with_location(18.9388, 72.8354),
    );
    let chennai = memory
        .seed_area(ServiceArea::new("600001", "Chennai", "Tamil Nadu").with_service_types(["fashion", "grocery"]))
        .id;

    let staples = memory.seed_category("Staples");
    let pulses = memory.seed_category("Pulses");
    let apparel = memory.seed_category("Apparel");

    let rice = memory.seed_offering(Offering {
        category_id: Some(staples),
        stock: Some(120),
        ..Offering::new("grocery", "Basmati Rice 5kg", 59_900)
    });
    let dal = memory.seed_offering(Offering {
        category_id: Some(pulses),
        stock: Some(80),
        ..Offering::new("grocery", "Toor Dal 1kg", 18_900)
    });
    memory.seed_offering(Offering {
        category_id: Some(staples),
        ..Offering::new("grocery", "Kashmiri Saffron 1g", 45_000)
    });

    memory.seed_offering(Offering {
        category_id: Some(apparel),
        custom_fields: BTreeMap::from([("brand".to_string(), "Fabindia".to_string())]),
        legacy: LegacyColumns {
            brand: Some("Generic".into()),
            rating: Some("4.2".into()),
            ..LegacyColumns::default()
        },
        ..Offering::new("fashion", "Cotton Kurta", 129_900)
    });
    memory.seed_offering(Offering {
        category_id: Some(apparel),
        legacy: LegacyColumns {
            brand: Some("Levi's".into()),
            ..LegacyColumns::default()
        },
        ..Offering::new("fashion", "Denim Jeans", 249_900)
    });
    memory.seed_offering(Offering {
        is_active: false,
        ..Offering::new("fashion", "Discontinued Scarf", 39_900)
    });

    memory.seed_area_pricing(AreaPricing {
        service_area_id: bengaluru,
        offering_id: rice.id,
        price: 61_000,
        stock: Some(40),
        is_available: true,
    });
    memory.seed_area_pricing(AreaPricing {
        service_area_id: bengaluru,
        offering_id: dal.id,
        price: 19_500,
        stock: Some(0),
        is_available: false,
    });
    memory.seed_area_pricing(AreaPricing {
        service_area_id: delhi,
        offering_id: rice.id,
        price: 58_000,
        stock: Some(10),
        is_available: true,
    });

    let repos: Arc<dyn RepositoryProvider> = memory.clone();
    Fixture {
        repos,
        memory,
        bengaluru,
        chennai,
        delhi,
        pulses,
    }
}
