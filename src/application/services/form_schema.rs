//! Form schema generation
//!
//! Pure mapping from resolved fields to the descriptors preview and
//! checkout screens render. No I/O; identical input yields identical output.

use serde::Serialize;

use crate::domain::attribute::{InputType, SelectOption};
use crate::domain::binding::ResolvedField;

/// Rendering of a preview field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewFieldType {
    Text,
    Number,
    Textarea,
    Boolean,
    Select { options: Vec<SelectOption> },
}

/// One field of a rendered product form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewField {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub field_type: PreviewFieldType,
    pub required: bool,
    pub placeholder: String,
    pub help_text: String,
    pub locked: bool,
}

/// Map resolved fields to preview descriptors, dropping hidden ones.
pub fn generate_preview(fields: &[ResolvedField]) -> Vec<PreviewField> {
    fields
        .iter()
        .filter(|f| f.visible)
        .map(|f| PreviewField {
            name: f.name.clone(),
            label: f.label.clone(),
            field_type: field_type(f),
            required: f.required,
            placeholder: f.placeholder.clone(),
            help_text: f.help_text.clone(),
            locked: f.locked,
        })
        .collect()
}

fn field_type(field: &ResolvedField) -> PreviewFieldType {
    match &field.input_type {
        InputType::Text => PreviewFieldType::Text,
        InputType::Number => PreviewFieldType::Number,
        InputType::Textarea => PreviewFieldType::Textarea,
        InputType::Boolean => PreviewFieldType::Boolean,
        InputType::Select(options) if options.is_empty() => PreviewFieldType::Select {
            options: vec![SelectOption::new("", field.placeholder.clone())],
        },
        InputType::Select(options) => PreviewFieldType::Select {
            options: options.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::binding_resolver::BindingResolver;
    use crate::application::services::test_support::fixture;
    use crate::domain::binding::{FieldRef, MANDATORY_FIELDS};

    #[test]
    fn mandatory_fields_render_by_kind() {
        let fields: Vec<ResolvedField> = MANDATORY_FIELDS.iter().map(ResolvedField::mandatory).collect();
        let preview = generate_preview(&fields);

        assert_eq!(preview.len(), 4);
        assert_eq!(preview[0].field_type, PreviewFieldType::Text);
        assert_eq!(preview[1].field_type, PreviewFieldType::Textarea);
        assert_eq!(preview[2].field_type, PreviewFieldType::Number);
        assert!(preview.iter().all(|f| f.locked && f.required));
    }

    #[test]
    fn empty_select_degrades_to_placeholder_option() {
        let vendor = MANDATORY_FIELDS.iter().find(|f| f.key == "vendor").unwrap();
        let preview = generate_preview(&[ResolvedField::mandatory(vendor)]);
        assert_eq!(
            preview[0].field_type,
            PreviewFieldType::Select {
                options: vec![SelectOption::new("", "Select a vendor")]
            }
        );
    }

    #[test]
    fn hidden_fields_are_omitted() {
        let mut field = ResolvedField::mandatory(&MANDATORY_FIELDS[0]);
        field.locked = false;
        field.visible = false;
        assert!(generate_preview(&[field]).is_empty());
    }

    #[tokio::test]
    async fn preview_of_resolved_bindings_is_idempotent() {
        let fx = fixture();
        let resolver = BindingResolver::new(fx.repos.clone());
        resolver
            .add_bindings(
                "handyman",
                &[FieldRef::from("urgency"), FieldRef::from("fuel"), FieldRef::from("addr")],
            )
            .await
            .unwrap();

        let first = generate_preview(&resolver.resolve_bindings("handyman").await.unwrap());
        let second = generate_preview(&resolver.resolve_bindings("handyman").await.unwrap());
        assert_eq!(first, second);

        let fuel = first.iter().find(|f| f.name == "fuel").unwrap();
        assert_eq!(
            fuel.field_type,
            PreviewFieldType::Select {
                options: vec![
                    SelectOption::new("petrol", "Petrol"),
                    SelectOption::new("diesel", "Diesel"),
                ]
            }
        );
        let urgency = first.iter().find(|f| f.name == "urgency").unwrap();
        assert_eq!(urgency.field_type, PreviewFieldType::Textarea);
        assert!(!urgency.locked);
    }

    #[test]
    fn preview_serializes_with_flat_type_tag() {
        let preview = generate_preview(&[ResolvedField::mandatory(&MANDATORY_FIELDS[2])]);
        let json = serde_json::to_value(&preview[0]).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["name"], "price");
    }
}
