//! Attribute binding domain entity and resolved form fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::attribute::{DataType, InputType};

/// Section of the product form a bound field is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    General,
    #[default]
    Custom,
    Specifications,
    Pricing,
    Features,
}

impl FieldGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Custom => "custom",
            Self::Specifications => "specifications",
            Self::Pricing => "pricing",
            Self::Features => "features",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Self::General),
            "custom" => Some(Self::Custom),
            "specifications" => Some(Self::Specifications),
            "pricing" => Some(Self::Pricing),
            "features" => Some(Self::Features),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment of one registry definition to one service type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub id: i32,
    pub service_type_id: String,
    pub attribute_id: i32,
    pub is_required: bool,
    pub is_visible: bool,
    /// Dense per service type; not globally unique
    pub display_order: u32,
    pub field_group: FieldGroup,
    pub override_label: Option<String>,
    pub override_placeholder: Option<String>,
    pub override_help_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert when attaching a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBinding {
    pub service_type_id: String,
    pub attribute_id: i32,
    pub display_order: u32,
    pub is_required: bool,
    pub is_visible: bool,
    pub field_group: FieldGroup,
}

impl NewBinding {
    pub fn new(service_type_id: impl Into<String>, attribute_id: i32, display_order: u32) -> Self {
        Self {
            service_type_id: service_type_id.into(),
            attribute_id,
            display_order,
            is_required: false,
            is_visible: true,
            field_group: FieldGroup::default(),
        }
    }
}

/// Partial edit of a binding.
///
/// Override fields: `Some("")` clears the override so the definition value
/// shows through again. `display_order` is accepted only so that a patch
/// carrying it can be rejected; ordering changes go through `reorder`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BindingPatch {
    #[validate(length(max = 128, message = "override_label must be at most 128 characters"))]
    pub override_label: Option<String>,
    #[validate(length(max = 255))]
    pub override_placeholder: Option<String>,
    #[validate(length(max = 1024))]
    pub override_help_text: Option<String>,
    pub is_required: Option<bool>,
    /// Hidden fields stay bound but are left out of the form preview
    pub is_visible: Option<bool>,
    pub field_group: Option<FieldGroup>,
    #[validate(range(min = 0, message = "display_order must not be negative"))]
    pub display_order: Option<i64>,
}

impl BindingPatch {
    pub fn is_empty(&self) -> bool {
        self.override_label.is_none()
            && self.override_placeholder.is_none()
            && self.override_help_text.is_none()
            && self.is_required.is_none()
            && self.is_visible.is_none()
            && self.field_group.is_none()
            && self.display_order.is_none()
    }

    pub fn apply_to(self, binding: &mut AttributeBinding) {
        fn edit(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value {
                *slot = if v.trim().is_empty() { None } else { Some(v) };
            }
        }

        edit(&mut binding.override_label, self.override_label);
        edit(&mut binding.override_placeholder, self.override_placeholder);
        edit(&mut binding.override_help_text, self.override_help_text);
        if let Some(required) = self.is_required {
            binding.is_required = required;
        }
        if let Some(visible) = self.is_visible {
            binding.is_visible = visible;
        }
        if let Some(group) = self.field_group {
            binding.field_group = group;
        }
        binding.updated_at = Utc::now();
    }
}

/// Direction of a single reorder step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// How a mutation call addresses a field of a service type's form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// Registry definition id
    Attribute(i32),
    /// Machine key; may name a mandatory field
    Key(String),
}

impl From<i32> for FieldRef {
    fn from(id: i32) -> Self {
        Self::Attribute(id)
    }
}

impl From<&str> for FieldRef {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attribute(id) => write!(f, "attribute #{}", id),
            Self::Key(key) => write!(f, "'{}'", key),
        }
    }
}

// ── Mandatory fields ────────────────────────────────────────────

/// Always-present form field outside the binding system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MandatoryField {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub help_text: &'static str,
    pub input_kind: &'static str,
    pub data_type: DataType,
    pub field_group: FieldGroup,
}

pub const MANDATORY_FIELDS: [MandatoryField; 4] = [
    MandatoryField {
        key: "name",
        label: "Name",
        placeholder: "Enter a name",
        help_text: "Shown as the listing title",
        input_kind: "text",
        data_type: DataType::Text,
        field_group: FieldGroup::General,
    },
    MandatoryField {
        key: "description",
        label: "Description",
        placeholder: "Describe the offering",
        help_text: "Shown on the listing detail page",
        input_kind: "textarea",
        data_type: DataType::Text,
        field_group: FieldGroup::General,
    },
    MandatoryField {
        key: "price",
        label: "Price",
        placeholder: "0.00",
        help_text: "Base price before any area override",
        input_kind: "number",
        data_type: DataType::Decimal,
        field_group: FieldGroup::Pricing,
    },
    MandatoryField {
        key: "vendor",
        label: "Vendor",
        placeholder: "Select a vendor",
        help_text: "Vendor fulfilling this offering",
        input_kind: "select",
        data_type: DataType::Text,
        field_group: FieldGroup::General,
    },
];

pub fn is_mandatory_key(key: &str) -> bool {
    MANDATORY_FIELDS.iter().any(|f| f.key == key)
}

// ── Resolved fields ─────────────────────────────────────────────

/// Where a resolved field came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FieldSource {
    Mandatory,
    Binding {
        binding_id: i32,
        attribute_id: i32,
        display_order: u32,
    },
}

/// A form field with overrides applied, ready for rendering decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub help_text: String,
    pub data_type: DataType,
    pub input_type: InputType,
    pub required: bool,
    pub visible: bool,
    pub locked: bool,
    pub field_group: FieldGroup,
    pub default_value: Option<String>,
    #[serde(flatten)]
    pub source: FieldSource,
}

impl ResolvedField {
    pub fn mandatory(field: &MandatoryField) -> Self {
        Self {
            name: field.key.to_string(),
            label: field.label.to_string(),
            placeholder: field.placeholder.to_string(),
            help_text: field.help_text.to_string(),
            data_type: field.data_type,
            input_type: InputType::from_parts(field.input_kind, None),
            required: true,
            visible: true,
            locked: true,
            field_group: field.field_group,
            default_value: None,
            source: FieldSource::Mandatory,
        }
    }

    pub fn display_order(&self) -> Option<u32> {
        match self.source {
            FieldSource::Mandatory => None,
            FieldSource::Binding { display_order, .. } => Some(display_order),
        }
    }

    pub fn binding_id(&self) -> Option<i32> {
        match self.source {
            FieldSource::Mandatory => None,
            FieldSource::Binding { binding_id, .. } => Some(binding_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> AttributeBinding {
        let now = Utc::now();
        AttributeBinding {
            id: 7,
            service_type_id: "handyman".into(),
            attribute_id: 3,
            is_required: false,
            is_visible: true,
            display_order: 0,
            field_group: FieldGroup::Custom,
            override_label: Some("Urgency level".into()),
            override_placeholder: None,
            override_help_text: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn mandatory_keys_are_reserved() {
        assert!(is_mandatory_key("price"));
        assert!(is_mandatory_key("vendor"));
        assert!(!is_mandatory_key("urgency"));
    }

    #[test]
    fn mandatory_fields_resolve_locked_and_required() {
        for field in MANDATORY_FIELDS.iter() {
            let resolved = ResolvedField::mandatory(field);
            assert!(resolved.locked);
            assert!(resolved.required);
            assert_eq!(resolved.display_order(), None);
        }
    }

    #[test]
    fn patch_clears_and_sets_overrides() {
        let mut b = binding();
        let patch = BindingPatch {
            override_label: Some("  ".into()),
            override_placeholder: Some("How soon?".into()),
            is_required: Some(true),
            is_visible: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut b);
        assert_eq!(b.override_label, None);
        assert_eq!(b.override_placeholder.as_deref(), Some("How soon?"));
        assert!(b.is_required);
        assert!(!b.is_visible);
        assert_eq!(b.display_order, 0);
    }

    #[test]
    fn field_group_parse_matches_as_str() {
        for g in [
            FieldGroup::General,
            FieldGroup::Custom,
            FieldGroup::Specifications,
            FieldGroup::Pricing,
            FieldGroup::Features,
        ] {
            assert_eq!(FieldGroup::parse(g.as_str()), Some(g));
        }
        assert_eq!(FieldGroup::parse("misc"), None);
    }
}
