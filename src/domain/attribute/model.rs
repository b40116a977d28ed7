//! Attribute definition domain entity

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validations::validate_machine_key;

/// Storage type of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Text,
    Number,
    Decimal,
    Boolean,
    Date,
    Json,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Json => "json",
        }
    }

    /// Unknown values read back from storage degrade to `Text`.
    pub fn parse(s: &str) -> Self {
        match s {
            "number" | "integer" => Self::Number,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kinds an attribute can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Service,
    Booking,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Service => "service",
            Self::Booking => "booking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "product" => Some(Self::Product),
            "service" => Some(Self::Service),
            "booking" => Some(Self::Booking),
            _ => None,
        }
    }
}

/// One choice of an enumerated input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Options arrive either as bare strings or as value/label pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Pair { value: String, label: Option<String> },
}

/// How an attribute is captured on a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum InputType {
    Text,
    Number,
    Textarea,
    Boolean,
    Select(Vec<SelectOption>),
}

impl Default for InputType {
    fn default() -> Self {
        Self::Text
    }
}

impl InputType {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Boolean => "boolean",
            Self::Select(_) => "select",
        }
    }

    /// Rebuild from the stored `(input_type, options)` column pair.
    ///
    /// Single-line variants the closed set does not name (email, url, tel...)
    /// render as `Text`. An unreadable options payload yields an empty select,
    /// which the form generator degrades to a placeholder option.
    pub fn from_parts(kind: &str, options: Option<&str>) -> Self {
        match kind {
            "number" => Self::Number,
            "textarea" => Self::Textarea,
            "boolean" | "checkbox" => Self::Boolean,
            "select" => Self::Select(options.map(parse_options).unwrap_or_default()),
            _ => Self::Text,
        }
    }

    /// Options payload for storage; `None` for non-select inputs.
    pub fn options_json(&self) -> Option<String> {
        match self {
            Self::Select(options) => serde_json::to_string(options).ok(),
            _ => None,
        }
    }
}

fn parse_options(raw: &str) -> Vec<SelectOption> {
    let parsed: Vec<RawOption> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable select options payload");
            return Vec::new();
        }
    };
    parsed
        .into_iter()
        .map(|o| match o {
            RawOption::Plain(v) => SelectOption::new(v.clone(), v),
            RawOption::Pair { value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                SelectOption::new(value, label)
            }
        })
        .collect()
}

/// Registry entry describing one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: i32,
    /// Machine key, unique across the registry
    pub name: String,
    pub label: Option<String>,
    pub data_type: DataType,
    pub input_type: InputType,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub group_name: Option<String>,
    pub default_value: Option<String>,
    pub applicable_entity_types: BTreeSet<EntityType>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttributeDefinition {
    pub fn applies_to(&self, entity_type: EntityType) -> bool {
        self.applicable_entity_types.contains(&entity_type)
    }
}

/// Request to register a new attribute definition
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAttributeDefinition {
    #[validate(
        length(min = 1, max = 64, message = "name must be 1–64 characters"),
        custom(function = "validate_machine_key")
    )]
    pub name: String,
    #[validate(length(max = 128, message = "label must be at most 128 characters"))]
    pub label: Option<String>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub input_type: InputType,
    #[validate(length(max = 255))]
    pub placeholder: Option<String>,
    #[validate(length(max = 1024))]
    pub help_text: Option<String>,
    pub group_name: Option<String>,
    pub default_value: Option<String>,
    #[serde(default)]
    pub applicable_entity_types: BTreeSet<EntityType>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewAttributeDefinition {
    /// Minimal text attribute applicable to products.
    pub fn text(name: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            name: name.into(),
            label: label.map(str::to_string),
            data_type: DataType::Text,
            input_type: InputType::Text,
            placeholder: None,
            help_text: None,
            group_name: None,
            default_value: None,
            applicable_entity_types: BTreeSet::from([EntityType::Product]),
            is_active: true,
        }
    }
}

/// Partial edit of a definition. `Some("")` clears an optional text field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttributeDefinitionPatch {
    #[validate(length(min = 1, max = 64), custom(function = "validate_machine_key"))]
    pub name: Option<String>,
    #[validate(length(max = 128))]
    pub label: Option<String>,
    pub data_type: Option<DataType>,
    pub input_type: Option<InputType>,
    #[validate(length(max = 255))]
    pub placeholder: Option<String>,
    #[validate(length(max = 1024))]
    pub help_text: Option<String>,
    pub group_name: Option<String>,
    pub default_value: Option<String>,
    pub applicable_entity_types: Option<BTreeSet<EntityType>>,
}

impl AttributeDefinitionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.label.is_none()
            && self.data_type.is_none()
            && self.input_type.is_none()
            && self.placeholder.is_none()
            && self.help_text.is_none()
            && self.group_name.is_none()
            && self.default_value.is_none()
            && self.applicable_entity_types.is_none()
    }

    /// Apply everything except `name`; renames are checked by the caller.
    pub fn apply_to(self, definition: &mut AttributeDefinition) {
        fn edit(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value {
                *slot = if v.trim().is_empty() { None } else { Some(v) };
            }
        }

        edit(&mut definition.label, self.label);
        edit(&mut definition.placeholder, self.placeholder);
        edit(&mut definition.help_text, self.help_text);
        edit(&mut definition.group_name, self.group_name);
        edit(&mut definition.default_value, self.default_value);
        if let Some(data_type) = self.data_type {
            definition.data_type = data_type;
        }
        if let Some(input_type) = self.input_type {
            definition.input_type = input_type;
        }
        if let Some(types) = self.applicable_entity_types {
            definition.applicable_entity_types = types;
        }
        definition.updated_at = Utc::now();
    }
}
