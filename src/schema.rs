//! Schema node data model
//!
//! One `SchemaNode` is a single fragment of a JSON/YAML schema document.
//! `properties` and `definitions` are `IndexMap`s so generated output keeps
//! the source order of the schema file. Unknown keys are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A schema fragment: a whole document root, a definition, or a property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaNode {
    /// Pointer to another fragment (`#/definitions/Name` or a relative path)
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Member names for enum values, keyed by value text or by position
    #[serde(rename = "enumNames", skip_serializing_if = "Option::is_none")]
    pub enum_names: Option<NameHints>,

    #[serde(rename = "enumDescriptions", skip_serializing_if = "Option::is_none")]
    pub enum_descriptions: Option<NameHints>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,

    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,

    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Whether this fragment's entire body is a pointer to somewhere else.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Whether this fragment declares enum values.
    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    /// Whether this fragment is an object with its own named properties.
    pub fn is_object_with_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Whether a property name is listed as required.
    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn type_is(&self, name: &str) -> bool {
        self.schema_type.as_deref() == Some(name)
    }
}

/// `additionalProperties` is either a boolean or a schema for map values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

/// `enumNames`/`enumDescriptions`: keyed by value text, or positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameHints {
    ByValue(IndexMap<String, String>),
    ByPosition(Vec<String>),
}

impl NameHints {
    /// Look up the hint for an enum value, preferring the by-value form.
    pub fn get(&self, value: &serde_json::Value, index: usize) -> Option<&str> {
        match self {
            NameHints::ByValue(map) => {
                let key = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                map.get(&key).map(String::as_str)
            }
            NameHints::ByPosition(list) => list.get(index).map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_order_preserved() {
        let node: SchemaNode = serde_json::from_str(
            r#"{
                "type": "object",
                "properties": {
                    "zeta": {"type": "string"},
                    "alpha": {"type": "integer"},
                    "mid": {"type": "boolean"}
                },
                "required": ["alpha"]
            }"#,
        )
        .unwrap();

        let names: Vec<&String> = node.properties.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(node.requires("alpha"));
        assert!(!node.requires("zeta"));
    }

    #[test]
    fn test_enum_names_by_value_and_position() {
        let by_value: SchemaNode = serde_json::from_str(
            r#"{"enum": ["a", "b"], "enumNames": {"a": "Alpha", "b": "Beta"}}"#,
        )
        .unwrap();
        let hints = by_value.enum_names.unwrap();
        assert_eq!(hints.get(&serde_json::json!("a"), 0), Some("Alpha"));

        let by_position: SchemaNode =
            serde_json::from_str(r#"{"enum": [1, 2], "enumNames": ["One", "Two"]}"#).unwrap();
        let hints = by_position.enum_names.unwrap();
        assert_eq!(hints.get(&serde_json::json!(2), 1), Some("Two"));
    }

    #[test]
    fn test_additional_properties_forms() {
        let boolean: SchemaNode =
            serde_json::from_str(r#"{"type": "object", "additionalProperties": true}"#).unwrap();
        assert_eq!(
            boolean.additional_properties,
            Some(AdditionalProperties::Allowed(true))
        );

        let typed: SchemaNode = serde_json::from_str(
            r#"{"type": "object", "additionalProperties": {"type": "string"}}"#,
        )
        .unwrap();
        match typed.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => {
                assert!(inner.type_is("string"));
            }
            other => panic!("expected schema form, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_reference_detection() {
        let node: SchemaNode =
            serde_json::from_str(r#"{"$ref": "./other.schema.json"}"#).unwrap();
        assert!(node.is_reference());
        assert!(!node.is_enum());
        assert!(!node.is_object_with_properties());
    }
}
