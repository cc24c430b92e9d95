//! JSON-Schema-like argument and output schemas.
//!
//! [`Schema`] is the document handed to the model caller for every tool and
//! for structured output targets. Schemas come from three places:
//!
//! - [`derive`] / [`schema_for`] turn a [`TypeDescriptor`] into a schema,
//! - [`SchemaBuilder`] lets tool authors write one by hand,
//! - [`Schema::from_json_schema`] adapts a foreign JSON Schema document.

pub mod builder;
pub mod derive;

pub use builder::SchemaBuilder;
pub use derive::{derive, schema_for, ArgumentShape, FieldDescriptor, TypeDescriptor};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Primitive kind of a schema node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// A recursive schema node. An absent `kind` means "any value".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// `Some` for objects with a known (possibly empty) property set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    pub fn of(kind: SchemaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            kind: Some(SchemaKind::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Object with an empty, open property set.
    pub fn object() -> Self {
        Self {
            kind: Some(SchemaKind::Object),
            properties: Some(BTreeMap::new()),
            ..Default::default()
        }
    }

    /// Unconstrained schema, accepts any value.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Render as a JSON Schema value for a provider request.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if let Some(kind) = self.kind {
            out.insert("type".into(), Value::String(kind.to_string()));
        }
        if let Some(desc) = &self.description {
            out.insert("description".into(), Value::String(desc.clone()));
        }
        if !self.enum_values.is_empty() {
            out.insert(
                "enum".into(),
                Value::Array(
                    self.enum_values
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }
        if let Some(props) = &self.properties {
            let props = props
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_value()))
                .collect();
            out.insert("properties".into(), Value::Object(props));
        }
        if let Some(items) = &self.items {
            out.insert("items".into(), items.to_value());
        }
        if !self.required.is_empty() {
            out.insert(
                "required".into(),
                Value::Array(self.required.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(out)
    }

    /// Adapt a foreign JSON Schema document.
    ///
    /// `integer` collapses to number; unknown or missing types leave the node
    /// unconstrained. Type unions pick the first non-null member.
    pub fn from_json_schema(value: &Value) -> Schema {
        let Some(obj) = value.as_object() else {
            return Schema::any();
        };

        let kind = match obj.get("type") {
            Some(Value::String(t)) => kind_from_json_type(t),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null")
                .and_then(kind_from_json_type),
            _ => None,
        };

        let description = obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let enum_values = obj
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let properties = obj.get("properties").and_then(Value::as_object).map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), Schema::from_json_schema(schema)))
                .collect()
        });

        let items = obj
            .get("items")
            .filter(|items| items.is_object())
            .map(|items| Box::new(Schema::from_json_schema(items)));

        let required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Schema {
            kind,
            description,
            enum_values,
            properties,
            items,
            required,
        }
    }
}

fn kind_from_json_type(name: &str) -> Option<SchemaKind> {
    match name {
        "string" => Some(SchemaKind::String),
        "number" | "integer" => Some(SchemaKind::Number),
        "boolean" => Some(SchemaKind::Boolean),
        "object" => Some(SchemaKind::Object),
        "array" => Some(SchemaKind::Array),
        _ => None,
    }
}
