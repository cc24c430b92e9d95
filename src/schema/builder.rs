//! Hand-written object schemas.

use std::collections::BTreeMap;

use super::{Schema, SchemaKind};

/// Builder for object schemas with named properties.
///
/// ```
/// use agentic::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .string("city", "City name", true)
///     .number("days", "Forecast length", false)
///     .build();
/// assert!(schema.is_required("city"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: BTreeMap<String, Schema>,
    required: Vec<String>,
    description: Option<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add a property with an arbitrary schema.
    pub fn property(mut self, name: impl Into<String>, schema: Schema, required: bool) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Add a string property.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(name, Schema::string().with_description(description), required)
    }

    /// Add a number property.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(name, Schema::number().with_description(description), required)
    }

    /// Add a boolean property.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(name, Schema::boolean().with_description(description), required)
    }

    /// Add an enum (string) property.
    pub fn string_enum(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
        required: bool,
    ) -> Self {
        self.property(
            name,
            Schema::string()
                .with_description(description)
                .with_enum(values.iter().copied()),
            required,
        )
    }

    /// Add an array property with the given item schema.
    pub fn array(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        items: Schema,
        required: bool,
    ) -> Self {
        self.property(name, Schema::array(items).with_description(description), required)
    }

    pub fn build(self) -> Schema {
        Schema {
            kind: Some(SchemaKind::Object),
            description: self.description,
            properties: Some(self.properties),
            required: self.required,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_keeps_insertion_order_without_duplicates() {
        let schema = SchemaBuilder::new()
            .string("b", "second", true)
            .string("a", "first", true)
            .string("b", "again", true)
            .boolean("c", "optional", false)
            .build();

        assert_eq!(schema.required, vec!["b", "a"]);
        assert_eq!(
            schema.property("b").and_then(|s| s.description.as_deref()),
            Some("again")
        );
        assert!(!schema.is_required("c"));
    }
}
