//! Validate tool call arguments against a [`Schema`] before execution.

use serde_json::Value;

use crate::schema::{Schema, SchemaKind};

/// Validate decoded arguments against a schema.
///
/// Checks the value kind, required field presence, enum membership and
/// property kinds, descending into nested objects and array items. Returns
/// `Err(message)` describing the first violation found. A required field set
/// to `null` counts as missing; optional fields may be `null`.
pub fn validate_arguments(args: &Value, schema: &Schema) -> Result<(), String> {
    validate_at(args, schema, "")
}

fn validate_at(value: &Value, schema: &Schema, path: &str) -> Result<(), String> {
    if let Some(kind) = schema.kind {
        if !value_matches_kind(value, kind) {
            return Err(if path.is_empty() {
                format!("expected {kind} arguments, got {}", json_type_name(value))
            } else {
                format!(
                    "field '{path}' expected type '{kind}', got {}",
                    json_type_name(value)
                )
            });
        }
    }

    if !schema.enum_values.is_empty() {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if !schema.enum_values.contains(&rendered) {
            return Err(format!(
                "field '{path}' must be one of [{}], got {rendered}",
                schema.enum_values.join(", ")
            ));
        }
    }

    match value {
        Value::Object(obj) => {
            for name in &schema.required {
                if obj.get(name).map_or(true, Value::is_null) {
                    return Err(format!("missing required field '{}'", join(path, name)));
                }
            }
            if let Some(properties) = &schema.properties {
                for (key, field) in obj {
                    let Some(prop_schema) = properties.get(key) else {
                        continue;
                    };
                    if field.is_null() && !schema.is_required(key) {
                        continue;
                    }
                    validate_at(field, prop_schema, &join(path, key))?;
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = &schema.items {
                for (idx, item) in items.iter().enumerate() {
                    validate_at(item, item_schema, &format!("{path}[{idx}]"))?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn value_matches_kind(value: &Value, kind: SchemaKind) -> bool {
    match kind {
        SchemaKind::String => value.is_string(),
        SchemaKind::Number => value.is_number(),
        SchemaKind::Boolean => value.is_boolean(),
        SchemaKind::Object => value.is_object(),
        SchemaKind::Array => value.is_array(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use serde_json::json;

    fn file_schema() -> Schema {
        SchemaBuilder::new()
            .string("path", "File path", true)
            .string("content", "File body", false)
            .build()
    }

    #[test]
    fn rejects_non_object_args_when_schema_expects_object() {
        let err = validate_arguments(&json!("not an object"), &file_schema()).unwrap_err();
        assert!(err.contains("expected object"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = validate_arguments(&json!({}), &file_schema()).unwrap_err();
        assert!(err.contains("missing required field 'path'"));
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let err = validate_arguments(&json!({"path": null}), &file_schema()).unwrap_err();
        assert!(err.contains("missing required field 'path'"));
    }

    #[test]
    fn accepts_valid_args_and_null_optionals() {
        assert!(validate_arguments(&json!({"path": "a.txt"}), &file_schema()).is_ok());
        assert!(
            validate_arguments(&json!({"path": "a.txt", "content": null}), &file_schema()).is_ok()
        );
    }

    #[test]
    fn rejects_wrong_property_type() {
        let err = validate_arguments(&json!({"path": 42}), &file_schema()).unwrap_err();
        assert!(err.contains("field 'path' expected type 'string', got number"));
    }

    #[test]
    fn ignores_unknown_properties() {
        assert!(validate_arguments(&json!({"path": "a", "mode": 1}), &file_schema()).is_ok());
    }

    #[test]
    fn descends_into_nested_objects_and_arrays() {
        let schema = SchemaBuilder::new()
            .array(
                "people",
                "People to greet",
                SchemaBuilder::new()
                    .string("name", "Name", true)
                    .number("age", "Age", false)
                    .build(),
                true,
            )
            .build();

        assert!(validate_arguments(
            &json!({"people": [{"name": "a"}, {"name": "b", "age": 3}]}),
            &schema
        )
        .is_ok());

        let err = validate_arguments(&json!({"people": [{"name": "a"}, {"age": 3}]}), &schema)
            .unwrap_err();
        assert_eq!(err, "missing required field 'people[1].name'");

        let err = validate_arguments(
            &json!({"people": [{"name": "a", "age": "old"}]}),
            &schema,
        )
        .unwrap_err();
        assert!(err.contains("field 'people[0].age' expected type 'number'"));
    }

    #[test]
    fn enforces_enum_membership() {
        let schema = SchemaBuilder::new()
            .string_enum("unit", "Unit", &["celsius", "fahrenheit"], true)
            .build();

        assert!(validate_arguments(&json!({"unit": "celsius"}), &schema).is_ok());
        let err = validate_arguments(&json!({"unit": "kelvin"}), &schema).unwrap_err();
        assert!(err.contains("must be one of [celsius, fahrenheit]"));
    }

    #[test]
    fn unconstrained_schema_accepts_anything() {
        assert!(validate_arguments(&json!([1, "two", null]), &Schema::any()).is_ok());
    }
}
