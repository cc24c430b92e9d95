//! Schema derivation from explicit type descriptors.
//!
//! A [`TypeDescriptor`] describes the shape of an argument or output type.
//! Records list their fields with [`FieldDescriptor`], which carries the
//! serialized name, a description, validation markers and an ignore flag.
//! Types opt in by implementing [`ArgumentShape`].

use std::collections::{BTreeMap, HashMap};

use super::{Schema, SchemaKind};

/// Shape of a type, as far as schema derivation is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Text,
    Integer,
    Float,
    Boolean,
    Sequence(Box<TypeDescriptor>),
    /// A string-keyed map; rendered as an object with no known properties.
    Mapping,
    Record(Vec<FieldDescriptor>),
    /// Optional or boxed value; derivation looks through to the inner type.
    Optional(Box<TypeDescriptor>),
    Any,
}

impl TypeDescriptor {
    pub fn sequence(element: TypeDescriptor) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn record(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self::Record(fields.into_iter().collect())
    }

    pub fn schema(&self) -> Schema {
        derive_type(self)
    }
}

/// A record field with its schema metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub rename: Option<String>,
    pub description: Option<String>,
    pub validation: Vec<String>,
    pub ignore: bool,
    pub ty: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            rename: None,
            description: None,
            validation: Vec::new(),
            ignore: false,
            ty,
        }
    }

    /// Serialized name, used instead of the declared name.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Comma-separated validation markers, e.g. `"required,min=1"`.
    pub fn validate(mut self, markers: &str) -> Self {
        self.validation.extend(
            markers
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        );
        self
    }

    pub fn required(self) -> Self {
        self.validate("required")
    }

    /// Exclude the field from the derived schema.
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn serialized_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    pub fn is_required(&self) -> bool {
        self.validation.iter().any(|m| m == "required")
    }
}

/// Types that can describe their own argument shape.
///
/// `()` describes "no arguments" and derives no schema at all.
pub trait ArgumentShape {
    fn descriptor() -> Option<TypeDescriptor>;
}

/// Derive a schema from a descriptor. `None` means the callable takes no
/// arguments and yields no schema.
pub fn derive(descriptor: Option<&TypeDescriptor>) -> Option<Schema> {
    descriptor.map(derive_type)
}

/// Derive the schema of `T` through its [`ArgumentShape`] impl.
pub fn schema_for<T: ArgumentShape + ?Sized>() -> Option<Schema> {
    derive(T::descriptor().as_ref())
}

fn derive_type(descriptor: &TypeDescriptor) -> Schema {
    match descriptor {
        TypeDescriptor::Text => Schema::string(),
        TypeDescriptor::Integer | TypeDescriptor::Float => Schema::number(),
        TypeDescriptor::Boolean => Schema::boolean(),
        TypeDescriptor::Sequence(element) => Schema::array(derive_type(element)),
        TypeDescriptor::Mapping => Schema::object(),
        TypeDescriptor::Optional(inner) => derive_type(inner),
        TypeDescriptor::Any => Schema::any(),
        TypeDescriptor::Record(fields) => derive_record(fields),
    }
}

fn derive_record(fields: &[FieldDescriptor]) -> Schema {
    if fields.is_empty() {
        return Schema::of(SchemaKind::Object);
    }

    // Record-level description is taken from the first declared field.
    let mut schema = Schema {
        kind: Some(SchemaKind::Object),
        description: fields[0].description.clone(),
        ..Default::default()
    };

    let mut properties = BTreeMap::new();
    for field in fields.iter().filter(|f| !f.ignore) {
        let name = field.serialized_name().to_string();
        let mut field_schema = derive_type(&field.ty);
        if let Some(desc) = &field.description {
            field_schema.description = Some(desc.clone());
        }
        if field.is_required() && !schema.required.contains(&name) {
            schema.required.push(name.clone());
        }
        properties.insert(name, field_schema);
    }
    schema.properties = Some(properties);
    schema
}

impl ArgumentShape for () {
    fn descriptor() -> Option<TypeDescriptor> {
        None
    }
}

macro_rules! shape_of {
    ($descriptor:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl ArgumentShape for $ty {
                fn descriptor() -> Option<TypeDescriptor> {
                    Some($descriptor)
                }
            }
        )+
    };
}

shape_of!(TypeDescriptor::Text => String, str, char);
shape_of!(TypeDescriptor::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
shape_of!(TypeDescriptor::Float => f32, f64);
shape_of!(TypeDescriptor::Boolean => bool);
shape_of!(TypeDescriptor::Any => serde_json::Value);
shape_of!(TypeDescriptor::Mapping => serde_json::Map<String, serde_json::Value>);

impl<T: ArgumentShape> ArgumentShape for Vec<T> {
    fn descriptor() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::sequence(
            T::descriptor().unwrap_or(TypeDescriptor::Any),
        ))
    }
}

impl<T: ArgumentShape> ArgumentShape for Option<T> {
    fn descriptor() -> Option<TypeDescriptor> {
        T::descriptor().map(TypeDescriptor::optional)
    }
}

impl<T: ArgumentShape + ?Sized> ArgumentShape for Box<T> {
    fn descriptor() -> Option<TypeDescriptor> {
        T::descriptor().map(TypeDescriptor::optional)
    }
}

impl<K, V, S> ArgumentShape for HashMap<K, V, S> {
    fn descriptor() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::Mapping)
    }
}

impl<K, V> ArgumentShape for BTreeMap<K, V> {
    fn descriptor() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::Mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Address;

    impl ArgumentShape for Address {
        fn descriptor() -> Option<TypeDescriptor> {
            Some(TypeDescriptor::record([
                FieldDescriptor::new("Street", TypeDescriptor::Text)
                    .rename("street")
                    .description("Street line")
                    .required(),
                FieldDescriptor::new("zip", TypeDescriptor::optional(TypeDescriptor::Integer)),
            ]))
        }
    }

    struct Person;

    impl ArgumentShape for Person {
        fn descriptor() -> Option<TypeDescriptor> {
            Some(TypeDescriptor::record([
                FieldDescriptor::new("name", TypeDescriptor::Text)
                    .description("A person")
                    .validate("required,min=1"),
                FieldDescriptor::new("age", TypeDescriptor::Integer).validate("gte=0"),
                FieldDescriptor::new("addresses", Vec::<Address>::descriptor().unwrap())
                    .required(),
                FieldDescriptor::new("secret", TypeDescriptor::Text).ignore(),
                FieldDescriptor::new("labels", TypeDescriptor::Mapping),
                FieldDescriptor::new("extra", TypeDescriptor::Any),
            ]))
        }
    }

    #[test]
    fn nested_records_derive_properties_and_required() {
        let schema = schema_for::<Person>().unwrap();

        assert_eq!(schema.kind, Some(SchemaKind::Object));
        assert_eq!(schema.description.as_deref(), Some("A person"));
        assert_eq!(schema.required, vec!["name", "addresses"]);

        let props = schema.properties.as_ref().unwrap();
        let mut names: Vec<_> = props.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["addresses", "age", "extra", "labels", "name"]);

        assert_eq!(props["age"], Schema::number());
        assert_eq!(props["labels"], Schema::object());
        assert_eq!(props["extra"], Schema::any());

        let address = props["addresses"].items.as_deref().unwrap();
        assert_eq!(address.kind, Some(SchemaKind::Object));
        assert_eq!(address.required, vec!["street"]);
        assert_eq!(
            address.property("street"),
            Some(&Schema::string().with_description("Street line"))
        );
        assert_eq!(address.property("zip"), Some(&Schema::number()));
    }

    #[test]
    fn unit_derives_no_schema() {
        assert_eq!(schema_for::<()>(), None);
        assert_eq!(derive(None), None);
    }

    #[test]
    fn empty_record_has_no_properties() {
        let schema = TypeDescriptor::record([]).schema();
        assert_eq!(schema, Schema::of(SchemaKind::Object));
    }

    #[test]
    fn primitives_and_wrappers() {
        assert_eq!(schema_for::<u16>(), Some(Schema::number()));
        assert_eq!(schema_for::<Option<f32>>(), Some(Schema::number()));
        assert_eq!(schema_for::<Box<bool>>(), Some(Schema::boolean()));
        assert_eq!(
            schema_for::<Vec<Vec<String>>>(),
            Some(Schema::array(Schema::array(Schema::string())))
        );
        assert_eq!(
            schema_for::<HashMap<String, i32>>(),
            Some(Schema::object())
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(schema_for::<Person>(), schema_for::<Person>());
    }
}
