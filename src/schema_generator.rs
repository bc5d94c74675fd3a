//! Type Inspector: turns a [`TypeInfo`] into a schema plus the named
//! sub-schemas met on the way.
//!
//! The generator keeps no state between calls. Named sub-schemas are
//! returned in [`Reflection::definitions`] and it is up to the caller to
//! publish them into a [`DefinitionRegistry`](crate::registry::DefinitionRegistry).
//!
//! Two interception points let callers special-case parts of a type:
//!
//! - type interception, through a per-call closure
//!   ([`ReflectOptions::intercept_type`]) followed by the [`TypeHook`]s
//!   registered on the generator, in registration order. Any of them may
//!   fill the schema and stop default handling.
//! - property interception ([`ReflectOptions::intercept_property`]), called
//!   once for every property of the root structure.

use crate::error::{Error, Result};
use crate::operation::Processing;
use crate::schema::{AdditionalProperties, Schema, SchemaType, COMPONENTS_SCHEMAS_PREFIX};
use crate::type_info::{FieldInfo, StructInfo, TypeInfo, TypeKind, TAG_JSON};
use indexmap::IndexMap;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// What a [`TypeHook`] gets to see besides the type itself
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Operation phase, absent outside of operation building
    pub processing: Option<&'a Processing>,
    /// Field whose type is being reflected, absent for the root and collection items
    pub field: Option<&'a FieldInfo>,
    /// Annotation tag naming properties in this reflection
    pub property_tag: &'a str,
}

/// Extension hook consulted for every type visited during reflection.
pub trait TypeHook: Send + Sync {
    /// Returns `Ok(true)` when `schema` is complete and default handling must be skipped.
    fn intercept_type(
        &self,
        context: &HookContext<'_>,
        ty: &TypeInfo,
        schema: &mut Schema,
    ) -> Result<bool>;
}

impl<F> TypeHook for F
where
    F: Fn(&HookContext<'_>, &TypeInfo, &mut Schema) -> Result<bool> + Send + Sync,
{
    fn intercept_type(
        &self,
        context: &HookContext<'_>,
        ty: &TypeInfo,
        schema: &mut Schema,
    ) -> Result<bool> {
        self(context, ty, schema)
    }
}

/// Per-call type interceptor, see [`ReflectOptions::intercept_type`]
pub type TypeInterceptor<'a> = dyn FnMut(&TypeInfo, &mut Schema) -> Result<bool> + 'a;

/// Per-call property interceptor, see [`ReflectOptions::intercept_property`]
pub type PropertyInterceptor<'a> = dyn FnMut(&str, &FieldInfo, &Schema) -> Result<()> + 'a;

/// Options of one reflection
pub struct ReflectOptions<'a> {
    property_name_tag: String,
    name_mapping: Option<&'a BTreeMap<String, String>>,
    definitions_prefix: String,
    name_prefix: String,
    root_ref: bool,
    inline_refs: bool,
    skip_embedded_maps_slices: bool,
    processing: Option<Processing>,
    intercept_type: Option<&'a mut TypeInterceptor<'a>>,
    intercept_property: Option<&'a mut PropertyInterceptor<'a>>,
}

impl<'a> ReflectOptions<'a> {
    pub fn new() -> Self {
        Self {
            property_name_tag: TAG_JSON.to_string(),
            name_mapping: None,
            definitions_prefix: COMPONENTS_SCHEMAS_PREFIX.to_string(),
            name_prefix: String::new(),
            root_ref: false,
            inline_refs: false,
            skip_embedded_maps_slices: false,
            processing: None,
            intercept_type: None,
            intercept_property: None,
        }
    }

    /// Annotation tag that names properties; fields without it are skipped
    /// unless the name mapping lists them
    pub fn property_name_tag(mut self, tag: &str) -> Self {
        self.property_name_tag = tag.to_string();
        self
    }

    /// Field identifier -> property name overrides
    pub fn name_mapping(mut self, mapping: &'a BTreeMap<String, String>) -> Self {
        self.name_mapping = Some(mapping);
        self
    }

    /// Path that definition references start with
    pub fn definitions_prefix(mut self, prefix: &str) -> Self {
        self.definitions_prefix = prefix.to_string();
        self
    }

    /// Prepended to every definition name, keeping differently encoded
    /// schemas of one type apart
    pub fn name_prefix(mut self, prefix: &str) -> Self {
        self.name_prefix = prefix.to_string();
        self
    }

    /// Hoists a named root type into the definitions and returns a reference
    pub fn root_ref(mut self) -> Self {
        self.root_ref = true;
        self
    }

    /// Expands every named type in place
    pub fn inline_refs(mut self) -> Self {
        self.inline_refs = true;
        self
    }

    /// Embedded sequences and maps no longer turn a structure into a collection
    pub fn skip_embedded_maps_slices(mut self) -> Self {
        self.skip_embedded_maps_slices = true;
        self
    }

    pub fn processing(mut self, processing: Processing) -> Self {
        self.processing = Some(processing);
        self
    }

    /// Runs before the registered hooks for every visited type
    pub fn intercept_type(mut self, interceptor: &'a mut TypeInterceptor<'a>) -> Self {
        self.intercept_type = Some(interceptor);
        self
    }

    /// Receives every property of the root structure with its final schema
    pub fn intercept_property(mut self, interceptor: &'a mut PropertyInterceptor<'a>) -> Self {
        self.intercept_property = Some(interceptor);
        self
    }
}

impl Default for ReflectOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one reflection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reflection {
    /// Root schema, a reference when the root was hoisted
    pub schema: Schema,
    /// Named sub-schemas keyed by prefixed definition name
    pub definitions: IndexMap<String, Schema>,
}

impl Reflection {
    /// The root schema, following a reference into the own definitions
    pub fn resolved_root(&self, definitions_prefix: &str) -> &Schema {
        self.schema
            .reference
            .as_deref()
            .and_then(|r| r.strip_prefix(definitions_prefix))
            .and_then(|name| self.definitions.get(name))
            .unwrap_or(&self.schema)
    }
}

/// Schema generator - converts described types to schemas
#[derive(Default)]
pub struct SchemaGenerator {
    hooks: Vec<Box<dyn TypeHook>>,
}

impl fmt::Debug for SchemaGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl SchemaGenerator {
    pub fn new() -> Self {
        debug!("Initializing SchemaGenerator");
        Self::default()
    }

    /// Appends an extension hook; hooks run in registration order
    pub fn add_hook(&mut self, hook: impl TypeHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Reflects `ty` into a schema and its named sub-schemas
    pub fn reflect(&self, ty: &TypeInfo, options: &mut ReflectOptions<'_>) -> Result<Reflection> {
        debug!(
            "Reflecting {} with property tag {}",
            ty.display_name(),
            options.property_name_tag
        );

        let mut walker = Walker {
            generator: self,
            options,
            definitions: IndexMap::new(),
        };
        let schema = walker.schema_for(ty, None, true)?;

        Ok(Reflection {
            schema,
            definitions: walker.definitions,
        })
    }
}

struct Walker<'w, 'a> {
    generator: &'w SchemaGenerator,
    options: &'w mut ReflectOptions<'a>,
    definitions: IndexMap<String, Schema>,
}

impl Walker<'_, '_> {
    fn schema_for(&mut self, ty: &TypeInfo, field: Option<&FieldInfo>, root: bool) -> Result<Schema> {
        let mut schema = Schema::default();
        if self.intercept(ty, field, &mut schema)? {
            return Ok(schema);
        }

        if let Some(name) = ty.name.as_deref() {
            let hoist = !self.options.inline_refs && (!root || self.options.root_ref);
            if hoist {
                let key = format!("{}{}", self.options.name_prefix, name);
                if !self.definitions.contains_key(&key) {
                    self.fill(ty, field, &mut schema, root)?;
                    self.definitions.entry(key.clone()).or_insert(schema);
                }
                return Ok(Schema::reference(format!(
                    "{}{}",
                    self.options.definitions_prefix, key
                )));
            }
        }

        self.fill(ty, field, &mut schema, root)?;
        Ok(schema)
    }

    fn intercept(
        &mut self,
        ty: &TypeInfo,
        field: Option<&FieldInfo>,
        schema: &mut Schema,
    ) -> Result<bool> {
        if let Some(interceptor) = self.options.intercept_type.as_deref_mut() {
            if interceptor(ty, schema)? {
                return Ok(true);
            }
        }

        let context = HookContext {
            processing: self.options.processing.as_ref(),
            field,
            property_tag: &self.options.property_name_tag,
        };
        for hook in &self.generator.hooks {
            if hook.intercept_type(&context, ty, schema)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn fill(
        &mut self,
        ty: &TypeInfo,
        field: Option<&FieldInfo>,
        schema: &mut Schema,
        root: bool,
    ) -> Result<()> {
        match &ty.kind {
            TypeKind::Any => {}
            TypeKind::Boolean => set_type(schema, SchemaType::Boolean, None),
            TypeKind::Integer(format) => set_type(schema, SchemaType::Integer, format.as_deref()),
            TypeKind::Number(format) => set_type(schema, SchemaType::Number, format.as_deref()),
            TypeKind::String(format) => set_type(schema, SchemaType::String, format.as_deref()),
            TypeKind::File => set_type(schema, SchemaType::String, Some("binary")),
            TypeKind::Array(items) => {
                schema.schema_type = Some(SchemaType::Array);
                schema.items = Some(Box::new(self.schema_for(items, None, false)?));
            }
            TypeKind::Map(values) => {
                schema.schema_type = Some(SchemaType::Object);
                let values = self.schema_for(values, None, false)?;
                schema.additional_properties = Some(AdditionalProperties::Schema(Box::new(values)));
            }
            TypeKind::Nullable(inner) => {
                let mut inner_schema = self.schema_for(inner, field, root)?;
                // Siblings of a reference are ignored by OpenAPI 3.0 readers.
                if inner_schema.reference.is_none() {
                    inner_schema.nullable = Some(true);
                }
                *schema = inner_schema;
            }
            TypeKind::Struct(info) => self.fill_struct(ty, info, schema, root)?,
        }

        if ty.title.is_some() {
            schema.title = ty.title.clone();
        }
        if ty.description.is_some() {
            schema.description = ty.description.clone();
        }

        Ok(())
    }

    fn fill_struct(
        &mut self,
        ty: &TypeInfo,
        info: &StructInfo,
        schema: &mut Schema,
        root: bool,
    ) -> Result<()> {
        if !self.options.skip_embedded_maps_slices {
            if let Some(collection) = ty.find_embedded_slice_or_map() {
                *schema = self.schema_for(collection, None, false)?;
                return Ok(());
            }
        }

        schema.schema_type = Some(SchemaType::Object);

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        self.walk_fields(info, &mut properties, &mut required, root)?;

        if !properties.is_empty() {
            schema.properties = Some(properties);
        }
        if !required.is_empty() {
            schema.required = Some(required);
        }
        if info.forbid_unknown.contains(&self.options.property_name_tag) {
            schema.additional_properties = Some(AdditionalProperties::Allowed(false));
        }

        Ok(())
    }

    fn walk_fields(
        &mut self,
        info: &StructInfo,
        properties: &mut IndexMap<String, Schema>,
        required: &mut Vec<String>,
        root: bool,
    ) -> Result<()> {
        for field in &info.fields {
            if field.embedded && field.tag_value(&self.options.property_name_tag).is_none() {
                if let Some(embedded) = field.ty.as_struct() {
                    self.walk_fields(embedded, properties, required, root)?;
                }
                continue;
            }

            let Some(name) = self.property_name(field) else {
                continue;
            };

            let mut property = self.schema_for(&field.ty, Some(field), false)?;
            if property.reference.is_none() {
                apply_field_tags(&mut property, field)?;
            } else {
                // Annotations are still validated, a reference takes no siblings.
                apply_field_tags(&mut Schema::default(), field)?;
            }

            let is_required = field
                .tag_parse::<bool>("required")
                .map_err(|message| Error::reflection(&field.ident, message))?
                .unwrap_or(false);
            if is_required && !required.contains(&name) {
                required.push(name.clone());
            }

            if root {
                if let Some(interceptor) = self.options.intercept_property.as_deref_mut() {
                    interceptor(&name, field, &property)?;
                }
            }

            properties.insert(name, property);
        }

        Ok(())
    }

    fn property_name(&self, field: &FieldInfo) -> Option<String> {
        if let Some(mapped) = self
            .options
            .name_mapping
            .and_then(|mapping| mapping.get(&field.ident))
        {
            return Some(mapped.clone());
        }

        match field.tag_name(&self.options.property_name_tag) {
            Some("-") | None => None,
            Some(name) => Some(name.to_string()),
        }
    }
}

fn set_type(schema: &mut Schema, schema_type: SchemaType, format: Option<&str>) {
    schema.schema_type = Some(schema_type);
    if let Some(format) = format {
        schema.format = Some(format.to_string());
    }
}

/// Copies constraint and documentation annotations of `field` onto its schema
fn apply_field_tags(schema: &mut Schema, field: &FieldInfo) -> Result<()> {
    let invalid = |message: String| Error::reflection(&field.ident, message);

    for (key, value) in &field.tags {
        match key.as_str() {
            "title" => schema.title = Some(value.clone()),
            "description" => schema.description = Some(value.clone()),
            "format" => schema.format = Some(value.clone()),
            "pattern" => schema.pattern = Some(value.clone()),
            "example" => schema.example = field.tag_json(key),
            "default" => schema.default = field.tag_json(key),
            "enum" => {
                schema.enum_values = Some(
                    value
                        .split(',')
                        .map(|v| crate::type_info::parse_loose_json(v.trim()))
                        .collect(),
                )
            }
            "minimum" => schema.minimum = field.tag_parse(key).map_err(invalid)?,
            "maximum" => schema.maximum = field.tag_parse(key).map_err(invalid)?,
            "minLength" => schema.min_length = field.tag_parse(key).map_err(invalid)?,
            "maxLength" => schema.max_length = field.tag_parse(key).map_err(invalid)?,
            "deprecated" => schema.deprecated = field.tag_parse(key).map_err(invalid)?,
            "nullable" => schema.nullable = field.tag_parse(key).map_err(invalid)?,
            "readOnly" => schema.read_only = field.tag_parse(key).map_err(invalid)?,
            "writeOnly" => schema.write_only = field.tag_parse(key).map_err(invalid)?,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_info::{Describe, FileUpload};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Address;

    impl Describe for Address {
        fn describe() -> TypeInfo {
            TypeInfo::object(vec![
                FieldInfo::new("city", TypeInfo::of::<String>()).json("city").required(),
                FieldInfo::new("zip", TypeInfo::of::<Option<String>>()).json("zip"),
            ])
            .named("Address")
        }
    }

    struct User;

    impl Describe for User {
        fn describe() -> TypeInfo {
            TypeInfo::object(vec![
                FieldInfo::new("id", TypeInfo::of::<u64>())
                    .json("id")
                    .description("Identifier")
                    .tag("minimum", "1"),
                FieldInfo::new("home", TypeInfo::of::<Address>()).json("home"),
                FieldInfo::new("work", TypeInfo::of::<Option<Address>>()).json("work"),
                FieldInfo::new("secret", TypeInfo::of::<String>()).json("-"),
                FieldInfo::new("untagged", TypeInfo::of::<String>()),
                FieldInfo::new("token", TypeInfo::of::<String>()).header("X-Token"),
            ])
            .named("User")
            .with_description("A registered user")
        }
    }

    fn to_json(schema: &Schema) -> serde_json::Value {
        serde_json::to_value(schema).unwrap()
    }

    #[test]
    fn test_primitive_schemas() {
        let generator = SchemaGenerator::new();
        let reflection = generator
            .reflect(&TypeInfo::of::<i32>(), &mut ReflectOptions::new())
            .unwrap();

        assert_eq!(to_json(&reflection.schema), json!({"type": "integer", "format": "int32"}));
        assert!(reflection.definitions.is_empty());
    }

    #[test]
    fn test_nullable_and_array_schemas() {
        let generator = SchemaGenerator::new();
        let reflection = generator
            .reflect(&TypeInfo::of::<Option<Vec<bool>>>(), &mut ReflectOptions::new())
            .unwrap();

        assert_eq!(
            to_json(&reflection.schema),
            json!({"type": "array", "nullable": true, "items": {"type": "boolean"}})
        );
    }

    #[test]
    fn test_map_schema() {
        let generator = SchemaGenerator::new();
        let info = TypeInfo::of::<BTreeMap<String, f64>>();
        let reflection = generator.reflect(&info, &mut ReflectOptions::new()).unwrap();

        assert_eq!(
            to_json(&reflection.schema),
            json!({
                "type": "object",
                "additionalProperties": {"type": "number", "format": "double"}
            })
        );
    }

    #[test]
    fn test_struct_inline_root_with_hoisted_nested() {
        let generator = SchemaGenerator::new();
        let reflection = generator
            .reflect(&TypeInfo::of::<User>(), &mut ReflectOptions::new())
            .unwrap();

        assert_eq!(
            to_json(&reflection.schema),
            json!({
                "type": "object",
                "description": "A registered user",
                "properties": {
                    "id": {
                        "type": "integer",
                        "format": "int64",
                        "description": "Identifier",
                        "minimum": 1.0
                    },
                    "home": {"$ref": "#/components/schemas/Address"},
                    "work": {"$ref": "#/components/schemas/Address"}
                }
            })
        );

        assert_eq!(reflection.definitions.len(), 1);
        assert_eq!(
            to_json(&reflection.definitions["Address"]),
            json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string"},
                    "zip": {"type": "string", "nullable": true}
                },
                "required": ["city"]
            })
        );
    }

    #[test]
    fn test_root_ref_with_name_prefix() {
        let generator = SchemaGenerator::new();
        let mut options = ReflectOptions::new().root_ref().name_prefix("FormData");
        let reflection = generator.reflect(&TypeInfo::of::<User>(), &mut options).unwrap();

        assert_eq!(
            reflection.schema,
            Schema::reference("#/components/schemas/FormDataUser")
        );
        let keys: Vec<_> = reflection.definitions.keys().cloned().collect();
        assert_eq!(keys, vec!["FormDataAddress", "FormDataUser"]);
        assert_eq!(
            reflection
                .resolved_root(COMPONENTS_SCHEMAS_PREFIX)
                .description
                .as_deref(),
            Some("A registered user")
        );
    }

    #[test]
    fn test_inline_refs() {
        let generator = SchemaGenerator::new();
        let mut options = ReflectOptions::new().inline_refs().root_ref();
        let reflection = generator.reflect(&TypeInfo::of::<Address>(), &mut options).unwrap();

        assert!(reflection.definitions.is_empty());
        assert!(reflection.schema.has_type(SchemaType::Object));
    }

    #[test]
    fn test_property_tag_and_mapping_select_fields() {
        let generator = SchemaGenerator::new();
        let mut mapping = BTreeMap::new();
        mapping.insert("untagged".to_string(), "X-Untagged".to_string());

        let mut options = ReflectOptions::new()
            .property_name_tag("header")
            .name_mapping(&mapping);
        let reflection = generator.reflect(&TypeInfo::of::<User>(), &mut options).unwrap();

        let properties = reflection.schema.properties.unwrap();
        let names: Vec<_> = properties.keys().cloned().collect();
        assert_eq!(names, vec!["X-Untagged", "X-Token"]);
    }

    #[test]
    fn test_embedded_struct_is_flattened() {
        let info = TypeInfo::object(vec![
            FieldInfo::embed(TypeInfo::of::<Address>()),
            FieldInfo::new("name", TypeInfo::of::<String>()).json("name"),
        ]);

        let generator = SchemaGenerator::new();
        let reflection = generator.reflect(&info, &mut ReflectOptions::new()).unwrap();

        let names: Vec<_> = reflection.schema.properties.unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["city", "zip", "name"]);
        assert_eq!(reflection.schema.required, Some(vec!["city".to_string()]));
    }

    #[test]
    fn test_embedded_collection() {
        let info = TypeInfo::object(vec![FieldInfo::embed(TypeInfo::of::<Vec<Address>>())]);
        let generator = SchemaGenerator::new();

        let reflection = generator.reflect(&info, &mut ReflectOptions::new()).unwrap();
        assert_eq!(
            to_json(&reflection.schema),
            json!({"type": "array", "items": {"$ref": "#/components/schemas/Address"}})
        );

        let mut skipping = ReflectOptions::new().skip_embedded_maps_slices();
        let reflection = generator.reflect(&info, &mut skipping).unwrap();
        assert_eq!(to_json(&reflection.schema), json!({"type": "object"}));
    }

    #[test]
    fn test_forbid_unknown_is_per_tag() {
        let info = TypeInfo::of::<Address>().forbid_unknown("query");
        let generator = SchemaGenerator::new();

        let json_reflection = generator
            .reflect(&info, &mut ReflectOptions::new().inline_refs())
            .unwrap();
        assert!(!json_reflection.schema.forbids_additional_properties());

        let mut options = ReflectOptions::new().inline_refs().property_name_tag("query");
        let query_reflection = generator.reflect(&info, &mut options).unwrap();
        assert!(query_reflection.schema.forbids_additional_properties());
    }

    #[test]
    fn test_field_tag_constraints() {
        let info = TypeInfo::object(vec![FieldInfo::new("status", TypeInfo::of::<String>())
            .json("status")
            .tag("enum", "active,disabled")
            .tag("default", "active")
            .tag("maxLength", "16")
            .deprecated()]);

        let generator = SchemaGenerator::new();
        let reflection = generator.reflect(&info, &mut ReflectOptions::new()).unwrap();

        assert_eq!(
            to_json(&reflection.schema.properties.unwrap()["status"]),
            json!({
                "type": "string",
                "deprecated": true,
                "enum": ["active", "disabled"],
                "default": "active",
                "maxLength": 16
            })
        );
    }

    #[test]
    fn test_malformed_tag_is_reflection_error() {
        let info = TypeInfo::object(vec![FieldInfo::new("age", TypeInfo::of::<u8>())
            .json("age")
            .tag("minimum", "eighteen")]);

        let generator = SchemaGenerator::new();
        let err = generator
            .reflect(&info, &mut ReflectOptions::new())
            .unwrap_err();

        match err {
            Error::Reflection { type_name, message } => {
                assert_eq!(type_name, "age");
                assert!(message.contains("eighteen"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_per_call_type_interceptor_short_circuits() {
        let info = TypeInfo::object(vec![
            FieldInfo::new("avatar", TypeInfo::of::<FileUpload>()).form("avatar"),
            FieldInfo::new("name", TypeInfo::of::<String>()).form("name"),
        ]);

        let mut files = 0;
        let reflection = {
            let mut intercept = |ty: &TypeInfo, schema: &mut Schema| -> Result<bool> {
                if ty.kind == TypeKind::File {
                    files += 1;
                    schema.schema_type = Some(SchemaType::String);
                    schema.format = Some("byte".to_string());
                    return Ok(true);
                }
                Ok(false)
            };
            let mut options = ReflectOptions::new()
                .property_name_tag("formData")
                .intercept_type(&mut intercept);
            SchemaGenerator::new().reflect(&info, &mut options).unwrap()
        };

        assert_eq!(files, 1);
        assert_eq!(
            to_json(&reflection.schema.properties.unwrap()["avatar"]),
            json!({"type": "string", "format": "byte"})
        );
    }

    #[test]
    fn test_registered_hook_sees_processing_marker() {
        use crate::operation::HttpMethod;

        let mut generator = SchemaGenerator::new();
        generator.add_hook(
            |context: &HookContext<'_>, ty: &TypeInfo, schema: &mut Schema| -> Result<bool> {
                let in_response = context.processing.map(|p| p.response).unwrap_or(false);
                if in_response && matches!(ty.kind, TypeKind::String(_)) {
                    schema.schema_type = Some(SchemaType::String);
                    schema.read_only = Some(true);
                    return Ok(true);
                }
                Ok(false)
            },
        );

        let processing = Processing {
            response: true,
            location: "body".to_string(),
            http_method: HttpMethod::Get,
            http_status: Some(200),
            operation_id: None,
        };
        let mut options = ReflectOptions::new().processing(processing);
        let reflection = generator
            .reflect(&TypeInfo::of::<String>(), &mut options)
            .unwrap();
        assert_eq!(reflection.schema.read_only, Some(true));

        let plain = generator
            .reflect(&TypeInfo::of::<String>(), &mut ReflectOptions::new())
            .unwrap();
        assert_eq!(plain.schema.read_only, None);
    }

    #[test]
    fn test_hook_sees_field_through_nullable() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let mut generator = SchemaGenerator::new();
        generator.add_hook(
            move |context: &HookContext<'_>, ty: &TypeInfo, _schema: &mut Schema| -> Result<bool> {
                if matches!(ty.kind, TypeKind::String(_)) {
                    let ident = context.field.map(|f| f.ident.clone());
                    recorder.lock().unwrap().push(ident);
                }
                Ok(false)
            },
        );

        generator
            .reflect(&TypeInfo::of::<Address>(), &mut ReflectOptions::new())
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("city".to_string()), Some("zip".to_string())]
        );
    }

    #[test]
    fn test_reference_property_has_no_siblings() {
        let info = TypeInfo::object(vec![FieldInfo::new("home", TypeInfo::of::<Address>())
            .json("home")
            .description("Where the user lives")]);
        let reflection = SchemaGenerator::new()
            .reflect(&info, &mut ReflectOptions::new())
            .unwrap();

        assert_eq!(
            to_json(&reflection.schema),
            json!({
                "type": "object",
                "properties": {"home": {"$ref": "#/components/schemas/Address"}}
            })
        );

        let malformed = TypeInfo::object(vec![FieldInfo::new("home", TypeInfo::of::<Address>())
            .json("home")
            .tag("deprecated", "sometimes")]);
        let err = SchemaGenerator::new()
            .reflect(&malformed, &mut ReflectOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::Reflection { ref type_name, .. } if type_name == "home"));
    }

    #[test]
    fn test_property_interceptor_sees_only_root_properties() {
        let mut seen = Vec::new();
        {
            let mut intercept = |name: &str, field: &FieldInfo, _schema: &Schema| -> Result<()> {
                seen.push(format!("{}:{}", name, field.ident));
                Ok(())
            };
            let mut options = ReflectOptions::new().intercept_property(&mut intercept);
            SchemaGenerator::new()
                .reflect(&TypeInfo::of::<User>(), &mut options)
                .unwrap();
        }

        assert_eq!(seen, vec!["id:id", "home:home", "work:work"]);
    }

    #[test]
    fn test_property_interceptor_error_aborts() {
        let mut intercept = |name: &str, _field: &FieldInfo, _schema: &Schema| -> Result<()> {
            Err(Error::reflection(name, "rejected"))
        };
        let mut options = ReflectOptions::new().intercept_property(&mut intercept);

        let err = SchemaGenerator::new()
            .reflect(&TypeInfo::of::<User>(), &mut options)
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to reflect id: rejected");
    }
}
