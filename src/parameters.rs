//! Parameter Extractor: turns the fields annotated for one location into
//! operation parameters.

use crate::document::{MediaType, Parameter, ParameterLocation, ParameterStyle};
use crate::error::{Error, Result};
use crate::field_options::PopulateFromTags;
use crate::operation::{OperationContext, Processing};
use crate::registry::DefinitionRegistry;
use crate::request_body::MIME_JSON;
use crate::schema::{Schema, SchemaType};
use crate::schema_generator::{ReflectOptions, SchemaGenerator};
use crate::type_info::{FieldInfo, TAG_COLLECTION_FORMAT, TAG_JSON};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of the vendor extension marking a location that rejects unknown
/// parameters; the location name is appended.
pub const X_FORBID_UNKNOWN: &str = "x-forbid-unknown-";

/// Adds a parameter for every input field annotated for `location`.
///
/// Name overrides come from the context's mapping for that location. The
/// first conflicting parameter aborts extraction with
/// [`Error::DuplicateParameter`]; parameters added before it are kept.
pub fn extract_parameters(
    generator: &SchemaGenerator,
    registry: &mut DefinitionRegistry,
    oc: &mut OperationContext,
    location: ParameterLocation,
) -> Result<()> {
    let Some(input) = oc.input.clone() else {
        return Ok(());
    };

    if input.is_slice_or_map() {
        debug!("Input {} is a collection, no {} parameters", input.display_name(), location);
        return Ok(());
    }

    let tag = location.as_str();
    let mapping = oc.mapping(location).clone();
    let processing = oc.mark_processing(false, tag);
    let operation = &mut oc.operation;

    let reflection = {
        let mut intercept = |name: &str, field: &FieldInfo, property: &Schema| -> Result<()> {
            let parameter =
                build_parameter(generator, registry, &processing, location, name, field, property)?;

            if operation.parameter(location, &parameter.name).is_some() {
                return Err(Error::DuplicateParameter {
                    name: parameter.name,
                    location,
                });
            }

            debug!("Adding {} parameter {}", location, parameter.name);
            operation.parameters.push(parameter);
            Ok(())
        };

        let mut options = ReflectOptions::new()
            .property_name_tag(tag)
            .name_mapping(&mapping)
            .skip_embedded_maps_slices()
            .processing(processing.clone())
            .intercept_property(&mut intercept);

        generator.reflect(&input, &mut options)?
    };

    registry.collect_all(reflection.definitions);

    if reflection.schema.forbids_additional_properties() {
        operation
            .extensions
            .insert(format!("{}{}", X_FORBID_UNKNOWN, tag), Value::Bool(true));
    }

    Ok(())
}

fn build_parameter(
    generator: &SchemaGenerator,
    registry: &mut DefinitionRegistry,
    processing: &Processing,
    location: ParameterLocation,
    name: &str,
    field: &FieldInfo,
    property: &Schema,
) -> Result<Parameter> {
    let mut schema = property.clone();
    schema.nullable = None;

    let mut parameter = Parameter::new(name, location);
    parameter.description = property.description.clone();
    parameter.schema = Some(schema);

    if let Some((style, explode)) = collection_style(field.tag_value(TAG_COLLECTION_FORMAT)) {
        parameter.with_style(style, explode);
    }

    if field.ty.has_tagged_fields(TAG_JSON) {
        // Structured value sent as one JSON encoded parameter.
        let mut options = ReflectOptions::new()
            .root_ref()
            .processing(processing.clone());
        let reflection = generator.reflect(&field.ty, &mut options)?;
        registry.collect_all(reflection.definitions);

        let mut content = BTreeMap::new();
        content.insert(MIME_JSON.to_string(), MediaType::new(reflection.schema));
        parameter.schema = None;
        parameter.content = Some(content);
    } else {
        let mut options = ReflectOptions::new()
            .inline_refs()
            .processing(processing.clone());
        let reflection = generator.reflect(&field.ty, &mut options)?;

        if reflection.schema.has_type(SchemaType::Object) {
            parameter.with_style(ParameterStyle::DeepObject, true);
        }
    }

    parameter.populate_from_tags(field)?;

    if location == ParameterLocation::Path {
        parameter.required = Some(true);
    }

    Ok(parameter)
}

/// Style and explode flag equivalent to a Swagger 2 collection format
fn collection_style(format: Option<&str>) -> Option<(ParameterStyle, bool)> {
    match format? {
        "csv" => Some((ParameterStyle::Form, false)),
        "ssv" => Some((ParameterStyle::SpaceDelimited, false)),
        "pipes" => Some((ParameterStyle::PipeDelimited, false)),
        "multi" => Some((ParameterStyle::Form, true)),
        _ => None,
    }
}
