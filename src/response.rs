//! Response Builder: documents one status code of an operation from its
//! output type.

use crate::document::{Header, MediaType, Response};
use crate::error::Result;
use crate::field_options::PopulateFromTags;
use crate::operation::OperationContext;
use crate::registry::DefinitionRegistry;
use crate::request_body::MIME_JSON;
use crate::schema::{Schema, COMPONENTS_SCHEMAS_PREFIX};
use crate::schema_generator::{ReflectOptions, SchemaGenerator};
use crate::type_info::{FieldInfo, TypeInfo, TAG_HEADER};
use http::StatusCode;
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Writes the response for `oc.http_status` into the operation.
///
/// `trivial_schemas` lists the schemas regarded as carrying no information;
/// an output type reflecting to one of them (once descriptive metadata is
/// stripped) gets no response body. Response headers are documented either
/// way.
pub fn build_response(
    generator: &SchemaGenerator,
    registry: &mut DefinitionRegistry,
    trivial_schemas: &[Value],
    oc: &mut OperationContext,
) -> Result<()> {
    let mut response = Response::default();
    let content_type = oc
        .resp_content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|ct| !ct.is_empty());

    if let Some(output) = oc.output.clone() {
        if has_meaningful_schema(generator, trivial_schemas, &output)? {
            build_body(generator, registry, oc, &output, content_type.as_deref(), &mut response)?;
        } else {
            debug!("Output {} has no meaningful schema, skipping body", output.display_name());
        }

        build_headers(generator, oc, &output, &mut response)?;
    }

    if let Some(content_type) = content_type {
        if !response.content.contains_key(&content_type) {
            warn!(
                "Response content type {} requested without a schema, advertising it untyped",
                content_type
            );
            response
                .content
                .insert(content_type, MediaType::new(Schema::default()));
        }
    }

    if response.description.is_empty() {
        response.description = status_text(oc.http_status).to_string();
    }

    debug!("Adding response {}", oc.http_status);
    oc.operation
        .responses
        .insert(oc.http_status.to_string(), response);

    Ok(())
}

/// Standard reason phrase of a status code, empty when unknown
pub fn status_text(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("")
}

/// Whether the output type constrains its value beyond the trivial schemas
fn has_meaningful_schema(
    generator: &SchemaGenerator,
    trivial_schemas: &[Value],
    output: &TypeInfo,
) -> Result<bool> {
    let mut schema = generator.reflect(output, &mut ReflectOptions::new())?.schema;
    schema.strip_descriptive();

    let value = serde_json::to_value(&schema)?;
    Ok(!trivial_schemas.contains(&value))
}

fn build_body(
    generator: &SchemaGenerator,
    registry: &mut DefinitionRegistry,
    oc: &mut OperationContext,
    output: &TypeInfo,
    content_type: Option<&str>,
    response: &mut Response,
) -> Result<()> {
    let processing = oc.mark_processing(true, "body");
    let mut options = ReflectOptions::new().root_ref().processing(processing);
    let reflection = generator.reflect(output, &mut options)?;

    let description = reflection
        .resolved_root(COMPONENTS_SCHEMAS_PREFIX)
        .description
        .clone();

    registry.collect_all(reflection.definitions);

    let mut schema = reflection.schema;
    schema.nullable = None;

    let content_type = content_type.unwrap_or(MIME_JSON);
    debug!("Adding {} response body of {}", content_type, output.display_name());
    response
        .content
        .insert(content_type.to_string(), MediaType::new(schema));

    if response.description.is_empty() {
        if let Some(description) = description {
            response.description = description;
        }
    }

    Ok(())
}

fn build_headers(
    generator: &SchemaGenerator,
    oc: &mut OperationContext,
    output: &TypeInfo,
    response: &mut Response,
) -> Result<()> {
    let mapping = oc.resp_header_mapping.clone();
    let processing = oc.mark_processing(true, TAG_HEADER);
    let mut headers = BTreeMap::new();

    let reflection = {
        let mut intercept = |name: &str, field: &FieldInfo, property: &Schema| -> Result<()> {
            let mut header = Header {
                description: property.description.clone(),
                deprecated: property.deprecated,
                schema: Some(property.clone()),
                ..Header::default()
            };
            header.populate_from_tags(field)?;

            headers.insert(name.to_string(), header);
            Ok(())
        };

        let mut options = ReflectOptions::new()
            .inline_refs()
            .property_name_tag(TAG_HEADER)
            .name_mapping(&mapping)
            .processing(processing)
            .intercept_property(&mut intercept);

        generator.reflect(output, &mut options)?
    };

    response.headers = headers;

    if response.description.is_empty() {
        if let Some(description) = reflection.schema.description {
            response.description = description;
        }
    }

    Ok(())
}
