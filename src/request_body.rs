//! Request Body Builder: decides whether an input type contributes a request
//! body for one encoding and writes the matching content entry.

use crate::document::MediaType;
use crate::error::Result;
use crate::operation::OperationContext;
use crate::registry::DefinitionRegistry;
use crate::schema::{Schema, SchemaType};
use crate::schema_generator::{ReflectOptions, SchemaGenerator};
use crate::type_info::{TypeInfo, TypeKind, TAG_FORM_DATA, TAG_JSON};
use log::debug;
use std::collections::BTreeMap;

pub const MIME_JSON: &str = "application/json";
pub const MIME_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MIME_MULTIPART: &str = "multipart/form-data";

/// Body encodings an input type can be sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    FormData,
}

impl BodyEncoding {
    /// Annotation tag selecting the fields of this encoding
    pub fn tag(&self) -> &'static str {
        match self {
            BodyEncoding::Json => TAG_JSON,
            BodyEncoding::FormData => TAG_FORM_DATA,
        }
    }

    /// Content type the body is registered under
    pub fn mime(&self) -> &'static str {
        match self {
            BodyEncoding::Json => MIME_JSON,
            BodyEncoding::FormData => MIME_FORM_URLENCODED,
        }
    }

    /// Prefix keeping definitions of differently encoded bodies apart
    pub fn definition_prefix(&self) -> &'static str {
        match self {
            BodyEncoding::Json => "",
            BodyEncoding::FormData => "FormData",
        }
    }
}

/// Adds a request body entry for `encoding` when the input type has one.
///
/// Bodiless methods are skipped unless the input forces a body. Entries of
/// other content types already present on the operation are left alone.
pub fn build_request_body(
    generator: &SchemaGenerator,
    registry: &mut DefinitionRegistry,
    oc: &mut OperationContext,
    encoding: BodyEncoding,
) -> Result<()> {
    let Some(input) = oc.input.clone() else {
        return Ok(());
    };

    if oc.http_method.is_bodiless() && !input.force_request_body {
        debug!(
            "Skipping {:?} body of {}: {} carries no request body",
            encoding,
            input.display_name(),
            oc.http_method
        );
        return Ok(());
    }

    let mapping = match encoding {
        BodyEncoding::Json => BTreeMap::new(),
        BodyEncoding::FormData => oc.req_form_data_mapping.clone(),
    };

    if !contributes_body(&input, encoding, &mapping) {
        return Ok(());
    }

    let processing = oc.mark_processing(false, "body");
    let mut has_file_upload = false;

    let reflection = {
        let mut intercept = |ty: &TypeInfo, schema: &mut Schema| -> Result<bool> {
            if ty.kind != TypeKind::File {
                return Ok(false);
            }

            schema.schema_type = Some(SchemaType::String);
            schema.format = Some("binary".to_string());
            has_file_upload = true;
            Ok(true)
        };

        let mut options = ReflectOptions::new()
            .root_ref()
            .property_name_tag(encoding.tag())
            .name_mapping(&mapping)
            .name_prefix(encoding.definition_prefix())
            .processing(processing)
            .intercept_type(&mut intercept);

        generator.reflect(&input, &mut options)?
    };

    registry.collect_all(reflection.definitions);

    let mut mime = encoding.mime();
    if has_file_upload && mime == MIME_FORM_URLENCODED {
        mime = MIME_MULTIPART;
    }

    debug!("Adding {} request body of {}", mime, input.display_name());
    oc.operation
        .request_body
        .get_or_insert_with(Default::default)
        .content
        .insert(mime.to_string(), MediaType::new(reflection.schema));

    Ok(())
}

/// Whether the input has anything to send with `encoding`.
///
/// JSON bodies may also be bare or embedded collections without field tags.
fn contributes_body(input: &TypeInfo, encoding: BodyEncoding, mapping: &BTreeMap<String, String>) -> bool {
    if input.has_tagged_fields(encoding.tag()) || !mapping.is_empty() {
        return true;
    }

    encoding == BodyEncoding::Json
        && (input.is_slice_or_map() || input.find_embedded_slice_or_map().is_some())
}
