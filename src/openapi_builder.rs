use crate::document::{Info, Operation, ParameterLocation, Spec};
use crate::error::{Error, Errors, Result};
use crate::operation::{HttpMethod, OperationContext};
use crate::parameters::extract_parameters;
use crate::registry::DefinitionRegistry;
use crate::request_body::{build_request_body, BodyEncoding};
use crate::response::build_response;
use crate::schema::Schema;
use crate::schema_generator::{SchemaGenerator, TypeHook};
use crate::type_info::TypeInfo;
use log::debug;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Document-wide reflection settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectorConfig {
    /// Value of the document's `openapi` field
    pub openapi_version: String,
    /// Output schemas regarded as carrying no information. An output type
    /// reflecting to one of these, once titles, descriptions, examples and
    /// extensions are stripped, gets no response body.
    pub trivial_schemas: Vec<Value>,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.0.3".to_string(),
            trivial_schemas: vec![json!({}), json!({"type": "object"})],
        }
    }
}

/// OpenAPI document builder.
///
/// Owns the document being built, and with it the definition registry every
/// operation publishes its named schemas into. Operations are built one at a
/// time through `&mut self`; wrap the builder in a `Mutex` to share it
/// between threads.
#[derive(Debug)]
pub struct OpenApiBuilder {
    config: ReflectorConfig,
    /// Type Inspector with the registered hooks
    generator: SchemaGenerator,
    /// Document under construction
    spec: Spec,
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        let config = ReflectorConfig::default();
        Self {
            spec: Spec {
                openapi: config.openapi_version.clone(),
                info: Info {
                    title: "Generated API".to_string(),
                    version: "1.0.0".to_string(),
                    description: None,
                },
                paths: BTreeMap::new(),
                components: Default::default(),
            },
            generator: SchemaGenerator::new(),
            config,
        }
    }

    pub fn with_config(mut self, config: ReflectorConfig) -> Self {
        self.spec.openapi = config.openapi_version.clone();
        self.config = config;
        self
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.spec.info = Info {
            title,
            version,
            description,
        };
        self
    }

    /// Register an extension hook consulted for every reflected type
    pub fn register_type_hook(&mut self, hook: impl TypeHook + 'static) {
        self.generator.add_hook(hook);
    }

    /// Document the request side of an operation: parameters of every
    /// location, then the JSON and form bodies.
    ///
    /// Each step runs even when an earlier one failed, and all failures are
    /// returned together. Whatever was applied to the operation before a
    /// failure stays applied.
    pub fn setup_request(&mut self, oc: &mut OperationContext) -> Result<()> {
        let registry = &mut self.spec.components.schemas;
        let mut errors = Errors::new();

        for location in ParameterLocation::ALL {
            errors.push_result(extract_parameters(&self.generator, registry, oc, location));
        }

        for encoding in [BodyEncoding::Json, BodyEncoding::FormData] {
            errors.push_result(build_request_body(&self.generator, registry, oc, encoding));
        }

        if !errors.is_empty() {
            debug!("Request setup failed with {} error(s)", errors.len());
        }
        errors.into_result()
    }

    /// Document `input` as the request of `operation` with default mappings
    pub fn set_request(
        &mut self,
        operation: &mut Operation,
        input: TypeInfo,
        method: HttpMethod,
    ) -> Result<()> {
        let mut oc = OperationContext::new(method)
            .with_operation(std::mem::take(operation))
            .with_input_info(input);

        let result = self.setup_request(&mut oc);
        *operation = oc.operation;
        result
    }

    /// Document the response for `oc.http_status`
    pub fn setup_response(&mut self, oc: &mut OperationContext) -> Result<()> {
        build_response(
            &self.generator,
            &mut self.spec.components.schemas,
            &self.config.trivial_schemas,
            oc,
        )
    }

    /// Document `output` as the JSON response of `operation` for `status`
    pub fn set_json_response(
        &mut self,
        operation: &mut Operation,
        output: Option<TypeInfo>,
        status: u16,
    ) -> Result<()> {
        let mut oc = OperationContext::new(HttpMethod::Get)
            .with_operation(std::mem::take(operation))
            .with_status(status);
        oc.output = output;

        let result = self.setup_response(&mut oc);
        *operation = oc.operation;
        result
    }

    /// Place an operation under `path`, converting `:param` segments to
    /// `{param}`
    pub fn add_operation(&mut self, method: HttpMethod, path: &str, operation: Operation) -> Result<()> {
        let openapi_path = Self::convert_path_format(path);
        debug!("Adding operation: {} {}", method, openapi_path);

        let slot = self
            .spec
            .paths
            .entry(openapi_path.clone())
            .or_default()
            .operation_mut(method);

        if slot.is_some() {
            return Err(Error::DuplicateOperation {
                method,
                path: openapi_path,
            });
        }

        *slot = Some(operation);
        Ok(())
    }

    /// Look up a `#/components/schemas/<name>` reference
    pub fn resolve_schema_ref(&self, reference: &str) -> Option<&Schema> {
        self.spec.components.schemas.resolve(reference)
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// Named schemas collected so far
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.spec.components.schemas
    }

    /// Convert path format from :param or {param} to OpenAPI {param} format
    fn convert_path_format(path: &str) -> String {
        path.split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> Spec {
        debug!(
            "Building final OpenAPI document with {} path(s) and {} schema(s)",
            self.spec.paths.len(),
            self.spec.components.schemas.len()
        );
        self.spec
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
