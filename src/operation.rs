use crate::document::{Operation, ParameterLocation};
use crate::error::Error;
use crate::type_info::{Describe, TypeInfo};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTTP methods an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Methods that conventionally carry no request body
    pub fn is_bodiless(&self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete | HttpMethod::Trace
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// Processing phase handed to extension hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processing {
    /// `true` while the output type is reflected
    pub response: bool,
    /// `query`, `path`, `cookie`, `header` or `body`
    pub location: String,
    pub http_method: HttpMethod,
    /// Status code being documented, only set for responses
    pub http_status: Option<u16>,
    pub operation_id: Option<String>,
}

/// Unit of work for building one operation.
///
/// Holds the operation record being populated, the input and output types
/// and per-location property name overrides (field identifier -> name).
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: Operation,
    pub input: Option<TypeInfo>,
    pub http_method: HttpMethod,

    pub req_query_mapping: BTreeMap<String, String>,
    pub req_path_mapping: BTreeMap<String, String>,
    pub req_cookie_mapping: BTreeMap<String, String>,
    pub req_header_mapping: BTreeMap<String, String>,
    pub req_form_data_mapping: BTreeMap<String, String>,

    pub output: Option<TypeInfo>,
    pub http_status: u16,
    /// Requested response content type; parameters after `;` are ignored
    pub resp_content_type: Option<String>,
    pub resp_header_mapping: BTreeMap<String, String>,

    /// Phase currently being processed, set by the builders
    pub processing: Option<Processing>,
}

impl OperationContext {
    pub fn new(http_method: HttpMethod) -> Self {
        Self {
            operation: Operation::default(),
            input: None,
            http_method,
            req_query_mapping: BTreeMap::new(),
            req_path_mapping: BTreeMap::new(),
            req_cookie_mapping: BTreeMap::new(),
            req_header_mapping: BTreeMap::new(),
            req_form_data_mapping: BTreeMap::new(),
            output: None,
            http_status: 200,
            resp_content_type: None,
            resp_header_mapping: BTreeMap::new(),
            processing: None,
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_input<T: Describe + ?Sized>(self) -> Self {
        self.with_input_info(TypeInfo::of::<T>())
    }

    pub fn with_input_info(mut self, input: TypeInfo) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_output<T: Describe + ?Sized>(self) -> Self {
        self.with_output_info(TypeInfo::of::<T>())
    }

    pub fn with_output_info(mut self, output: TypeInfo) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_status(mut self, http_status: u16) -> Self {
        self.http_status = http_status;
        self
    }

    pub fn with_response_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.resp_content_type = Some(content_type.into());
        self
    }

    /// Overrides the property name of field `ident` for `location`
    pub fn with_mapping(mut self, location: ParameterLocation, ident: &str, name: &str) -> Self {
        self.mapping_mut(location)
            .insert(ident.to_string(), name.to_string());
        self
    }

    pub fn with_form_data_mapping(mut self, ident: &str, name: &str) -> Self {
        self.req_form_data_mapping
            .insert(ident.to_string(), name.to_string());
        self
    }

    pub fn with_response_header_mapping(mut self, ident: &str, name: &str) -> Self {
        self.resp_header_mapping
            .insert(ident.to_string(), name.to_string());
        self
    }

    /// Property name overrides for a parameter location
    pub fn mapping(&self, location: ParameterLocation) -> &BTreeMap<String, String> {
        match location {
            ParameterLocation::Query => &self.req_query_mapping,
            ParameterLocation::Path => &self.req_path_mapping,
            ParameterLocation::Cookie => &self.req_cookie_mapping,
            ParameterLocation::Header => &self.req_header_mapping,
        }
    }

    fn mapping_mut(&mut self, location: ParameterLocation) -> &mut BTreeMap<String, String> {
        match location {
            ParameterLocation::Query => &mut self.req_query_mapping,
            ParameterLocation::Path => &mut self.req_path_mapping,
            ParameterLocation::Cookie => &mut self.req_cookie_mapping,
            ParameterLocation::Header => &mut self.req_header_mapping,
        }
    }

    /// Records the phase about to be processed and returns the marker for hooks
    pub(crate) fn mark_processing(&mut self, response: bool, location: &str) -> Processing {
        let marker = Processing {
            response,
            location: location.to_string(),
            http_method: self.http_method,
            http_status: response.then_some(self.http_status),
            operation_id: self.operation.operation_id.clone(),
        };
        self.processing = Some(marker.clone());
        marker
    }
}
