//! OpenAPI from Types - Derive OpenAPI operations from annotated Rust types.
//!
//! This library builds OpenAPI 3.0 operation descriptions (parameters, request
//! bodies, responses and response headers) from the types a web service
//! already uses to decode requests and encode responses. Each type describes
//! itself through the [`Describe`](type_info::Describe) trait; per-field
//! annotations select where a field travels (`query`, `path`, `header`,
//! `cookie`, `formData` or the `json` body) and carry options such as
//! `description`, `required` or `collectionFormat`.
//!
//! # Architecture
//!
//! 1. [`type_info`] - Type descriptions and field annotations
//! 2. [`schema_generator`] - Converts type descriptions to schemas, with extension hooks
//! 3. [`registry`] - Document-wide store of named schemas, first write wins
//! 4. [`parameters`] - Builds the parameters of one location
//! 5. [`request_body`] - Builds JSON, form and multipart request bodies
//! 6. [`response`] - Builds response bodies and headers
//! 7. [`openapi_builder`] - Assembles operations into the complete document
//!
//! # Example Usage
//!
//! ```
//! use openapi_from_types::{
//!     document::Operation,
//!     openapi_builder::OpenApiBuilder,
//!     operation::{HttpMethod, OperationContext},
//!     type_info::{Describe, FieldInfo, TypeInfo},
//! };
//!
//! struct GetUser;
//!
//! impl Describe for GetUser {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::object(vec![
//!             FieldInfo::new("id", TypeInfo::of::<u64>()).path("id"),
//!             FieldInfo::new("fields", TypeInfo::of::<Vec<String>>())
//!                 .query("fields")
//!                 .collection_format("csv"),
//!         ])
//!     }
//! }
//!
//! struct User;
//!
//! impl Describe for User {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::object(vec![
//!             FieldInfo::new("id", TypeInfo::of::<u64>()).json("id"),
//!             FieldInfo::new("name", TypeInfo::of::<String>()).json("name"),
//!         ])
//!         .named("User")
//!     }
//! }
//!
//! let mut builder = OpenApiBuilder::new();
//! let mut oc = OperationContext::new(HttpMethod::Get)
//!     .with_operation(Operation::new().with_operation_id("getUser"))
//!     .with_input::<GetUser>()
//!     .with_output::<User>();
//!
//! builder.setup_request(&mut oc).unwrap();
//! builder.setup_response(&mut oc).unwrap();
//! builder.add_operation(HttpMethod::Get, "/users/:id", oc.operation).unwrap();
//!
//! let document = builder.build();
//! assert!(document.paths["/users/{id}"].get.is_some());
//! assert!(document.components.schemas.contains("User"));
//! ```

pub mod type_info;
pub mod schema;
pub mod schema_generator;
pub mod registry;
pub mod document;
pub mod operation;
mod field_options;
pub mod parameters;
pub mod request_body;
pub mod response;
pub mod openapi_builder;
pub mod error;

pub use error::{Error, Errors, Result};
pub use openapi_builder::{OpenApiBuilder, ReflectorConfig};
pub use type_info::{Describe, FieldInfo, TypeInfo};
