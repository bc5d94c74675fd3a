//! Type description capability.
//!
//! Rust has no runtime reflection, so every type that takes part in an API
//! operation describes itself through the [`Describe`] trait. The returned
//! [`TypeInfo`] tree carries the same information a reflection facility would
//! expose: the shape of the type, an optional definition name, and per-field
//! annotations ("tags") selecting where each field travels.
//!
//! # Example
//!
//! ```
//! use openapi_from_types::type_info::{Describe, FieldInfo, TypeInfo};
//!
//! struct GetUser;
//!
//! impl Describe for GetUser {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::object(vec![
//!             FieldInfo::new("id", TypeInfo::of::<u64>()).path("id"),
//!             FieldInfo::new("verbose", TypeInfo::of::<Option<bool>>()).query("verbose"),
//!         ])
//!         .named("GetUser")
//!     }
//! }
//!
//! let info = TypeInfo::of::<GetUser>();
//! assert!(info.has_tagged_fields("path"));
//! assert!(!info.has_tagged_fields("json"));
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Annotation tag naming query parameters
pub const TAG_QUERY: &str = "query";
/// Annotation tag naming path parameters
pub const TAG_PATH: &str = "path";
/// Annotation tag naming header parameters and response headers
pub const TAG_HEADER: &str = "header";
/// Annotation tag naming cookie parameters
pub const TAG_COOKIE: &str = "cookie";
/// Annotation tag naming form-data body fields
pub const TAG_FORM_DATA: &str = "formData";
/// Annotation tag naming JSON body fields
pub const TAG_JSON: &str = "json";
/// Auxiliary tag selecting a collection encoding (`csv`, `ssv`, `pipes`, `multi`)
pub const TAG_COLLECTION_FORMAT: &str = "collectionFormat";

/// Capability implemented by every type used as an operation input or output.
pub trait Describe {
    /// Describes the shape and annotations of the implementing type.
    fn describe() -> TypeInfo;

    /// Opts a normally bodiless HTTP method (GET, HEAD, DELETE, TRACE) into
    /// carrying a request body. Not recommended, kept for compatibility.
    fn force_request_body() -> bool {
        false
    }
}

/// Runtime description of a type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    /// Definition name; named types are hoisted into the shared registry
    pub name: Option<String>,
    /// Human readable title
    pub title: Option<String>,
    /// Human readable description
    pub description: Option<String>,
    /// Shape of the type
    pub kind: TypeKind,
    /// Whether the type opted into a request body for bodiless methods
    pub force_request_body: bool,
}

/// Shape of a described type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Any value, no constraints
    Any,
    Boolean,
    /// Integer with an optional format (`int32`, `int64`)
    Integer(Option<String>),
    /// Floating point number with an optional format (`float`, `double`)
    Number(Option<String>),
    /// String with an optional format (`date-time`, `uuid`, ...)
    String(Option<String>),
    /// Sequence of items
    Array(Box<TypeInfo>),
    /// String-keyed map of values
    Map(Box<TypeInfo>),
    /// Value that may be absent or null
    Nullable(Box<TypeInfo>),
    /// Structure with named fields
    Struct(StructInfo),
    /// Uploaded file or stream
    File,
}

/// Fields of a structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructInfo {
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Annotation tags for which unknown properties are rejected
    pub forbid_unknown: BTreeSet<String>,
}

/// One field of a structure with its annotations
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field identifier as written in the source
    pub ident: String,
    /// Type of the field
    pub ty: TypeInfo,
    /// Annotations in declaration order (`query` -> `"limit"`, `description` -> `"..."`)
    pub tags: IndexMap<String, String>,
    /// Embedded fields are flattened into their parent
    pub embedded: bool,
}

impl TypeInfo {
    fn with_kind(kind: TypeKind) -> Self {
        Self {
            name: None,
            title: None,
            description: None,
            kind,
            force_request_body: false,
        }
    }

    /// Describes `T` through its [`Describe`] implementation
    pub fn of<T: Describe + ?Sized>() -> Self {
        let mut info = T::describe();
        if T::force_request_body() {
            info.force_request_body = true;
        }
        info
    }

    pub fn any() -> Self {
        Self::with_kind(TypeKind::Any)
    }

    pub fn boolean() -> Self {
        Self::with_kind(TypeKind::Boolean)
    }

    pub fn integer(format: Option<&str>) -> Self {
        Self::with_kind(TypeKind::Integer(format.map(str::to_string)))
    }

    pub fn number(format: Option<&str>) -> Self {
        Self::with_kind(TypeKind::Number(format.map(str::to_string)))
    }

    pub fn string() -> Self {
        Self::with_kind(TypeKind::String(None))
    }

    pub fn string_format(format: &str) -> Self {
        Self::with_kind(TypeKind::String(Some(format.to_string())))
    }

    pub fn array(items: TypeInfo) -> Self {
        Self::with_kind(TypeKind::Array(Box::new(items)))
    }

    pub fn map(values: TypeInfo) -> Self {
        Self::with_kind(TypeKind::Map(Box::new(values)))
    }

    pub fn nullable(inner: TypeInfo) -> Self {
        Self::with_kind(TypeKind::Nullable(Box::new(inner)))
    }

    pub fn file() -> Self {
        Self::with_kind(TypeKind::File)
    }

    /// Anonymous structure with the given fields
    pub fn object(fields: Vec<FieldInfo>) -> Self {
        Self::structure(StructInfo {
            fields,
            forbid_unknown: BTreeSet::new(),
        })
    }

    pub fn structure(info: StructInfo) -> Self {
        Self::with_kind(TypeKind::Struct(info))
    }

    /// Gives the type a definition name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Opts the type into a request body for bodiless methods
    pub fn with_forced_request_body(mut self) -> Self {
        self.force_request_body = true;
        self
    }

    /// Rejects unknown properties for the given annotation tag.
    /// Has no effect on non-struct types.
    pub fn forbid_unknown(mut self, tag: &str) -> Self {
        if let TypeKind::Struct(info) = &mut self.kind {
            info.forbid_unknown.insert(tag.to_string());
        }
        self
    }

    /// Rejects unknown JSON properties
    pub fn deny_unknown_fields(self) -> Self {
        self.forbid_unknown(TAG_JSON)
    }

    /// Strips any number of nullable wrappers
    pub fn unwrap_nullable(&self) -> &TypeInfo {
        let mut current = self;
        while let TypeKind::Nullable(inner) = &current.kind {
            current = inner;
        }
        current
    }

    /// Structure behind any nullable wrappers
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match &self.unwrap_nullable().kind {
            TypeKind::Struct(info) => Some(info),
            _ => None,
        }
    }

    /// Whether the type is a bare sequence or map
    pub fn is_slice_or_map(&self) -> bool {
        matches!(
            self.unwrap_nullable().kind,
            TypeKind::Array(_) | TypeKind::Map(_)
        )
    }

    /// Whether the type, or any struct embedded in it, has a field carrying `tag`
    pub fn has_tagged_fields(&self, tag: &str) -> bool {
        let Some(info) = self.as_struct() else {
            return false;
        };

        info.fields.iter().any(|field| {
            if field.tag_name(tag).is_some() {
                return true;
            }
            field.embedded && field.tag_value(tag).is_none() && field.ty.has_tagged_fields(tag)
        })
    }

    /// First embedded sequence or map field, searching embedded structs too
    pub fn find_embedded_slice_or_map(&self) -> Option<&TypeInfo> {
        let info = self.as_struct()?;

        for field in info.fields.iter().filter(|f| f.embedded) {
            if field.ty.is_slice_or_map() {
                return Some(&field.ty);
            }
            if let Some(found) = field.ty.find_embedded_slice_or_map() {
                return Some(found);
            }
        }

        None
    }

    /// Type name for messages, `<anonymous>` when unnamed
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.unwrap_nullable().name.as_deref())
            .unwrap_or("<anonymous>")
    }
}

impl FieldInfo {
    pub fn new(ident: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            ident: ident.into(),
            ty,
            tags: IndexMap::new(),
            embedded: false,
        }
    }

    /// Embedded field whose properties are flattened into the parent
    pub fn embed(ty: TypeInfo) -> Self {
        let ident = ty.display_name().to_string();
        Self {
            ident,
            ty,
            tags: IndexMap::new(),
            embedded: true,
        }
    }

    /// Adds an annotation, replacing an earlier one with the same key
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn query(self, name: &str) -> Self {
        self.tag(TAG_QUERY, name)
    }

    pub fn path(self, name: &str) -> Self {
        self.tag(TAG_PATH, name)
    }

    pub fn header(self, name: &str) -> Self {
        self.tag(TAG_HEADER, name)
    }

    pub fn cookie(self, name: &str) -> Self {
        self.tag(TAG_COOKIE, name)
    }

    pub fn form(self, name: &str) -> Self {
        self.tag(TAG_FORM_DATA, name)
    }

    pub fn json(self, name: &str) -> Self {
        self.tag(TAG_JSON, name)
    }

    pub fn description(self, text: &str) -> Self {
        self.tag("description", text)
    }

    pub fn required(self) -> Self {
        self.tag("required", "true")
    }

    pub fn deprecated(self) -> Self {
        self.tag("deprecated", "true")
    }

    pub fn example(self, value: &str) -> Self {
        self.tag("example", value)
    }

    pub fn collection_format(self, format: &str) -> Self {
        self.tag(TAG_COLLECTION_FORMAT, format)
    }

    /// Raw annotation value
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Name part of an annotation (`"limit,omitempty"` -> `"limit"`), `None` when empty
    pub fn tag_name(&self, key: &str) -> Option<&str> {
        let value = self.tag_value(key)?;
        let name = value.split(',').next().unwrap_or_default().trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Parsed annotation value; the error is a human readable reason
    pub fn tag_parse<T>(&self, key: &str) -> Result<Option<T>, String>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.tag_value(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| format!("cannot parse '{}': {}", value, e))
            })
            .transpose()
    }

    /// Annotation value as JSON, falling back to a plain string
    pub fn tag_json(&self, key: &str) -> Option<Value> {
        self.tag_value(key).map(parse_loose_json)
    }
}

/// Parses `value` as JSON when possible, otherwise keeps it as a string
pub fn parse_loose_json(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Marker for an uploaded file or stream in a form body
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUpload;

impl Describe for FileUpload {
    fn describe() -> TypeInfo {
        TypeInfo::file()
    }
}

macro_rules! describe_primitive {
    ($($ty:ty => $info:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeInfo {
                    $info
                }
            }
        )*
    };
}

describe_primitive! {
    bool => TypeInfo::boolean(),
    i8 => TypeInfo::integer(Some("int32")),
    i16 => TypeInfo::integer(Some("int32")),
    i32 => TypeInfo::integer(Some("int32")),
    i64 => TypeInfo::integer(Some("int64")),
    i128 => TypeInfo::integer(Some("int64")),
    isize => TypeInfo::integer(Some("int64")),
    u8 => TypeInfo::integer(Some("int32")),
    u16 => TypeInfo::integer(Some("int32")),
    u32 => TypeInfo::integer(Some("int32")),
    u64 => TypeInfo::integer(Some("int64")),
    u128 => TypeInfo::integer(Some("int64")),
    usize => TypeInfo::integer(Some("int64")),
    f32 => TypeInfo::number(Some("float")),
    f64 => TypeInfo::number(Some("double")),
    char => TypeInfo::string(),
    String => TypeInfo::string(),
    str => TypeInfo::string(),
    serde_json::Value => TypeInfo::any(),
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeInfo {
        TypeInfo::of::<T>()
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeInfo {
        TypeInfo::of::<T>()
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeInfo {
        TypeInfo::nullable(TypeInfo::of::<T>())
    }

    fn force_request_body() -> bool {
        T::force_request_body()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeInfo {
        TypeInfo::array(TypeInfo::of::<T>())
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeInfo {
        TypeInfo::array(TypeInfo::of::<T>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeInfo {
        TypeInfo::array(TypeInfo::of::<T>())
    }
}

impl<T: Describe, S> Describe for HashMap<String, T, S> {
    fn describe() -> TypeInfo {
        TypeInfo::map(TypeInfo::of::<T>())
    }
}

impl<T: Describe> Describe for BTreeMap<String, T> {
    fn describe() -> TypeInfo {
        TypeInfo::map(TypeInfo::of::<T>())
    }
}
