//! Pet store types shared by the integration tests.

use openapi_from_types::type_info::{FileUpload, StructInfo};
use openapi_from_types::{Describe, FieldInfo, TypeInfo};

pub struct Category;

impl Describe for Category {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("id", TypeInfo::of::<u64>()).json("id"),
            FieldInfo::new("name", TypeInfo::of::<String>()).json("name").required(),
        ])
        .named("Category")
    }
}

/// Reports itself under the same definition name as [`Category`] with a
/// different shape.
pub struct RenamedCategory;

impl Describe for RenamedCategory {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![FieldInfo::new("label", TypeInfo::of::<String>()).json("label")])
            .named("Category")
    }
}

pub struct Pet;

impl Describe for Pet {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("id", TypeInfo::of::<u64>()).json("id").required(),
            FieldInfo::new("name", TypeInfo::of::<String>())
                .json("name")
                .required()
                .tag("minLength", "1"),
            FieldInfo::new("category", TypeInfo::of::<Option<Category>>()).json("category"),
            FieldInfo::new("status", TypeInfo::of::<String>())
                .json("status")
                .tag("enum", "available,pending,sold"),
        ])
        .named("Pet")
        .with_description("A pet for sale")
    }
}

pub struct PetFilter;

impl Describe for PetFilter {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("born_after", TypeInfo::string_format("date")).json("bornAfter"),
            FieldInfo::new("category", TypeInfo::of::<Category>()).json("category"),
        ])
        .named("PetFilter")
    }
}

pub struct Paging;

impl Describe for Paging {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("limit", TypeInfo::of::<u32>())
                .query("limit")
                .description("Page size")
                .tag("maximum", "100"),
            FieldInfo::new("offset", TypeInfo::of::<u32>()).query("offset"),
        ])
    }
}

pub struct ListPets;

impl Describe for ListPets {
    fn describe() -> TypeInfo {
        TypeInfo::structure(StructInfo {
            fields: vec![
                FieldInfo::embed(TypeInfo::of::<Paging>()),
                FieldInfo::new("tags", TypeInfo::of::<Vec<String>>())
                    .query("tags")
                    .collection_format("multi"),
                FieldInfo::new("status", TypeInfo::of::<Vec<String>>())
                    .query("status")
                    .collection_format("csv"),
                FieldInfo::new("filter", TypeInfo::of::<Option<PetFilter>>()).query("filter"),
                FieldInfo::new("request_id", TypeInfo::of::<String>())
                    .header("X-Request-Id")
                    .example("\"b5f2\""),
                FieldInfo::new("session", TypeInfo::of::<Option<String>>()).cookie("session"),
                // Body annotations on a GET input are ignored.
                FieldInfo::new("ignored", TypeInfo::of::<String>()).json("ignored"),
            ],
            ..StructInfo::default()
        })
        .named("ListPets")
        .forbid_unknown("query")
    }
}

pub struct GetPet;

impl Describe for GetPet {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![FieldInfo::new("id", TypeInfo::of::<Option<u64>>())
            .path("id")
            .tag("required", "false")])
    }
}

pub struct CreatePet;

impl Describe for CreatePet {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("name", TypeInfo::of::<String>()).json("name").form("name").required(),
            FieldInfo::new("category", TypeInfo::of::<RenamedCategory>()).json("category"),
            FieldInfo::new("idempotency_key", TypeInfo::of::<String>()).header("Idempotency-Key"),
        ])
        .named("CreatePet")
    }
}

pub struct UploadPhoto;

impl Describe for UploadPhoto {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("id", TypeInfo::of::<u64>()).path("id"),
            FieldInfo::new("caption", TypeInfo::of::<Option<String>>()).form("caption"),
            FieldInfo::new("photo", TypeInfo::of::<FileUpload>()).form("photo"),
        ])
        .named("UploadPhoto")
    }
}

pub struct SearchPets;

impl Describe for SearchPets {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![FieldInfo::new("filter", TypeInfo::of::<PetFilter>()).json("filter")])
            .named("SearchPets")
    }

    fn force_request_body() -> bool {
        true
    }
}

pub struct DuplicateQuery;

impl Describe for DuplicateQuery {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![
            FieldInfo::new("page", TypeInfo::of::<u32>()).query("page"),
            FieldInfo::new("page_number", TypeInfo::of::<u32>()).query("page"),
        ])
    }
}

pub struct CreatedPet;

impl Describe for CreatedPet {
    fn describe() -> TypeInfo {
        TypeInfo::structure(StructInfo {
            fields: vec![
                FieldInfo::embed(TypeInfo::of::<Pet>()),
                FieldInfo::new("location", TypeInfo::of::<String>())
                    .header("Location")
                    .description("URL of the new pet"),
            ],
            ..StructInfo::default()
        })
    }
}

pub struct NoContent;

impl Describe for NoContent {
    fn describe() -> TypeInfo {
        TypeInfo::object(vec![])
    }
}
