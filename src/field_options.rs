//! Declarative field options applied onto parameter and header descriptors.

use crate::document::{Header, Parameter, ParameterStyle};
use crate::error::{Error, Result};
use crate::type_info::FieldInfo;
use std::fmt;
use std::str::FromStr;

/// Descriptor that can take its options from field annotations
pub(crate) trait PopulateFromTags {
    fn populate_from_tags(&mut self, field: &FieldInfo) -> Result<()>;
}

fn option<T>(field: &FieldInfo, tag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    field
        .tag_parse(tag)
        .map_err(|message| Error::FieldPopulation {
            field: field.ident.clone(),
            tag: tag.to_string(),
            message,
        })
}

/// Overwrites `target` only when the annotation is present
fn set<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

impl PopulateFromTags for Parameter {
    fn populate_from_tags(&mut self, field: &FieldInfo) -> Result<()> {
        set(&mut self.description, field.tag_value("description").map(str::to_string));
        set(&mut self.required, option(field, "required")?);
        set(&mut self.deprecated, option(field, "deprecated")?);
        set(&mut self.allow_empty_value, option(field, "allowEmptyValue")?);
        set(&mut self.allow_reserved, option(field, "allowReserved")?);
        set(&mut self.style, option::<ParameterStyle>(field, "style")?);
        set(&mut self.explode, option(field, "explode")?);
        set(&mut self.example, field.tag_json("example"));
        Ok(())
    }
}

impl PopulateFromTags for Header {
    fn populate_from_tags(&mut self, field: &FieldInfo) -> Result<()> {
        set(&mut self.description, field.tag_value("description").map(str::to_string));
        set(&mut self.required, option(field, "required")?);
        set(&mut self.deprecated, option(field, "deprecated")?);
        set(&mut self.example, field.tag_json("example"));
        Ok(())
    }
}
