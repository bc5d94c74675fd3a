//! Document-scoped store of named schemas.

use crate::schema::{Schema, COMPONENTS_SCHEMAS_PREFIX};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared mapping from definition name to schema.
///
/// The first schema collected under a name wins; later writes with the same
/// name are ignored. Repeated traversals of a shared nested type therefore
/// leave exactly one entry behind, whichever operation reached it first.
///
/// The registry has no interior locking. Builders that run concurrently must
/// serialize access to it (and to the document owning it) themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `schema` under `name` unless the name is already taken.
    ///
    /// Returns whether the schema was inserted.
    pub fn collect(&mut self, name: &str, schema: Schema) -> bool {
        if self.schemas.contains_key(name) {
            trace!("Schema {} already registered, keeping first definition", name);
            return false;
        }

        debug!("Registering schema {}", name);
        self.schemas.insert(name.to_string(), schema);
        true
    }

    /// Collects every definition in order
    pub fn collect_all<I>(&mut self, definitions: I)
    where
        I: IntoIterator<Item = (String, Schema)>,
    {
        for (name, schema) in definitions {
            self.collect(&name, schema);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Resolves a `#/components/schemas/<name>` reference
    pub fn resolve(&self, reference: &str) -> Option<&Schema> {
        reference
            .strip_prefix(COMPONENTS_SCHEMAS_PREFIX)
            .and_then(|name| self.schemas.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter()
    }
}
