use crate::document::ParameterLocation;
use crate::operation::HttpMethod;
use std::fmt;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document construction
#[derive(Debug, Error)]
pub enum Error {
    /// The same (location, name) pair was produced twice for one operation
    #[error("parameter {name} in {location} is already defined")]
    DuplicateParameter {
        name: String,
        location: ParameterLocation,
    },

    /// A type could not be turned into a schema
    #[error("failed to reflect {type_name}: {message}")]
    Reflection { type_name: String, message: String },

    /// A field annotation could not be applied to a parameter or header
    #[error("invalid value for tag '{tag}' on field {field}: {message}")]
    FieldPopulation {
        field: String,
        tag: String,
        message: String,
    },

    /// Two operations were placed under the same method and path
    #[error("operation {method} {path} is already defined")]
    DuplicateOperation { method: HttpMethod, path: String },

    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),

    #[error("schema serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Several independent failures, in the order they were detected
    #[error("{0}")]
    Multiple(Errors),
}

impl Error {
    pub(crate) fn reflection(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Reflection {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Iterates over the individual errors, flattening [`Error::Multiple`].
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Error> + '_> {
        match self {
            Error::Multiple(errors) => Box::new(errors.iter().flat_map(|e| e.iter())),
            other => Box::new(std::iter::once(other)),
        }
    }
}

/// Ordered aggregate of independent errors.
///
/// Each error keeps its own kind and context so callers can inspect them
/// programmatically instead of parsing a joined message.
#[derive(Debug, Default)]
pub struct Errors(Vec<Error>);

impl Errors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records the error of `result`, if any.
    pub fn push_result(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.0.push(err);
        }
    }

    pub fn push(&mut self, err: Error) {
        self.0.push(err);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.0
    }

    /// Converts the aggregate into a result: `Ok` when empty, the sole error
    /// when there is exactly one, [`Error::Multiple`] otherwise.
    pub fn into_result(mut self) -> Result<()> {
        match self.0.len() {
            0 => Ok(()),
            1 => Err(self.0.remove(0)),
            _ => Err(Error::Multiple(self)),
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
