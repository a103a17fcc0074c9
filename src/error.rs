//! Error types for schema construction and parsing.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// The two independent type namespaces of a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Message,
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Message => f.write_str("message"),
            TypeKind::Enum => f.write_str("enum"),
        }
    }
}

/// Schema build, resolution and parse errors.
///
/// Every variant is fatal to the build or parse that raised it. Failed
/// lookups are not errors; they return `None`.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("duplicate file name: {name}")]
    DuplicateFile { name: String },

    #[error("file '{file}' has unresolved dependencies: {}", missing.join(", "))]
    UnresolvedDependency { file: String, missing: Vec<String> },

    #[error("duplicate {kind} name: {name}")]
    DuplicateFullyQualifiedName { kind: TypeKind, name: String },

    #[error("malformed descriptor set: {0}")]
    MalformedWireData(#[from] prost::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid descriptor in file '{file}': {source}")]
    InvalidDescriptor {
        file: String,
        source: prost_reflect::DescriptorError,
    },

    #[error("illegal label: {0}")]
    InvalidLabel(String),
}

impl SchemaError {
    /// The file or type name this error is about, when it names one.
    pub fn offending_name(&self) -> Option<&str> {
        match self {
            SchemaError::DuplicateFile { name } => Some(name),
            SchemaError::UnresolvedDependency { file, .. } => Some(file),
            SchemaError::DuplicateFullyQualifiedName { name, .. } => Some(name),
            SchemaError::InvalidDescriptor { file, .. } => Some(file),
            SchemaError::InvalidLabel(label) => Some(label),
            SchemaError::MalformedWireData(_) | SchemaError::Io(_) => None,
        }
    }
}
