//! # protodyn
//!
//! Runtime protobuf schemas: assemble message and enum types without a
//! compile step, resolve them into a linked schema, and build dynamic
//! messages from it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! schema      → Schema façade, SchemaBuilder, merge and (de)serialization
//!   ↓
//! registry    → Short/full type name indexes
//!   ↓
//! resolve     → Import-order linking into one descriptor pool
//!   ↓
//! descriptor  → Raw file batches, declared type paths
//!   ↓
//! definition  → Hand-built message and enum definitions
//!   ↓
//! base        → Primitives (FileId)
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: FileId
pub mod base;

/// Error types
pub mod error;

// ============================================================================
// RAW MODEL
// ============================================================================

/// Message and enum definition builders
pub mod definition;

/// Raw descriptor batches and type paths
pub mod descriptor;

// ============================================================================
// RESOLUTION
// ============================================================================

/// Dependency resolution
pub mod resolve;

/// Type name indexes
pub mod registry;

/// Schema façade and builder
pub mod schema;

pub use base::FileId;
pub use definition::{EnumDefinition, FieldType, Label, MessageDefinition};
pub use error::{Result, SchemaError, TypeKind};
pub use schema::{Schema, SchemaBuilder};

// Re-export the descriptor types that appear in the public API
pub use prost_reflect::{DescriptorPool, DynamicMessage, EnumDescriptor, EnumValueDescriptor, MessageDescriptor, Value};
pub use prost_types::{FileDescriptorProto, FileDescriptorSet};
