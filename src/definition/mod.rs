//! Hand-built message and enum definitions.
//!
//! Definitions are thin wrappers over the raw `prost_types` records. They
//! are not validated on their own; problems surface when a schema is built.

mod enumeration;
mod field;
mod message;

pub use enumeration::{EnumDefinition, EnumDefinitionBuilder};
pub use field::{FieldType, Label};
pub use message::{MessageDefinition, MessageDefinitionBuilder, OneofBuilder};
