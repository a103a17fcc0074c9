//! Schema - the resolved, queryable result of a build or parse.
//!
//! # Architecture
//!
//! Every schema is produced by the same pipeline, whether it comes from a
//! [`SchemaBuilder`] or from serialized bytes:
//!
//! 1. **Declare** - walk the raw files, rejecting duplicate full names
//! 2. **Batch** - key the files by name, rejecting duplicate files
//! 3. **Resolve** - link the files into one descriptor pool in import order
//! 4. **Index** - build the short/full name registry
//!
//! The raw descriptor set is kept alongside the linked form. It is what
//! [`Schema::to_bytes`] writes and what [`SchemaBuilder::add_schema`] merges,
//! so a schema always serializes exactly the records it was built from.

mod builder;

pub use builder::SchemaBuilder;

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use prost::Message;
use prost_reflect::text_format::FormatOptions;
use prost_reflect::{
    DescriptorPool, DynamicMessage, EnumDescriptor, EnumValueDescriptor, MessageDescriptor, ReflectMessage,
};
use prost_types::FileDescriptorSet;
use tracing::debug;

use crate::descriptor::{DeclaredTypes, FileBatch};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::resolve::{LinkedFiles, resolve};

/// A resolved set of message and enum types.
///
/// Cheap to clone; clones share the same immutable state.
#[derive(Clone, Debug)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

#[derive(Debug)]
struct SchemaInner {
    file_set: FileDescriptorSet,
    linked: LinkedFiles,
    registry: TypeRegistry,
}

impl Schema {
    /// Create a new schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Resolve a descriptor set.
    ///
    /// Files may appear in any order; imports are resolved regardless.
    pub fn from_file_set(file_set: FileDescriptorSet) -> Result<Self> {
        DeclaredTypes::collect(&file_set.file)?;
        let batch = FileBatch::from_files(file_set.file.iter().cloned())?;
        let linked = resolve(&batch)?;
        let registry = TypeRegistry::build(linked.iter())?;

        debug!(
            files = linked.len(),
            messages = registry.messages().len(),
            enums = registry.enums().len(),
            "built schema"
        );

        Ok(Self {
            inner: Arc::new(SchemaInner {
                file_set,
                linked,
                registry,
            }),
        })
    }

    /// Parse a serialized `FileDescriptorSet`, such as `protoc --descriptor_set_out` output.
    pub fn parse_from(bytes: &[u8]) -> Result<Self> {
        let file_set = FileDescriptorSet::decode(bytes)?;
        debug!(bytes = bytes.len(), files = file_set.file.len(), "decoded descriptor set");
        Self::from_file_set(file_set)
    }

    /// Read a serialized `FileDescriptorSet` to the end of the stream and parse it.
    ///
    /// The reader is dropped before parsing starts.
    pub fn parse_from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        drop(reader);
        Self::parse_from(&bytes)
    }

    /// Serialize the descriptor set this schema was built from.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.file_set.encode_to_vec()
    }

    /// Create an empty message of the named type.
    ///
    /// The name may be short or fully-qualified.
    pub fn new_message(&self, type_name: &str) -> Option<DynamicMessage> {
        self.message_descriptor(type_name).map(DynamicMessage::new)
    }

    /// Look up a message by short or fully-qualified name.
    pub fn message_descriptor(&self, type_name: &str) -> Option<MessageDescriptor> {
        self.inner.registry.message(type_name).cloned()
    }

    /// Look up an enum by short or fully-qualified name.
    pub fn enum_descriptor(&self, type_name: &str) -> Option<EnumDescriptor> {
        self.inner.registry.enumeration(type_name).cloned()
    }

    /// Look up an enum value by the enum's name and the value's name.
    pub fn enum_value_by_name(&self, enum_name: &str, value_name: &str) -> Option<EnumValueDescriptor> {
        self.inner.registry.enum_value_by_name(enum_name, value_name)
    }

    /// Look up an enum value by the enum's name and the value's number.
    pub fn enum_value_by_number(&self, enum_name: &str, number: i32) -> Option<EnumValueDescriptor> {
        self.inner.registry.enum_value_by_number(enum_name, number)
    }

    /// Get all message full names, sorted.
    pub fn message_names(&self) -> Vec<&str> {
        self.inner.registry.messages().full_names()
    }

    /// Get all enum full names, sorted.
    pub fn enum_names(&self) -> Vec<&str> {
        self.inner.registry.enums().full_names()
    }

    /// Check if a short message name is declared more than once.
    pub fn is_ambiguous_message_name(&self, short_name: &str) -> bool {
        self.inner.registry.messages().is_ambiguous(short_name)
    }

    /// Check if a short enum name is declared more than once.
    pub fn is_ambiguous_enum_name(&self, short_name: &str) -> bool {
        self.inner.registry.enums().is_ambiguous(short_name)
    }

    /// Get the raw descriptor set, as built or parsed.
    pub fn file_descriptor_set(&self) -> &FileDescriptorSet {
        &self.inner.file_set
    }

    /// Get the linked files in link order.
    pub fn linked_files(&self) -> &LinkedFiles {
        &self.inner.linked
    }

    /// Get the pool every descriptor of this schema belongs to.
    pub fn descriptor_pool(&self) -> &DescriptorPool {
        self.inner.linked.pool()
    }

    /// Get the short/full name indexes.
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "types: [{}]", self.message_names().join(", "))?;
        writeln!(f, "enums: [{}]", self.enum_names().join(", "))?;
        let file_set = self.inner.file_set.transcode_to_dynamic();
        f.write_str(&file_set.to_text_format_with_options(&FormatOptions::new().pretty(true)))
    }
}
