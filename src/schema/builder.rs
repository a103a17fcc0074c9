//! Incremental schema assembly and merging.

use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use tracing::debug;

use super::Schema;
use crate::definition::{EnumDefinition, MessageDefinition};
use crate::error::Result;

/// Assembles one home file plus any number of previously built schemas.
///
/// `build` borrows the builder, so it can keep growing and be rebuilt.
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    package: Option<String>,
    messages: Vec<DescriptorProto>,
    enums: Vec<EnumDescriptorProto>,
    /// Files of every merged schema, in merge order.
    merged: Vec<FileDescriptorProto>,
}

impl SchemaBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the home file's name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Set the home file's package.
    pub fn package(&mut self, package: impl Into<String>) -> &mut Self {
        self.package = Some(package.into());
        self
    }

    /// Add a top-level message to the home file.
    pub fn add_message_definition(&mut self, definition: MessageDefinition) -> &mut Self {
        self.messages.push(definition.into_proto());
        self
    }

    /// Add a top-level enum to the home file.
    pub fn add_enum_definition(&mut self, definition: EnumDefinition) -> &mut Self {
        self.enums.push(definition.into_proto());
        self
    }

    /// Merge in every file of a built schema.
    ///
    /// Conflicts are only detected by [`build`](Self::build).
    pub fn add_schema(&mut self, schema: &Schema) -> &mut Self {
        self.merged
            .extend(schema.file_descriptor_set().file.iter().cloned());
        self
    }

    /// Get the home file as it would be built.
    pub fn home_file(&self) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(self.name.clone()),
            package: self.package.clone(),
            message_type: self.messages.clone(),
            enum_type: self.enums.clone(),
            ..Default::default()
        }
    }

    /// Build a schema from the home file followed by every merged file.
    pub fn build(&self) -> Result<Schema> {
        let mut file = Vec::with_capacity(1 + self.merged.len());
        file.push(self.home_file());
        file.extend(self.merged.iter().cloned());

        debug!(home = %self.name, merged = self.merged.len(), "building schema");
        Schema::from_file_set(FileDescriptorSet { file })
    }
}
