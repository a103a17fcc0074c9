//! Enum definitions.

use std::fmt;

use prost_types::{EnumDescriptorProto, EnumValueDescriptorProto};

/// An enum type, ready to add to a schema or a message.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumDefinition {
    proto: EnumDescriptorProto,
}

impl EnumDefinition {
    /// Start a new enum definition.
    pub fn builder(name: impl Into<String>) -> EnumDefinitionBuilder {
        EnumDefinitionBuilder {
            proto: EnumDescriptorProto {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }

    /// Get the enum name.
    pub fn name(&self) -> &str {
        self.proto.name()
    }

    /// Get the raw record.
    pub fn as_proto(&self) -> &EnumDescriptorProto {
        &self.proto
    }

    /// Take the raw record.
    pub fn into_proto(self) -> EnumDescriptorProto {
        self.proto
    }
}

impl fmt::Display for EnumDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#?}", self.proto)
    }
}

/// Builder for [`EnumDefinition`].
#[derive(Clone, Debug)]
pub struct EnumDefinitionBuilder {
    proto: EnumDescriptorProto,
}

impl EnumDefinitionBuilder {
    /// Add a value.
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.proto.value.push(EnumValueDescriptorProto {
            name: Some(name.into()),
            number: Some(number),
            ..Default::default()
        });
        self
    }

    /// Finish the definition.
    pub fn build(self) -> EnumDefinition {
        EnumDefinition { proto: self.proto }
    }
}
