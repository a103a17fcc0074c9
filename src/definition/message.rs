//! Message definitions and their oneofs.

use std::fmt;

use prost_types::{DescriptorProto, FieldDescriptorProto, OneofDescriptorProto};

use super::enumeration::EnumDefinition;
use super::field::{FieldType, Label, field_proto};

/// A message type, ready to add to a schema or nest in another message.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageDefinition {
    proto: DescriptorProto,
}

impl MessageDefinition {
    /// Start a new message definition.
    pub fn builder(name: impl Into<String>) -> MessageDefinitionBuilder {
        MessageDefinitionBuilder {
            proto: DescriptorProto {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }

    /// Get the message name.
    pub fn name(&self) -> &str {
        self.proto.name()
    }

    /// Get the raw record.
    pub fn as_proto(&self) -> &DescriptorProto {
        &self.proto
    }

    /// Take the raw record.
    pub fn into_proto(self) -> DescriptorProto {
        self.proto
    }
}

impl fmt::Display for MessageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#?}", self.proto)
    }
}

/// Builder for [`MessageDefinition`].
///
/// Field types are given as keywords (`"int32"`, `"string"`, ...) or as
/// message/enum names. Names may be relative to this message, so a nested
/// enum can be referenced by its simple name.
#[derive(Clone, Debug)]
pub struct MessageDefinitionBuilder {
    proto: DescriptorProto,
}

impl MessageDefinitionBuilder {
    /// Add a field.
    pub fn field(self, label: Label, field_type: impl Into<FieldType>, name: &str, number: i32) -> Self {
        self.push_field(field_proto(label, field_type.into(), name, number, None))
    }

    /// Add a field with a default value, in protobuf text form.
    ///
    /// Enum defaults are given by value name.
    pub fn field_with_default(
        self,
        label: Label,
        field_type: impl Into<FieldType>,
        name: &str,
        number: i32,
        default: &str,
    ) -> Self {
        self.push_field(field_proto(label, field_type.into(), name, number, Some(default)))
    }

    /// Add an optional field.
    pub fn optional_field(self, field_type: impl Into<FieldType>, name: &str, number: i32) -> Self {
        self.field(Label::Optional, field_type, name, number)
    }

    /// Add a required field.
    pub fn required_field(self, field_type: impl Into<FieldType>, name: &str, number: i32) -> Self {
        self.field(Label::Required, field_type, name, number)
    }

    /// Add a repeated field.
    pub fn repeated_field(self, field_type: impl Into<FieldType>, name: &str, number: i32) -> Self {
        self.field(Label::Repeated, field_type, name, number)
    }

    /// Nest a message definition.
    pub fn message(mut self, definition: MessageDefinition) -> Self {
        self.proto.nested_type.push(definition.into_proto());
        self
    }

    /// Nest an enum definition.
    pub fn enumeration(mut self, definition: EnumDefinition) -> Self {
        self.proto.enum_type.push(definition.into_proto());
        self
    }

    /// Declare a oneof whose members are added by `members`.
    ///
    /// Members are optional fields tagged with the oneof's index.
    pub fn oneof(mut self, name: &str, members: impl FnOnce(OneofBuilder) -> OneofBuilder) -> Self {
        let index = self.proto.oneof_decl.len() as i32;
        self.proto.oneof_decl.push(OneofDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        });

        let oneof = members(OneofBuilder {
            index,
            fields: Vec::new(),
        });
        self.proto.field.extend(oneof.fields);
        self
    }

    fn push_field(mut self, field: FieldDescriptorProto) -> Self {
        self.proto.field.push(field);
        self
    }

    /// Finish the definition.
    pub fn build(self) -> MessageDefinition {
        MessageDefinition { proto: self.proto }
    }
}

/// Collects the members of one oneof.
#[derive(Clone, Debug)]
pub struct OneofBuilder {
    index: i32,
    fields: Vec<FieldDescriptorProto>,
}

impl OneofBuilder {
    /// Add a member field.
    pub fn field(self, field_type: impl Into<FieldType>, name: &str, number: i32) -> Self {
        self.push(field_proto(Label::Optional, field_type.into(), name, number, None))
    }

    /// Add a member field with a default value.
    pub fn field_with_default(
        self,
        field_type: impl Into<FieldType>,
        name: &str,
        number: i32,
        default: &str,
    ) -> Self {
        self.push(field_proto(Label::Optional, field_type.into(), name, number, Some(default)))
    }

    fn push(mut self, mut field: FieldDescriptorProto) -> Self {
        field.oneof_index = Some(self.index);
        self.fields.push(field);
        self
    }
}
