//! Field labels and field types.

use std::fmt;
use std::str::FromStr;

use prost_types::FieldDescriptorProto;
use prost_types::field_descriptor_proto::{Label as ProtoLabel, Type};
use smol_str::SmolStr;

use crate::error::SchemaError;

// ============================================================================
// LABEL
// ============================================================================

/// Field cardinality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

impl Label {
    /// Get the keyword for this label.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Optional => "optional",
            Label::Required => "required",
            Label::Repeated => "repeated",
        }
    }

    fn to_proto(self) -> ProtoLabel {
        match self {
            Label::Optional => ProtoLabel::Optional,
            Label::Required => ProtoLabel::Required,
            Label::Repeated => ProtoLabel::Repeated,
        }
    }
}

impl FromStr for Label {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optional" => Ok(Label::Optional),
            "required" => Ok(Label::Required),
            "repeated" => Ok(Label::Repeated),
            other => Err(SchemaError::InvalidLabel(other.to_string())),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD TYPE
// ============================================================================

/// The type of a field: a scalar, or a message/enum named by reference.
///
/// Named references may be relative to the declaring message; the
/// descriptor pool resolves them when the schema is linked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Type),
    Named(SmolStr),
}

impl FieldType {
    /// Parse a type keyword. Anything that is not a scalar keyword is a
    /// named reference.
    pub fn parse(s: &str) -> Self {
        let scalar = match s {
            "double" => Type::Double,
            "float" => Type::Float,
            "int32" => Type::Int32,
            "int64" => Type::Int64,
            "uint32" => Type::Uint32,
            "uint64" => Type::Uint64,
            "sint32" => Type::Sint32,
            "sint64" => Type::Sint64,
            "fixed32" => Type::Fixed32,
            "fixed64" => Type::Fixed64,
            "sfixed32" => Type::Sfixed32,
            "sfixed64" => Type::Sfixed64,
            "bool" => Type::Bool,
            "string" => Type::String,
            "bytes" => Type::Bytes,
            name => return FieldType::Named(SmolStr::new(name)),
        };
        FieldType::Scalar(scalar)
    }

    /// Check if this is a scalar type.
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldType::Scalar(_))
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        FieldType::parse(s)
    }
}

impl From<Type> for FieldType {
    fn from(scalar: Type) -> Self {
        FieldType::Scalar(scalar)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => f.write_str(&scalar.as_str_name()["TYPE_".len()..].to_ascii_lowercase()),
            FieldType::Named(name) => f.write_str(name),
        }
    }
}

/// Build the raw record for one field.
pub(crate) fn field_proto(
    label: Label,
    field_type: FieldType,
    name: &str,
    number: i32,
    default: Option<&str>,
) -> FieldDescriptorProto {
    let mut field = FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label.to_proto() as i32),
        default_value: default.map(str::to_string),
        ..Default::default()
    };
    match field_type {
        FieldType::Scalar(scalar) => field.r#type = Some(scalar as i32),
        FieldType::Named(type_name) => field.type_name = Some(type_name.to_string()),
    }
    field
}
