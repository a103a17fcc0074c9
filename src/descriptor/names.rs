//! Type paths declared by raw descriptor files.
//!
//! Names here are computed from the raw records alone, before anything is
//! linked, so a batch that declares the same fully-qualified name twice is
//! rejected with the offending name and kind rather than a linker error.

use std::sync::Arc;

use prost_types::{DescriptorProto, FileDescriptorProto};
use rustc_hash::FxHashMap;
use smol_str::{SmolStr, format_smolstr};

use crate::error::{Result, SchemaError, TypeKind};

/// Join a dotted scope and a simple name.
///
/// "" + "Person" -> "Person"
/// "pkg" + "Person" -> "pkg.Person"
pub fn join_scope(scope: &str, name: &str) -> SmolStr {
    if scope.is_empty() {
        SmolStr::new(name)
    } else {
        format_smolstr!("{scope}.{name}")
    }
}

/// Where a declared type lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredType {
    pub kind: TypeKind,
    pub file: Arc<str>,
}

/// Every fully-qualified type name declared across a set of raw files.
#[derive(Clone, Debug, Default)]
pub struct DeclaredTypes {
    by_full_name: FxHashMap<SmolStr, DeclaredType>,
}

impl DeclaredTypes {
    /// Walk the files' message and enum trees.
    ///
    /// Fails on the first fully-qualified name declared twice, whether the
    /// two declarations sit in one file or in different files.
    pub fn collect<'a>(files: impl IntoIterator<Item = &'a FileDescriptorProto>) -> Result<Self> {
        let mut declared = Self::default();
        for file in files {
            let file_name: Arc<str> = Arc::from(file.name());
            let package = file.package();
            for message in &file.message_type {
                declared.add_message(message, package, &file_name)?;
            }
            for enumeration in &file.enum_type {
                declared.add(join_scope(package, enumeration.name()), TypeKind::Enum, &file_name)?;
            }
        }
        Ok(declared)
    }

    fn add_message(&mut self, message: &DescriptorProto, scope: &str, file: &Arc<str>) -> Result<()> {
        let path = join_scope(scope, message.name());
        self.add(path.clone(), TypeKind::Message, file)?;
        for nested in &message.nested_type {
            self.add_message(nested, &path, file)?;
        }
        for enumeration in &message.enum_type {
            self.add(join_scope(&path, enumeration.name()), TypeKind::Enum, file)?;
        }
        Ok(())
    }

    fn add(&mut self, full_name: SmolStr, kind: TypeKind, file: &Arc<str>) -> Result<()> {
        if self.by_full_name.contains_key(&full_name) {
            return Err(SchemaError::DuplicateFullyQualifiedName {
                kind,
                name: full_name.to_string(),
            });
        }
        self.by_full_name.insert(full_name, DeclaredType { kind, file: file.clone() });
        Ok(())
    }

    /// Look up a fully-qualified name (without a leading dot).
    pub fn get(&self, full_name: &str) -> Option<&DeclaredType> {
        self.by_full_name.get(full_name)
    }

    /// Get the number of declared types.
    pub fn len(&self) -> usize {
        self.by_full_name.len()
    }

    /// Check if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.by_full_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{EnumDescriptorProto, FieldDescriptorProto};

    fn message(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn enumeration(name: &str) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn untyped_field(name: &str, type_name: &str) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(1),
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    fn person_file() -> FileDescriptorProto {
        let mut phone_number = message("PhoneNumber");
        phone_number.field.push(untyped_field("type", "PhoneType"));

        let mut person = message("Person");
        person.nested_type.push(phone_number);
        person.enum_type.push(enumeration("PhoneType"));
        person.field.push(untyped_field("phone", "PhoneNumber"));

        FileDescriptorProto {
            name: Some("Person.proto".to_string()),
            package: Some("people".to_string()),
            message_type: vec![person],
            enum_type: vec![enumeration("Status")],
            ..Default::default()
        }
    }

    #[test]
    fn test_scope_helpers() {
        assert_eq!(join_scope("", "Person"), "Person");
        assert_eq!(join_scope("pkg.Person", "PhoneType"), "pkg.Person.PhoneType");
    }

    #[test]
    fn test_collect_nested_names() {
        let file = person_file();
        let declared = DeclaredTypes::collect([&file]).unwrap();

        assert_eq!(declared.len(), 4);
        assert_eq!(declared.get("people.Person").map(|d| d.kind), Some(TypeKind::Message));
        assert_eq!(
            declared.get("people.Person.PhoneNumber").map(|d| d.kind),
            Some(TypeKind::Message)
        );
        assert_eq!(declared.get("people.Person.PhoneType").map(|d| d.kind), Some(TypeKind::Enum));
        assert_eq!(declared.get("people.Status").map(|d| d.file.as_ref()), Some("Person.proto"));
    }

    #[test]
    fn test_collect_rejects_duplicate_across_files() {
        let first = person_file();
        let mut second = person_file();
        second.name = Some("Copy.proto".to_string());

        let err = DeclaredTypes::collect([&first, &second]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateFullyQualifiedName { kind: TypeKind::Message, ref name }
                if name == "people.Person"
        ));
    }

    #[test]
    fn test_collect_rejects_duplicate_nested_enum() {
        let mut file = person_file();
        file.message_type[0].enum_type.push(enumeration("PhoneType"));

        let err = DeclaredTypes::collect([&file]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateFullyQualifiedName { kind: TypeKind::Enum, ref name }
                if name == "people.Person.PhoneType"
        ));
    }

    #[test]
    fn test_collect_same_simple_name_in_other_scope() {
        let mut file = person_file();
        file.message_type[0].nested_type[0].enum_type.push(enumeration("PhoneType"));

        let declared = DeclaredTypes::collect([&file]).unwrap();
        assert!(declared.get("people.Person.PhoneType").is_some());
        assert!(declared.get("people.Person.PhoneNumber.PhoneType").is_some());
    }
}
