//! Type registry - short and fully-qualified name indexes.
//!
//! Every linked message and enum is indexed twice:
//!
//! - **Full name** - `package.Outer.Inner`. Must be unique; a second
//!   declaration is a hard error.
//! - **Short name** - `Outer.Inner`, the package-free path. Different
//!   packages may reuse it.
//!
//! Short names are inserted speculatively and collisions are recorded on
//! the side. Once every type is in, the collided short names are purged,
//! so the result does not depend on which declaration was visited first.
//! A purged name still resolves by full name and stays queryable through
//! [`Namespace::is_ambiguous`].

use std::sync::Arc;

use prost_reflect::{EnumDescriptor, EnumValueDescriptor, MessageDescriptor};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::descriptor::join_scope;
use crate::error::{Result, SchemaError, TypeKind};
use crate::resolve::LinkedFile;

/// Index into a namespace's entry vector.
pub type TypeIdx = usize;

// ============================================================================
// TYPE ENTRY
// ============================================================================

/// One resolved message or enum type.
#[derive(Clone, Debug)]
pub struct TypeEntry<D> {
    short_name: SmolStr,
    full_name: SmolStr,
    /// Name of the declaring file.
    file: Arc<str>,
    descriptor: D,
}

impl<D> TypeEntry<D> {
    /// Get the package-free, scope-qualified name.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Get the fully-qualified name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Get the name of the declaring file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Get the linked descriptor.
    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }
}

// ============================================================================
// NAMESPACE
// ============================================================================

/// The dual index for one kind of type.
///
/// Entries are stored in a single vector and referenced by index from
/// both maps.
#[derive(Clone, Debug)]
pub struct Namespace<D> {
    kind: TypeKind,
    /// The single source of truth for all entries.
    entries: Vec<TypeEntry<D>>,
    /// Full name -> entry index. Never collides.
    by_full_name: FxHashMap<SmolStr, TypeIdx>,
    /// Short name -> entry index, only for unambiguous short names.
    by_short_name: FxHashMap<SmolStr, TypeIdx>,
    /// Short names declared more than once.
    ambiguous: FxHashSet<SmolStr>,
}

impl<D> Namespace<D> {
    fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            by_full_name: FxHashMap::default(),
            by_short_name: FxHashMap::default(),
            ambiguous: FxHashSet::default(),
        }
    }

    /// Insert an entry, recording (not resolving) short-name collisions.
    fn insert(&mut self, entry: TypeEntry<D>) -> Result<()> {
        if self.by_full_name.contains_key(&entry.full_name) {
            return Err(SchemaError::DuplicateFullyQualifiedName {
                kind: self.kind,
                name: entry.full_name.to_string(),
            });
        }

        let idx = self.entries.len();
        self.by_full_name.insert(entry.full_name.clone(), idx);

        if self.by_short_name.contains_key(&entry.short_name) {
            trace!(kind = %self.kind, short_name = %entry.short_name, "short name collision");
            self.ambiguous.insert(entry.short_name.clone());
        } else {
            self.by_short_name.insert(entry.short_name.clone(), idx);
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Drop every collided short name from the short index.
    fn purge_ambiguous(&mut self) {
        for short_name in &self.ambiguous {
            self.by_short_name.remove(short_name);
        }
    }

    /// Look up a type by short name, falling back to full name.
    pub fn lookup(&self, name: &str) -> Option<&TypeEntry<D>> {
        self.lookup_short(name).or_else(|| self.lookup_full(name))
    }

    /// Look up only by unambiguous short name.
    pub fn lookup_short(&self, name: &str) -> Option<&TypeEntry<D>> {
        self.by_short_name.get(name).and_then(|&idx| self.entries.get(idx))
    }

    /// Look up only by fully-qualified name.
    pub fn lookup_full(&self, name: &str) -> Option<&TypeEntry<D>> {
        self.by_full_name.get(name).and_then(|&idx| self.entries.get(idx))
    }

    /// Check if a short name is declared by more than one type.
    pub fn is_ambiguous(&self, short_name: &str) -> bool {
        self.ambiguous.contains(short_name)
    }

    /// Get all ambiguous short names, sorted.
    pub fn ambiguous_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ambiguous.iter().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get all fully-qualified names, sorted.
    pub fn full_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(TypeEntry::full_name).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry<D>> + '_ {
        self.entries.iter()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TYPE REGISTRY
// ============================================================================

/// Message and enum indexes for a set of linked files.
///
/// The two namespaces are independent: a message and an enum may share a
/// short name without making either ambiguous.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    messages: Namespace<MessageDescriptor>,
    enums: Namespace<EnumDescriptor>,
}

impl TypeRegistry {
    /// Index every message and enum declared by `files`, nested ones included.
    pub fn build<'a>(files: impl IntoIterator<Item = &'a LinkedFile>) -> Result<Self> {
        let mut registry = Self {
            messages: Namespace::new(TypeKind::Message),
            enums: Namespace::new(TypeKind::Enum),
        };

        for file in files {
            let file_name: Arc<str> = Arc::from(file.name());
            for message in file.descriptor().messages() {
                registry.add_message(message, "", &file_name)?;
            }
            for enumeration in file.descriptor().enums() {
                registry.add_enum(enumeration, "", &file_name)?;
            }
        }

        registry.messages.purge_ambiguous();
        registry.enums.purge_ambiguous();

        debug!(
            messages = registry.messages.len(),
            enums = registry.enums.len(),
            ambiguous = registry.messages.ambiguous.len() + registry.enums.ambiguous.len(),
            "built type registry"
        );
        Ok(registry)
    }

    fn add_message(&mut self, message: MessageDescriptor, scope: &str, file: &Arc<str>) -> Result<()> {
        let short_name = join_scope(scope, message.name());
        self.messages.insert(TypeEntry {
            short_name: short_name.clone(),
            full_name: SmolStr::new(message.full_name()),
            file: file.clone(),
            descriptor: message.clone(),
        })?;

        for nested in message.child_messages() {
            self.add_message(nested, &short_name, file)?;
        }
        for enumeration in message.child_enums() {
            self.add_enum(enumeration, &short_name, file)?;
        }
        Ok(())
    }

    fn add_enum(&mut self, enumeration: EnumDescriptor, scope: &str, file: &Arc<str>) -> Result<()> {
        self.enums.insert(TypeEntry {
            short_name: join_scope(scope, enumeration.name()),
            full_name: SmolStr::new(enumeration.full_name()),
            file: file.clone(),
            descriptor: enumeration,
        })
    }

    /// Get the message namespace.
    pub fn messages(&self) -> &Namespace<MessageDescriptor> {
        &self.messages
    }

    /// Get the enum namespace.
    pub fn enums(&self) -> &Namespace<EnumDescriptor> {
        &self.enums
    }

    /// Look up a message by short or fully-qualified name.
    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.lookup(name).map(TypeEntry::descriptor)
    }

    /// Look up an enum by short or fully-qualified name.
    pub fn enumeration(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.lookup(name).map(TypeEntry::descriptor)
    }

    /// Look up an enum value by its declared name.
    pub fn enum_value_by_name(&self, enum_name: &str, value: &str) -> Option<EnumValueDescriptor> {
        self.enumeration(enum_name)?.get_value_by_name(value)
    }

    /// Look up an enum value by its number.
    pub fn enum_value_by_number(&self, enum_name: &str, number: i32) -> Option<EnumValueDescriptor> {
        self.enumeration(enum_name)?.get_value(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FileBatch;
    use crate::resolve::{LinkedFiles, resolve};
    use prost_types::{DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FileDescriptorProto};

    fn make_message(name: &str, nested: Vec<DescriptorProto>, enums: Vec<EnumDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            nested_type: nested,
            enum_type: enums,
            ..Default::default()
        }
    }

    fn make_enum(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_string()),
            value: values
                .iter()
                .map(|&(name, number)| EnumValueDescriptorProto {
                    name: Some(name.to_string()),
                    number: Some(number),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn make_file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: (!package.is_empty()).then(|| package.to_string()),
            message_type: messages,
            ..Default::default()
        }
    }

    fn link(files: Vec<FileDescriptorProto>) -> LinkedFiles {
        let batch = FileBatch::from_files(files).unwrap();
        resolve(&batch).unwrap()
    }

    fn person_file() -> FileDescriptorProto {
        let phone_type = make_enum("PhoneType", &[("MOBILE", 0), ("HOME", 1), ("WORK", 2)]);
        let person = make_message(
            "Person",
            vec![make_message("PhoneNumber", vec![], vec![])],
            vec![phone_type],
        );
        make_file("Person.proto", "people", vec![person])
    }

    #[test]
    fn test_nested_short_and_full_names() {
        let linked = link(vec![person_file()]);
        let registry = TypeRegistry::build(linked.iter()).unwrap();

        assert_eq!(registry.messages().len(), 2);
        assert_eq!(registry.enums().len(), 1);

        let entry = registry.messages().lookup("Person.PhoneNumber").unwrap();
        assert_eq!(entry.full_name(), "people.Person.PhoneNumber");
        assert_eq!(entry.file(), "Person.proto");

        assert!(registry.message("people.Person").is_some());
        assert!(registry.enumeration("Person.PhoneType").is_some());
        assert!(registry.enumeration("people.Person.PhoneType").is_some());
        assert!(registry.message("PhoneNumber").is_none());
    }

    #[test]
    fn test_enum_value_lookup() {
        let linked = link(vec![person_file()]);
        let registry = TypeRegistry::build(linked.iter()).unwrap();

        let home = registry.enum_value_by_name("Person.PhoneType", "HOME").unwrap();
        assert_eq!(home.number(), 1);

        let work = registry.enum_value_by_number("Person.PhoneType", 2).unwrap();
        assert_eq!(work.name(), "WORK");

        assert!(registry.enum_value_by_name("Person.PhoneType", "FAX").is_none());
        assert!(registry.enum_value_by_number("Missing", 0).is_none());
    }

    #[test]
    fn test_short_name_collision_is_purged() {
        let linked = link(vec![
            make_file("a.proto", "pkg_a", vec![make_message("Msg", vec![], vec![])]),
            make_file("b.proto", "pkg_b", vec![make_message("Msg", vec![], vec![])]),
            make_file("c.proto", "pkg_c", vec![make_message("Other", vec![], vec![])]),
        ]);
        let registry = TypeRegistry::build(linked.iter()).unwrap();

        assert!(registry.message("Msg").is_none());
        assert!(registry.messages().is_ambiguous("Msg"));
        assert!(registry.message("pkg_a.Msg").is_some());
        assert!(registry.message("pkg_b.Msg").is_some());
        assert!(registry.message("Other").is_some());
        assert_eq!(registry.messages().ambiguous_names(), vec!["Msg"]);
    }

    #[test]
    fn test_three_way_collision_is_order_independent() {
        let files = vec![
            make_file("a.proto", "a", vec![make_message("Msg", vec![], vec![])]),
            make_file("b.proto", "b", vec![make_message("Msg", vec![], vec![])]),
            make_file("c.proto", "c", vec![make_message("Msg", vec![], vec![])]),
        ];
        let mut reversed = files.clone();
        reversed.reverse();

        for files in [files, reversed] {
            let linked = link(files);
            let registry = TypeRegistry::build(linked.iter()).unwrap();
            assert!(registry.messages().lookup_short("Msg").is_none());
            assert_eq!(registry.messages().full_names(), vec!["a.Msg", "b.Msg", "c.Msg"]);
        }
    }

    #[test]
    fn test_message_and_enum_namespaces_are_independent() {
        let file = make_file("a.proto", "a", vec![make_message("Status", vec![], vec![])]);
        let mut other = make_file("b.proto", "b", vec![]);
        other.enum_type.push(make_enum("Status", &[("OK", 0)]));

        let linked = link(vec![file, other]);
        let registry = TypeRegistry::build(linked.iter()).unwrap();

        assert!(registry.message("Status").is_some());
        assert!(registry.enumeration("Status").is_some());
        assert!(!registry.messages().is_ambiguous("Status"));
    }

    #[test]
    fn test_duplicate_full_name_across_batches() {
        // Two independent resolutions can each be valid while their union is not.
        let first = link(vec![make_file("a.proto", "pkg", vec![make_message("Msg", vec![], vec![])])]);
        let second = link(vec![make_file("b.proto", "pkg", vec![make_message("Msg", vec![], vec![])])]);

        let err = TypeRegistry::build(first.iter().chain(second.iter())).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateFullyQualifiedName { kind: TypeKind::Message, ref name } if name == "pkg.Msg"
        ));
    }

    #[test]
    fn test_duplicate_enum_across_batches() {
        let mut enums_only = make_file("Enums.proto", "people", vec![]);
        enums_only.enum_type.push(make_enum("Color", &[("RED", 0)]));
        let mut enums_copy = enums_only.clone();
        enums_copy.name = Some("EnumsCopy.proto".to_string());

        let first = link(vec![enums_only]);
        let second = link(vec![enums_copy]);
        let err = TypeRegistry::build(first.iter().chain(second.iter())).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateFullyQualifiedName { kind: TypeKind::Enum, ref name } if name == "people.Color"
        ));
    }
}
