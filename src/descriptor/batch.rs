//! The set of raw descriptor files fed to one resolution pass.

use std::sync::Arc;

use indexmap::IndexMap;
use prost_types::FileDescriptorProto;

use crate::error::{Result, SchemaError};

/// The raw files of one resolution batch, keyed by file name.
///
/// Insertion order is preserved; the resolver scans files in this order,
/// which keeps link order and error attribution deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileBatch {
    files: IndexMap<Arc<str>, FileDescriptorProto>,
}

impl FileBatch {
    /// Create a new empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect files into a batch, rejecting repeated file names.
    pub fn from_files(files: impl IntoIterator<Item = FileDescriptorProto>) -> Result<Self> {
        let mut batch = Self::new();
        for file in files {
            batch.insert(file)?;
        }
        Ok(batch)
    }

    /// Add a file to the batch.
    pub fn insert(&mut self, file: FileDescriptorProto) -> Result<()> {
        let name: Arc<str> = Arc::from(file.name());
        if self.files.contains_key(&name) {
            return Err(SchemaError::DuplicateFile {
                name: name.to_string(),
            });
        }
        self.files.insert(name, file);
        Ok(())
    }

    /// Get a file by name.
    pub fn get(&self, name: &str) -> Option<&FileDescriptorProto> {
        self.files.get(name)
    }

    /// Check if a file with this name is in the batch.
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Iterate over `(name, file)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &FileDescriptorProto)> + '_ {
        self.files.iter()
    }

    /// Iterate over the raw files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &FileDescriptorProto> + '_ {
        self.files.values()
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, package: &str) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let batch = FileBatch::from_files(vec![
            file("b.proto", "pkg"),
            file("a.proto", "pkg"),
        ])
        .unwrap();

        let names: Vec<_> = batch.iter().map(|(name, _)| name.as_ref()).collect();
        assert_eq!(names, vec!["b.proto", "a.proto"]);
        assert_eq!(batch.len(), 2);
        assert!(batch.contains("a.proto"));
    }

    #[test]
    fn test_batch_rejects_duplicate_file() {
        let err = FileBatch::from_files(vec![
            file("a.proto", "one"),
            file("a.proto", "two"),
        ])
        .unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateFile { ref name } if name == "a.proto"));
    }

    #[test]
    fn test_batch_lookup() {
        let mut batch = FileBatch::new();
        assert!(batch.is_empty());

        batch.insert(file("a.proto", "pkg")).unwrap();
        assert_eq!(batch.get("a.proto").map(|f| f.package()), Some("pkg"));
        assert!(batch.get("missing.proto").is_none());
    }
}
