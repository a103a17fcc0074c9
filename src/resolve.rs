//! Dependency resolution - linking raw files in import order.
//!
//! Callers hand over files in any order. The resolver works a fixed-point
//! loop instead of a topological sort:
//!
//! 1. **Scan** - walk the unlinked files in batch order
//! 2. **Link** - a file whose imports are all linked is added to the
//!    descriptor pool (a file without imports always is)
//! 3. **Repeat** - until a pass finds nothing left to link
//!
//! A pass that links nothing while files remain means the batch is stuck.
//! Missing imports and import cycles look the same from here and both
//! fail with [`SchemaError::UnresolvedDependency`].

use std::sync::Arc;

use indexmap::IndexMap;
use prost_reflect::{DescriptorPool, FileDescriptor};
use prost_types::FileDescriptorProto;
use tracing::{debug, warn};

use crate::base::FileId;
use crate::descriptor::FileBatch;
use crate::error::{Result, SchemaError};

// ============================================================================
// LINKED FILES
// ============================================================================

/// A file whose imports have all been resolved.
#[derive(Clone, Debug)]
pub struct LinkedFile {
    /// Position in link order.
    id: FileId,
    /// File name, as declared.
    name: Arc<str>,
    /// The linked descriptor, owned by the shared pool.
    descriptor: FileDescriptor,
    /// Resolved imports, in declaration order.
    dependencies: Vec<FileId>,
}

impl LinkedFile {
    /// Get the link-order id.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Get the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the package, empty when the file has none.
    pub fn package(&self) -> &str {
        self.descriptor.package_name()
    }

    /// Get the linked descriptor.
    pub fn descriptor(&self) -> &FileDescriptor {
        &self.descriptor
    }

    /// Get the resolved imports.
    pub fn dependencies(&self) -> &[FileId] {
        &self.dependencies
    }
}

/// Every file of a batch, linked into one descriptor pool.
#[derive(Clone, Debug)]
pub struct LinkedFiles {
    pool: DescriptorPool,
    files: IndexMap<Arc<str>, LinkedFile>,
}

impl LinkedFiles {
    /// Get the descriptor pool holding every linked file.
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Look up a linked file by name.
    pub fn get(&self, name: &str) -> Option<&LinkedFile> {
        self.files.get(name)
    }

    /// Look up a linked file by id.
    pub fn file(&self, id: FileId) -> Option<&LinkedFile> {
        self.files.get_index(id.slot()).map(|(_, file)| file)
    }

    /// Iterate over a file's direct imports.
    pub fn dependencies<'a>(&'a self, file: &'a LinkedFile) -> impl Iterator<Item = &'a LinkedFile> + 'a {
        file.dependencies.iter().filter_map(|&id| self.file(id))
    }

    /// Iterate over all files in link order.
    pub fn iter(&self) -> impl Iterator<Item = &LinkedFile> + '_ {
        self.files.values()
    }

    /// Get the number of linked files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if nothing was linked.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Link every file of `batch`.
///
/// Field type names are resolved by the pool, relative ones included, so
/// a file only sees the types of the files it imports.
pub fn resolve(batch: &FileBatch) -> Result<LinkedFiles> {
    let mut pool = DescriptorPool::new();
    // File name -> resolved imports, in link order
    let mut linked: IndexMap<Arc<str>, Vec<FileId>> = IndexMap::with_capacity(batch.len());

    loop {
        let mut blocked = None;
        let mut progress = false;

        for (name, file) in batch.iter() {
            if linked.contains_key(name) {
                continue;
            }

            let Some(dependencies) = linked_dependencies(file, &linked) else {
                blocked.get_or_insert((name, file));
                continue;
            };

            pool.add_file_descriptor_proto(file.clone())
                .map_err(|source| SchemaError::InvalidDescriptor {
                    file: name.to_string(),
                    source,
                })?;

            debug!(file = %name, id = linked.len(), imports = dependencies.len(), "linked file");
            linked.insert(name.clone(), dependencies);
            progress = true;
        }

        match blocked {
            None => break,
            Some((name, file)) if !progress => return Err(unresolved(name, file, &linked)),
            Some(_) => {}
        }
    }

    // Descriptors come from the final pool so every file shares one snapshot.
    let files = pool
        .files()
        .zip(linked)
        .enumerate()
        .map(|(idx, (descriptor, (name, dependencies)))| {
            debug_assert_eq!(descriptor.name(), name.as_ref());
            let file = LinkedFile {
                id: FileId::from_slot(idx),
                name: name.clone(),
                descriptor,
                dependencies,
            };
            (name, file)
        })
        .collect();

    Ok(LinkedFiles { pool, files })
}

/// Resolve a file's imports against the linked set.
///
/// Returns `None` while any import is still unlinked.
fn linked_dependencies(
    file: &FileDescriptorProto,
    linked: &IndexMap<Arc<str>, Vec<FileId>>,
) -> Option<Vec<FileId>> {
    file.dependency
        .iter()
        .map(|dependency| {
            linked
                .get_index_of(dependency.as_str())
                .map(FileId::from_slot)
        })
        .collect()
}

/// Build the error for a stalled batch, attributed to its first blocked file.
fn unresolved(
    name: &str,
    file: &FileDescriptorProto,
    linked: &IndexMap<Arc<str>, Vec<FileId>>,
) -> SchemaError {
    let missing: Vec<String> = file
        .dependency
        .iter()
        .filter(|dependency| !linked.contains_key(dependency.as_str()))
        .cloned()
        .collect();

    warn!(file = name, missing = ?missing, linked = linked.len(), "dependency resolution stalled");

    SchemaError::UnresolvedDependency {
        file: name.to_string(),
        missing,
    }
}
