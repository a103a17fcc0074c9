//! Link-order identifiers for descriptor files.

use std::fmt;

/// Position of a file in link order.
///
/// Ids are handed out by the dependency resolver as files are linked, so
/// every import of a file has a smaller id than the file itself.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(u32);

impl FileId {
    /// Create a new FileId from a link position.
    #[inline]
    pub const fn new(position: u32) -> Self {
        Self(position)
    }

    /// Id of the file linked at `slot` in link-ordered storage.
    #[inline]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self(slot as u32)
    }

    /// Get the link position.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }

    /// Check if this file was linked before `other`.
    pub fn precedes(self, other: FileId) -> bool {
        self.0 < other.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linked#{}", self.0)
    }
}
