//! Foundation types shared by the resolver and the registry.
//!
//! - [`FileId`] - Link-order handle of a resolved descriptor file
//!
//! This module has NO dependencies on other protodyn modules.

mod file_id;

pub use file_id::FileId;
