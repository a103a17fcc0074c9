//! Raw descriptor model.
//!
//! The raw records are the `prost_types` descriptor messages themselves:
//! a [`FileDescriptorProto`](prost_types::FileDescriptorProto) names its
//! package and imports and holds the message/enum trees. They come either
//! from the definition builders or from a decoded descriptor set.
//!
//! - [`FileBatch`] - the name-keyed files of one resolution pass
//! - [`DeclaredTypes`] - the fully-qualified names those files declare

mod batch;
mod names;

pub use batch::FileBatch;
pub use names::{DeclaredType, DeclaredTypes, join_scope};
