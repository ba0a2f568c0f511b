//! Media library: identifier resolution and directory indexing.
//!
//! [`MediaStore`] confines client-supplied identifiers to the configured
//! media root; [`indexer`] walks the root and derives display metadata for
//! every file on the extension allow-list.

pub mod indexer;
pub mod store;

pub use indexer::MediaRecord;
pub use store::{MediaStore, ResolvedPath};
