//! The dual-tree file system.
//!
//! A file system is a root links-node pointing at two trees that share one
//!  structure but differ in how they are stored:
//!
//! - the public tree is plaintext DAG-CBOR, readable by anyone holding
//!   the CID
//! - the private tree seals every node, version blob and file with one
//!   symmetric key, so the store only ever sees opaque raw blocks
//!
//! Both are [`DagTree`]s, parameterised by a [`Sealer`]. Paths handed to
//!  [`FileSystem`] start with `public/` or `private/` and are routed to
//!  the matching tree.
//!
//! Trees are values. Mutations return a new tree and only touch the store
//!  to write file bodies; [`FileSystem::sync`] writes out changed nodes and
//!  a new root.

mod error;
mod filesystem;
mod link;
mod node;
mod pins;
mod resolver;
mod sealer;
mod tree;
mod version;

pub mod path;

pub use error::FsError;
pub use filesystem::{
    FileSystem, FileSystemConfig, FsContext, TreeHandle, TreeOutcome, DEFAULT_KEY_NAME,
};
pub use link::{Link, Links};
pub use node::DirNode;
pub use path::Namespace;
pub use pins::Pins;
pub use resolver::Resolver;
pub use sealer::{Plain, Sealed, Sealer};
pub use tree::{DagTree, Entry, File, PrivateTree, PublicTree};
pub use version::{FileSystemVersion, VERSION_LINK};
