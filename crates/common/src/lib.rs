/**
 * Cryptographic types and operations.
 *  - Symmetric secrets with deterministic,
 *    content-derived nonces
 *  - Named key lookup
 */
pub mod crypto;
/**
 * The dual-tree file system itself: public and
 *  private trees under one root, the path router,
 *  and the facade that syncs them.
 */
pub mod fs;
/**
 * Internal wrapper around IPLD, renamed to
 *  something a little more down-to-earth.
 * CIDs, codecs, and how we hash blocks.
 */
pub mod linked_data;
/**
 * Where blocks live and who publishes roots.
 *  Object stores (memory, disk, retrying) and
 *  the username -> root directory.
 */
pub mod store;

pub mod prelude {
    pub use crate::crypto::{KeyStore, MemoryKeyStore, Secret};
    pub use crate::fs::{
        Entry, FileSystem, FileSystemConfig, FileSystemVersion, FsContext, FsError, Link, Links,
    };
    pub use crate::linked_data::{Cid, CidError};
    pub use crate::store::{Directory, FsStore, MemoryDirectory, MemoryStore, ObjectStore};
}
