//! Object store seam
//!
//! The file system never talks to a transport directly. It is handed an
//!  explicitly constructed [`ObjectStore`] (usually wrapped in an `Arc`)
//!  and only ever asks it to put or get blocks by CID.
//!
//! - [`MemoryStore`]: hash map backed, for tests and ephemeral use
//! - [`FsStore`]: one file per block in a local directory
//! - [`RetryingStore`]: bounded retry decorator over any store
//!
//! The identity collaborator used to locate a user's root lives here too,
//!  see [`Directory`].

mod directory;
mod fs;
mod memory;
mod retry;

pub use directory::{is_username_valid, Directory, DirectoryError, MemoryDirectory};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use retry::{RetryPolicy, RetryingStore};

use async_trait::async_trait;
use bytes::Bytes;

use crate::linked_data::Cid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("block not found: {0}")]
    NotFound(Cid),
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Default(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Content-addressed block store
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Fetch the bytes of a block
    ///
    /// Should fail with `StoreError::NotFound` if the CID is unknown.
    async fn get(&self, cid: &Cid) -> Result<Bytes, StoreError>;

    /// Store a block and return its CID under `codec`
    ///
    /// Implementations must be content-addressed: storing identical bytes
    ///  under the same codec always yields the same CID, and storing a block
    ///  that already exists is not an error.
    async fn put(&self, codec: u64, data: Vec<u8>) -> Result<Cid, StoreError>;

    /// Check whether a block is present
    async fn has(&self, cid: &Cid) -> Result<bool, StoreError>;
}
