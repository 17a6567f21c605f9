use crate::crypto::{KeyStoreError, SecretError};
use crate::linked_data::{Cid, CodecError};
use crate::store::{DirectoryError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("not a valid file system path: '{0}'")]
    InvalidPath(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("'{0}' is reserved and cannot be used as an entry name")]
    ReservedName(String),
    #[error("tree has unsaved changes; put it before walking the stored dag")]
    Unsaved,
    #[error("malformed node {0}: {1}")]
    Malformed(Cid, String),
    #[error("decryption failed for {0}: {1}")]
    DecryptionFailed(Cid, SecretError),
    #[error("encryption failed: {0}")]
    EncryptionFailed(SecretError),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("store read failed: {0}")]
    StoreReadFailed(StoreError),
    #[error("store write failed: {0}")]
    StoreWriteFailed(StoreError),
    #[error("key store error: {0}")]
    KeyStore(#[from] KeyStoreError),
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl FsError {
    /// Map a failed store read, keeping "no such block" distinct
    pub(crate) fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(cid) => FsError::NotFound(cid.to_string()),
            err => FsError::StoreReadFailed(err),
        }
    }

    /// Errors that mean "this CID does not describe a usable tree",
    ///  as opposed to the store or key service being unavailable
    pub fn is_unresolvable(&self) -> bool {
        matches!(
            self,
            FsError::NotFound(_)
                | FsError::NotADirectory(_)
                | FsError::NotAFile(_)
                | FsError::Malformed(..)
                | FsError::DecryptionFailed(..)
        )
    }
}
