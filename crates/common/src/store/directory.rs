use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::linked_data::Cid;

/// Names that can never be claimed as usernames
const RESERVED_USERNAMES: &[&str] = &["admin", "api", "root", "www", "files"];

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    #[error("could not locate a published root for '{0}'")]
    NoRoot(String),
    #[error("invalid username: '{0}'")]
    InvalidUsername(String),
    #[error("directory error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Maps usernames to the root CID of their published file system.
///
/// Publication is last-write-wins at this seam: whatever reconciliation
///  a real directory (e.g. DNS records) does happens behind it.
#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug {
    /// Resolve the current root for a user
    ///
    /// Should fail with `DirectoryError::NoRoot` if nothing is published.
    async fn resolve_root_cid(&self, username: &str) -> Result<Cid, DirectoryError>;

    /// Publish a new root for a user
    async fn update_root(&self, username: &str, cid: Cid) -> Result<(), DirectoryError>;
}

/// A username is valid if it is non-empty, made only of ASCII letters,
///  digits and `-`, neither starts nor ends with `-`, and is not reserved.
pub fn is_username_valid(username: &str) -> bool {
    !username.is_empty()
        && !username.starts_with('-')
        && !username.ends_with('-')
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !RESERVED_USERNAMES.contains(&username)
}

/// In-memory directory
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    inner: Arc<RwLock<HashMap<String, Cid>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn resolve_root_cid(&self, username: &str) -> Result<Cid, DirectoryError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| anyhow::anyhow!("failed to acquire read lock: {}", e))?;
        inner
            .get(username)
            .copied()
            .ok_or_else(|| DirectoryError::NoRoot(username.to_string()))
    }

    async fn update_root(&self, username: &str, cid: Cid) -> Result<(), DirectoryError> {
        if !is_username_valid(username) {
            return Err(DirectoryError::InvalidUsername(username.to_string()));
        }
        let mut inner = self
            .inner
            .write()
            .map_err(|e| anyhow::anyhow!("failed to acquire write lock: {}", e))?;
        inner.insert(username.to_string(), cid);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linked_data::{cid_for, LD_CBOR_CODEC};

    #[test]
    fn test_username_validation() {
        assert!(is_username_valid("alice"));
        assert!(is_username_valid("bob-99"));
        assert!(!is_username_valid(""));
        assert!(!is_username_valid("-alice"));
        assert!(!is_username_valid("alice-"));
        assert!(!is_username_valid("al ice"));
        assert!(!is_username_valid("alice.smith"));
        assert!(!is_username_valid("admin"));
    }

    #[tokio::test]
    async fn test_memory_directory() {
        let directory = MemoryDirectory::new();
        assert!(matches!(
            directory.resolve_root_cid("alice").await,
            Err(DirectoryError::NoRoot(_))
        ));

        let cid = cid_for(LD_CBOR_CODEC, b"root");
        directory.update_root("alice", cid).await.unwrap();
        assert_eq!(directory.resolve_root_cid("alice").await.unwrap(), cid);

        assert!(matches!(
            directory.update_root("-bad", cid).await,
            Err(DirectoryError::InvalidUsername(_))
        ));
    }
}
