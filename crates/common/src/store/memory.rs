use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStore, StoreError};
use crate::linked_data::{cid_for, Cid};

/// In-memory object store using a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<Cid, Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blocks held
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every CID currently held, in no particular order
    pub fn cids(&self) -> Vec<Cid> {
        self.inner
            .read()
            .map(|inner| inner.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, cid: &Cid) -> Result<Bytes, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| anyhow::anyhow!("failed to acquire read lock: {}", e))?;
        inner.get(cid).cloned().ok_or(StoreError::NotFound(*cid))
    }

    async fn put(&self, codec: u64, data: Vec<u8>) -> Result<Cid, StoreError> {
        let cid = cid_for(codec, &data);
        let mut inner = self
            .inner
            .write()
            .map_err(|e| anyhow::anyhow!("failed to acquire write lock: {}", e))?;
        inner.entry(cid).or_insert_with(|| Bytes::from(data));
        Ok(cid)
    }

    async fn has(&self, cid: &Cid) -> Result<bool, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| anyhow::anyhow!("failed to acquire read lock: {}", e))?;
        Ok(inner.contains_key(cid))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linked_data::LD_RAW_CODEC;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryStore::new();
        let cid = store.put(LD_RAW_CODEC, b"hello".to_vec()).await.unwrap();
        assert_eq!(store.get(&cid).await.unwrap(), Bytes::from_static(b"hello"));
        assert!(store.has(&cid).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.put(LD_RAW_CODEC, b"same".to_vec()).await.unwrap();
        let b = store.put(LD_RAW_CODEC, b"same".to_vec()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_block() {
        let store = MemoryStore::new();
        let cid = cid_for(LD_RAW_CODEC, b"never stored");
        assert!(store.get(&cid).await.unwrap_err().is_not_found());
        assert!(!store.has(&cid).await.unwrap());
    }
}
