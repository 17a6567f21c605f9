use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStore, StoreError};
use crate::linked_data::{cid_for, Cid};

/// Object store keeping one file per block in a local directory.
///  Files are named by the block's CID string.
#[derive(Debug, Clone)]
pub struct FsStore {
    path: PathBuf,
}

impl FsStore {
    /// Open (creating if needed) a block directory
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        tracing::debug!("FsStore::open called with path: {:?}", path);
        tokio::fs::create_dir_all(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn block_path(&self, cid: &Cid) -> PathBuf {
        self.path.join(cid.to_string())
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, cid: &Cid) -> Result<Bytes, StoreError> {
        match tokio::fs::read(self.block_path(cid)).await {
            Ok(data) => {
                tracing::debug!("FsStore::get: read {} bytes for {}", data.len(), cid);
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(*cid)),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, codec: u64, data: Vec<u8>) -> Result<Cid, StoreError> {
        let cid = cid_for(codec, &data);
        let path = self.block_path(&cid);
        if tokio::fs::try_exists(&path).await? {
            return Ok(cid);
        }

        // write-then-rename so a crashed write never leaves a truncated block
        let tmp = self.path.join(format!(".{}.tmp", cid));
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!("FsStore::put: wrote {} bytes as {}", data.len(), cid);
        Ok(cid)
    }

    async fn has(&self, cid: &Cid) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(self.block_path(cid)).await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linked_data::LD_CBOR_CODEC;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::open(&temp.path().join("blocks")).await.unwrap();

        let cid = store.put(LD_CBOR_CODEC, vec![1, 2, 3]).await.unwrap();
        assert!(store.has(&cid).await.unwrap());
        assert_eq!(store.get(&cid).await.unwrap().as_ref(), &[1, 2, 3]);

        // a second handle over the same directory sees the block
        let reopened = FsStore::open(store.path()).await.unwrap();
        assert_eq!(reopened.get(&cid).await.unwrap().as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fs_store_missing() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::open(temp.path()).await.unwrap();
        let cid = cid_for(LD_CBOR_CODEC, b"missing");
        assert!(matches!(store.get(&cid).await, Err(StoreError::NotFound(_))));
    }
}
