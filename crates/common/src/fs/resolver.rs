use std::sync::Arc;

use bytes::Bytes;

use crate::linked_data::{Cid, LD_RAW_CODEC};
use crate::store::ObjectStore;

use super::link::{Link, Links};
use super::sealer::{Plain, Sealer};
use super::version::{FileSystemVersion, VERSION_LINK};
use super::FsError;

/// Typed reads and writes of nodes and blobs against an object store.
///
/// The `get_*`/`put_*` helpers work on plaintext blocks. The
///  `read_*`/`write_*` helpers take a [`Sealer`] and are what the trees
///  go through, so the same code serves both namespaces.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: Arc<dyn ObjectStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub async fn get_block(&self, cid: &Cid) -> Result<Bytes, FsError> {
        self.store.get(cid).await.map_err(FsError::from_read)
    }

    pub async fn put_block(&self, codec: u64, data: Vec<u8>) -> Result<Cid, FsError> {
        self.store
            .put(codec, data)
            .await
            .map_err(FsError::StoreWriteFailed)
    }

    pub async fn read_links<S: Sealer>(&self, sealer: &S, cid: &Cid) -> Result<Links, FsError> {
        let data = self.get_block(cid).await?;
        sealer.open_node(cid, &data)
    }

    pub async fn write_links<S: Sealer>(&self, sealer: &S, links: &Links) -> Result<Cid, FsError> {
        let (codec, data) = sealer.seal_node(links)?;
        self.put_block(codec, data).await
    }

    pub async fn read_file<S: Sealer>(&self, sealer: &S, cid: &Cid) -> Result<Bytes, FsError> {
        let data = self.get_block(cid).await?;
        sealer.open_blob(cid, data)
    }

    pub async fn write_file<S: Sealer>(&self, sealer: &S, content: &[u8]) -> Result<Cid, FsError> {
        let data = sealer.seal_blob(content)?;
        self.put_block(LD_RAW_CODEC, data).await
    }

    /// Read the version recorded in a set of links.
    /// A missing link or an unrecognised value reads as the oldest version.
    pub async fn read_version<S: Sealer>(
        &self,
        sealer: &S,
        links: &Links,
    ) -> Result<FileSystemVersion, FsError> {
        let Some(link) = links.get(VERSION_LINK) else {
            return Ok(FileSystemVersion::default());
        };
        let data = self.read_file(sealer, &link.cid).await?;
        Ok(FileSystemVersion::parse_lossy(&String::from_utf8_lossy(&data)))
    }

    pub async fn write_version<S: Sealer>(
        &self,
        sealer: &S,
        version: FileSystemVersion,
    ) -> Result<Link, FsError> {
        let content = version.as_str().as_bytes();
        let cid = self.write_file(sealer, content).await?;
        Ok(Link::file(VERSION_LINK, cid, content.len() as u64))
    }

    pub async fn get_links(&self, cid: &Cid) -> Result<Links, FsError> {
        self.read_links(&Plain, cid).await
    }

    pub async fn put_links(&self, links: &Links) -> Result<Cid, FsError> {
        self.write_links(&Plain, links).await
    }

    pub async fn get_file(&self, cid: &Cid) -> Result<Bytes, FsError> {
        self.read_file(&Plain, cid).await
    }

    pub async fn put_file(&self, content: &[u8]) -> Result<Cid, FsError> {
        self.write_file(&Plain, content).await
    }

    /// Version of a plaintext links-node
    pub async fn get_version(&self, cid: &Cid) -> Result<FileSystemVersion, FsError> {
        let links = self.get_links(cid).await?;
        self.read_version(&Plain, &links).await
    }
}
