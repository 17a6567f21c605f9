use std::fmt::Debug;

use bytes::Bytes;

use crate::crypto::Secret;
use crate::linked_data::{BlockEncoded, Cid, LD_CBOR_CODEC, LD_RAW_CODEC};

use super::link::Links;
use super::node::DirNode;
use super::FsError;

/// How a tree turns its nodes and blobs into stored bytes and back.
///
/// This is the only thing that differs between the public and the
///  private tree. Implementations must be pure and deterministic: the
///  same input always seals to the same bytes, so a node's CID can be
///  computed before it is written.
pub trait Sealer: Clone + Debug + Send + Sync + 'static {
    /// Seal a links-node. Returns the block codec and the bytes to store.
    fn seal_node(&self, links: &Links) -> Result<(u64, Vec<u8>), FsError>;

    fn open_node(&self, cid: &Cid, data: &[u8]) -> Result<Links, FsError>;

    /// Seal a file body. Sealed blobs are always stored as raw blocks.
    fn seal_blob(&self, data: &[u8]) -> Result<Vec<u8>, FsError>;

    fn open_blob(&self, cid: &Cid, data: Bytes) -> Result<Bytes, FsError>;
}

/// Plaintext storage for the public tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl Sealer for Plain {
    fn seal_node(&self, links: &Links) -> Result<(u64, Vec<u8>), FsError> {
        let data = DirNode::new(links.clone()).encode()?;
        Ok((LD_CBOR_CODEC, data))
    }

    fn open_node(&self, cid: &Cid, data: &[u8]) -> Result<Links, FsError> {
        if cid.codec() != LD_CBOR_CODEC {
            return Err(FsError::Malformed(
                *cid,
                format!("expected a dag-cbor node, found codec {:#x}", cid.codec()),
            ));
        }
        DirNode::decode(data)
            .map(DirNode::into_links)
            .map_err(|e| FsError::Malformed(*cid, e.to_string()))
    }

    fn seal_blob(&self, data: &[u8]) -> Result<Vec<u8>, FsError> {
        Ok(data.to_vec())
    }

    fn open_blob(&self, cid: &Cid, data: Bytes) -> Result<Bytes, FsError> {
        if cid.codec() != LD_RAW_CODEC {
            return Err(FsError::Malformed(
                *cid,
                format!("expected a raw blob, found codec {:#x}", cid.codec()),
            ));
        }
        Ok(data)
    }
}

/// Encrypted storage for the private tree.
///
/// Nodes and blobs are both written as raw blocks of
///  `nonce || ciphertext || tag`; a node is DAG-CBOR before sealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed(Secret);

impl Sealed {
    pub fn new(key: Secret) -> Self {
        Self(key)
    }

    pub fn key(&self) -> &Secret {
        &self.0
    }

    fn open(&self, cid: &Cid, data: &[u8]) -> Result<Vec<u8>, FsError> {
        if cid.codec() != LD_RAW_CODEC {
            return Err(FsError::Malformed(
                *cid,
                format!("expected a sealed raw block, found codec {:#x}", cid.codec()),
            ));
        }
        self.0
            .decrypt(data)
            .map_err(|e| FsError::DecryptionFailed(*cid, e))
    }
}

impl Sealer for Sealed {
    fn seal_node(&self, links: &Links) -> Result<(u64, Vec<u8>), FsError> {
        let plaintext = DirNode::new(links.clone()).encode()?;
        Ok((LD_RAW_CODEC, self.seal_blob(&plaintext)?))
    }

    fn open_node(&self, cid: &Cid, data: &[u8]) -> Result<Links, FsError> {
        let plaintext = self.open(cid, data)?;
        DirNode::decode(&plaintext)
            .map(DirNode::into_links)
            .map_err(|e| FsError::Malformed(*cid, e.to_string()))
    }

    fn seal_blob(&self, data: &[u8]) -> Result<Vec<u8>, FsError> {
        self.0.encrypt(data).map_err(FsError::EncryptionFailed)
    }

    fn open_blob(&self, cid: &Cid, data: Bytes) -> Result<Bytes, FsError> {
        self.open(cid, &data).map(Bytes::from)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::Link;
    use crate::linked_data::cid_for;

    fn sample_links() -> Links {
        let mut links = Links::new();
        let cid = cid_for(LD_RAW_CODEC, b"hello");
        links.insert("hello.txt".to_string(), Link::file("hello.txt", cid, 5));
        links
    }

    #[test]
    fn test_plain_node_is_dag_cbor() {
        let (codec, data) = Plain.seal_node(&sample_links()).unwrap();
        assert_eq!(codec, LD_CBOR_CODEC);

        let cid = cid_for(codec, &data);
        assert_eq!(Plain.open_node(&cid, &data).unwrap(), sample_links());
    }

    #[test]
    fn test_plain_rejects_wrong_codec() {
        let (_, data) = Plain.seal_node(&sample_links()).unwrap();
        let raw_cid = cid_for(LD_RAW_CODEC, &data);
        assert!(matches!(
            Plain.open_node(&raw_cid, &data),
            Err(FsError::Malformed(..))
        ));

        let cbor_cid = cid_for(LD_CBOR_CODEC, b"blob");
        assert!(matches!(
            Plain.open_blob(&cbor_cid, Bytes::from_static(b"blob")),
            Err(FsError::Malformed(..))
        ));
    }

    #[test]
    fn test_sealed_node_roundtrip_and_opacity() {
        let sealer = Sealed::new(Secret::generate());
        let (codec, data) = sealer.seal_node(&sample_links()).unwrap();
        assert_eq!(codec, LD_RAW_CODEC);

        let (_, plain) = Plain.seal_node(&sample_links()).unwrap();
        assert_ne!(data, plain);
        assert!(!data.windows(9).any(|w| w == b"hello.txt"));

        let cid = cid_for(codec, &data);
        assert_eq!(sealer.open_node(&cid, &data).unwrap(), sample_links());
    }

    #[test]
    fn test_sealed_is_deterministic() {
        let sealer = Sealed::new(Secret::generate());
        assert_eq!(
            sealer.seal_node(&sample_links()).unwrap(),
            sealer.seal_node(&sample_links()).unwrap()
        );
        assert_eq!(
            sealer.seal_blob(b"abc").unwrap(),
            sealer.seal_blob(b"abc").unwrap()
        );
    }

    #[test]
    fn test_sealed_wrong_key() {
        let sealer = Sealed::new(Secret::generate());
        let other = Sealed::new(Secret::generate());
        let data = sealer.seal_blob(b"secret").unwrap();
        let cid = cid_for(LD_RAW_CODEC, &data);

        assert!(matches!(
            other.open_blob(&cid, Bytes::from(data)),
            Err(FsError::DecryptionFailed(..))
        ));
    }
}
