use serde::de::DeserializeOwned;
use serde::Serialize;

use super::LD_CBOR_CODEC;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode block: {0}")]
    Encode(String),
    #[error("failed to decode block: {0}")]
    Decode(String),
}

/// A serialization format with a multicodec code
pub trait BlockCodec {
    const CODE: u64;

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError>;
}

/// DAG-CBOR, the codec for every structured block we write
#[derive(Debug, Clone, Copy, Default)]
pub struct DagCborCodec;

impl BlockCodec for DagCborCodec {
    const CODE: u64 = LD_CBOR_CODEC;

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
        serde_ipld_dagcbor::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
        serde_ipld_dagcbor::from_slice(data).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Types that know how to turn themselves into a block and back
pub trait BlockEncoded<C: BlockCodec>: Serialize + DeserializeOwned + Sized {
    fn codec(&self) -> u64 {
        C::CODE
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        C::encode(self)
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        C::decode(data)
    }
}
