//! Thin wrapper around IPLD primitives.
//!
//! Everything that ends up in the object store is addressed by a CIDv1
//! whose multihash is BLAKE3-256 over the exact bytes that were stored.
//! Directory nodes are DAG-CBOR; file bodies, version blobs and anything
//! encrypted are stored as raw blocks.

mod codec;

pub use cid::Cid;
pub use cid::Error as CidError;
pub use codec::{BlockCodec, BlockEncoded, CodecError, DagCborCodec};

use multihash::Multihash;

/// Multicodec for raw binary blocks
pub const LD_RAW_CODEC: u64 = 0x55;
/// Multicodec for DAG-CBOR blocks
pub const LD_CBOR_CODEC: u64 = 0x71;
/// Multihash code for BLAKE3-256
pub const BLAKE3_HASH_CODE: u64 = 0x1e;

/// Compute the CIDv1 for a block of bytes under the given codec.
pub fn cid_for(codec: u64, data: &[u8]) -> Cid {
    let digest = blake3::hash(data);
    // NOTE: a 32 byte digest always fits in a 64 byte multihash
    let hash = Multihash::<64>::wrap(BLAKE3_HASH_CODE, digest.as_bytes())
        .unwrap_or_default();
    Cid::new_v1(codec, hash)
}
