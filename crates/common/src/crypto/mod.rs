//! Cryptographic primitives for the private namespace
//!
//! - **Encryption**: ChaCha20-Poly1305 with a single [`Secret`] per private tree
//! - **Key lookup**: the [`KeyStore`] seam through which named keys are provisioned
//!
//! # Content Addressing Under Encryption
//!
//! The nonce for every encryption is derived from a BLAKE3 keyed hash of the
//! plaintext. Encrypting the same bytes under the same key therefore always
//! yields the same ciphertext, and so the same CID. Different keys (or different
//! plaintexts) never share a nonce.

mod keystore;
mod secret;

pub use keystore::{KeyStore, KeyStoreError, MemoryKeyStore};
pub use secret::{Secret, SecretError, NONCE_SIZE, SECRET_SIZE, TAG_SIZE};
