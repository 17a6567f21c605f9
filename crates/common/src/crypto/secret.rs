//! Content encryption using ChaCha20-Poly1305
//!
//! Every node, version blob and file body of a private tree is sealed with the
//! tree's `Secret` before it reaches the object store.

use std::fmt;
use std::ops::Deref;

use chacha20poly1305::Key;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use serde::{Deserialize, Serialize};

/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of ChaCha20-Poly1305 key in bytes (256 bits)
pub const SECRET_SIZE: usize = 32;
/// Size of the Poly1305 authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// A 256-bit symmetric encryption key
///
/// The encrypted format is: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
/// The nonce is the first 12 bytes of `BLAKE3-keyed(secret, plaintext)`, which makes
/// encryption deterministic and doubles as an integrity check on decrypt.
///
/// # Examples
///
/// ```ignore
/// let secret = Secret::generate();
/// let ciphertext = secret.encrypt(b"sensitive data")?;
/// let recovered = secret.decrypt(&ciphertext)?;
/// assert_eq!(b"sensitive data", &recovered[..]);
/// ```
#[derive(PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Secret([u8; SECRET_SIZE]);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl Default for Secret {
    fn default() -> Self {
        Secret([0; SECRET_SIZE])
    }
}

impl Deref for Secret {
    type Target = [u8; SECRET_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; SECRET_SIZE]> for Secret {
    fn from(bytes: [u8; SECRET_SIZE]) -> Self {
        Secret(bytes)
    }
}

impl Secret {
    /// Generate a new random secret using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut buff = [0; SECRET_SIZE];
        getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
        Self(buff)
    }

    /// Create a secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `SECRET_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != SECRET_SIZE {
            return Err(anyhow::anyhow!(
                "invalid secret size, expected {}, got {}",
                SECRET_SIZE,
                data.len()
            )
            .into());
        }
        let mut buff = [0; SECRET_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(data: &str) -> Result<Self, SecretError> {
        let bytes = hex::decode(data.trim())
            .map_err(|e| anyhow::anyhow!("invalid secret hex: {}", e))?;
        Self::from_slice(&bytes)
    }

    /// Get a reference to the secret key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    fn nonce_for(&self, data: &[u8]) -> [u8; NONCE_SIZE] {
        let hash = blake3::keyed_hash(&self.0, data);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&hash.as_bytes()[..NONCE_SIZE]);
        nonce
    }

    /// Encrypt data using ChaCha20-Poly1305 AEAD
    ///
    /// # Errors
    ///
    /// Returns an error if the AEAD refuses the input (only on absurd lengths).
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, SecretError> {
        let nonce_bytes = self.nonce_for(data);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let key = Key::from_slice(self.bytes());
        let cipher = ChaCha20Poly1305::new(key);
        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|_| anyhow::anyhow!("encrypt error"))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(nonce.as_ref());
        out.extend_from_slice(ciphertext.as_ref());

        Ok(out)
    }

    /// Decrypt data using ChaCha20-Poly1305 AEAD
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Decrypt`] if:
    /// - Data is too short to contain a nonce and tag
    /// - Authentication tag verification fails (tampered data or wrong key)
    /// - The nonce does not match the keyed hash of the recovered plaintext
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, SecretError> {
        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(SecretError::Decrypt("data too short for nonce".into()));
        }

        let key = Key::from_slice(self.bytes());
        let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);
        let cipher = ChaCha20Poly1305::new(key);
        let plaintext = cipher
            .decrypt(nonce, &data[NONCE_SIZE..])
            .map_err(|_| SecretError::Decrypt("authentication failed".into()))?;

        if self.nonce_for(&plaintext)[..] != data[..NONCE_SIZE] {
            return Err(SecretError::Decrypt(
                "nonce verification failed - data corrupted".into(),
            ));
        }

        Ok(plaintext)
    }
}
