use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::Secret;

#[derive(thiserror::Error, Debug)]
pub enum KeyStoreError {
    #[error("no key provisioned under name '{0}'")]
    NotFound(String),
    #[error("key store error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Source of named symmetric keys.
///
/// A file system asks for its private tree key by name once, when it is
///  constructed, and keeps it for its lifetime.
#[async_trait]
pub trait KeyStore: Send + Sync + std::fmt::Debug {
    /// Look up a key by name
    ///
    /// Should fail with `KeyStoreError::NotFound` if no key
    ///  exists under that name.
    async fn get_key_by_name(&self, name: &str) -> Result<Secret, KeyStoreError>;
}

/// In-memory key store, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    inner: Arc<RwLock<HashMap<String, Secret>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision (or replace) a key under `name`
    pub fn insert(&self, name: impl Into<String>, secret: Secret) -> Result<(), KeyStoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| anyhow::anyhow!("failed to acquire write lock: {}", e))?;
        inner.insert(name.into(), secret);
        Ok(())
    }

    /// Provision a fresh random key under `name` and return it
    pub fn generate(&self, name: impl Into<String>) -> Result<Secret, KeyStoreError> {
        let secret = Secret::generate();
        self.insert(name, secret.clone())?;
        Ok(secret)
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get_key_by_name(&self, name: &str) -> Result<Secret, KeyStoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|e| anyhow::anyhow!("failed to acquire read lock: {}", e))?;
        inner
            .get(name)
            .cloned()
            .ok_or_else(|| KeyStoreError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_memory_keystore_lookup() {
        let keys = MemoryKeyStore::new();
        let secret = keys.generate("filesystem-root").unwrap();

        let found = keys.get_key_by_name("filesystem-root").await.unwrap();
        assert_eq!(found, secret);
    }

    #[tokio::test]
    async fn test_memory_keystore_missing() {
        let keys = MemoryKeyStore::new();
        let result = keys.get_key_by_name("nope").await;
        assert!(matches!(result, Err(KeyStoreError::NotFound(name)) if name == "nope"));
    }
}
