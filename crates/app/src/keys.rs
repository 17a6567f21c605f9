use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use common::crypto::{KeyStore, KeyStoreError, Secret};

const KEY_EXTENSION: &str = "key";

/// Keys kept as hex files under a directory, one per name
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, name: &str) -> Result<PathBuf, KeyStoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(anyhow::anyhow!("invalid key name: '{}'", name).into());
        }
        Ok(self.dir.join(format!("{}.{}", name, KEY_EXTENSION)))
    }

    /// Generate and write a new key. Refuses to overwrite an existing one.
    pub fn create(&self, name: &str) -> Result<Secret, KeyStoreError> {
        let path = self.key_path(name)?;
        if path.exists() {
            return Err(anyhow::anyhow!("key '{}' already exists", name).into());
        }
        std::fs::create_dir_all(&self.dir).map_err(anyhow::Error::from)?;
        let secret = Secret::generate();
        std::fs::write(&path, secret.to_hex()).map_err(anyhow::Error::from)?;
        tracing::debug!("FileKeyStore::create: wrote key '{}'", name);
        Ok(secret)
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn get_key_by_name(&self, name: &str) -> Result<Secret, KeyStoreError> {
        let path = self.key_path(name)?;
        let hex = match tokio::fs::read_to_string(&path).await {
            Ok(hex) => hex,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KeyStoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(anyhow::Error::from(e).into()),
        };
        Secret::from_hex(hex.trim())
            .map_err(|e| anyhow::anyhow!("key '{}' is unreadable: {}", name, e).into())
    }
}
