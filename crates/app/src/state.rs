use std::sync::Arc;
use std::time::Duration;
use std::{fs, path::PathBuf};

use common::crypto::KeyStoreError;
use common::fs::{FileSystem, FileSystemConfig, FileSystemVersion, FsContext, FsError};
use common::linked_data::Cid;
use common::store::{FsStore, MemoryDirectory, RetryPolicy, RetryingStore, StoreError};
use serde::{Deserialize, Serialize};

use crate::keys::FileKeyStore;

pub const APP_NAME: &str = "dagfs";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ROOT_FILE_NAME: &str = "root";
pub const KEYS_DIR_NAME: &str = "keys";
pub const BLOBS_DIR_NAME: &str = "blobs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the key that opens the private tree
    #[serde(default = "default_key_name")]
    pub key_name: String,
    /// Format version written into new nodes
    #[serde(default)]
    pub version: FileSystemVersion,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per block read or write before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay unit; attempt n waits (n - 1) * base_delay_ms
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_key_name() -> String {
    common::fs::DEFAULT_KEY_NAME.to_string()
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_base_delay_ms() -> u64 {
    RetryPolicy::default().base_delay.as_millis() as u64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_name: default_key_name(),
            version: FileSystemVersion::latest(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the dagfs directory (~/.dagfs)
    pub dagfs_dir: PathBuf,
    /// Path to the block store
    pub blobs_path: PathBuf,
    /// Path to the key files
    pub keys_path: PathBuf,
    /// Path to the file holding the current root CID
    pub root_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the dagfs directory path (custom or default ~/.dagfs)
    pub fn dagfs_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory and provision the private tree key
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let dagfs_dir = Self::dagfs_dir(custom_path)?;

        if dagfs_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&dagfs_dir)?;

        let blobs_path = dagfs_dir.join(BLOBS_DIR_NAME);
        fs::create_dir_all(&blobs_path)?;

        let config = config.unwrap_or_default();
        let keys_path = dagfs_dir.join(KEYS_DIR_NAME);
        FileKeyStore::new(&keys_path).create(&config.key_name)?;

        let config_path = dagfs_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // no root until the first sync
        let root_path = dagfs_dir.join(ROOT_FILE_NAME);

        Ok(Self {
            dagfs_dir,
            blobs_path,
            keys_path,
            root_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the dagfs directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dagfs_dir = Self::dagfs_dir(custom_path)?;

        if !dagfs_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let blobs_path = dagfs_dir.join(BLOBS_DIR_NAME);
        let keys_path = dagfs_dir.join(KEYS_DIR_NAME);
        let root_path = dagfs_dir.join(ROOT_FILE_NAME);
        let config_path = dagfs_dir.join(CONFIG_FILE_NAME);

        if !blobs_path.exists() {
            return Err(StateError::MissingFile("blobs/".to_string()));
        }
        if !keys_path.exists() {
            return Err(StateError::MissingFile("keys/".to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile("config.toml".to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            dagfs_dir,
            blobs_path,
            keys_path,
            root_path,
            config_path,
            config,
        })
    }

    pub fn fs_config(&self) -> FileSystemConfig {
        FileSystemConfig {
            key_name: Some(self.config.key_name.clone()),
            version: Some(self.config.version),
        }
    }

    /// Services backed by this directory: a retrying on-disk block store
    ///  and the key files
    pub async fn fs_context(&self) -> Result<FsContext, StateError> {
        let store = FsStore::open(&self.blobs_path).await?;
        let store = RetryingStore::new(store, self.config.retry.policy());
        Ok(FsContext::new(
            Arc::new(store),
            Arc::new(FileKeyStore::new(&self.keys_path)),
            Arc::new(MemoryDirectory::new()),
        ))
    }

    /// The root CID from the last sync, if there has been one
    pub fn read_root(&self) -> Result<Option<Cid>, StateError> {
        if !self.root_path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.root_path)?;
        let cid = raw
            .trim()
            .parse::<Cid>()
            .map_err(|e| StateError::InvalidRoot(e.to_string()))?;
        Ok(Some(cid))
    }

    pub fn write_root(&self, cid: &Cid) -> Result<(), StateError> {
        fs::write(&self.root_path, cid.to_string())?;
        Ok(())
    }

    /// Open the file system at the recorded root, or an empty one
    ///  if nothing has been synced yet
    pub async fn open(&self) -> Result<FileSystem, StateError> {
        let ctx = self.fs_context().await?;
        let config = self.fs_config();
        match self.read_root()? {
            None => Ok(FileSystem::empty(&ctx, &config).await?),
            Some(cid) => FileSystem::from_cid(&ctx, &cid, &config)
                .await?
                .ok_or(StateError::UnresolvableRoot(cid)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("dagfs directory not initialized. Run 'dagfs init' first")]
    NotInitialized,

    #[error("dagfs directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid root record: {0}")]
    InvalidRoot(String),

    #[error("root {0} does not resolve to a file system with the configured key")]
    UnresolvableRoot(Cid),

    #[error("key error: {0}")]
    Key(#[from] KeyStoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
