//! Shared test utilities for file system integration tests
#![allow(dead_code)]

use std::sync::Arc;

use common::crypto::{MemoryKeyStore, Secret};
use common::fs::{FileSystem, FileSystemConfig, FsContext, DEFAULT_KEY_NAME};
use common::store::{FsStore, MemoryDirectory};
use tempfile::TempDir;

/// Everything a test needs to reopen or inspect a file system
pub struct TestEnv {
    pub ctx: FsContext,
    pub store: Arc<FsStore>,
    pub keys: MemoryKeyStore,
    pub key: Secret,
    pub config: FileSystemConfig,
}

/// Set up a fresh file system over an on-disk block store,
///  with the default key provisioned
pub async fn setup_test_env() -> (FileSystem, TestEnv, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FsStore::open(&temp_dir.path().join("blobs")).await.unwrap());

    let keys = MemoryKeyStore::new();
    let key = keys.generate(DEFAULT_KEY_NAME).unwrap();

    let ctx = FsContext::new(
        store.clone(),
        Arc::new(keys.clone()),
        Arc::new(MemoryDirectory::new()),
    );
    let config = FileSystemConfig::default();
    let fs = FileSystem::empty(&ctx, &config).await.unwrap();

    (
        fs,
        TestEnv {
            ctx,
            store,
            keys,
            key,
            config,
        },
        temp_dir,
    )
}

/// Open a second context over the same blocks, with a different key
pub fn context_with_key(env: &TestEnv, name: &str, key: Secret) -> FsContext {
    let keys = MemoryKeyStore::new();
    keys.insert(name, key).unwrap();
    FsContext::new(
        env.store.clone(),
        Arc::new(keys),
        env.ctx.directory.clone(),
    )
}
