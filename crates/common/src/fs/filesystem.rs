use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::crypto::{KeyStore, Secret};
use crate::linked_data::Cid;
use crate::store::{Directory, ObjectStore};

use super::link::{Link, Links};
use super::path::{self, Namespace, PRIVATE, PUBLIC};
use super::resolver::Resolver;
use super::tree::{Entry, PrivateTree, PublicTree};
use super::version::FileSystemVersion;
use super::FsError;

/// Key name the private tree key is looked up under unless configured
pub const DEFAULT_KEY_NAME: &str = "filesystem-root";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemConfig {
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub version: Option<FileSystemVersion>,
}

impl FileSystemConfig {
    pub fn key_name(&self) -> &str {
        self.key_name.as_deref().unwrap_or(DEFAULT_KEY_NAME)
    }

    pub fn version(&self) -> FileSystemVersion {
        self.version.unwrap_or_default()
    }
}

/// The services a file system talks to
#[derive(Debug, Clone)]
pub struct FsContext {
    pub store: Arc<dyn ObjectStore>,
    pub keys: Arc<dyn KeyStore>,
    pub directory: Arc<dyn Directory>,
}

impl FsContext {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        keys: Arc<dyn KeyStore>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            store,
            keys,
            directory,
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.store.clone())
    }

    async fn key(&self, config: &FileSystemConfig) -> Result<Secret, FsError> {
        Ok(self.keys.get_key_by_name(config.key_name()).await?)
    }
}

/// One of the two trees, as handed to an operation by the router
#[derive(Debug, Clone)]
pub enum TreeHandle {
    Public(PublicTree),
    Private(PrivateTree),
}

impl TreeHandle {
    pub fn namespace(&self) -> Namespace {
        match self {
            TreeHandle::Public(_) => Namespace::Public,
            TreeHandle::Private(_) => Namespace::Private,
        }
    }

    pub async fn ls(&self, path: &str) -> Result<Links, FsError> {
        match self {
            TreeHandle::Public(tree) => tree.ls(path).await,
            TreeHandle::Private(tree) => tree.ls(path).await,
        }
    }

    pub async fn mkdir(&self, path: &str) -> Result<TreeHandle, FsError> {
        Ok(match self {
            TreeHandle::Public(tree) => TreeHandle::Public(tree.mkdir(path).await?),
            TreeHandle::Private(tree) => TreeHandle::Private(tree.mkdir(path).await?),
        })
    }

    pub async fn add(&self, path: &str, content: &[u8]) -> Result<TreeHandle, FsError> {
        Ok(match self {
            TreeHandle::Public(tree) => TreeHandle::Public(tree.add(path, content).await?),
            TreeHandle::Private(tree) => TreeHandle::Private(tree.add(path, content).await?),
        })
    }

    pub async fn cat(&self, path: &str) -> Result<Option<Bytes>, FsError> {
        match self {
            TreeHandle::Public(tree) => tree.cat(path).await,
            TreeHandle::Private(tree) => tree.cat(path).await,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Entry<TreeHandle>, FsError> {
        Ok(match self {
            TreeHandle::Public(tree) => tree.get(path).await?.map(TreeHandle::Public),
            TreeHandle::Private(tree) => tree.get(path).await?.map(TreeHandle::Private),
        })
    }
}

/// Results the router knows how to fold back into the file system.
///  Only a tree result replaces anything.
pub trait TreeOutcome {
    fn tree(&self) -> Option<&TreeHandle> {
        None
    }
}

impl TreeOutcome for TreeHandle {
    fn tree(&self) -> Option<&TreeHandle> {
        Some(self)
    }
}

impl TreeOutcome for Links {}
impl TreeOutcome for Option<Bytes> {}
impl TreeOutcome for Entry<TreeHandle> {}

/// A user's file system: a root node linking one public and one
///  private tree.
///
/// ```text
/// root
///  ├── public  -> plaintext DAG-CBOR tree
///  ├── private -> encrypted tree, one key for every node and file
///  └── version
/// ```
///
/// Not safe for concurrent mutation. Callers that share one across tasks
///  must serialize access themselves.
#[derive(Debug)]
pub struct FileSystem {
    ctx: FsContext,
    root: PublicTree,
    public: PublicTree,
    private: PrivateTree,
    key: Secret,
}

impl FileSystem {
    /// A fresh file system with empty trees. Nothing is written until `sync`.
    pub async fn empty(ctx: &FsContext, config: &FileSystemConfig) -> Result<Self, FsError> {
        let key = ctx.key(config).await?;
        let resolver = ctx.resolver();
        let version = config.version();
        Ok(Self {
            ctx: ctx.clone(),
            root: PublicTree::empty(resolver.clone(), version),
            public: PublicTree::empty(resolver.clone(), version),
            private: PrivateTree::empty(resolver, key.clone(), version),
            key,
        })
    }

    /// Open a file system from its root CID.
    ///
    /// Returns `Ok(None)` if the root, or either of its subtrees, cannot be
    ///  resolved: missing, malformed, or not decryptable with the configured
    ///  key. Store and key service failures are still errors.
    pub async fn from_cid(
        ctx: &FsContext,
        cid: &Cid,
        config: &FileSystemConfig,
    ) -> Result<Option<Self>, FsError> {
        let resolver = ctx.resolver();

        let root = match absorb(cid, PublicTree::from_cid(resolver.clone(), *cid).await)? {
            Some(root) => root,
            None => return Ok(None),
        };
        tracing::debug!("from_cid: root {} at version {}", cid, root.version());

        let Some(public_link) = dir_link(&root, PUBLIC) else {
            tracing::warn!("from_cid: root {} has no public tree", cid);
            return Ok(None);
        };
        let public = match absorb(
            &public_link.cid,
            PublicTree::from_cid(resolver.clone(), public_link.cid).await,
        )? {
            Some(tree) => tree,
            None => return Ok(None),
        };

        let key = ctx.key(config).await?;
        let Some(private_link) = dir_link(&root, PRIVATE) else {
            tracing::warn!("from_cid: root {} has no private tree", cid);
            return Ok(None);
        };
        let private = match absorb(
            &private_link.cid,
            PrivateTree::from_cid_with_key(resolver, private_link.cid, key.clone()).await,
        )? {
            Some(tree) => tree,
            None => return Ok(None),
        };

        Ok(Some(Self {
            ctx: ctx.clone(),
            root,
            public,
            private,
            key,
        }))
    }

    /// Look up a user's published root and open it
    pub async fn for_user(
        ctx: &FsContext,
        username: &str,
        config: &FileSystemConfig,
    ) -> Result<Option<Self>, FsError> {
        let cid = ctx.directory.resolve_root_cid(username).await?;
        tracing::debug!("for_user: {} -> {}", username, cid);
        Self::from_cid(ctx, &cid, config).await
    }

    /// Adopt an existing plaintext tree as the public side of a new
    ///  file system, with a fresh root and an empty private tree.
    pub async fn upgrade_public_cid(
        ctx: &FsContext,
        cid: &Cid,
        config: &FileSystemConfig,
    ) -> Result<Self, FsError> {
        let mut fs = Self::empty(ctx, config).await?;
        fs.public = PublicTree::from_cid(ctx.resolver(), *cid).await?;
        tracing::info!("upgrade_public_cid: adopted {} as public tree", cid);
        Ok(fs)
    }

    pub fn public(&self) -> &PublicTree {
        &self.public
    }

    pub fn private(&self) -> &PrivateTree {
        &self.private
    }

    pub fn key(&self) -> &Secret {
        &self.key
    }

    /// Root CID as last synced, if nothing has changed since
    pub fn root_cid(&self) -> Option<Cid> {
        if self.public.is_dirty() || self.private.is_dirty() {
            return None;
        }
        self.root.cid()
    }

    /// Hand the tree `path` addresses to `op`, along with the path inside it
    pub async fn run_on_tree<F, Fut, R>(&self, path: &str, op: F) -> Result<R, FsError>
    where
        F: FnOnce(TreeHandle, String) -> Fut,
        Fut: Future<Output = Result<R, FsError>>,
    {
        let (namespace, rest) = path::route(path)?;
        let tree = match namespace {
            Namespace::Public => TreeHandle::Public(self.public.clone()),
            Namespace::Private => TreeHandle::Private(self.private.clone()),
        };
        op(tree, rest).await
    }

    /// Like [`FileSystem::run_on_tree`], but a tree returned by `op`
    ///  replaces the one it was run on
    pub async fn run_on_tree_mut<F, Fut, R>(&mut self, path: &str, op: F) -> Result<R, FsError>
    where
        F: FnOnce(TreeHandle, String) -> Fut,
        Fut: Future<Output = Result<R, FsError>>,
        R: TreeOutcome,
    {
        let result = self.run_on_tree(path, op).await?;
        match result.tree() {
            Some(TreeHandle::Public(tree)) => self.public = tree.clone(),
            Some(TreeHandle::Private(tree)) => self.private = tree.clone(),
            None => {}
        }
        Ok(result)
    }

    pub async fn ls(&self, path: &str) -> Result<Links, FsError> {
        self.run_on_tree(path, |tree, rest| async move { tree.ls(&rest).await })
            .await
    }

    pub async fn cat(&self, path: &str) -> Result<Option<Bytes>, FsError> {
        self.run_on_tree(path, |tree, rest| async move { tree.cat(&rest).await })
            .await
    }

    pub async fn get(&self, path: &str) -> Result<Entry<TreeHandle>, FsError> {
        self.run_on_tree(path, |tree, rest| async move { tree.get(&rest).await })
            .await
    }

    /// Create directories along `path` and sync. Returns the new root CID.
    pub async fn mkdir(&mut self, path: &str) -> Result<Cid, FsError> {
        self.run_on_tree_mut(path, |tree, rest| async move { tree.mkdir(&rest).await })
            .await?;
        self.sync().await
    }

    /// Write a file at `path` and sync. Returns the new root CID.
    pub async fn add(&mut self, path: &str, content: &[u8]) -> Result<Cid, FsError> {
        self.run_on_tree_mut(path, |tree, rest| async move {
            tree.add(&rest, content).await
        })
        .await?;
        self.sync().await
    }

    /// Persist both trees and a root linking them. Returns the root CID.
    ///  Safe to repeat: unchanged trees are not rewritten.
    pub async fn sync(&mut self) -> Result<Cid, FsError> {
        let public = self.public.put().await?;
        let private = self.private.put().await?;
        self.root = self
            .root
            .set_link(Link::dir(PUBLIC, public))
            .set_link(Link::dir(PRIVATE, private));
        let cid = self.root.put().await?;
        tracing::info!("sync: root {} (public {}, private {})", cid, public, private);
        Ok(cid)
    }

    /// Sync, then list every block the private tree needs, followed by the root
    pub async fn pin_list(&mut self) -> Result<Vec<Cid>, FsError> {
        let root = self.sync().await?;
        let mut pins = self.private.pin_list().await?;
        pins.insert(root);
        Ok(pins.into_vec())
    }

    /// Sync and publish the root under `username`
    pub async fn publish(&mut self, username: &str) -> Result<Cid, FsError> {
        let cid = self.sync().await?;
        self.ctx.directory.update_root(username, cid).await?;
        tracing::info!("publish: {} -> {}", username, cid);
        Ok(cid)
    }
}

fn dir_link(root: &PublicTree, name: &str) -> Option<Link> {
    root.direct_link(name).filter(|link| link.is_dir()).cloned()
}

/// Turn "this CID is not a usable tree" into `None`, logging why
fn absorb<T>(cid: &Cid, result: Result<T, FsError>) -> Result<Option<T>, FsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_unresolvable() => {
            tracing::warn!("from_cid: could not resolve {}: {}", cid, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
