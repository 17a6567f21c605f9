use std::collections::BTreeMap;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::crypto::Secret;
use crate::linked_data::{cid_for, Cid, LD_RAW_CODEC};

use super::link::{Link, Links};
use super::path;
use super::pins::Pins;
use super::resolver::Resolver;
use super::sealer::{Plain, Sealed, Sealer};
use super::version::{FileSystemVersion, VERSION_LINK};
use super::FsError;

pub type PublicTree = DagTree<Plain>;
pub type PrivateTree = DagTree<Sealed>;

/// A file resolved out of a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub cid: Cid,
    pub content: Bytes,
}

/// What lives at a path
#[derive(Debug, Clone)]
pub enum Entry<T> {
    Directory(T),
    File(File),
    Absent,
}

impl<T> Entry<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Entry<U> {
        match self {
            Entry::Directory(tree) => Entry::Directory(f(tree)),
            Entry::File(file) => Entry::File(file),
            Entry::Absent => Entry::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Entry::Absent)
    }
}

enum Child<S: Sealer> {
    Dir(DagTree<S>),
    File(Link),
}

enum Leaf {
    Dir,
    File(Link),
}

/// An immutable, lazily persisted directory tree over an object store.
///
/// Every mutation returns a new tree and leaves `self` untouched. Changed
///  directories are held in memory until [`DagTree::put`] writes them out
///  bottom-up; nothing reaches the store before that except file bodies.
#[derive(Debug, Clone)]
pub struct DagTree<S: Sealer> {
    resolver: Resolver,
    sealer: S,
    version: FileSystemVersion,
    // CID of this node as last written; None while it has unsaved changes
    cid: Option<Cid>,
    // children as last written, without the version link
    links: Links,
    // child directories changed since the last put; these win over `links`
    dirty: BTreeMap<String, DagTree<S>>,
}

impl DagTree<Plain> {
    pub fn empty(resolver: Resolver, version: FileSystemVersion) -> Self {
        Self::new(resolver, Plain, version)
    }

    pub async fn from_cid(resolver: Resolver, cid: Cid) -> Result<Self, FsError> {
        Self::load(resolver, Plain, cid).await
    }
}

impl DagTree<Sealed> {
    pub fn empty(resolver: Resolver, key: Secret, version: FileSystemVersion) -> Self {
        Self::new(resolver, Sealed::new(key), version)
    }

    pub async fn from_cid_with_key(
        resolver: Resolver,
        cid: Cid,
        key: Secret,
    ) -> Result<Self, FsError> {
        Self::load(resolver, Sealed::new(key), cid).await
    }
}

impl<S: Sealer> DagTree<S> {
    fn new(resolver: Resolver, sealer: S, version: FileSystemVersion) -> Self {
        Self {
            resolver,
            sealer,
            version,
            cid: None,
            links: Links::new(),
            dirty: BTreeMap::new(),
        }
    }

    async fn load(resolver: Resolver, sealer: S, cid: Cid) -> Result<Self, FsError> {
        let mut links = resolver.read_links(&sealer, &cid).await?;
        let version = resolver.read_version(&sealer, &links).await?;
        links.remove(VERSION_LINK);
        Ok(Self {
            resolver,
            sealer,
            version,
            cid: Some(cid),
            links,
            dirty: BTreeMap::new(),
        })
    }

    /// CID as last written, or None if there are unsaved changes
    pub fn cid(&self) -> Option<Cid> {
        self.cid
    }

    pub fn version(&self) -> FileSystemVersion {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.cid.is_none()
    }

    pub fn sealer(&self) -> &S {
        &self.sealer
    }

    /// A link on this node as last written
    pub fn direct_link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    /// Place a link directly on this node, replacing any entry of that name
    pub fn set_link(&self, link: Link) -> Self {
        let unchanged =
            self.links.get(&link.name) == Some(&link) && !self.dirty.contains_key(&link.name);
        let mut next = self.clone();
        if unchanged {
            return next;
        }
        next.dirty.remove(&link.name);
        next.links.insert(link.name.clone(), link);
        next.cid = None;
        next
    }

    /// List the entries of the directory at `path`
    pub async fn ls(&self, path: &str) -> Result<Links, FsError> {
        let segments = path::split(path);
        self.walk(&segments).await?.listing()
    }

    /// Ensure every directory along `path` exists
    pub async fn mkdir(&self, path: &str) -> Result<Self, FsError> {
        let segments = path::split(path);
        check_names(&segments)?;
        if segments.is_empty() {
            return Ok(self.clone());
        }
        tracing::debug!("mkdir: {}", path);
        self.apply(&segments, 0, &Leaf::Dir).await
    }

    /// Write `content` as a file at `path`, creating parents as needed.
    ///  The file body is stored immediately; directories wait for `put`.
    pub async fn add(&self, path: &str, content: &[u8]) -> Result<Self, FsError> {
        let segments = path::split(path);
        check_names(&segments)?;
        let Some(name) = segments.last() else {
            return Err(FsError::InvalidPath(path.to_string()));
        };
        let cid = self.resolver.write_file(&self.sealer, content).await?;
        tracing::debug!("add: {} -> {}", path, cid);
        let leaf = Leaf::File(Link::file(*name, cid, content.len() as u64));
        self.apply(&segments, 0, &leaf).await
    }

    /// Read the file at `path`. Returns None if nothing is there.
    pub async fn cat(&self, path: &str) -> Result<Option<Bytes>, FsError> {
        let segments = path::split(path);
        let Some((name, parents)) = segments.split_last() else {
            return Err(FsError::NotAFile(path.to_string()));
        };
        match self.walk(parents).await?.child(name).await? {
            None => Ok(None),
            Some(Child::Dir(_)) => Err(FsError::NotAFile(path.to_string())),
            Some(Child::File(link)) => self.read_link(&link).await.map(Some),
        }
    }

    /// Resolve whatever is at `path`
    pub async fn get(&self, path: &str) -> Result<Entry<Self>, FsError> {
        let segments = path::split(path);
        let Some((name, parents)) = segments.split_last() else {
            return Ok(Entry::Directory(self.clone()));
        };
        match self.walk(parents).await?.child(name).await? {
            None => Ok(Entry::Absent),
            Some(Child::Dir(tree)) => Ok(Entry::Directory(tree)),
            Some(Child::File(link)) => {
                let content = self.read_link(&link).await?;
                Ok(Entry::File(File {
                    cid: link.cid,
                    content,
                }))
            }
        }
    }

    /// Write every unsaved node bottom-up and return this node's CID.
    ///  A tree with no changes returns its existing CID without writing.
    pub fn put(&mut self) -> BoxFuture<'_, Result<Cid, FsError>> {
        Box::pin(async move {
            if let Some(cid) = self.cid {
                return Ok(cid);
            }

            let mut written = Vec::with_capacity(self.dirty.len());
            for (name, child) in self.dirty.iter_mut() {
                let cid = child.put().await?;
                written.push(Link::dir(name.clone(), cid));
            }
            self.dirty.clear();
            for link in written {
                self.links.insert(link.name.clone(), link);
            }

            let version = self
                .resolver
                .write_version(&self.sealer, self.version)
                .await?;
            let mut links = self.links.clone();
            links.insert(VERSION_LINK.to_string(), version);
            let cid = self.resolver.write_links(&self.sealer, &links).await?;

            tracing::debug!("put: wrote node {} ({} entries)", cid, self.links.len());
            self.cid = Some(cid);
            Ok(cid)
        })
    }

    /// The CID this tree has, or will have once put.
    ///  Computed without touching the store.
    pub fn current_cid(&self) -> Result<Cid, FsError> {
        if let Some(cid) = self.cid {
            return Ok(cid);
        }
        let mut links = self.listing()?;
        let content = self.version.as_str().as_bytes();
        let sealed = self.sealer.seal_blob(content)?;
        links.insert(
            VERSION_LINK.to_string(),
            Link::file(
                VERSION_LINK,
                cid_for(LD_RAW_CODEC, &sealed),
                content.len() as u64,
            ),
        );
        let (codec, data) = self.sealer.seal_node(&links)?;
        Ok(cid_for(codec, &data))
    }

    /// Every block reachable from the written tree: nodes, version blobs and
    ///  file bodies. Fails with [`FsError::Unsaved`] if there are unsaved changes.
    pub async fn pin_list(&self) -> Result<Pins, FsError> {
        let root = self.cid.ok_or(FsError::Unsaved)?;
        let mut pins = Pins::new();
        let mut pending = vec![root];
        while let Some(cid) = pending.pop() {
            if !pins.insert(cid) {
                continue;
            }
            let links = self.resolver.read_links(&self.sealer, &cid).await?;
            for link in links.values() {
                if link.is_file {
                    pins.insert(link.cid);
                } else {
                    pending.push(link.cid);
                }
            }
        }
        Ok(pins)
    }

    fn listing(&self) -> Result<Links, FsError> {
        let mut links = self.links.clone();
        for (name, child) in &self.dirty {
            links.insert(name.clone(), Link::dir(name.clone(), child.current_cid()?));
        }
        Ok(links)
    }

    async fn read_link(&self, link: &Link) -> Result<Bytes, FsError> {
        self.resolver.read_file(&self.sealer, &link.cid).await
    }

    async fn child(&self, name: &str) -> Result<Option<Child<S>>, FsError> {
        if let Some(tree) = self.dirty.get(name) {
            return Ok(Some(Child::Dir(tree.clone())));
        }
        match self.links.get(name) {
            None => Ok(None),
            Some(link) if link.is_file => Ok(Some(Child::File(link.clone()))),
            Some(link) => {
                let tree = Self::load(self.resolver.clone(), self.sealer.clone(), link.cid).await?;
                Ok(Some(Child::Dir(tree)))
            }
        }
    }

    /// Descend through `segments`, all of which must be directories
    async fn walk(&self, segments: &[&str]) -> Result<Self, FsError> {
        let mut current = self.clone();
        for (i, name) in segments.iter().enumerate() {
            current = match current.child(name).await? {
                Some(Child::Dir(tree)) => tree,
                Some(Child::File(_)) => {
                    return Err(FsError::NotADirectory(path::join(&segments[..=i])))
                }
                None => return Err(FsError::NotFound(path::join(&segments[..=i]))),
            };
        }
        Ok(current)
    }

    fn apply<'a>(
        &'a self,
        segments: &'a [&'a str],
        depth: usize,
        leaf: &'a Leaf,
    ) -> BoxFuture<'a, Result<Self, FsError>> {
        Box::pin(async move {
            let name = segments[depth];
            let at_leaf = depth + 1 == segments.len();

            if let (true, Leaf::File(link)) = (at_leaf, leaf) {
                return Ok(self.set_link(link.clone()));
            }

            let child = match self.child(name).await? {
                Some(Child::Dir(tree)) => tree,
                Some(Child::File(_)) => {
                    return Err(FsError::NotADirectory(path::join(&segments[..=depth])))
                }
                None => Self::new(self.resolver.clone(), self.sealer.clone(), self.version),
            };
            let child = if at_leaf {
                child
            } else {
                child.apply(segments, depth + 1, leaf).await?
            };
            Ok(self.with_child(name, child))
        })
    }

    fn with_child(&self, name: &str, child: Self) -> Self {
        match child.cid {
            // loaded and untouched
            Some(cid) => self.set_link(Link::dir(name, cid)),
            None => {
                let mut next = self.clone();
                next.dirty.insert(name.to_string(), child);
                next.cid = None;
                next
            }
        }
    }
}

fn check_names(segments: &[&str]) -> Result<(), FsError> {
    match segments.iter().find(|name| **name == VERSION_LINK) {
        Some(name) => Err(FsError::ReservedName(name.to_string())),
        None => Ok(()),
    }
}
