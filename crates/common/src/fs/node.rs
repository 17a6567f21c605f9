use serde::{Deserialize, Serialize};

use crate::linked_data::{BlockEncoded, DagCborCodec};

use super::link::Links;

/// The serialized body of a links-node: named links to children,
///  including the reserved `version` link.
///  Always DAG-CBOR encoded, and sealed before storage in a private tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirNode {
    links: Links,
}

impl BlockEncoded<DagCborCodec> for DirNode {}

impl DirNode {
    pub fn new(links: Links) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn into_links(self) -> Links {
        self.links
    }
}

impl From<Links> for DirNode {
    fn from(links: Links) -> Self {
        Self::new(links)
    }
}
