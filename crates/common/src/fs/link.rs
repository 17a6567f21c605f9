use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::linked_data::Cid;

/// A named edge from a links-node to a child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub cid: Cid,
    pub is_file: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

// NOTE: a BTreeMap keeps the serialized node byte-for-byte stable,
//  which content addressing depends on
pub type Links = BTreeMap<String, Link>;

impl Link {
    pub fn new(name: impl Into<String>, cid: Cid, is_file: bool, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            cid,
            is_file,
            size,
        }
    }

    pub fn file(name: impl Into<String>, cid: Cid, size: u64) -> Self {
        Self::new(name, cid, true, Some(size))
    }

    pub fn dir(name: impl Into<String>, cid: Cid) -> Self {
        Self::new(name, cid, false, None)
    }

    pub fn is_dir(&self) -> bool {
        !self.is_file
    }
}
