use std::collections::HashSet;

use crate::linked_data::Cid;

/// Every block a tree needs kept alive, in the order the walk found them.
///  Inserting a CID twice keeps the first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pins {
    order: Vec<Cid>,
    seen: HashSet<Cid>,
}

impl Pins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the CID was already pinned
    pub fn insert(&mut self, cid: Cid) -> bool {
        if !self.seen.insert(cid) {
            return false;
        }
        self.order.push(cid);
        true
    }

    pub fn extend<I>(&mut self, cids: I)
    where
        I: IntoIterator<Item = Cid>,
    {
        for cid in cids {
            self.insert(cid);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.seen.contains(cid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cid> {
        self.order.iter()
    }

    pub fn into_vec(self) -> Vec<Cid> {
        self.order
    }
}

impl IntoIterator for Pins {
    type Item = Cid;
    type IntoIter = std::vec::IntoIter<Cid>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}
