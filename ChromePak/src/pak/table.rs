//! In-memory resource table
//!
//! Provides the editing operations used before writing a PAK:
//! - Insert, update, remove resources by id
//! - Ordered iteration (ascending id, the on-disk order)

use std::collections::BTreeMap;
use std::collections::btree_map;

use super::{ResourceId, TextEncoding};

/// The contents of a PAK archive
///
/// Resources are kept in a `BTreeMap`, so iteration always yields ids in
/// ascending order and two equal tables serialize to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    /// Format version, written back unchanged
    pub version: u32,
    /// Encoding tag, written back unchanged
    pub encoding: TextEncoding,
    /// Resource payloads by id
    pub resources: BTreeMap<ResourceId, Vec<u8>>,
}

impl ResourceTable {
    /// Create an empty table (version 0, binary encoding)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the format version
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the encoding tag
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Add or replace a resource
    ///
    /// # Returns
    /// The previous payload if the id was already present
    pub fn insert(&mut self, id: ResourceId, data: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.resources.insert(id, data.into())
    }

    /// Get a resource's payload
    #[must_use]
    pub fn get(&self, id: ResourceId) -> Option<&[u8]> {
        self.resources.get(&id).map(Vec::as_slice)
    }

    /// Get a resource's payload for in-place editing
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Vec<u8>> {
        self.resources.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    /// Remove a resource by id
    ///
    /// # Returns
    /// The removed payload if found, `None` otherwise
    pub fn remove(&mut self, id: ResourceId) -> Option<Vec<u8>> {
        self.resources.remove(&id)
    }

    /// Remove all resources, keeping version and encoding
    pub fn clear(&mut self) {
        self.resources.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resource ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.resources.keys().copied()
    }

    /// Resources in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &[u8])> + '_ {
        self.resources.iter().map(|(id, data)| (*id, data.as_slice()))
    }

    /// Total length of all payloads in bytes
    #[must_use]
    pub fn payload_size(&self) -> u64 {
        self.resources.values().map(|data| data.len() as u64).sum()
    }
}

impl FromIterator<(ResourceId, Vec<u8>)> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = (ResourceId, Vec<u8>)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Extend<(ResourceId, Vec<u8>)> for ResourceTable {
    fn extend<I: IntoIterator<Item = (ResourceId, Vec<u8>)>>(&mut self, iter: I) {
        self.resources.extend(iter);
    }
}

impl IntoIterator for ResourceTable {
    type Item = (ResourceId, Vec<u8>);
    type IntoIter = btree_map::IntoIter<ResourceId, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}
