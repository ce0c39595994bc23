//! Types for Chromium PAK file handling

use std::fmt;
use std::num::NonZeroU16;

use crate::error::Error;

/// Identifier of a resource in a PAK archive.
///
/// Id 0 marks the end of the index on disk, so it can never name a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(NonZeroU16);

impl ResourceId {
    /// Create an id, returning `None` for the reserved value 0
    #[must_use]
    pub const fn new(id: u16) -> Option<Self> {
        match NonZeroU16::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw identifier
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for ResourceId {
    type Error = Error;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(Error::ReservedResourceId)
    }
}

impl From<ResourceId> for u16 {
    fn from(id: ResourceId) -> Self {
        id.get()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Text encoding tag stored in the PAK header
///
/// The codec never interprets it. Tag bytes other than 0-2 are kept in
/// `Unknown` so they survive a read/write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Binary,
    Utf8,
    Utf16,
    /// Any tag above 2
    Unknown(u8),
}

impl TextEncoding {
    /// Parse the encoding from the header byte
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => TextEncoding::Binary,
            1 => TextEncoding::Utf8,
            2 => TextEncoding::Utf16,
            other => TextEncoding::Unknown(other),
        }
    }

    /// Convert the encoding to its header byte for writing
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            TextEncoding::Binary => 0,
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 => 2,
            TextEncoding::Unknown(byte) => byte,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Binary => "binary",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Unknown(_) => "unknown",
        }
    }
}

/// Fixed header at the start of a PAK file
#[derive(Debug, Clone, Copy)]
pub(crate) struct PakHeader {
    pub version: u32,
    pub resource_count: u32,
    pub encoding: TextEncoding,
}

/// Entry of the on-disk index, as read from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexEntry {
    /// Start of a resource's payload
    Resource { id: ResourceId, offset: u32 },
    /// Id 0: end offset of the last payload
    Terminal { offset: u32 },
}

impl IndexEntry {
    pub fn from_raw(id: u16, offset: u32) -> Self {
        match ResourceId::new(id) {
            Some(id) => IndexEntry::Resource { id, offset },
            None => IndexEntry::Terminal { offset },
        }
    }

    pub fn offset(self) -> u32 {
        match self {
            IndexEntry::Resource { offset, .. } | IndexEntry::Terminal { offset } => offset,
        }
    }
}

/// Location of one resource inside a PAK file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakEntryInfo {
    /// Resource id
    pub id: ResourceId,
    /// Absolute offset of the payload
    pub offset: u32,
    /// Payload length, taken from the distance to the next entry
    pub size: u32,
}

/// Header and index of a PAK file, without payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakIndex {
    /// Format version from the header
    pub version: u32,
    /// Encoding tag from the header
    pub encoding: TextEncoding,
    /// Resources in index order
    pub entries: Vec<PakEntryInfo>,
    /// Offset stored in the terminal sentinel
    pub end_offset: u32,
}

impl PakIndex {
    /// Number of resources listed in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find a resource's location by id
    #[must_use]
    pub fn find(&self, id: ResourceId) -> Option<&PakEntryInfo> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// File size a well-formed archive with this index must have
    #[must_use]
    pub fn total_size(&self) -> u64 {
        u64::from(self.end_offset)
    }
}
