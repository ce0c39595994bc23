//! Error types for `ChromePak`

use thiserror::Error;

/// The error type for `ChromePak` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from the underlying stream or file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The temporary file holding a freshly written archive could not be
    /// moved over its destination.
    #[error("failed to publish PAK file: {0}")]
    Persist(#[from] tempfile::PersistError),

    // ==================== Truncation Errors ====================
    /// The stream ended before a header field or index entry was read.
    #[error("unexpected end of stream while reading {field}")]
    Truncated {
        /// The field that could not be read in full.
        field: String,
    },

    /// The stream ended before a resource payload was read in full.
    #[error("resource {id} is truncated: expected {expected} bytes, got {actual}")]
    ResourceTruncated {
        /// The resource whose payload is short.
        id: u16,
        /// Payload length computed from the index.
        expected: u64,
        /// Bytes actually available.
        actual: u64,
    },

    // ==================== Structural Errors ====================
    /// The last index entry does not carry the reserved identifier 0.
    #[error("terminal sentinel missing: last index entry has id {found}, expected 0")]
    MissingTerminalSentinel {
        /// The identifier found in the terminal position.
        found: u16,
    },

    /// A non-terminal index entry uses the reserved identifier 0.
    #[error("index entry {position} uses reserved resource id 0")]
    ReservedIdInIndex {
        /// Zero-based position of the entry in the index.
        position: usize,
    },

    /// The same identifier appears twice in the index.
    #[error("duplicate resource id in index: {id}")]
    DuplicateResourceId {
        /// The repeated identifier.
        id: u16,
    },

    /// An absolute offset does not match the position implied by the layout.
    #[error("index entry {position} has offset {found}, expected {expected}")]
    InvalidOffset {
        /// Zero-based position of the entry in the index.
        position: usize,
        /// Offset implied by the header and index sizes.
        expected: u32,
        /// Offset stored in the file.
        found: u32,
    },

    /// A resource's offset lies past the offset of the entry that follows it.
    #[error("resource {id} starts at {offset}, past the next entry at {next_offset}")]
    OffsetsNotMonotonic {
        /// The resource whose entry is out of order.
        id: u16,
        /// Its stored offset.
        offset: u32,
        /// The following entry's offset.
        next_offset: u32,
    },

    // ==================== Precondition Errors ====================
    /// Resource id 0 is reserved for the terminal sentinel.
    #[error("resource id 0 is reserved")]
    ReservedResourceId,

    /// The table cannot be addressed with 32-bit counts and offsets.
    #[error("PAK too large: {size} bytes exceeds the 32-bit offset range")]
    PakTooLarge {
        /// Size the archive would need, in bytes (or the resource count).
        size: u64,
    },
}

impl Error {
    /// Returns true for malformed header or index contents.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MissingTerminalSentinel { .. }
                | Error::ReservedIdInIndex { .. }
                | Error::DuplicateResourceId { .. }
                | Error::InvalidOffset { .. }
                | Error::OffsetsNotMonotonic { .. }
        )
    }

    /// Returns true when the stream ended early.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated { .. } | Error::ResourceTruncated { .. })
    }

    /// Maps a short read on `field` to [`Error::Truncated`], passing other
    /// IO errors through unchanged.
    pub(crate) fn from_read(err: std::io::Error, field: impl Into<String>) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated { field: field.into() }
        } else {
            Error::Io(err)
        }
    }
}

/// A specialized Result type for `ChromePak` operations.
pub type Result<T> = std::result::Result<T, Error>;
