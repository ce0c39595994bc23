//! Chromium `.pak` resource archive reader/writer
//!
//! A pak file bundles opaque resources keyed by 16-bit ids behind a flat index.
//! All integers are little-endian.
//!
//! ``` text
//!     1. Header : From Start 0
//!         +----------------------+----------------+-----------------------+
//!         |   version            |    4 bytes     |   passed through      |
//!         |   resource_count     |    4 bytes     |   N                   |
//!         |   encoding           |    1 byte      |   0=bin 1=utf8 2=utf16|
//!         +----------------------+----------------+-----------------------+
//!
//!     2. Index : From Start 9
//!         for 0 to N + 1
//!             +---------------------+------------------------------------+
//!             |   id                |   2 bytes (0 only on last entry)   |
//!             |   offset            |   4 bytes (absolute)               |
//!             +---------------------+------------------------------------+
//!
//!     3. Payload : From Start 9 + 6 * (N + 1)
//!         resources back-to-back, each running up to the next entry's offset
//! ```

mod lister;
mod options;
mod reader;
mod table;
mod types;
mod writer;

pub use lister::list_pak_entries;
pub use options::PakReadOptions;
pub use reader::{PakReader, parse_pak_bytes, read_pak, read_pak_from};
pub use table::ResourceTable;
pub use types::{PakEntryInfo, PakIndex, ResourceId, TextEncoding};
pub use writer::{write_pak, write_pak_to};

/// Size of the fixed header (4 + 4 + 1 bytes)
pub const HEADER_SIZE: u32 = 9;

/// Size of each index entry (2 + 4 bytes)
pub const INDEX_ENTRY_SIZE: u32 = 6;

/// Offset of the first payload byte for an archive of `count` resources.
///
/// The index holds one extra entry for the terminal sentinel.
#[must_use]
pub const fn data_start(count: u32) -> u64 {
    HEADER_SIZE as u64 + INDEX_ENTRY_SIZE as u64 * (count as u64 + 1)
}
