//! # ChromePak
//!
//! A pure-Rust library for reading and writing Chromium `.pak` resource
//! archives.
//!
//! A pak bundles opaque byte blobs, each keyed by a 16-bit id, behind a flat
//! index. This crate decodes that layout into a [`ResourceTable`] and encodes
//! a table back into canonical, byte-for-byte deterministic output.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chromepak::pak::{read_pak, write_pak, ResourceId};
//!
//! // Load, patch one resource, and write back
//! let mut table = read_pak("resources.pak")?;
//! let id = ResourceId::new(1001).unwrap();
//! table.insert(id, b"patched".to_vec());
//! write_pak("resources.pak", &table)?;
//!
//! // Inspect the index without loading payloads
//! let index = chromepak::pak::list_pak_entries("resources.pak")?;
//! println!("Found {} resources", index.len());
//! # Ok::<(), chromepak::Error>(())
//! ```
//!
//! ### In-memory encoding
//!
//! ```
//! use chromepak::prelude::*;
//!
//! let mut table = ResourceTable::new().with_encoding(TextEncoding::Utf8);
//! table.insert(ResourceId::new(7).unwrap(), b"a".to_vec());
//!
//! let bytes = table.to_bytes()?;
//! assert_eq!(parse_pak_bytes(&bytes)?, table);
//! # Ok::<(), chromepak::Error>(())
//! ```
//!
//! [`ResourceTable`]: pak::ResourceTable

pub mod error;
pub mod pak;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pak::{
        PakEntryInfo, PakIndex, PakReadOptions, PakReader, ResourceId, ResourceTable,
        TextEncoding, list_pak_entries, parse_pak_bytes, read_pak, read_pak_from, write_pak,
        write_pak_to,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
