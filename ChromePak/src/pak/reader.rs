//! PAK file reading and parsing
//!
//! The reader is sequential: it never seeks, so any `Read` source works.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::types::{IndexEntry, PakHeader};
use super::{PakEntryInfo, PakIndex, PakReadOptions, ResourceTable, TextEncoding, data_start};
use crate::error::{Error, Result};

/// Upper bound on speculative allocation driven by untrusted header values.
///
/// Index entries beyond this can only be duplicates or reserved ids, and large
/// payloads grow their buffer as bytes actually arrive.
const MAX_PREALLOC: usize = 1 << 16;

/// Read a .pak file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, or any
/// decoding error from [`read_pak_from`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_pak<P: AsRef<Path>>(path: P) -> Result<ResourceTable> {
    let path = path.as_ref();
    tracing::info!("Reading PAK: {}", path.display());
    let file = File::open(path)?;
    PakReader::new(BufReader::new(file)).read()
}

/// Decode a PAK archive from any byte stream with default options
///
/// # Errors
///
/// Returns [`Error::Truncated`] or [`Error::ResourceTruncated`] if the stream
/// ends early, a structural error if the index is malformed, or
/// [`Error::Io`] if the stream itself fails.
///
/// [`Error::Truncated`]: crate::Error::Truncated
/// [`Error::ResourceTruncated`]: crate::Error::ResourceTruncated
/// [`Error::Io`]: crate::Error::Io
pub fn read_pak_from<R: Read>(reader: R) -> Result<ResourceTable> {
    PakReader::new(reader).read()
}

/// Parse PAK data from bytes
///
/// # Errors
///
/// See [`read_pak_from`].
pub fn parse_pak_bytes(data: &[u8]) -> Result<ResourceTable> {
    read_pak_from(data)
}

/// Sequential PAK decoder
///
/// # Example
///
/// ```
/// use chromepak::pak::{PakReadOptions, PakReader, ResourceId, ResourceTable};
///
/// let mut table = ResourceTable::new().with_version(5);
/// table.insert(ResourceId::new(1).unwrap(), b"hello".to_vec());
/// let bytes = table.to_bytes()?;
///
/// let decoded = PakReader::new(bytes.as_slice())
///     .with_options(PakReadOptions::strict())
///     .read()?;
/// assert_eq!(decoded, table);
/// # Ok::<(), chromepak::Error>(())
/// ```
pub struct PakReader<R: Read> {
    reader: R,
    options: PakReadOptions,
}

impl<R: Read> PakReader<R> {
    /// Create a new reader with default (lenient) options
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            options: PakReadOptions::new(),
        }
    }

    /// Set the validation options
    #[must_use]
    pub fn with_options(mut self, options: PakReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the header and index, leaving the stream positioned at the
    /// first payload byte
    ///
    /// # Errors
    /// Returns an error if the header or index is short or malformed.
    pub fn read_index(&mut self) -> Result<PakIndex> {
        let header = self.read_header()?;
        let raw = self.read_index_entries(header.resource_count)?;
        validate_index(&header, &raw, self.options)
    }

    /// Decode the whole archive
    ///
    /// Nothing is returned unless every resource was read in full.
    ///
    /// # Errors
    /// Returns an error if the stream is short, the index is malformed, or
    /// reading fails.
    pub fn read(mut self) -> Result<ResourceTable> {
        let index = self.read_index()?;

        let mut table = ResourceTable::new()
            .with_version(index.version)
            .with_encoding(index.encoding);

        for entry in &index.entries {
            let data = self.read_payload(entry)?;
            tracing::trace!("Read resource {} ({} bytes)", entry.id, data.len());
            table.insert(entry.id, data);
        }

        tracing::debug!(
            "Decoded PAK: {} resources, {} payload bytes",
            table.len(),
            table.payload_size()
        );
        Ok(table)
    }

    /// Read and parse the fixed 9-byte header
    fn read_header(&mut self) -> Result<PakHeader> {
        let version = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, "version"))?;
        let resource_count = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, "resource count"))?;
        let encoding = self
            .reader
            .read_u8()
            .map_err(|e| Error::from_read(e, "encoding"))?;

        let header = PakHeader {
            version,
            resource_count,
            encoding: TextEncoding::from_byte(encoding),
        };
        tracing::debug!(
            "PAK header: version={}, resources={}, encoding={}",
            header.version,
            header.resource_count,
            header.encoding.as_str()
        );
        Ok(header)
    }

    /// Read `count + 1` index entries in stream order
    fn read_index_entries(&mut self, count: u32) -> Result<Vec<IndexEntry>> {
        let total = u64::from(count) + 1;
        let capacity = usize::try_from(total).unwrap_or(usize::MAX).min(MAX_PREALLOC);
        let mut entries = Vec::with_capacity(capacity);

        for position in 0..total {
            let id = self
                .reader
                .read_u16::<LittleEndian>()
                .map_err(|e| Error::from_read(e, format!("index entry {position}")))?;
            let offset = self
                .reader
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::from_read(e, format!("index entry {position}")))?;
            entries.push(IndexEntry::from_raw(id, offset));
        }

        Ok(entries)
    }

    /// Read exactly `entry.size` bytes
    fn read_payload(&mut self, entry: &PakEntryInfo) -> Result<Vec<u8>> {
        let expected = u64::from(entry.size);
        let mut data = Vec::with_capacity((entry.size as usize).min(MAX_PREALLOC));
        self.reader.by_ref().take(expected).read_to_end(&mut data)?;

        let actual = data.len() as u64;
        if actual != expected {
            tracing::warn!(
                "Resource {} truncated: expected {} bytes, got {}",
                entry.id,
                expected,
                actual
            );
            return Err(Error::ResourceTruncated {
                id: entry.id.get(),
                expected,
                actual,
            });
        }
        Ok(data)
    }
}

/// Check the raw index and turn it into resource locations
fn validate_index(
    header: &PakHeader,
    raw: &[IndexEntry],
    options: PakReadOptions,
) -> Result<PakIndex> {
    let Some((&terminal, resources)) = raw.split_last() else {
        // read_index_entries always reads at least the terminal entry
        return Err(Error::Truncated {
            field: "index entry 0".to_string(),
        });
    };

    let end_offset = match terminal {
        IndexEntry::Terminal { offset } => offset,
        IndexEntry::Resource { id, .. } => {
            tracing::warn!("PAK index has no terminal sentinel (last id {})", id);
            return Err(Error::MissingTerminalSentinel { found: id.get() });
        }
    };

    if options.strict_offsets {
        let expected = data_start(header.resource_count);
        let found = raw[0].offset();
        if u64::from(found) != expected {
            return Err(Error::InvalidOffset {
                position: 0,
                expected: u32::try_from(expected).unwrap_or(u32::MAX),
                found,
            });
        }
    }

    let mut seen = HashSet::with_capacity(resources.len());
    let mut entries = Vec::with_capacity(resources.len());

    for (position, pair) in raw.windows(2).enumerate() {
        let (id, offset) = match pair[0] {
            IndexEntry::Resource { id, offset } => (id, offset),
            IndexEntry::Terminal { .. } => return Err(Error::ReservedIdInIndex { position }),
        };
        let next_offset = pair[1].offset();

        if !seen.insert(id) {
            tracing::warn!("Duplicate resource id {} in PAK index", id);
            return Err(Error::DuplicateResourceId { id: id.get() });
        }

        if options.strict_offsets && next_offset < offset {
            return Err(Error::OffsetsNotMonotonic {
                id: id.get(),
                offset,
                next_offset,
            });
        }

        entries.push(PakEntryInfo {
            id,
            offset,
            size: next_offset.wrapping_sub(offset),
        });
    }

    Ok(PakIndex {
        version: header.version,
        encoding: header.encoding,
        entries,
        end_offset,
    })
}
