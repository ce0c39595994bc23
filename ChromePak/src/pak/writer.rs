//! PAK file writing

use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tempfile::NamedTempFile;

use super::{ResourceId, ResourceTable, data_start};
use crate::error::{Error, Result};

/// Offsets computed for a table before anything is written
struct Layout {
    /// Resource ids in write order, with their payload offsets
    entries: Vec<(ResourceId, u32)>,
    /// Offset one past the last payload byte
    end_offset: u32,
}

impl Layout {
    /// Lay resources out in ascending id order, checking that every offset
    /// fits in 32 bits
    fn plan(table: &ResourceTable) -> Result<Self> {
        let count = u32::try_from(table.len()).map_err(|_| Error::PakTooLarge {
            size: table.len() as u64,
        })?;

        let mut offset = data_start(count);
        let mut entries = Vec::with_capacity(table.len());
        for (id, data) in table.iter() {
            let start = narrow_offset(offset)?;
            entries.push((id, start));
            offset += data.len() as u64;
        }

        Ok(Self {
            entries,
            end_offset: narrow_offset(offset)?,
        })
    }
}

fn narrow_offset(offset: u64) -> Result<u32> {
    u32::try_from(offset).map_err(|_| Error::PakTooLarge { size: offset })
}

/// Write a .pak file to disk
///
/// The archive is written to a temporary file next to `path` and moved into
/// place only once it is complete, so a failed write never leaves a partial
/// file at `path`.
///
/// # Errors
/// Returns an error if the table is too large for the format, or if creating,
/// writing, syncing, or renaming the file fails.
pub fn write_pak<P: AsRef<Path>>(path: P, table: &ResourceTable) -> Result<()> {
    let path = path.as_ref();
    tracing::info!("Writing PAK: {} ({} resources)", path.display(), table.len());

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_pak_to(&mut writer, table)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    Ok(())
}

/// Encode a table into any byte sink
///
/// Layout is canonical: ascending ids, payloads back-to-back, terminal
/// sentinel `(0, end_offset)`.
///
/// # Errors
/// Returns [`Error::PakTooLarge`] before writing anything if offsets would
/// overflow 32 bits, or [`Error::Io`] if the sink fails.
///
/// [`Error::PakTooLarge`]: crate::Error::PakTooLarge
/// [`Error::Io`]: crate::Error::Io
pub fn write_pak_to<W: Write>(mut writer: W, table: &ResourceTable) -> Result<()> {
    let layout = Layout::plan(table)?;
    let num_resources = layout.entries.len() as u32;

    // Write header
    writer.write_u32::<LittleEndian>(table.version)?;
    writer.write_u32::<LittleEndian>(num_resources)?;
    writer.write_u8(table.encoding.to_byte())?;

    // Write index, then the extra entry giving the end of the last resource
    for &(id, offset) in &layout.entries {
        writer.write_u16::<LittleEndian>(id.get())?;
        writer.write_u32::<LittleEndian>(offset)?;
    }
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(layout.end_offset)?;

    // Write payloads in index order
    for (_, data) in table.iter() {
        writer.write_all(data)?;
    }

    writer.flush()?;
    tracing::debug!(
        "Encoded PAK: {} resources, {} bytes",
        num_resources,
        layout.end_offset
    );
    Ok(())
}

impl ResourceTable {
    /// Encode the table into a new buffer
    ///
    /// # Errors
    /// Returns [`Error::PakTooLarge`] if offsets would overflow 32 bits.
    ///
    /// [`Error::PakTooLarge`]: crate::Error::PakTooLarge
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let layout = Layout::plan(self)?;
        let mut buffer = Vec::with_capacity(layout.end_offset as usize);
        write_pak_to(&mut buffer, self)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pak::TextEncoding;
    use std::io;

    fn id(n: u16) -> ResourceId {
        ResourceId::new(n).unwrap()
    }

    #[test]
    fn test_empty_table_is_fifteen_bytes() {
        let table = ResourceTable::new().with_version(5);
        let bytes = table.to_bytes().unwrap();

        assert_eq!(bytes.len(), 15);
        assert_eq!(&bytes[..4], &5u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &0u32.to_le_bytes());
        assert_eq!(bytes[8], 0);
        // Terminal entry (0, 15)
        assert_eq!(&bytes[9..11], &0u16.to_le_bytes());
        assert_eq!(&bytes[11..15], &15u32.to_le_bytes());
    }

    #[test]
    fn test_zero_length_resource() {
        let mut table = ResourceTable::new();
        table.insert(id(5), Vec::new());
        let bytes = table.to_bytes().unwrap();

        assert_eq!(bytes.len(), 21);
        assert_eq!(&bytes[9..11], &5u16.to_le_bytes());
        assert_eq!(&bytes[11..15], &21u32.to_le_bytes());
        assert_eq!(&bytes[15..17], &0u16.to_le_bytes());
        assert_eq!(&bytes[17..21], &21u32.to_le_bytes());
    }

    #[test]
    fn test_index_is_ascending() {
        let mut table = ResourceTable::new().with_encoding(TextEncoding::Utf8);
        table.insert(id(300), b"b".to_vec());
        table.insert(id(7), b"a".to_vec());
        let bytes = table.to_bytes().unwrap();

        let expected: Vec<u8> = [
            &0u32.to_le_bytes()[..],
            &2u32.to_le_bytes()[..],
            &[1u8][..],
            &7u16.to_le_bytes()[..],
            &27u32.to_le_bytes()[..],
            &300u16.to_le_bytes()[..],
            &28u32.to_le_bytes()[..],
            &0u16.to_le_bytes()[..],
            &29u32.to_le_bytes()[..],
            &b"ab"[..],
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_unknown_encoding_written_verbatim() {
        let table = ResourceTable::new().with_encoding(TextEncoding::Unknown(9));
        let bytes = table.to_bytes().unwrap();
        assert_eq!(bytes[8], 9);
    }

    /// Sink that fails after accepting `remaining` bytes
    struct FailingWriter {
        remaining: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_io_error() {
        let mut table = ResourceTable::new();
        table.insert(id(1), vec![0u8; 64]);

        let err = write_pak_to(FailingWriter { remaining: 30 }, &table).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
