// lister.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{PakIndex, PakReader};

/// List the resources of a .pak file without reading their payloads
///
/// # Errors
/// Returns an error if the file cannot be opened or its header or index is
/// malformed.
pub fn list_pak_entries<P: AsRef<Path>>(pak: P) -> crate::error::Result<PakIndex> {
    let file = File::open(pak)?;
    PakReader::new(BufReader::new(file)).read_index()
}
