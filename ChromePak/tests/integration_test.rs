use chromepak::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn id(n: u16) -> ResourceId {
    ResourceId::new(n).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn sample_table() -> ResourceTable {
    let mut table = ResourceTable::new()
        .with_version(4)
        .with_encoding(TextEncoding::Utf8);
    table.insert(id(1), b"<html></html>".to_vec());
    table.insert(id(2), Vec::new());
    table.insert(id(65535), vec![0xFF; 300]);
    table.insert(id(1024), (0..=255u8).collect::<Vec<u8>>());
    table
}

#[test]
fn test_round_trip_in_memory() {
    init_tracing();
    let table = sample_table();
    let bytes = table.to_bytes().unwrap();
    let decoded = parse_pak_bytes(&bytes).unwrap();
    assert_eq!(decoded, table);
}

#[test]
fn test_encoding_is_deterministic() {
    let forward: ResourceTable = (1..=50u16).map(|n| (id(n), vec![n as u8; n as usize])).collect();
    let backward: ResourceTable = (1..=50u16)
        .rev()
        .map(|n| (id(n), vec![n as u8; n as usize]))
        .collect();

    let a = forward.to_bytes().unwrap();
    let b = backward.to_bytes().unwrap();
    assert_eq!(a, b);
    assert_eq!(a, forward.to_bytes().unwrap());
}

#[test]
fn test_empty_table_round_trip() {
    let table = ResourceTable::new().with_version(5);
    let bytes = table.to_bytes().unwrap();
    assert_eq!(bytes.len(), 15);

    let decoded = parse_pak_bytes(&bytes).unwrap();
    assert!(decoded.is_empty());
    assert_eq!(decoded.version, 5);
}

#[test]
fn test_single_empty_resource_round_trip() {
    let mut table = ResourceTable::new();
    table.insert(id(5), Vec::new());
    let bytes = table.to_bytes().unwrap();
    assert_eq!(bytes.len(), 21);

    let decoded = parse_pak_bytes(&bytes).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get(id(5)), Some(&[][..]));
}

#[test]
fn test_sentinel_corruption_detected() {
    let mut bytes = sample_table().to_bytes().unwrap();
    // Terminal entry id sits right after the 4 resource entries
    let terminal = 9 + 6 * 4;
    bytes[terminal] = 0x01;

    let err = parse_pak_bytes(&bytes).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, Error::MissingTerminalSentinel { found: 1 }));
}

#[test]
fn test_truncation_names_last_resource() {
    let mut bytes = sample_table().to_bytes().unwrap();
    bytes.truncate(bytes.len() - 1);

    let err = parse_pak_bytes(&bytes).unwrap_err();
    assert!(err.is_truncation());
    assert!(matches!(
        err,
        Error::ResourceTruncated { id: 65535, expected: 300, actual: 299 }
    ));
}

#[test]
fn test_canonical_output_passes_strict_mode() {
    let bytes = sample_table().to_bytes().unwrap();
    let decoded = PakReader::new(bytes.as_slice())
        .with_options(PakReadOptions::strict())
        .read()
        .unwrap();
    assert_eq!(decoded, sample_table());
}

#[test]
fn test_file_round_trip() {
    init_tracing();
    let temp = tempdir().unwrap();
    let path = temp.path().join("resources.pak");

    let table = sample_table();
    write_pak(&path, &table).unwrap();
    assert_eq!(fs::read(&path).unwrap(), table.to_bytes().unwrap());

    let decoded = read_pak(&path).unwrap();
    assert_eq!(decoded, table);
}

#[test]
fn test_write_replaces_existing_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("resources.pak");
    fs::write(&path, b"stale contents").unwrap();

    let mut table = ResourceTable::new();
    table.insert(id(3), b"fresh".to_vec());
    write_pak(&path, &table).unwrap();

    assert_eq!(read_pak(&path).unwrap(), table);
    // Only the published archive remains; no temporary files are left behind
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn test_write_into_missing_directory_fails_cleanly() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("missing").join("resources.pak");

    let err = write_pak(&path, &sample_table()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_list_entries_from_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("resources.pak");
    write_pak(&path, &sample_table()).unwrap();

    let index = list_pak_entries(&path).unwrap();
    let listed: Vec<(u16, u32)> = index.entries.iter().map(|e| (e.id.get(), e.size)).collect();
    assert_eq!(listed, vec![(1, 13), (2, 0), (1024, 256), (65535, 300)]);
    assert_eq!(index.version, 4);
    assert_eq!(index.encoding, TextEncoding::Utf8);
    assert_eq!(index.total_size(), fs::metadata(&path).unwrap().len());
}

#[test]
fn test_read_missing_file_is_io_error() {
    let temp = tempdir().unwrap();
    let err = read_pak(temp.path().join("absent.pak")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
