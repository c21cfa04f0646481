use archive::{ArchiveError, DirectoryEntry, Limits, Pak, Wad, WadEntryKind};
use bytestream::ByteWriter;

fn single_entry_pak() -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("PACK", 4);
    w.write_i32(12);
    w.write_i32(64);
    w.write_fixed_string("maps/e1m1.bsp", 56);
    w.write_i32(76);
    w.write_i32(100);
    w.write_bytes(&[0x1d; 100]);
    w.finish()
}

fn wad_with(names: &[&str]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("WAD2", 4);
    w.write_i32(names.len() as i32);
    w.write_i32(12);
    let data_start = 12 + names.len() * 32;
    for (i, name) in names.iter().enumerate() {
        w.write_u32((data_start + i * 4) as u32);
        w.write_u32(4);
        w.write_u32(4);
        w.write_u8(b'B');
        w.write_u8(0);
        w.write_zeros(2);
        w.write_fixed_string(name, 16);
    }
    for i in 0..names.len() {
        w.write_u32(i as u32);
    }
    w.finish()
}

#[test]
fn pak_find_entry_by_path() {
    let bytes = single_entry_pak();
    let pak = Pak::parse(&bytes).unwrap();
    let entry = pak.find_entry_by_path("maps/e1m1.bsp").unwrap();
    assert_eq!(entry.offset, 76);
    assert_eq!(entry.size, 100);
    assert_eq!(pak.entry_data(entry).unwrap().len(), 100);
    assert!(pak.find_entry_by_path("nope").is_none());
}

#[test]
fn pak_entries_stay_in_bounds() {
    let bytes = single_entry_pak();
    let pak = Pak::parse(&bytes).unwrap();
    for entry in pak.entries() {
        let range = entry.range().unwrap();
        assert!(range.end <= bytes.len());
    }
    assert!(pak.is_clean());
}

#[test]
fn pak_entry_past_end_is_reported() {
    let mut bytes = single_entry_pak();
    bytes.truncate(150);
    let pak = Pak::parse(&bytes).unwrap();
    assert!(!pak.is_clean());
    let entry = &pak.entries()[0];
    let err = pak.entry_data(entry).unwrap_err();
    assert!(matches!(err, ArchiveError::EntryOutOfBounds { len: 150, .. }));
}

#[test]
fn wad_count_matches_header() {
    let bytes = wad_with(&["A", "B", "A", "CONCHARS"]);
    let wad = Wad::parse(&bytes).unwrap();
    assert_eq!(wad.len(), 4);
    assert_eq!(wad.header().dir_entries, 4);
    assert!(wad.entries().iter().all(|e| e.kind == WadEntryKind::Status));
}

#[test]
fn wad_lookup_is_case_sensitive_first_match() {
    let bytes = wad_with(&["conchars", "CONCHARS", "CONCHARS"]);
    let wad = Wad::parse(&bytes).unwrap();
    let entry = wad.find_entry_by_name("CONCHARS").unwrap();
    assert_eq!(wad.entry_data(entry).unwrap(), &1u32.to_le_bytes());
    assert!(wad.find_entry_by_name("Conchars").is_none());
}

#[test]
fn wad_count_limit() {
    let names: Vec<String> = (0..65).map(|i| format!("E{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let bytes = wad_with(&refs);
    assert!(Wad::parse(&bytes).is_ok());
    let err = Wad::parse_with_limits(&bytes, &Limits::for_testing()).unwrap_err();
    assert!(matches!(err, ArchiveError::LimitsExceeded { .. }));
}

#[test]
fn parsing_is_idempotent() {
    let bytes = wad_with(&["X", "Y"]);
    assert_eq!(Wad::parse(&bytes).unwrap(), Wad::parse(&bytes).unwrap());
    let bytes = single_entry_pak();
    assert_eq!(Pak::parse(&bytes).unwrap(), Pak::parse(&bytes).unwrap());
}
