use archive::{DirectoryEntry, Pak, Wad};
use bytestream::ByteWriter;
use proptest::prelude::*;

fn pak_from(files: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("PACK", 4);
    w.write_i32(0);
    w.write_i32((files.len() * 64) as i32);
    let mut offsets = Vec::new();
    for (_, data) in files {
        offsets.push(w.position());
        w.write_bytes(data);
    }
    let dir = w.position();
    for ((path, data), offset) in files.iter().zip(offsets) {
        w.write_fixed_string(path, 56);
        w.write_u32(offset as u32);
        w.write_u32(data.len() as u32);
    }
    w.patch_i32_at(4, dir as i32);
    w.finish()
}

proptest! {
    #[test]
    fn prop_well_formed_pak_entries_in_bounds(
        files in prop::collection::vec(("[a-z/]{1,20}\\.lmp", prop::collection::vec(any::<u8>(), 0..64)), 0..12)
    ) {
        let bytes = pak_from(&files);
        let pak = Pak::parse(&bytes).unwrap();
        prop_assert_eq!(pak.len(), files.len());
        for ((path, data), entry) in files.iter().zip(pak.entries()) {
            prop_assert_eq!(&entry.path, path);
            prop_assert!(entry.in_bounds(bytes.len()));
            prop_assert_eq!(pak.entry_data(entry).unwrap(), data.as_slice());
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Pak::parse(&data);
        let _ = Wad::parse(&data);
    }
}
