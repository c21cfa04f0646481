#![no_main]

use bytestream::{ByteReader, Endian};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Input bytes drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 9;
        let arg = usize::from(data[idx]);
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_u8();
            }
            1 => {
                let _ = reader.read_i16();
            }
            2 => {
                let _ = reader.read_i32();
            }
            3 => {
                let _ = reader.read_f32();
            }
            4 => {
                let _ = reader.read_bytes(arg);
            }
            5 => {
                let _ = reader.read_fixed_string(arg % 64);
            }
            6 => {
                let _ = reader.read_cstring();
            }
            7 => {
                let _ = reader.seek(arg * 4);
            }
            _ => {
                reader = reader.clone().with_endian(if arg % 2 == 0 {
                    Endian::Big
                } else {
                    Endian::Little
                });
            }
        }
        assert!(reader.position() <= reader.len());
    }
});
