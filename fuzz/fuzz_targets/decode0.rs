#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let data: Vec<u16> = raw_data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    for alphabet in lzstr::Alphabet::ALL {
        let _ = lzstr::Decoder::new(alphabet).decode(&data);
    }
    let _ = lzstr::decompress_from_bytes(Some(raw_data));
});
