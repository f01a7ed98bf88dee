#![no_main]
use libfuzzer_sys::fuzz_target;
use lzstr::{decode, encode, Alphabet};

fuzz_target!(|raw_data: &[u8]| {
    let data: Vec<u16> = raw_data
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], *pair.get(1).unwrap_or(&0)]))
        .collect();

    for alphabet in Alphabet::ALL {
        let encoded = encode::Encoder::new(alphabet).encode(&data);
        let result = decode::Decoder::new(alphabet).decode(&encoded);
        assert_eq!(result.as_deref(), Ok(&data[..]), "{}", alphabet);
    }
});
