use lzstr::{decode, encode, Alphabet};

const SOURCES: &[&str] = &[
    include_str!("../src/lib.rs"),
    include_str!("../src/encode.rs"),
    include_str!("../Cargo.toml"),
];

#[test]
fn roundtrip_all() {
    for source in SOURCES {
        let data: Vec<u16> = source.encode_utf16().collect();
        for &alphabet in &Alphabet::ALL {
            assert_roundtrips(&data, alphabet);
        }
    }
}

#[test]
fn roundtrip_short() {
    for text in ["x", "ab", "aaaaaaaaaa", "TOBEORNOTTOBEORTOBEORNOT", "\u{0}", "\u{ffff}"] {
        let data: Vec<u16> = text.encode_utf16().collect();
        for &alphabet in &Alphabet::ALL {
            assert_roundtrips(&data, alphabet);
        }
    }
}

#[test]
fn roundtrip_wide_units() {
    // Lone surrogates and units that need 16-bit literals.
    let data: Vec<u16> = [0xd800, 0x0041, 0xdfff, 0x263a, 0xd800, 0xd800, 0x00ff, 0x0100]
        .iter()
        .copied()
        .cycle()
        .take(200)
        .collect();
    for &alphabet in &Alphabet::ALL {
        assert_roundtrips(&data, alphabet);
    }
}

#[test]
fn roundtrip_random() {
    for &(size, seed, mask) in &[(1000, 1, 0xffff), (4000, 7, 0x00ff), (3000, 42, 0x000f)] {
        let data = generate_random_units(size, seed, mask);
        for &alphabet in &Alphabet::ALL {
            assert_roundtrips(&data, alphabet);
        }
    }
}

#[test]
fn roundtrip_long_repetition() {
    // Enough distinct phrases to grow the code size well past a byte.
    let mut data: Vec<u16> = Vec::new();
    for i in 0..2000u16 {
        data.extend_from_slice(&[i % 97, i % 13, 0x4e00 + i % 7]);
    }
    for &alphabet in &Alphabet::ALL {
        assert_roundtrips(&data, alphabet);
    }
}

/// Simple xorshift, masked to narrow the unit range.
fn generate_random_units(size: usize, seed: u64, mask: u16) -> Vec<u16> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state as u16) & mask
        })
        .collect()
}

fn assert_roundtrips(data: &[u16], alphabet: Alphabet) {
    let encoder = encode::Encoder::new(alphabet);
    let compressed = encoder.encode(data);

    let decoder = decode::Decoder::new(alphabet);
    let result = decoder.decode(&compressed);
    assert!(result.is_ok(), "{}, {} units, {:?}", alphabet, data.len(), result);
    assert!(result.unwrap() == data, "{}, {} units", alphabet, data.len());
}
