//! # Text compression into printable alphabets
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for an adaptive dictionary code of the
//! LZW family. The input is a sequence of 16-bit code units, i.e. UTF-16 text without any
//! requirement that surrogates be paired. Codes are packed into symbols of one of four
//! [`Alphabet`]s, so that the result can be stored wherever text is accepted.
//!
//! The dictionary starts empty apart from three control codes:
//!
//!  * `0`: an 8-bit literal follows,
//!  * `1`: a 16-bit literal follows,
//!  * `2`: the end of the stream.
//!
//! Every unit is written as a literal the first time it occurs and by its code afterwards.
//!
//! Examplary use of the encoder:
//!
//! ```
//! use lzstr::{Alphabet, decode::Decoder, encode::Encoder};
//! let data: Vec<u16> = "TOBEORNOTTOBEORTOBEORNOT".encode_utf16().collect();
//!
//! let compressed = Encoder::new(Alphabet::Base64).encode(&data);
//! let decompressed = Decoder::new(Alphabet::Base64).decode(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```
//!
//! The free functions at the crate root offer the conventional interface instead: a missing
//! input results in a missing output and a malformed input decodes to an empty sequence.
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

use alloc::vec::Vec;

pub(crate) const LITERAL_U8: Code = 0;
pub(crate) const LITERAL_U16: Code = 1;
pub(crate) const END_CODE: Code = 2;
pub(crate) const MAX_CODESIZE: u8 = 32;

/// Alias for a dictionary code.
pub type Code = u32;

pub mod alphabet;
pub mod decode;
pub mod encode;

pub use alphabet::{Alphabet, ParseAlphabetError};
pub use decode::{Decoder, LzwError};
pub use encode::Encoder;

/// Compress into raw 16-bit symbols.
pub fn compress(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    compress_with(Alphabet::Raw, inp)
}

/// Decompress raw 16-bit symbols, the exact symbol count produced by [`compress`] is expected.
pub fn decompress(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    decompress_with(Alphabet::Raw, inp)
}

/// Compress into 15-bit symbols that are valid text, followed by a space.
pub fn compress_to_utf16(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    compress_with(Alphabet::Utf16, inp)
}

/// Decompress the output of [`compress_to_utf16`].
pub fn decompress_from_utf16(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    decompress_with(Alphabet::Utf16, inp)
}

/// Compress into Base64 symbols, padded with `=`.
pub fn compress_to_base64(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    compress_with(Alphabet::Base64, inp)
}

/// Decompress the output of [`compress_to_base64`].
pub fn decompress_from_base64(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    decompress_with(Alphabet::Base64, inp)
}

/// Compress into URI component safe symbols, padded with `$`.
pub fn compress_to_uri(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    compress_with(Alphabet::Uri, inp)
}

/// Decompress the output of [`compress_to_uri`]. Spaces are read as `+`.
pub fn decompress_from_uri(inp: Option<&[u16]>) -> Option<Vec<u16>> {
    decompress_with(Alphabet::Uri, inp)
}

/// Compress into raw symbols serialized as big endian bytes.
pub fn compress_to_bytes(inp: Option<&[u16]>) -> Option<Vec<u8>> {
    let symbols = compress(inp)?;
    Some(symbols.iter().flat_map(|sym| sym.to_be_bytes()).collect())
}

/// Decompress the output of [`compress_to_bytes`]. An odd number of bytes is malformed.
pub fn decompress_from_bytes(inp: Option<&[u8]>) -> Option<Vec<u16>> {
    let inp = inp?;
    if inp.len() % 2 != 0 {
        log::debug!("rejected {} bytes, not a whole number of symbols", inp.len());
        return Some(Vec::new());
    }

    let symbols: Vec<u16> = inp
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    decompress(Some(symbols.as_slice()))
}

fn compress_with(alphabet: Alphabet, inp: Option<&[u16]>) -> Option<Vec<u16>> {
    inp.map(|inp| Encoder::new(alphabet).encode(inp))
}

fn decompress_with(alphabet: Alphabet, inp: Option<&[u16]>) -> Option<Vec<u16>> {
    inp.map(|inp| Decoder::new(alphabet).decode(inp).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_stays_absent() {
        assert_eq!(compress(None), None);
        assert_eq!(decompress(None), None);
        assert_eq!(compress_to_bytes(None), None);
        assert_eq!(decompress_from_bytes(None), None);
    }

    #[test]
    fn malformed_is_empty() {
        let bad: Vec<u16> = "IZA!".encode_utf16().collect();
        assert_eq!(decompress_from_base64(Some(bad.as_slice())), Some(Vec::new()));
        assert_eq!(decompress_from_bytes(Some(&[0u8, 1, 2][..])), Some(Vec::new()));
    }

    #[test]
    fn bytes_are_big_endian() {
        let data: Vec<u16> = "ab".encode_utf16().collect();
        let symbols = compress(Some(data.as_slice())).unwrap();
        let bytes = compress_to_bytes(Some(data.as_slice())).unwrap();
        assert_eq!(bytes.len(), 2 * symbols.len());
        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), symbols[0]);
        assert_eq!(decompress_from_bytes(Some(bytes.as_slice())), Some(data));
    }
}
