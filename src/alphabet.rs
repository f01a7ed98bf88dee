//! The output alphabets a compressed stream can be written in.
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::{fmt, str::FromStr};

/// The alphabet symbols are drawn from.
///
/// Each variant fixes the number of bits carried per output symbol and the mapping between those
/// bits and the symbol itself. The stream carries no tag, both sides must agree on the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// 16 bits per symbol, symbols are the raw values.
    ///
    /// The output may contain unpaired surrogates and is thus not necessarily valid text.
    Raw,
    /// 15 bits per symbol, offset by 32 to stay clear of control characters and surrogates. A
    /// single space is appended as end sentinel.
    Utf16,
    /// 6 bits per symbol from `A-Z a-z 0-9 + /`, padded with `=` to a multiple of four.
    Base64,
    /// 6 bits per symbol from `A-Z a-z 0-9 + -`, padded with `$` to a multiple of four.
    Uri,
}

/// Returned when parsing an unknown alphabet name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alphabet `{0}`, expected one of raw, utf16, base64, uri")]
pub struct ParseAlphabetError(String);

const BASE64_SYMBOLS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URI_SYMBOLS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-";

const INVALID: u8 = 0xff;

const BASE64_VALUES: [u8; 128] = {
    let mut table = reverse(BASE64_SYMBOLS);
    table[b'=' as usize] = 0;
    table
};

const URI_VALUES: [u8; 128] = {
    let mut table = reverse(URI_SYMBOLS);
    table[b'$' as usize] = 0;
    // Form encoding turns `+` into a space in transit.
    table[b' ' as usize] = 62;
    table
};

const fn reverse(symbols: &[u8; 64]) -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut idx = 0;
    while idx < symbols.len() {
        table[symbols[idx] as usize] = idx as u8;
        idx += 1;
    }
    table
}

impl Alphabet {
    /// All variants, in no particular order.
    pub const ALL: [Alphabet; 4] = [
        Alphabet::Raw,
        Alphabet::Utf16,
        Alphabet::Base64,
        Alphabet::Uri,
    ];

    /// The number of stream bits carried by each output symbol.
    pub fn bits_per_char(self) -> u8 {
        match self {
            Alphabet::Raw => 16,
            Alphabet::Utf16 => 15,
            Alphabet::Base64 | Alphabet::Uri => 6,
        }
    }

    /// The name used by `FromStr` and `Display`.
    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Raw => "raw",
            Alphabet::Utf16 => "utf16",
            Alphabet::Base64 => "base64",
            Alphabet::Uri => "uri",
        }
    }

    /// Map `bits_per_char` bits to their symbol.
    pub(crate) fn symbol(self, value: u16) -> u16 {
        debug_assert!(u32::from(value) < 1 << self.bits_per_char());
        match self {
            Alphabet::Raw => value,
            Alphabet::Utf16 => value + 32,
            Alphabet::Base64 => u16::from(BASE64_SYMBOLS[usize::from(value)]),
            Alphabet::Uri => u16::from(URI_SYMBOLS[usize::from(value)]),
        }
    }

    /// Map a symbol back to its bits, `None` if the symbol is not part of the alphabet.
    pub(crate) fn value(self, symbol: u16) -> Option<u16> {
        match self {
            Alphabet::Raw => Some(symbol),
            Alphabet::Utf16 => symbol.checked_sub(32).filter(|&value| value < 1 << 15),
            Alphabet::Base64 => lookup(&BASE64_VALUES, symbol),
            Alphabet::Uri => lookup(&URI_VALUES, symbol),
        }
    }

    /// Apply padding or the end sentinel to the symbols written since `start`.
    pub(crate) fn finish(self, out: &mut Vec<u16>, start: usize) {
        match self {
            Alphabet::Raw => {}
            Alphabet::Utf16 => out.push(u16::from(b' ')),
            Alphabet::Base64 => pad(out, start, b'='),
            Alphabet::Uri => pad(out, start, b'$'),
        }
    }
}

fn lookup(table: &[u8; 128], symbol: u16) -> Option<u16> {
    table
        .get(usize::from(symbol))
        .copied()
        .filter(|&value| value != INVALID)
        .map(u16::from)
}

fn pad(out: &mut Vec<u16>, start: usize, with: u8) {
    while (out.len() - start) % 4 != 0 {
        out.push(u16::from(with));
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alphabet {
    type Err = ParseAlphabetError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Alphabet::ALL
            .iter()
            .copied()
            .find(|alphabet| alphabet.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseAlphabetError(name.to_string()))
    }
}
