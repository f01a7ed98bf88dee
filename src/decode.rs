//! A module for all decoding needs.
use crate::alphabet::Alphabet;
use crate::{Code, END_CODE, LITERAL_U16, LITERAL_U8, MAX_CODESIZE};

use alloc::vec::Vec;

/// The state for decompressing symbols of one of the alphabets.
///
/// Like the encoder this only holds configuration, each call reconstructs its own dictionary.
#[derive(Clone, Debug)]
pub struct Decoder {
    alphabet: Alphabet,
}

/// The ways in which an encoded stream can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LzwError {
    /// A symbol that is not part of the alphabet.
    #[error("symbol {symbol:#06x} at position {position} is not part of the alphabet")]
    InvalidSymbol { position: usize, symbol: u16 },
    /// The stream did not start with a literal.
    #[error("stream starts with code {0} instead of a literal")]
    InvalidStart(Code),
    /// A code beyond the dictionary.
    #[error("code {code} refers past the next dictionary entry {next}")]
    InvalidCode { code: Code, next: Code },
    /// The symbols ran out before the end code.
    #[error("no more data but no end marker detected")]
    Truncated,
}

#[derive(Clone, Copy)]
struct Link {
    /// The code of the string this one extends, meaningless for literals.
    prefix: Code,
    /// The last unit of the string.
    unit: u16,
    /// The first unit of the string.
    first: u16,
    /// The length of the string.
    depth: u32,
}

/// The table of decoded strings, indexed by their code.
struct Table {
    inner: Vec<Link>,
}

struct DecodeState<'inp> {
    /// The table of decoded codes.
    table: Table,
    /// The previously decoded code.
    last: Code,
    /// Number of entries left before the code size grows.
    enlarge_in: Code,
    /// The bit reader.
    bits: SymbolReader<'inp>,
}

/// Unpacks codes from input symbols.
pub(crate) struct SymbolReader<'inp> {
    alphabet: Alphabet,
    /// The current code length.
    code_size: u8,
    /// The buffer bits, most significant first.
    bit_buffer: u64,
    /// The number of valid buffer bits.
    bits: u8,
    inp: &'inp [u16],
}

impl Decoder {
    /// Create a decoder reading symbols of the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Decoder { alphabet }
    }

    /// The alphabet of the accepted symbols.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Decompress all of `inp`.
    ///
    /// An empty input decodes to empty output. Every symbol must be part of the alphabet, even
    /// those following the end code.
    pub fn decode(&self, inp: &[u16]) -> Result<Vec<u16>, LzwError> {
        let mut out = Vec::new();
        self.decode_into(inp, &mut out)?;
        Ok(out)
    }

    /// Decompress all of `inp`, appending to `out`.
    ///
    /// On error `out` is restored to its original length, no partial result remains.
    pub fn decode_into(&self, inp: &[u16], out: &mut Vec<u16>) -> Result<(), LzwError> {
        if inp.is_empty() {
            return Ok(());
        }

        let start = out.len();
        match decode_stream(self.alphabet, inp, out) {
            Ok(()) => {
                log::debug!(
                    "decompressed {} {} symbols into {} units",
                    inp.len(),
                    self.alphabet,
                    out.len() - start
                );
                Ok(())
            }
            Err(err) => {
                log::debug!("rejected {} {} symbols: {}", inp.len(), self.alphabet, err);
                out.truncate(start);
                Err(err)
            }
        }
    }
}

fn decode_stream(alphabet: Alphabet, inp: &[u16], out: &mut Vec<u16>) -> Result<(), LzwError> {
    let bits = SymbolReader::new(alphabet, inp)?;
    let mut state = DecodeState::new(bits, out)?;
    state.advance(out)
}

impl<'inp> DecodeState<'inp> {
    /// Read the leading literal which seeds the dictionary.
    fn new(mut bits: SymbolReader<'inp>, out: &mut Vec<u16>) -> Result<Self, LzwError> {
        let unit = match bits.get_bits(2)? {
            LITERAL_U8 => bits.get_bits(8)?,
            LITERAL_U16 => bits.get_bits(16)?,
            code => return Err(LzwError::InvalidStart(code)),
        };

        // The literal's code and the entry it implies are already accounted for.
        bits.code_size = 3;
        let mut table = Table::new();
        let last = table.push_literal(unit as u16);
        out.push(unit as u16);

        Ok(DecodeState {
            table,
            last,
            enlarge_in: 4,
            bits,
        })
    }

    fn advance(&mut self, out: &mut Vec<u16>) -> Result<(), LzwError> {
        loop {
            let mut code = self.bits.next_code()?;
            match code {
                LITERAL_U8 | LITERAL_U16 => {
                    let width = if code == LITERAL_U8 { 8 } else { 16 };
                    let unit = self.bits.get_bits(width)? as u16;
                    code = self.table.push_literal(unit);
                    self.count_entry()?;
                }
                END_CODE => return Ok(()),
                _ => {}
            }

            let next = self.table.next_code();
            let first = if code < next {
                self.table.at(code).first
            } else if code == next {
                // The string is the previous one extended by its own first unit.
                self.table.at(self.last).first
            } else {
                return Err(LzwError::InvalidCode { code, next });
            };

            self.table.derive(self.last, first);
            self.table.reconstruct(code, out);
            self.last = code;
            self.count_entry()?;
        }
    }

    fn count_entry(&mut self) -> Result<(), LzwError> {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            if self.bits.code_size >= MAX_CODESIZE {
                return Err(LzwError::InvalidCode {
                    code: Code::MAX,
                    next: self.table.next_code(),
                });
            }
            self.enlarge_in = 1 << self.bits.code_size;
            self.bits.code_size += 1;
            log::trace!("code size grows to {} bits", self.bits.code_size);
        }
        Ok(())
    }
}

impl<'inp> SymbolReader<'inp> {
    /// Check the whole input against the alphabet and prepare reading.
    pub(crate) fn new(alphabet: Alphabet, inp: &'inp [u16]) -> Result<Self, LzwError> {
        if let Some(position) = inp.iter().position(|&sym| alphabet.value(sym).is_none()) {
            return Err(LzwError::InvalidSymbol {
                position,
                symbol: inp[position],
            });
        }

        Ok(SymbolReader {
            alphabet,
            code_size: 2,
            bit_buffer: 0,
            bits: 0,
            inp,
        })
    }

    fn next_code(&mut self) -> Result<Code, LzwError> {
        self.get_bits(self.code_size)
    }

    fn refill_bits(&mut self) -> Result<(), LzwError> {
        let (&sym, rest) = self.inp.split_first().ok_or(LzwError::Truncated)?;
        self.inp = rest;
        let per_char = self.alphabet.bits_per_char();
        // Validated on construction.
        let value = self.alphabet.value(sym).unwrap_or(0);
        self.bit_buffer |= u64::from(value) << (64 - self.bits - per_char);
        self.bits += per_char;
        Ok(())
    }

    /// Read `width` bits, the first read bit being the least significant of the result.
    pub(crate) fn get_bits(&mut self, width: u8) -> Result<Code, LzwError> {
        debug_assert!(0 < width && width <= 32);
        while self.bits < width {
            self.refill_bits()?;
        }

        let raw = (self.bit_buffer >> (64 - width)) as Code;
        self.bit_buffer <<= width;
        self.bits -= width;
        Ok(raw.reverse_bits() >> (32 - u32::from(width)))
    }
}

impl Table {
    fn new() -> Self {
        let placeholder = Link {
            prefix: 0,
            unit: 0,
            first: 0,
            depth: 0,
        };
        // The control codes.
        Table {
            inner: alloc::vec![placeholder; 3],
        }
    }

    fn next_code(&self) -> Code {
        self.inner.len() as Code
    }

    fn at(&self, code: Code) -> &Link {
        &self.inner[code as usize]
    }

    fn push_literal(&mut self, unit: u16) -> Code {
        let code = self.next_code();
        self.inner.push(Link {
            prefix: code,
            unit,
            first: unit,
            depth: 1,
        });
        code
    }

    fn derive(&mut self, prefix: Code, unit: u16) -> Code {
        let code = self.next_code();
        let from = *self.at(prefix);
        self.inner.push(Link {
            prefix,
            unit,
            first: from.first,
            depth: from.depth + 1,
        });
        code
    }

    /// Append the string of `code` to `out`.
    fn reconstruct(&self, code: Code, out: &mut Vec<u16>) {
        let depth = self.at(code).depth as usize;
        let start = out.len();
        out.resize(start + depth, 0);

        let mut code = code;
        for unit in out[start..].iter_mut().rev() {
            let link = self.at(code);
            *unit = link.unit;
            code = link.prefix;
        }
    }
}
