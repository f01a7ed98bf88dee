//! A module for all encoding needs.
use crate::alphabet::Alphabet;
use crate::{Code, END_CODE, LITERAL_U16, LITERAL_U8};

use alloc::vec::Vec;
use hashbrown::HashMap;

/// The state for compressing text into one of the alphabets.
///
/// The encoder itself only holds configuration. Every call to [`encode`] builds its own
/// dictionary which is dropped when the call returns, so an encoder can be shared freely.
///
/// [`encode`]: #method.encode
#[derive(Clone, Debug)]
pub struct Encoder {
    alphabet: Alphabet,
}

struct EncodeState<'out> {
    /// The dictionary of all known strings.
    tree: Tree,
    /// Single units that received a code but were never written as a literal, with their unit.
    pending: HashMap<Code, u16>,
    /// The code to assign to the next dictionary entry.
    next_code: Code,
    /// Number of entries left before the code size grows.
    enlarge_in: Code,
    /// The bit buffer for encoding.
    buffer: SymbolBuffer<'out>,
}

/// Packs codes into output symbols.
pub(crate) struct SymbolBuffer<'out> {
    alphabet: Alphabet,
    /// The current code length.
    code_size: u8,
    /// The buffer bits, most significant first.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
    out: &'out mut Vec<u16>,
}

/// Strings are stored as a prefix tree, each entry is its prefix code followed by one unit.
#[derive(Default)]
struct Tree {
    roots: HashMap<u16, Code>,
    links: HashMap<(Code, u16), Code>,
}

impl Encoder {
    /// Create an encoder writing symbols of the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Encoder { alphabet }
    }

    /// The alphabet of the produced symbols.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Compress all of `inp`.
    ///
    /// An empty input produces an empty output, there is no end marker or padding in that case.
    pub fn encode(&self, inp: &[u16]) -> Vec<u16> {
        let mut out = Vec::with_capacity(inp.len() / 2 + 4);
        self.encode_into(inp, &mut out);
        out
    }

    /// Compress all of `inp`, appending the symbols to `out`.
    pub fn encode_into(&self, inp: &[u16], out: &mut Vec<u16>) {
        if inp.is_empty() {
            return;
        }

        let start = out.len();
        let mut state = EncodeState::new(self.alphabet, out);
        state.advance(inp);
        state.finish();
        self.alphabet.finish(out, start);

        log::debug!(
            "compressed {} units into {} {} symbols",
            inp.len(),
            out.len() - start,
            self.alphabet
        );
    }
}

impl<'out> EncodeState<'out> {
    fn new(alphabet: Alphabet, out: &'out mut Vec<u16>) -> Self {
        EncodeState {
            tree: Tree::default(),
            pending: HashMap::new(),
            // The control codes occupy the first three codes.
            next_code: 3,
            enlarge_in: 2,
            buffer: SymbolBuffer::new(alphabet, 2, out),
        }
    }

    fn advance(&mut self, inp: &[u16]) {
        let mut current: Option<Code> = None;

        for &unit in inp {
            let unit_code = match self.tree.root(unit) {
                Some(code) => code,
                None => {
                    let code = self.assign_code();
                    self.tree.roots.insert(unit, code);
                    self.pending.insert(code, unit);
                    code
                }
            };

            let prefix = match current {
                // The first unit is always its own root.
                None => {
                    current = Some(unit_code);
                    continue;
                }
                Some(prefix) => prefix,
            };

            match self.tree.at_key(prefix, unit) {
                Some(code) => current = Some(code),
                None => {
                    self.emit(prefix);
                    let code = self.assign_code();
                    self.tree.links.insert((prefix, unit), code);
                    current = Some(unit_code);
                }
            }
        }

        if let Some(code) = current {
            self.emit(code);
        }
    }

    fn finish(mut self) {
        self.buffer.buffer_code(END_CODE);
        self.buffer.buffer_pad();
    }

    fn assign_code(&mut self) -> Code {
        let code = self.next_code;
        self.next_code += 1;
        code
    }

    /// Write one string, either as a first-time literal or through its code.
    fn emit(&mut self, code: Code) {
        if let Some(unit) = self.pending.remove(&code) {
            if unit < 256 {
                self.buffer.buffer_code(LITERAL_U8);
                self.buffer.buffer_bits(Code::from(unit), 8);
            } else {
                self.buffer.buffer_code(LITERAL_U16);
                self.buffer.buffer_bits(Code::from(unit), 16);
            }
            // The literal's own entry was added when the unit was first seen.
            self.count_entry();
        } else {
            self.buffer.buffer_code(code);
        }

        self.count_entry();
    }

    fn count_entry(&mut self) {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.buffer.code_size();
            self.buffer.bump_code_size();
        }
    }
}

impl<'out> SymbolBuffer<'out> {
    pub(crate) fn new(alphabet: Alphabet, code_size: u8, out: &'out mut Vec<u16>) -> Self {
        SymbolBuffer {
            alphabet,
            code_size,
            buffer: 0,
            bits_in_buffer: 0,
            out,
        }
    }

    /// Insert a code with the current code size.
    pub(crate) fn buffer_code(&mut self, code: Code) {
        self.buffer_bits(code, self.code_size);
    }

    /// Insert the lowest `width` bits of `value`.
    ///
    /// Symbols are filled from their most significant bit while each value enters with its
    /// least significant bit first.
    pub(crate) fn buffer_bits(&mut self, value: Code, width: u8) {
        debug_assert!(0 < width && width <= 32);
        debug_assert!(u64::from(value) < 1u64 << width);
        let reversed = u64::from(value.reverse_bits() >> (32 - u32::from(width)));
        let shift = 64 - self.bits_in_buffer - width;
        self.buffer |= reversed << shift;
        self.bits_in_buffer += width;
        self.push_out();
    }

    /// Move all complete symbols to the output.
    fn push_out(&mut self) {
        let bits = self.alphabet.bits_per_char();
        while self.bits_in_buffer >= bits {
            let value = (self.buffer >> (64 - bits)) as u16;
            self.out.push(self.alphabet.symbol(value));
            self.buffer <<= bits;
            self.bits_in_buffer -= bits;
        }
    }

    /// Pad with zero bits and write the final symbol.
    ///
    /// This always writes a symbol, even when the buffer was empty.
    pub(crate) fn buffer_pad(&mut self) {
        let bits = self.alphabet.bits_per_char();
        self.bits_in_buffer += bits - self.bits_in_buffer;
        self.push_out();
    }

    pub(crate) fn bump_code_size(&mut self) {
        self.code_size += 1;
        log::trace!("code size grows to {} bits", self.code_size);
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }
}

impl Tree {
    fn root(&self, unit: u16) -> Option<Code> {
        self.roots.get(&unit).copied()
    }

    /// The code of the string `code` extended by `unit`, if known.
    fn at_key(&self, code: Code, unit: u16) -> Option<Code> {
        self.links.get(&(code, unit)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Encoder, SymbolBuffer};
    use crate::Alphabet;
    use alloc::vec::Vec;

    fn units(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn empty_input_is_empty() {
        for alphabet in Alphabet::ALL {
            assert!(Encoder::new(alphabet).encode(&[]).is_empty());
        }
    }

    #[test]
    fn single_literal() {
        // 00 (literal) 10000110 (0x61, low bit first) 010 (end) padded to 18 bits.
        let out = Encoder::new(Alphabet::Base64).encode(&units("a"));
        assert_eq!(out, units("IZA="));
    }

    #[test]
    fn wide_literal() {
        let out = Encoder::new(Alphabet::Raw).encode(&[0x263a]);
        // 2 bits control, 16 bits literal, 3 bits end.
        let expected = {
            let mut bits = Vec::new();
            bits.extend([1, 0]);
            bits.extend((0..16).map(|i| (0x263a >> i) & 1));
            bits.extend([0, 1, 0]);
            bits.resize(32, 0);
            bits.chunks(16)
                .map(|chunk| chunk.iter().fold(0u16, |acc, &b| (acc << 1) | b))
                .collect::<Vec<_>>()
        };
        assert_eq!(out, expected);
    }

    #[test]
    fn values_enter_low_bit_first() {
        let mut out = Vec::new();
        let mut buffer = SymbolBuffer::new(Alphabet::Raw, 2, &mut out);
        buffer.buffer_bits(0b0000_0001, 8);
        buffer.buffer_bits(0b1000_0000, 8);
        drop(buffer);
        assert_eq!(out, [0b1000_0000_0000_0001]);
    }

    #[test]
    fn pad_writes_a_full_symbol_when_aligned() {
        let mut out = Vec::new();
        let mut buffer = SymbolBuffer::new(Alphabet::Base64, 2, &mut out);
        buffer.buffer_bits(0b111111, 6);
        buffer.buffer_pad();
        drop(buffer);
        assert_eq!(out, units("/A"));
    }

    #[test]
    fn repetition_shrinks() {
        let text = units(&"abc".repeat(200));
        let out = Encoder::new(Alphabet::Raw).encode(&text);
        assert!(out.len() * 4 < text.len(), "{} symbols", out.len());
    }

    #[test]
    fn encode_into_appends() {
        let encoder = Encoder::new(Alphabet::Uri);
        let mut out = units("prefix");
        encoder.encode_into(&units("hello hello"), &mut out);
        assert_eq!(&out[..6], &units("prefix")[..]);
        assert_eq!((out.len() - 6) % 4, 0);
        assert_eq!(out[6..], encoder.encode(&units("hello hello"))[..]);
    }
}
