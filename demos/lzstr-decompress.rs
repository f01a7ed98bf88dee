//! Decompresses Base64 text from stdin and writes the result to stdout.

use std::io::{self, Read, Write};

fn main() {
    match (|| -> io::Result<()> {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        let data: Vec<u16> = text.trim_end().encode_utf16().collect();
        let decoded = lzstr::Decoder::new(lzstr::Alphabet::Base64)
            .decode(&data)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let decoded = String::from_utf16(&decoded)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(decoded.as_bytes())?;
        stdout.flush()
    })() {
        Ok(()) => (),
        Err(err) => eprintln!("{}", err),
    }
}
