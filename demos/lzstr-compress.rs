//! Compresses the text from stdin and writes the Base64 result to stdout.

use std::io::{self, Read, Write};

fn main() {
    match (|| -> io::Result<()> {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        let data: Vec<u16> = text.encode_utf16().collect();
        let encoded = lzstr::compress_to_base64(Some(&data[..])).unwrap_or_default();
        let encoded = String::from_utf16_lossy(&encoded);
        let mut stdout = io::stdout().lock();
        stdout.write_all(encoded.as_bytes())?;
        stdout.flush()
    })() {
        Ok(()) => (),
        Err(err) => eprintln!("{}", err),
    }
}
