#![forbid(unsafe_code)]
use std::io::{Read, Write};
use std::path::PathBuf;
use std::{env, error, ffi, fs, io, process};

use lzstr::{Alphabet, Decoder, Encoder};

fn main() -> CodingResult {
    env_logger::init();
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let operation = flags.operation.unwrap_or_else(explain);
    let alphabet = flags.alphabet;

    let input = match flags.input {
        Input::File(file) => fs::read(file)?,
        Input::Stdin => {
            let mut data = vec![];
            io::stdin().lock().read_to_end(&mut data)?;
            data
        }
    };

    let output = match operation {
        Operation::Encode => {
            let text = String::from_utf8(input).map_err(invalid_data)?;
            let units: Vec<u16> = text.encode_utf16().collect();
            let symbols = Encoder::new(alphabet).encode(&units);
            log::info!("{} units compressed to {} symbols", units.len(), symbols.len());
            symbols_to_bytes(alphabet, &symbols)?
        }
        Operation::Decode => {
            let symbols = bytes_to_symbols(alphabet, input)?;
            let units = Decoder::new(alphabet)
                .decode(&symbols)
                .map_err(invalid_data)?;
            log::info!("{} symbols decompressed to {} units", symbols.len(), units.len());
            String::from_utf16(&units).map_err(invalid_data)?.into_bytes()
        }
    };

    let mut out = io::stdout().lock();
    out.write_all(&output)?;
    out.flush()
}

/// Raw symbols need not be text and are exchanged as UTF-16LE, all others as UTF-8.
fn symbols_to_bytes(alphabet: Alphabet, symbols: &[u16]) -> io::Result<Vec<u8>> {
    match alphabet {
        Alphabet::Raw => Ok(symbols.iter().flat_map(|sym| sym.to_le_bytes()).collect()),
        _ => String::from_utf16(symbols)
            .map(String::into_bytes)
            .map_err(invalid_data),
    }
}

fn bytes_to_symbols(alphabet: Alphabet, bytes: Vec<u8>) -> io::Result<Vec<u16>> {
    match alphabet {
        Alphabet::Raw if bytes.len() % 2 != 0 => {
            Err(invalid_data("raw symbol stream has an odd number of bytes"))
        }
        Alphabet::Raw => Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()),
        _ => {
            let text = String::from_utf8(bytes).map_err(invalid_data)?;
            // Editors like to add a final newline. The space sentinel must stay.
            let text = text.trim_end_matches(&['\n', '\r'][..]);
            Ok(text.encode_utf16().collect())
        }
    }
}

fn invalid_data<E>(err: E) -> io::Error
where
    E: Into<Box<dyn error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

struct Flags {
    input: Input,
    operation: Option<Operation>,
    alphabet: Alphabet,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn explain<T>() -> T {
    println!(
        "Usage: lzstr [-e|-d] [-a <alphabet>] <file>\n\
        Arguments:\n\
        -e\t operation encode\n\
        -d\t operation decode\n\
        -a\t one of raw, utf16, base64 (default), uri\n\
        <file>\tfilepath or '-' for stdin"
    );
    process::exit(1);
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            input: Input::Stdin,
            operation: None,
            alphabet: Alphabet::Base64,
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("lzstr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress text into printable alphabets and back")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .action(clap::ArgAction::SetTrue),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("alphabet")
                .short('a')
                .long("alphabet")
                .default_value("base64")
                .value_parser(["raw", "utf16", "base64", "uri"]),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(mut args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let mut flags = Flags::default();
        let matches = command().get_matches_from(args.by_ref());

        if matches.get_flag("decode") {
            flags.operation = Some(Operation::Decode);
        } else if matches.get_flag("encode") {
            flags.operation = Some(Operation::Encode);
        }

        if let Some(name) = matches.get_one::<String>("alphabet") {
            flags.alphabet = name.parse().map_err(|_| ParamError)?;
        }

        match matches.get_one::<PathBuf>("file") {
            None => flags.input = Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => flags.input = Input::Stdin,
            Some(p) => flags.input = Input::File(p.clone()),
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                log::error!("{}", err);
                eprintln!("lzstr: {}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!("lzstr failed irrecoverably! This should never happen and is a bug.");
                eprintln!("Please report it together with the input that caused it.");
                std::process::ExitCode::from(128)
            }
        }
    }
}
