// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use clap::Parser;
use env_logger::Env;
use intcode::disasm::{disassemble, disassemble_with_addresses};
use intcode::program::CodeFormat;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));
const INTCODE_HELP: &str = "File containing the intcode\nuses stdin if unset or set to '-'";
const OUTPUT_HELP: &str = "Output file for the listing\nuses stdout if unset or set to '-'";

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode disassembler", long_about = None)]
struct Args {
    #[arg(help = INTCODE_HELP.split_once("\n").unwrap().0)]
    #[arg(long_help = INTCODE_HELP)]
    input: Option<PathBuf>,
    #[arg(help = OUTPUT_HELP.split_once("\n").unwrap().0)]
    #[arg(long_help = OUTPUT_HELP)]
    output: Option<PathBuf>,
    #[arg(help = "Format of the intcode")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(short, long)]
    #[arg(help = "Prefix each line with its address")]
    addresses: bool,
}

fn main() -> Result<(), DisplayedError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
    let args = Args::parse();
    let input = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read(path)?,
        _ => {
            let mut v = Vec::new();
            io::stdin().read_to_end(&mut v)?;
            v
        }
    };

    let code = args.format.load(&input)?;
    log::info!("disassembling {} ints", code.len());

    let disassembly = if args.addresses {
        disassemble_with_addresses(code)
    } else {
        disassemble(code)
    };

    match args.output.as_deref() {
        Some(outfile) if outfile.as_os_str() != "-" => fs::write(outfile, disassembly.as_bytes())?,
        _ => print!("{disassembly}"),
    }

    Ok(())
}

/// a wrapper around a [`Box`ed][Box] [dyn Error][Error] that uses its implementation of [Display]
/// for the [Debug] impl, to display the Error if returned from `main`
struct DisplayedError(Box<dyn Error>);
impl<E: Error + 'static> From<E> for DisplayedError {
    fn from(e: E) -> Self {
        Self(Box::from(e))
    }
}

impl Debug for DisplayedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
