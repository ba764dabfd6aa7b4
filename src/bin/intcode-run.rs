// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an Intcode program, with inputs from the command line or the terminal

use clap::Parser;
use env_logger::Env;
use intcode::ports::{Console, Inputs};
use intcode::program::CodeFormat;
use intcode::{InputPort, Machine, Memory, State};
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode interpreter", long_about = None)]
struct Args {
    #[arg(help = "The program to run")]
    source: PathBuf,
    #[arg(help = "Format of the program")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(short, long = "input", allow_hyphen_values = true)]
    #[arg(help = "Value to feed to an IN instruction (can be repeated)")]
    inputs: Vec<i64>,
    #[arg(long, conflicts_with = "inputs")]
    #[arg(help = "Read input values from stdin, one per line")]
    interactive: bool,
    #[arg(long = "set", value_parser = parse_poke)]
    #[arg(help = "Set ADDRESS to VALUE before running (ADDRESS=VALUE)")]
    pokes: Vec<(i64, i64)>,
    #[arg(short, long = "peek", allow_hyphen_values = true)]
    #[arg(help = "Print the value at this address after running (can be repeated)")]
    peek: Vec<i64>,
    #[arg(long)]
    #[arg(help = "Pad memory with zeroes up to this size")]
    pad: Option<usize>,
    #[arg(long)]
    #[arg(help = "Log every executed instruction to stderr")]
    trace: bool,
}

fn parse_poke(s: &str) -> Result<(i64, i64), String> {
    let (address, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=VALUE, got {s:?}"))?;
    let parse = |n: &str| n.trim().parse::<i64>().map_err(|e| format!("{n:?}: {e}"));
    Ok((parse(address)?, parse(value)?))
}

fn main() -> Result<ExitCode, DisplayedError> {
    let args = Args::parse();
    let filter = if args.trace { "intcode=trace" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    let code = args.format.load(&fs::read(&args.source)?)?;
    log::info!("loaded {} ints from {}", code.len(), args.source.display());
    let memory = Memory::padded(code, args.pad.unwrap_or_default());

    let input: Box<dyn InputPort> = if args.interactive {
        Box::new(Console::new(io::stdin().lock(), io::stderr()).with_prompt("input> "))
    } else {
        Box::new(Inputs(args.inputs.into_iter()))
    };
    let output = Console::new(io::empty(), io::stdout());
    let mut machine = Machine::new(memory, input, output);

    for (address, value) in args.pokes {
        machine.write(address, value)?;
    }

    let state = machine.run()?;
    for address in args.peek {
        println!("[{address}] = {}", machine.read(address)?);
    }

    if state == State::Awaiting {
        log::error!("program stopped waiting for input at {}", machine.pc());
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
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
