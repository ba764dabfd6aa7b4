// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Loading Intcode programs from text or binary images

use std::error::Error;
use std::fmt::{self, Display};
use std::num::ParseIntError;

/// An error loading a program
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ProgramError {
    /// An entry in a comma-separated program was not a valid integer
    InvalidInt {
        /// the index of the entry within the program
        index: usize,
        /// the text of the entry
        text: String,
        /// why it could not be parsed
        source: ParseIntError,
    },
    /// The program text was not valid UTF-8
    NotUtf8,
    /// A binary image's length was not a multiple of 8 bytes
    IncompleteI64(Box<[u8]>),
}

impl Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::InvalidInt {
                index,
                text,
                source,
            } => write!(f, "entry {index} ({text:?}) is not a valid integer: {source}"),
            ProgramError::NotUtf8 => write!(f, "program text is not valid UTF-8"),
            ProgramError::IncompleteI64(rem) => {
                write!(f, "expected 8 bytes, got {}: {rem:02x?}", rem.len())
            }
        }
    }
}

impl Error for ProgramError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProgramError::InvalidInt { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parse comma-separated decimal integers, as used for Advent of Code puzzle inputs.
///
/// Whitespace around each entry is ignored, and empty (or all-whitespace) text is an empty
/// program.
///
/// ```
/// use intcode::program::parse_program;
/// assert_eq!(parse_program("1,9,10,3,\n2,3,11,0,99\n"), Ok(vec![1, 9, 10, 3, 2, 3, 11, 0, 99]));
/// assert!(parse_program("1,,2").is_err());
/// ```
pub fn parse_program(text: &str) -> Result<Vec<i64>, ProgramError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, entry)| {
            entry.parse().map_err(|source| ProgramError::InvalidInt {
                index,
                text: entry.to_owned(),
                source,
            })
        })
        .collect()
}

/// Format of a stored Intcode program
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "bin", derive(clap::ValueEnum))]
pub enum CodeFormat {
    /// comma-separated ASCII-encoded decimal numbers
    #[default]
    #[cfg_attr(feature = "bin", value(alias("text"), alias("aoc")))]
    Ascii,
    /// little-endian 64-bit integers
    #[cfg_attr(
        all(feature = "bin", target_endian = "little"),
        value(alias("binary-native"))
    )]
    #[cfg_attr(feature = "bin", value(name("binary-little-endian"), alias("binle")))]
    LittleEndian,
    /// big-endian 64-bit integers
    #[cfg_attr(
        all(feature = "bin", target_endian = "big"),
        value(alias("binary-native"))
    )]
    #[cfg_attr(feature = "bin", value(name("binary-big-endian"), alias("binbe")))]
    BigEndian,
}

fn load_bin<F: Fn([u8; 8]) -> i64>(input: &[u8], func: F) -> Result<Vec<i64>, ProgramError> {
    let chunks = input.chunks_exact(8);
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        return Err(ProgramError::IncompleteI64(Box::from(remainder)));
    }
    Ok(chunks
        .map(|c| {
            let mut word = [0; 8];
            word.copy_from_slice(c);
            func(word)
        })
        .collect())
}

impl CodeFormat {
    /// Load a program stored in this format
    pub fn load(self, input: &[u8]) -> Result<Vec<i64>, ProgramError> {
        match self {
            CodeFormat::Ascii => {
                parse_program(std::str::from_utf8(input).map_err(|_| ProgramError::NotUtf8)?)
            }
            CodeFormat::LittleEndian => load_bin(input, i64::from_le_bytes),
            CodeFormat::BigEndian => load_bin(input, i64::from_be_bytes),
        }
    }
}
