// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Disassembler-related functionality
//!
//! See [disassemble] for documentation

use itertools::Itertools;

use super::{Instruction, Memory};

/// Decode the instruction at `pc`, but only if re-encoding it reproduces the exact same int.
fn decode_strict(mem: &Memory, pc: usize) -> Option<Instruction> {
    let instr = Instruction::decode(mem, pc).ok()?;
    (instr.op_int() == mem[pc]).then_some(instr)
}

/// Walk `mem` from the start, returning the address and text of each line of the listing.
///
/// Ints that don't start a strictly decodable instruction are grouped into `DATA` lines, which end
/// at the next int that does.
fn listing(mem: &Memory) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pc = 0;
    while pc < mem.len() {
        if let Some(instr) = decode_strict(mem, pc) {
            lines.push((pc, instr.to_string()));
            pc += instr.width();
        } else {
            let run = (pc..mem.len())
                .take_while(|&i| i == pc || decode_strict(mem, i).is_none())
                .count();
            let data = mem.as_slice()[pc..pc + run].iter().join(", ");
            lines.push((pc, format!("DATA {data}")));
            pc += run;
        }
    }
    lines
}

/// Create a listing of the memory, one line per instruction
///
/// # Example
///
/// ```
/// use intcode::disasm::disassemble;
/// let listing = disassemble([1002, 4, 3, 4, 33]);
/// assert_eq!(listing, "MUL 4, #3, 4\nDATA 33\n");
/// ```
///
/// # Caveats
///
/// ## Naïve Approach to Ambiguity
///
/// Due to the ability to jump to any index, it's ambiguous where an instruction begins, and there's
/// no way to tell whether a given int in memory is meant as code or as data.
///
/// The approach this function uses is to start at the beginning of `mem_iter`, and treat the first
/// valid opcode that doesn't have ignored opcode digits as the start of an instruction. Anything
/// else is grouped into `DATA` lines.
///
/// ```
/// use intcode::{prelude::*, disasm::disassemble};
/// const HALT_WITH_MODES: i64 = 21299; // a HALT instruction with ignored parameter modes
/// let mut machine = QueueMachine::from_program([HALT_WITH_MODES]);
/// assert_eq!(machine.run_through_inputs(empty()).unwrap(), (vec![], State::Halted));
/// assert_eq!(disassemble([HALT_WITH_MODES]), "DATA 21299\n");
/// ```
///
/// ## Self-modifying Code
///
/// Because Intcode programs can modify themselves, the listing only shows their code as it exists
/// at a specific point in time, and not what an instruction will look like when it's executed.
pub fn disassemble(mem_iter: impl IntoIterator<Item = i64>) -> String {
    let mem: Memory = mem_iter.into_iter().collect();
    listing(&mem)
        .into_iter()
        .map(|(_, line)| format!("{line}\n"))
        .collect()
}

/// Like [disassemble], but with each line prefixed by the address it starts at
///
/// ```
/// use intcode::disasm::disassemble_with_addresses;
/// assert_eq!(
///     disassemble_with_addresses([3, 0, 4, 0, 99]),
///     "0000: IN 0\n0002: OUT 0\n0004: HALT\n"
/// );
/// ```
pub fn disassemble_with_addresses(mem_iter: impl IntoIterator<Item = i64>) -> String {
    let mem: Memory = mem_iter.into_iter().collect();
    listing(&mem)
        .into_iter()
        .map(|(address, line)| format!("{address:0>4}: {line}\n"))
        .collect()
}
