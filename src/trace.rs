// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Tracing of executed instructions
use std::fmt::{self, Display};

use super::internals::{Effect, Next};
use super::{Instruction, Machine, OpCode, ParamMode};

#[derive(Debug, PartialEq, Eq, Clone)]
/// Information about an instruction the machine executed, which can be queried with its various
/// methods, or converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    pc: usize,
    op_int: i64,
    instr: Instruction,
    loaded: [i64; 2],
    stored: Option<(i64, i64)>,
    next_pc: Option<usize>,
}

impl TracedInstr {
    pub(crate) fn build(pc: usize, op_int: i64, instr: Instruction, effect: &Effect) -> Self {
        Self {
            pc,
            op_int,
            instr,
            loaded: effect.loaded,
            stored: effect.stored,
            next_pc: match effect.next {
                Next::Jump(dest) => Some(dest),
                Next::Halt | Next::Await => None,
            },
        }
    }

    /// Return the program counter when the traced instruction was executed
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Return the actual integer of the traced instruction
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    /// Return the opcode of the traced instruction
    pub fn op_code(&self) -> OpCode {
        self.instr.opcode()
    }

    /// Return the decoded instruction
    pub fn instruction(&self) -> Instruction {
        self.instr
    }

    /// Return the parameter modes of the traced instruction
    pub fn param_modes(&self) -> Vec<ParamMode> {
        self.instr.params().into_iter().map(|p| p.mode).collect()
    }

    /// Return the values the instruction read from its parameters, in order
    pub fn loaded(&self) -> &[i64] {
        let n = match self.op_code() {
            OpCode::Halt | OpCode::In => 0,
            OpCode::Out => 1,
            _ => 2,
        };
        &self.loaded[..n]
    }

    /// If the instruction stored a value, return that value
    pub fn stored_val(&self) -> Option<i64> {
        self.stored.map(|(_, val)| val)
    }

    /// If the instruction stored a value, return the address it was stored at
    pub fn stored_at(&self) -> Option<i64> {
        self.stored.map(|(address, _)| address)
    }

    /// The program counter after the instruction, or [None] if it halted the machine
    pub fn next_pc(&self) -> Option<usize> {
        self.next_pc
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: op int {: <5} | ",
            self.pc, self.op_int
        )?;
        let opcode = self.op_code();
        let [va, vb] = self.loaded;
        let stored = self.stored_val().unwrap_or_default();

        match self.instr {
            Instruction::Add(a, b, dest)
            | Instruction::Mul(a, b, dest)
            | Instruction::Lt(a, b, dest)
            | Instruction::Eq(a, b, dest) => write!(
                f,
                "[{opcode} {a} (resolves to {va}), {b} (resolves to {vb}), {dest} (stored {stored})]"
            ),
            Instruction::Jnz(cond, target) | Instruction::Jz(cond, target) => {
                let jumped = (opcode == OpCode::Jnz) == (va != 0);
                write!(
                    f,
                    "[{opcode} {cond} (resolves to {va}), {target} ({} to {vb})]",
                    if jumped { "jumped" } else { "didn't jump" }
                )
            }
            Instruction::In(dest) => write!(f, "[{opcode} {dest} (stored {stored})]"),
            Instruction::Out(src) => write!(f, "[{opcode} {src} (resolves to {va})]"),
            Instruction::Halt => write!(f, "[HALT]"),
        }
    }
}

impl<I, O> Machine<I, O> {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    ///# use intcode::prelude::*;
    /// let mut machine = QueueMachine::from_program([1101, 90, 9, 4, 0]);
    /// machine.start_trace();
    /// machine.step().unwrap();
    /// let trace = machine.end_trace().unwrap();
    /// assert_eq!(trace.0[0].stored_val(), Some(99));
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions into a [Trace]. If no trace was active, returns [`None`]
    ///
    /// see [Machine::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// A log of instructions that a [Machine] has executed since a call to [Machine::start_trace]
///
/// see [Machine::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|instr| writeln!(f, "{instr}"))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn traced(code: impl IntoIterator<Item = i64>, inputs: &[i64]) -> Vec<String> {
        let mut machine = QueueMachine::from_program(code);
        machine.start_trace();
        machine.run_through_inputs(inputs.iter().copied()).unwrap();
        machine
            .end_trace()
            .unwrap()
            .0
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn display() {
        assert_eq!(
            traced([1002, 4, 3, 4, 33], &[]),
            [
                "ran instruction at 0000: op int 1002  | [MUL 4 (resolves to 33), #3 (resolves to 3), 4 (stored 99)]",
                "ran instruction at 0004: op int 99    | [HALT]",
            ]
        );
        assert_eq!(
            traced([3, 9, 1005, 9, 6, 99, 4, 9, 99, 0], &[5]),
            [
                "ran instruction at 0000: op int 3     | [IN 9 (stored 5)]",
                "ran instruction at 0002: op int 1005  | [JNZ 9 (resolves to 5), #6 (jumped to 6)]",
                "ran instruction at 0006: op int 4     | [OUT 9 (resolves to 5)]",
                "ran instruction at 0008: op int 99    | [HALT]",
            ]
        );
    }

    #[test]
    fn awaiting_is_not_traced() {
        let mut machine = QueueMachine::from_program([3, 3, 99, 0]);
        machine.start_trace();
        assert_eq!(machine.run_through_inputs(empty()), Ok((vec![], State::Awaiting)));
        assert!(machine.show_trace().unwrap().0.is_empty());
        machine.run_through_inputs([1]).unwrap();
        let trace = machine.end_trace().unwrap();
        assert_eq!(trace.0.len(), 2);
        assert_eq!(trace.0[0].stored_at(), Some(3));
        assert_eq!(trace.0[1].next_pc(), None);
    }
}
