// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing an Intcode virtual machine with pluggable I/O
//!
//! The machine implements the [Opcodes] and the positional and immediate [Parameter Modes] of the
//! Intcode computer as completed for [Day 5]. Memory is a fixed-size array, and any access outside
//! of it, unknown opcode, or bad parameter mode stops the machine with a [Fault] rather than being
//! silently ignored.
//!
//! # Example
//!
//! ```rust
//! use intcode::prelude::*;
//! let mut machine = QueueMachine::from_program(vec![104, 1024, 99]);
//!
//! assert_eq!(
//!     machine.run_through_inputs(empty()).unwrap(),
//!     (vec![1024], State::Halted)
//! );
//! ```
//!
//! Input and output go through the [InputPort] and [OutputPort] traits, so the same machine can
//! be driven by a fixed list of inputs, a terminal, or another machine. See the [ports] module.
//!
//! ```rust
//! use intcode::prelude::*;
//! // outputs 1 if its input is 8, otherwise 0
//! let code = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
//! let mut outputs: Vec<i64> = Vec::new();
//! let mut machine = Machine::new(code, Inputs([8].into_iter()), &mut outputs);
//! assert_eq!(machine.run(), Ok(State::Halted));
//! drop(machine);
//! assert_eq!(outputs, vec![1]);
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes
//! [Parameter Modes]: https://esolangs.org/wiki/Intcode#Parameter_Modes
//! [Day 5]: https://adventofcode.com/2019/day/5

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display};
use std::ops::Index;

use itertools::Itertools;

mod internals;
mod memory;

pub mod amplifier;
pub mod disasm;
pub mod ports;
pub mod program;
pub mod trace;

pub use memory::{AddressFault, Memory};
pub use ports::{InputPort, OutputPort, PortError};
use trace::{Trace, TracedInstr};

/// A small module that re-exports items needed when working with the Intcode machine
pub mod prelude {
    pub use crate::ports::{Discard, InputPort, Inputs, OutputPort};
    pub use crate::{Machine, QueueMachine, State, StepOutcome};
    pub use std::iter::empty;
}

/// The state of the machine, returned whenever it has stopped without a fault.
///
/// [Awaiting](State::Awaiting) means that there are more instructions to execute, but the
/// [InputPort] had no value for the next `IN` instruction.
///
/// [Halted](State::Halted) means that a `HALT` instruction has been executed. Once it's been
/// returned, no more instructions will be executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution is awaiting input
    Awaiting,
    /// Execution has halted
    Halted,
}

/// The result of executing a single instruction
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    /// The instruction executed, and the machine can keep going
    Running,
    /// The machine stopped
    Stopped(State),
}

/// Where a [Machine] is in its lifecycle
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Status {
    /// Ready to execute the instruction at the program counter
    Ready,
    /// Stopped at an `IN` instruction that had no input available
    Awaiting,
    /// Executed a `HALT` instruction
    Halted,
    /// Stopped by a [Fault], which will be returned again by any further attempt to run
    Faulted(Fault),
}

/// Intcode opcodes
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(missing_docs, reason = "trivial")]
pub enum OpCode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    Lt = 7,
    Eq = 8,
    Halt = 99,
}

impl OpCode {
    /// Every opcode, in numeric order
    pub const ALL: [OpCode; 9] = [
        OpCode::Add,
        OpCode::Mul,
        OpCode::In,
        OpCode::Out,
        OpCode::Jnz,
        OpCode::Jz,
        OpCode::Lt,
        OpCode::Eq,
        OpCode::Halt,
    ];

    /// The number of parameters an instruction with this opcode takes
    pub const fn param_count(self) -> usize {
        match self {
            OpCode::Halt => 0,
            OpCode::In | OpCode::Out => 1,
            OpCode::Jnz | OpCode::Jz => 2,
            OpCode::Add | OpCode::Mul | OpCode::Lt | OpCode::Eq => 3,
        }
    }

    /// The assembly mnemonic for this opcode
    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Add => "ADD",
            OpCode::Mul => "MUL",
            OpCode::In => "IN",
            OpCode::Out => "OUT",
            OpCode::Jnz => "JNZ",
            OpCode::Jz => "JZ",
            OpCode::Lt => "LT",
            OpCode::Eq => "EQ",
            OpCode::Halt => "HALT",
        }
    }
}

impl TryFrom<i64> for OpCode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, i64> {
        match i {
            1 => Ok(OpCode::Add),
            2 => Ok(OpCode::Mul),
            3 => Ok(OpCode::In),
            4 => Ok(OpCode::Out),
            5 => Ok(OpCode::Jnz),
            6 => Ok(OpCode::Jz),
            7 => Ok(OpCode::Lt),
            8 => Ok(OpCode::Eq),
            99 => Ok(OpCode::Halt),
            n => Err(n),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Parameter mode for Intcode instruction
///
/// Intcode instruction parameters each have a mode: [positional] or [immediate].
///
/// [positional]: ParamMode::Positional
/// [immediate]: ParamMode::Immediate
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ParamMode {
    /// Positional Mode
    ///
    /// A parameter in positional mode evaluates to the value at the address specified by the
    /// parameter.
    Positional = 0,
    /// Immediate Mode
    ///
    /// A parameter in immediate mode evaluates directly to the value specified. Instructions which
    /// write to memory may not use immediate mode for their destinations.
    #[doc(alias = "#")]
    Immediate = 1,
}

impl TryFrom<i64> for ParamMode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, i64> {
        match i {
            0 => Ok(ParamMode::Positional),
            1 => Ok(ParamMode::Immediate),
            n => Err(n),
        }
    }
}

impl Display for ParamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamMode::Positional => Ok(()),
            ParamMode::Immediate => f.write_str("#"),
        }
    }
}

/// A single instruction parameter: the raw int from memory, and the mode it's interpreted with
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Param {
    /// The int stored in memory for this parameter
    pub raw: i64,
    /// How to interpret `raw`
    pub mode: ParamMode,
}

impl Param {
    /// Create a new parameter
    pub const fn new(raw: i64, mode: ParamMode) -> Self {
        Self { raw, mode }
    }

    /// Resolve the parameter to a value
    pub fn load(self, mem: &Memory) -> Result<i64, FaultKind> {
        match self.mode {
            ParamMode::Positional => Ok(mem.read(self.raw)?),
            ParamMode::Immediate => Ok(self.raw),
        }
    }

    /// Store `value` at the address the parameter refers to
    pub fn store(self, mem: &mut Memory, value: i64) -> Result<(), FaultKind> {
        match self.mode {
            ParamMode::Positional => Ok(mem.write(self.raw, value)?),
            ParamMode::Immediate => Err(FaultKind::WriteToImmediate(self.raw)),
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode, self.raw)
    }
}

/// A decoded Intcode instruction
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(missing_docs, reason = "trivial")]
pub enum Instruction {
    Halt,
    Add(Param, Param, Param),
    Mul(Param, Param, Param),
    In(Param),
    Out(Param),
    Jnz(Param, Param),
    Jz(Param, Param),
    Lt(Param, Param, Param),
    Eq(Param, Param, Param),
}

impl Instruction {
    /// The opcode of the instruction
    pub const fn opcode(&self) -> OpCode {
        match self {
            Instruction::Halt => OpCode::Halt,
            Instruction::Add(..) => OpCode::Add,
            Instruction::Mul(..) => OpCode::Mul,
            Instruction::In(_) => OpCode::In,
            Instruction::Out(_) => OpCode::Out,
            Instruction::Jnz(..) => OpCode::Jnz,
            Instruction::Jz(..) => OpCode::Jz,
            Instruction::Lt(..) => OpCode::Lt,
            Instruction::Eq(..) => OpCode::Eq,
        }
    }

    /// The parameters of the instruction, in order
    pub fn params(&self) -> Vec<Param> {
        match *self {
            Instruction::Halt => vec![],
            Instruction::In(a) | Instruction::Out(a) => vec![a],
            Instruction::Jnz(a, b) | Instruction::Jz(a, b) => vec![a, b],
            Instruction::Add(a, b, c)
            | Instruction::Mul(a, b, c)
            | Instruction::Lt(a, b, c)
            | Instruction::Eq(a, b, c) => vec![a, b, c],
        }
    }

    /// The number of ints the instruction occupies in memory
    pub const fn width(&self) -> usize {
        1 + self.opcode().param_count()
    }

    /// Re-encode the instruction as its opcode-and-modes word
    pub fn op_int(&self) -> i64 {
        self.params()
            .iter()
            .zip([100, 1000, 10000])
            .fold(self.opcode() as i64, |acc, (p, scale)| {
                acc + p.mode as i64 * scale
            })
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params();
        if params.is_empty() {
            write!(f, "{}", self.opcode())
        } else {
            write!(f, "{} {}", self.opcode(), params.iter().join(", "))
        }
    }
}

/// The reason a [Machine] faulted
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FaultKind {
    /// Memory was accessed out of bounds
    Address(AddressFault),
    /// The opcode-and-modes word contained an unrecognized opcode
    UnrecognizedOpcode(i64),
    /// The opcode-and-modes word contained a parameter mode other than 0 or 1
    UnknownMode {
        /// the opcode-and-modes word
        word: i64,
        /// the offending mode digit
        digit: i64,
    },
    /// An instruction tried to write to an immediate destination
    WriteToImmediate(i64),
    /// An I/O port failed
    Port(PortError),
}

/// The broad category of a [FaultKind]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(missing_docs, reason = "trivial")]
pub enum FaultClass {
    Address,
    Decode,
    Mode,
    Port,
}

impl FaultKind {
    /// The category the fault falls into
    pub const fn class(&self) -> FaultClass {
        match self {
            FaultKind::Address(_) => FaultClass::Address,
            FaultKind::UnrecognizedOpcode(_) => FaultClass::Decode,
            FaultKind::UnknownMode { .. } | FaultKind::WriteToImmediate(_) => FaultClass::Mode,
            FaultKind::Port(_) => FaultClass::Port,
        }
    }
}

impl Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Address(e) => Display::fmt(e, f),
            FaultKind::UnrecognizedOpcode(word) => {
                write!(f, "encountered unrecognized opcode {} in {word}", word % 100)
            }
            FaultKind::UnknownMode { word, digit } => {
                write!(f, "encountered unknown parameter mode {digit} in {word}")
            }
            FaultKind::WriteToImmediate(i) => {
                write!(f, "code attempted to write to immediate {i}")
            }
            FaultKind::Port(e) => write!(f, "I/O port failed: {e}"),
        }
    }
}

impl Error for FaultKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FaultKind::Address(e) => Some(e),
            FaultKind::Port(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AddressFault> for FaultKind {
    fn from(err: AddressFault) -> Self {
        Self::Address(err)
    }
}

impl From<PortError> for FaultKind {
    fn from(err: PortError) -> Self {
        Self::Port(err)
    }
}

/// A fault that stopped a [Machine], along with the program counter it happened at
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Fault {
    /// The address of the instruction that faulted
    pub pc: usize,
    /// What went wrong
    pub kind: FaultKind,
}

impl Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault at instruction {}: {}", self.pc, self.kind)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

/// An Intcode machine, which owns its memory and program counter, and talks to the outside world
/// through an [InputPort] and an [OutputPort].
#[derive(Debug, Clone)]
pub struct Machine<I, O> {
    pc: usize,
    memory: Memory,
    input: I,
    output: O,
    status: Status,
    trace: Option<Trace>,
}

/// A [Machine] with a queue of pending inputs and a [Vec] collecting its outputs
pub type QueueMachine = Machine<VecDeque<i64>, Vec<i64>>;

impl<I, O> Machine<I, O> {
    /// Create a new machine. Collects `code` into the starting memory state.
    pub fn new(code: impl IntoIterator<Item = i64>, input: I, output: O) -> Self {
        Self {
            pc: 0,
            memory: code.into_iter().collect(),
            input,
            output,
            status: Status::Ready,
            trace: None,
        }
    }

    /// The address of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Where the machine is in its lifecycle
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// A view of the machine's memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Get the memory at `address`
    #[doc(alias = "peek")]
    pub fn read(&self, address: i64) -> Result<i64, AddressFault> {
        self.memory.read(address)
    }

    /// Manually set a memory location, e.g. to patch a program before running it
    #[doc(alias = "poke")]
    pub fn write(&mut self, address: i64, value: i64) -> Result<(), AddressFault> {
        self.memory.write(address, value)
    }

    /// The machine's input port
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// The machine's output port
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Take the machine apart into its memory and ports
    pub fn into_parts(self) -> (Memory, I, O) {
        (self.memory, self.input, self.output)
    }
}

impl<I: InputPort, O: OutputPort> Machine<I, O> {
    /// Execute a single instruction.
    ///
    /// If the machine has already halted, this does nothing and reports [State::Halted], and if
    /// it has faulted, it returns the same fault again.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        self.step_observed(None)
    }

    /// Execute until the program halts, or needs input that its [InputPort] can't provide.
    ///
    /// On a fault, returns a [Fault] describing it. The machine is left in the
    /// [Faulted](Status::Faulted) state, and will not execute any more instructions.
    pub fn run(&mut self) -> Result<State, Fault> {
        self.run_observed(None)
    }

    /// Like [Machine::run], but calls `observer` after each instruction is executed
    ///
    /// ```
    /// use intcode::prelude::*;
    /// let mut machine = QueueMachine::from_program([1101, 2, 3, 5, 99, 0]);
    /// let mut seen = Vec::new();
    /// machine.run_with_observer(|instr| seen.push(instr.pc())).unwrap();
    /// assert_eq!(seen, vec![0, 4]);
    /// ```
    pub fn run_with_observer(
        &mut self,
        mut observer: impl FnMut(&TracedInstr),
    ) -> Result<State, Fault> {
        self.run_observed(Some(&mut observer))
    }

    fn run_observed(
        &mut self,
        mut observer: Option<&mut (dyn FnMut(&TracedInstr) + '_)>,
    ) -> Result<State, Fault> {
        loop {
            if let StepOutcome::Stopped(state) = self.step_observed(observer.as_deref_mut())? {
                log::debug!("machine stopped at {}: {state:?}", self.pc);
                break Ok(state);
            }
        }
    }

    fn step_observed(
        &mut self,
        observer: Option<&mut (dyn FnMut(&TracedInstr) + '_)>,
    ) -> Result<StepOutcome, Fault> {
        match &self.status {
            Status::Halted => return Ok(StepOutcome::Stopped(State::Halted)),
            Status::Faulted(fault) => return Err(fault.clone()),
            Status::Ready | Status::Awaiting => (),
        }
        match self.exec_instruction(observer) {
            Ok(outcome) => {
                self.status = match outcome {
                    StepOutcome::Running => Status::Ready,
                    StepOutcome::Stopped(State::Awaiting) => Status::Awaiting,
                    StepOutcome::Stopped(State::Halted) => Status::Halted,
                };
                Ok(outcome)
            }
            Err(kind) => {
                let fault = Fault { pc: self.pc, kind };
                log::warn!("{fault}");
                self.status = Status::Faulted(fault.clone());
                Err(fault)
            }
        }
    }
}

impl QueueMachine {
    /// Create a machine with an empty input queue and output list
    pub fn from_program(code: impl IntoIterator<Item = i64>) -> Self {
        Self::new(code, VecDeque::new(), Vec::new())
    }

    /// Queue up `inputs`, then execute until the program halts or runs out of input.
    ///
    /// Returns `Ok((v, s))`, where `v` is a [`Vec<i64>`] containing all outputs produced during
    /// this call, and `s` is the [`State`] at the time it stopped.
    pub fn run_through_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<i64>, State), Fault> {
        self.input.extend(inputs);
        let result = self.run();
        let outputs = std::mem::take(&mut self.output);
        result.map(|state| (outputs, state))
    }
}

impl<I, O> Index<usize> for Machine<I, O> {
    type Output = i64;

    fn index(&self, i: usize) -> &Self::Output {
        &self.memory[i]
    }
}
