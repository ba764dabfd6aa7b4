// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;

/// Convert an in-bounds index into an address
pub(crate) fn addr(i: usize) -> i64 {
    i64::try_from(i).unwrap_or(i64::MAX)
}

/// What to do after an instruction is executed
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) enum Next {
    Jump(usize),
    Halt,
    Await,
}

/// Everything an executed instruction did, for tracing purposes
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct Effect {
    pub(crate) next: Next,
    /// values of the parameters the instruction read, in order
    pub(crate) loaded: [i64; 2],
    /// address and value of the memory write, if any
    pub(crate) stored: Option<(i64, i64)>,
}

impl Effect {
    const fn new(next: Next) -> Self {
        Self {
            next,
            loaded: [0; 2],
            stored: None,
        }
    }
}

impl Instruction {
    /// Decode the instruction starting at `pc` in `mem`.
    ///
    /// Given a 5 digit number, digits ABCDE are used as follows:
    /// DE is the two-digit opcode
    /// C is the 1st parameter's mode
    /// B is the 2nd parameter's mode
    /// A is the 3rd parameter's mode
    ///
    /// So `1002` is parsed as opcode 02 (multiply), with its 1st parameter in positional mode, its
    /// 2nd in immediate mode, and its 3rd (the leading zero that isn't written) in positional mode.
    ///
    /// Mode digits past the parameters the opcode takes are ignored. Destination parameters in
    /// immediate mode are rejected here, before anything is executed.
    ///
    /// ```
    /// use intcode::{Instruction, Memory, Param, ParamMode};
    /// let mem: Memory = [1002, 4, 3, 4, 33].into_iter().collect();
    /// assert_eq!(
    ///     Instruction::decode(&mem, 0),
    ///     Ok(Instruction::Mul(
    ///         Param::new(4, ParamMode::Positional),
    ///         Param::new(3, ParamMode::Immediate),
    ///         Param::new(4, ParamMode::Positional),
    ///     ))
    /// );
    /// ```
    pub fn decode(mem: &Memory, pc: usize) -> Result<Self, FaultKind> {
        let base = addr(pc);
        let word = mem.read(base)?;
        let opcode = OpCode::try_from(word % 100).map_err(|_| FaultKind::UnrecognizedOpcode(word))?;
        if opcode == OpCode::Halt {
            return Ok(Instruction::Halt);
        }

        let modes = word / 100;
        let param = |i: u32| -> Result<Param, FaultKind> {
            let digit = modes / 10_i64.pow(i) % 10;
            let mode = ParamMode::try_from(digit).map_err(|_| FaultKind::UnknownMode { word, digit })?;
            let raw = mem.read(base + 1 + i64::from(i))?;
            Ok(Param::new(raw, mode))
        };
        let dest = |i: u32| -> Result<Param, FaultKind> {
            let p = param(i)?;
            match p.mode {
                ParamMode::Positional => Ok(p),
                ParamMode::Immediate => Err(FaultKind::WriteToImmediate(p.raw)),
            }
        };

        Ok(match opcode {
            OpCode::Add => Instruction::Add(param(0)?, param(1)?, dest(2)?),
            OpCode::Mul => Instruction::Mul(param(0)?, param(1)?, dest(2)?),
            OpCode::In => Instruction::In(dest(0)?),
            OpCode::Out => Instruction::Out(param(0)?),
            OpCode::Jnz => Instruction::Jnz(param(0)?, param(1)?),
            OpCode::Jz => Instruction::Jz(param(0)?, param(1)?),
            OpCode::Lt => Instruction::Lt(param(0)?, param(1)?, dest(2)?),
            OpCode::Eq => Instruction::Eq(param(0)?, param(1)?, dest(2)?),
            OpCode::Halt => unreachable!("handled above"),
        })
    }
}

/// common logic of all 4 instructions that take 3 parameters
fn op3(
    mem: &mut Memory,
    (a, b, dest): (Param, Param, Param),
    next: Next,
    operation: impl Fn(i64, i64) -> i64,
) -> Result<Effect, FaultKind> {
    let a = a.load(mem)?;
    let b = b.load(mem)?;
    let val = operation(a, b);
    dest.store(mem, val)?;
    Ok(Effect {
        next,
        loaded: [a, b],
        stored: Some((dest.raw, val)),
    })
}

fn jump(
    mem: &Memory,
    (cond, target): (Param, Param),
    next: Next,
    func: impl Fn(i64) -> bool,
) -> Result<Effect, FaultKind> {
    let cond = cond.load(mem)?;
    let target = target.load(mem)?;
    let next = if func(cond) {
        let dest = usize::try_from(target).map_err(|_| AddressFault {
            address: target,
            len: mem.len(),
        })?;
        Next::Jump(dest)
    } else {
        next
    };
    Ok(Effect {
        next,
        loaded: [cond, target],
        stored: None,
    })
}

/// Execute `instr`, which was decoded at `pc`.
///
/// Arithmetic wraps on overflow.
pub(crate) fn execute(
    instr: Instruction,
    mem: &mut Memory,
    pc: usize,
    input: &mut impl InputPort,
    output: &mut impl OutputPort,
) -> Result<Effect, FaultKind> {
    let advance = Next::Jump(pc + instr.width());
    match instr {
        Instruction::Halt => Ok(Effect::new(Next::Halt)),
        Instruction::Add(a, b, c) => op3(mem, (a, b, c), advance, i64::wrapping_add),
        Instruction::Mul(a, b, c) => op3(mem, (a, b, c), advance, i64::wrapping_mul),
        Instruction::Lt(a, b, c) => op3(mem, (a, b, c), advance, |a, b| i64::from(a < b)),
        Instruction::Eq(a, b, c) => op3(mem, (a, b, c), advance, |a, b| i64::from(a == b)),
        Instruction::In(dest) => {
            let Some(value) = input.next_input()? else {
                return Ok(Effect::new(Next::Await));
            };
            dest.store(mem, value)?;
            Ok(Effect {
                next: advance,
                loaded: [0; 2],
                stored: Some((dest.raw, value)),
            })
        }
        Instruction::Out(src) => {
            let value = src.load(mem)?;
            output.emit(value)?;
            Ok(Effect {
                next: advance,
                loaded: [value, 0],
                stored: None,
            })
        }
        Instruction::Jnz(a, b) => jump(mem, (a, b), advance, |v| v != 0),
        Instruction::Jz(a, b) => jump(mem, (a, b), advance, |v| v == 0),
    }
}

impl<I: InputPort, O: OutputPort> Machine<I, O> {
    /// Decode and execute the instruction at the program counter.
    ///
    /// On error, the program counter is left on the instruction that failed.
    pub(crate) fn exec_instruction(
        &mut self,
        observer: Option<&mut (dyn FnMut(&TracedInstr) + '_)>,
    ) -> Result<StepOutcome, FaultKind> {
        let pc = self.pc;
        // read before executing, in case the instruction overwrites itself
        let word = self.memory.read(addr(pc))?;
        let instr = Instruction::decode(&self.memory, pc)?;
        let effect = execute(instr, &mut self.memory, pc, &mut self.input, &mut self.output)?;

        if effect.next != Next::Await
            && (observer.is_some() || self.trace.is_some() || log::log_enabled!(log::Level::Trace))
        {
            let traced = TracedInstr::build(pc, word, instr, &effect);
            log::trace!("{traced}");
            if let Some(observer) = observer {
                observer(&traced);
            }
            if let Some(trace) = self.trace.as_mut() {
                trace.0.push(traced);
            }
        }

        Ok(match effect.next {
            Next::Jump(dest) => {
                self.pc = dest;
                StepOutcome::Running
            }
            Next::Halt => StepOutcome::Stopped(State::Halted),
            Next::Await => StepOutcome::Stopped(State::Awaiting),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Discard;

    fn mem(code: &[i64]) -> Memory {
        code.iter().copied().collect()
    }

    #[test]
    fn decode_mixed_modes() {
        use ParamMode::{Immediate as I, Positional as P};
        let cases: [(&[i64], Instruction); 5] = [
            (&[1, 5, 6, 7], Instruction::Add(Param::new(5, P), Param::new(6, P), Param::new(7, P))),
            (&[1101, 5, 6, 7], Instruction::Add(Param::new(5, I), Param::new(6, I), Param::new(7, P))),
            (&[1007, 5, 6, 7], Instruction::Lt(Param::new(5, P), Param::new(6, I), Param::new(7, P))),
            (&[105, 0, 3], Instruction::Jnz(Param::new(0, I), Param::new(3, P))),
            (&[104, -3], Instruction::Out(Param::new(-3, I))),
        ];
        for (code, expected) in cases {
            assert_eq!(Instruction::decode(&mem(code), 0), Ok(expected));
            assert_eq!(expected.op_int(), code[0]);
        }
    }

    #[test]
    fn halt_ignores_mode_digits() {
        assert_eq!(Instruction::decode(&mem(&[21299]), 0), Ok(Instruction::Halt));
    }

    #[test]
    fn decode_faults() {
        assert_eq!(
            Instruction::decode(&mem(&[5555, 0, 0, 0]), 0),
            Err(FaultKind::UnrecognizedOpcode(5555))
        );
        assert_eq!(
            Instruction::decode(&mem(&[-1]), 0),
            Err(FaultKind::UnrecognizedOpcode(-1))
        );
        assert_eq!(
            Instruction::decode(&mem(&[201, 0, 0, 0]), 0),
            Err(FaultKind::UnknownMode { word: 201, digit: 2 })
        );
        assert_eq!(
            Instruction::decode(&mem(&[10001, 0, 0, 0]), 0),
            Err(FaultKind::WriteToImmediate(0))
        );
        assert_eq!(
            Instruction::decode(&mem(&[103, 7]), 0),
            Err(FaultKind::WriteToImmediate(7))
        );
        // missing operands
        assert_eq!(
            Instruction::decode(&mem(&[1, 0]), 0),
            Err(FaultKind::Address(AddressFault { address: 2, len: 2 }))
        );
        assert_eq!(
            Instruction::decode(&mem(&[99]), 1),
            Err(FaultKind::Address(AddressFault { address: 1, len: 1 }))
        );
    }

    #[test]
    fn jumps() {
        let mut m = mem(&[0, 0]);
        let (mut i, mut o) = (VecDeque::<i64>::new(), Vec::<i64>::new());
        let jnz = |cond, target| {
            Instruction::Jnz(
                Param::new(cond, ParamMode::Immediate),
                Param::new(target, ParamMode::Immediate),
            )
        };
        let taken = execute(jnz(1, 40), &mut m, 10, &mut i, &mut o).unwrap();
        assert_eq!(taken.next, Next::Jump(40));
        let skipped = execute(jnz(0, 40), &mut m, 10, &mut i, &mut o).unwrap();
        assert_eq!(skipped.next, Next::Jump(13));
        assert_eq!(
            execute(jnz(1, -4), &mut m, 10, &mut i, &mut o),
            Err(FaultKind::Address(AddressFault { address: -4, len: 2 }))
        );
    }

    #[test]
    fn arithmetic_wraps() {
        let mut m = mem(&[i64::MAX, 0]);
        let instr = Instruction::Add(
            Param::new(0, ParamMode::Positional),
            Param::new(1, ParamMode::Immediate),
            Param::new(1, ParamMode::Positional),
        );
        execute(instr, &mut m, 0, &mut VecDeque::<i64>::new(), &mut Discard).unwrap();
        assert_eq!(m[1], i64::MIN);
    }

    #[test]
    fn port_errors_become_faults() {
        let (mut tx, rx) = std::sync::mpsc::channel::<i64>();
        drop(rx);
        let instr = Instruction::Out(Param::new(1, ParamMode::Immediate));
        assert_eq!(
            execute(instr, &mut mem(&[]), 0, &mut VecDeque::<i64>::new(), &mut tx),
            Err(FaultKind::Port(PortError::Disconnected))
        );
    }
}
