// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Chains of machines that feed their outputs into each other, as in [Day 7]
//!
//! Each amplifier runs its own copy of the same program. It's first given its phase setting as
//! input, then its signal. In a serial chain the signal is the last output of the previous
//! amplifier, and in a feedback loop every output of the previous amplifier is passed along. The
//! first amplifier gets the initial signal instead.
//!
//! [Day 7]: https://adventofcode.com/2019/day/7

use std::error::Error;
use std::fmt::{self, Display};

use itertools::Itertools;

use super::{Fault, QueueMachine, State};

/// How amplifiers are wired together
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Wiring {
    /// Each amplifier runs to completion once, and the last one's output is the result
    Serial,
    /// The last amplifier's output is fed back into the first, until the last one halts
    Feedback,
}

/// An error running a chain of amplifiers
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AmplifierError {
    /// No phase settings were provided
    NoAmplifiers,
    /// An amplifier faulted
    Fault {
        /// position of the amplifier in the chain
        amplifier: usize,
        /// the fault itself
        fault: Fault,
    },
    /// An amplifier stopped without producing any output
    NoOutput {
        /// position of the amplifier in the chain
        amplifier: usize,
    },
    /// An amplifier is waiting for input that will never arrive
    Stalled {
        /// position of the amplifier in the chain
        amplifier: usize,
    },
}

impl Display for AmplifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmplifierError::NoAmplifiers => write!(f, "no amplifiers in chain"),
            AmplifierError::Fault { amplifier, fault } => {
                write!(f, "amplifier {amplifier} faulted: {fault}")
            }
            AmplifierError::NoOutput { amplifier } => {
                write!(f, "amplifier {amplifier} produced no output")
            }
            AmplifierError::Stalled { amplifier } => {
                write!(f, "amplifier {amplifier} is stuck waiting for input")
            }
        }
    }
}

impl Error for AmplifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmplifierError::Fault { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

fn amplifiers(program: &[i64], phases: &[i64]) -> Result<Vec<QueueMachine>, AmplifierError> {
    if phases.is_empty() {
        return Err(AmplifierError::NoAmplifiers);
    }
    Ok(phases
        .iter()
        .map(|&phase| {
            let mut amp = QueueMachine::from_program(program.iter().copied());
            amp.input_mut().push_back(phase);
            amp
        })
        .collect())
}

/// Run `amp` on `pending`, replacing it with everything `amp` outputs
fn pass_through(
    amp: &mut QueueMachine,
    amplifier: usize,
    pending: &mut Vec<i64>,
) -> Result<State, AmplifierError> {
    amp.run_through_inputs(pending.drain(..))
        .map(|(outputs, state)| {
            *pending = outputs;
            state
        })
        .map_err(|fault| AmplifierError::Fault { amplifier, fault })
}

/// Run each amplifier once, in order, returning the final output of the last one
///
/// Only the last output of each amplifier is passed on to the next one.
///
/// ```
/// use intcode::amplifier::run_chain;
/// const PROGRAM: [i64; 17] = [3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0];
/// assert_eq!(run_chain(&PROGRAM, &[4, 3, 2, 1, 0], 0), Ok(43210));
/// ```
pub fn run_chain(program: &[i64], phases: &[i64], signal: i64) -> Result<i64, AmplifierError> {
    let mut pending = vec![signal];
    for (amplifier, mut amp) in amplifiers(program, phases)?.into_iter().enumerate() {
        if pass_through(&mut amp, amplifier, &mut pending)? == State::Awaiting {
            return Err(AmplifierError::Stalled { amplifier });
        }
        let Some(&last) = pending.last() else {
            return Err(AmplifierError::NoOutput { amplifier });
        };
        pending = vec![last];
    }
    pending.pop().ok_or(AmplifierError::NoOutput {
        amplifier: phases.len() - 1,
    })
}

/// Run the amplifiers in a loop, with the last one's outputs going back to the first one, until
/// the last one halts. Returns the last output it produced.
///
/// All of the amplifiers run on the current thread, each one running until it needs more input
/// before moving on to the next.
pub fn run_feedback_loop(
    program: &[i64],
    phases: &[i64],
    signal: i64,
) -> Result<i64, AmplifierError> {
    let mut amps = amplifiers(program, phases)?;
    let last = amps.len() - 1;
    let mut pending = vec![signal];
    let mut last_signal = None;
    loop {
        for (amplifier, amp) in amps.iter_mut().enumerate() {
            let state = pass_through(amp, amplifier, &mut pending)?;
            if pending.is_empty() {
                return Err(if state == State::Awaiting {
                    AmplifierError::Stalled { amplifier }
                } else {
                    AmplifierError::NoOutput { amplifier }
                });
            }
            if amplifier == last {
                last_signal = pending.last().copied();
                if state == State::Halted {
                    log::debug!("feedback loop finished with {last_signal:?}");
                    return last_signal.ok_or(AmplifierError::NoOutput { amplifier });
                }
            }
        }
        log::trace!("feedback round produced {last_signal:?}");
    }
}

/// Try every ordering of `phases`, returning the largest final signal along with the phase
/// settings that produced it.
///
/// ```
/// use intcode::amplifier::{max_signal, Wiring};
/// const PROGRAM: [i64; 17] = [3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0];
/// assert_eq!(
///     max_signal(&PROGRAM, &[0, 1, 2, 3, 4], Wiring::Serial),
///     Ok((43210, vec![4, 3, 2, 1, 0]))
/// );
/// ```
pub fn max_signal(
    program: &[i64],
    phases: &[i64],
    wiring: Wiring,
) -> Result<(i64, Vec<i64>), AmplifierError> {
    let run: fn(&[i64], &[i64], i64) -> Result<i64, AmplifierError> = match wiring {
        Wiring::Serial => run_chain,
        Wiring::Feedback => run_feedback_loop,
    };
    let mut best: Option<(i64, Vec<i64>)> = None;
    for order in phases.iter().copied().permutations(phases.len()) {
        let signal = run(program, &order, 0)?;
        if best.as_ref().is_none_or(|(max, _)| signal > *max) {
            best = Some((signal, order));
        }
    }
    best.ok_or(AmplifierError::NoAmplifiers)
}
