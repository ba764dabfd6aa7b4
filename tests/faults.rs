//! Test that every kind of fault is reported, and that faulted machines stay stopped.
// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use intcode::ports::Console;
use intcode::prelude::*;
use intcode::{AddressFault, Fault, FaultClass, FaultKind, PortError, Status};
use std::error::Error;
use std::sync::mpsc;

/// Run `code` with no input, expecting it to fault
fn fault_of(code: impl IntoIterator<Item = i64>) -> Fault {
    QueueMachine::from_program(code)
        .run_through_inputs(empty())
        .expect_err("program should have faulted")
}

#[test]
fn unrecognized_opcode() {
    let fault = fault_of([5555, 0, 0, 0]);
    assert_eq!(fault.pc, 0);
    assert_eq!(fault.kind, FaultKind::UnrecognizedOpcode(5555));
    assert_eq!(fault.kind.class(), FaultClass::Decode);

    // a zero word is not an instruction either
    let fault = fault_of([1101, 0, 0, 5, 0, 0]);
    assert_eq!(fault.pc, 4);
    assert_eq!(fault.kind, FaultKind::UnrecognizedOpcode(0));
}

#[test]
fn unknown_mode() {
    let mut machine = QueueMachine::from_program([1, 0, 0, 0, 201, 0, 0, 0, 99]);
    let fault = machine.run().unwrap_err();
    assert_eq!(fault.pc, 4);
    assert_eq!(fault.kind, FaultKind::UnknownMode { word: 201, digit: 2 });
    assert_eq!(fault.kind.class(), FaultClass::Mode);
    // the instruction before the fault still took effect
    assert_eq!(machine[0], 2);
}

#[test]
fn write_to_immediate() {
    let mut machine = QueueMachine::from_program([11101, 1, 1, 5, 99, 0]);
    let fault = machine.run().unwrap_err();
    assert_eq!(fault.kind, FaultKind::WriteToImmediate(5));
    assert_eq!(fault.kind.class(), FaultClass::Mode);
    assert_eq!(machine.memory().as_slice(), &[11101, 1, 1, 5, 99, 0]);

    let fault = fault_of([103, 0, 99]);
    assert_eq!(fault.kind, FaultKind::WriteToImmediate(0));
}

#[test]
fn out_of_bounds() {
    assert_eq!(
        fault_of([4, 100, 99]),
        Fault {
            pc: 0,
            kind: FaultKind::Address(AddressFault { address: 100, len: 3 })
        }
    );
    assert_eq!(
        fault_of([1, 0, 0, -3, 99]).kind,
        FaultKind::Address(AddressFault { address: -3, len: 5 })
    );
    // jumping somewhere that can't be an address faults at the jump itself
    assert_eq!(
        fault_of([1105, 1, -1]),
        Fault {
            pc: 0,
            kind: FaultKind::Address(AddressFault { address: -1, len: 3 })
        }
    );
}

#[test]
fn running_off_the_end() {
    let fault = fault_of([1101, 0, 0, 0]);
    assert_eq!(fault.pc, 4);
    assert_eq!(
        fault.kind,
        FaultKind::Address(AddressFault { address: 4, len: 4 })
    );
    assert_eq!(fault.kind.class(), FaultClass::Address);

    // an instruction whose parameters are cut off by the end of memory
    let fault = fault_of([1101, 1]);
    assert_eq!(
        fault.kind,
        FaultKind::Address(AddressFault { address: 2, len: 2 })
    );
    assert_eq!(fault_of([]).pc, 0);
}

#[test]
fn port_failures() {
    let (tx, rx) = mpsc::channel::<i64>();
    drop(rx);
    let mut machine = Machine::new([104, 7, 99], Inputs(empty::<i64>()), tx);
    let fault: Fault = machine.run().unwrap_err();
    assert_eq!(fault.kind, FaultKind::Port(PortError::Disconnected));
    assert_eq!(fault.kind.class(), FaultClass::Port);

    let console = Console::new(b"seven\n".as_slice(), Vec::new());
    let mut machine = Machine::new([3, 0, 99], console, Discard);
    assert_eq!(
        machine.run().unwrap_err().kind,
        FaultKind::Port(PortError::InvalidInput(String::from("seven")))
    );
}

#[test]
fn closed_input_channel_waits() {
    let (tx, rx) = mpsc::channel::<i64>();
    drop(tx);
    let mut machine = Machine::new([3, 0, 99], rx, Discard);
    assert_eq!(machine.run(), Ok(State::Awaiting));
    assert_eq!(machine.pc(), 0);
}

#[test]
fn faulted_machine_is_poisoned() {
    let mut machine = QueueMachine::from_program([104, 1, 42, 99]);
    assert_eq!(
        machine.step(),
        Ok(StepOutcome::Running),
        "first instruction is valid"
    );
    let fault = machine.run().unwrap_err();
    assert_eq!(fault.pc, 2);
    // the output produced before the fault is still there
    assert_eq!(machine.output_mut(), &vec![1]);
    let memory = machine.memory().clone();

    // further attempts report the same fault without executing anything
    assert_eq!(machine.step(), Err(fault.clone()));
    assert_eq!(machine.run_through_inputs([1, 2, 3]), Err(fault.clone()));
    assert_eq!(machine.memory(), &memory);
    assert_eq!(machine.pc(), 2);
    assert_eq!(machine.status(), &Status::Faulted(fault));
}

#[test]
fn fault_reporting() {
    let fault = fault_of([1, 0, 0, 10, 99]);
    assert_eq!(
        fault.to_string(),
        "fault at instruction 0: attempted to access address 10 in memory of size 5"
    );
    let source = fault.source().expect("fault has a source");
    assert_eq!(
        source.to_string(),
        "attempted to access address 10 in memory of size 5"
    );
    assert!(source.source().is_some());
}
