// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 5 built using the `intcode` library.

use intcode::prelude::*;
use intcode::program::parse_program;

/// Run the diagnostic program for the system with the given ID
fn diagnose(mut machine: QueueMachine, system_id: i64) -> i64 {
    let (mut outputs, State::Halted) = machine.run_through_inputs([system_id]).unwrap() else {
        panic!("diagnostic program wanted more input");
    };
    let diagnostic = outputs.pop().expect("no diagnostic code");
    assert!(outputs.into_iter().all(|i| i == 0), "diagnostic failed");

    diagnostic
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let machine = QueueMachine::from_program(parse_program(&input).unwrap());
    println!("part 1: {}", diagnose(machine.clone(), 1));
    println!("part 2: {}", diagnose(machine, 5));
}
