// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 2 built using the `intcode` library.

use intcode::prelude::*;
use intcode::program::parse_program;

fn run_with(base: &QueueMachine, noun: i64, verb: i64) -> i64 {
    let mut machine = base.clone();
    machine.write(1, noun).unwrap();
    machine.write(2, verb).unwrap();
    let (output, state) = machine.run_through_inputs(empty()).unwrap();
    assert_eq!(state, State::Halted, "intcode did not run to completion");
    assert!(output.is_empty(), "intcode had unexpected output");
    machine.read(0).unwrap()
}

fn part1(base: &QueueMachine) -> i64 {
    run_with(base, 12, 2)
}

fn part2(base: &QueueMachine) -> i64 {
    for noun in 0..=99 {
        for verb in 0..=99 {
            #[allow(clippy::unreadable_literal, reason = "from Advent of Code")]
            if run_with(base, noun, verb) == 19690720 {
                return 100 * noun + verb;
            }
        }
    }
    panic!("no answer found for part 2");
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let machine = QueueMachine::from_program(parse_program(&input).unwrap());
    println!("part 1: {}", part1(&machine));
    println!("part 2: {}", part2(&machine));
}
