// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 7 built using the `intcode` library.

use intcode::amplifier::{Wiring, max_signal};
use intcode::program::parse_program;

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let code = parse_program(&input).unwrap();
    let (part1, phases) = max_signal(&code, &[0, 1, 2, 3, 4], Wiring::Serial).unwrap();
    log::info!("serial phases: {phases:?}");
    println!("part 1: {part1}");
    let (part2, phases) = max_signal(&code, &[5, 6, 7, 8, 9], Wiring::Feedback).unwrap();
    log::info!("feedback phases: {phases:?}");
    println!("part 2: {part2}");
}
