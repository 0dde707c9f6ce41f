// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! End-to-end opcode tests: run a small program image through [Mcs4] and
//! check the result it leaves behind in a register pair.

use mcs4::prelude::*;

/// Runs a program image on a fresh, unthrottled system
fn run(program: &[u8]) -> Mcs4 {
    let mut system = Mcs4::new(Throttle::unlimited());
    system.run_bytes(program).unwrap();
    system
}

#[test]
fn nop_runs_to_the_end() {
    let system = run(&[0x00, 0x00, 0x00, 0x00]);
    assert_eq!(4, system.cpu.pc());
    assert_eq!(32, system.cpu.cycles());
    assert!(system.cpu.registers().iter().all(|&reg| reg == 0));
}

#[test]
fn fim_loads_a_pair() {
    let system = run(&[0x20, 0xA1]);
    assert_eq!(0xA1, system.cpu.pair(0).unwrap());
    assert_eq!(16, system.cpu.cycles());
}

#[test]
fn jcn_taken_skips_ahead() {
    // accumulator is 0 at power-on, so the jump fires past the first FIM
    let system = run(&[0x14, 0x04, 0x2A, 0xFF, 0x2A, 0x55]);
    assert_eq!(0x55, system.cpu.pair(5).unwrap());
}

#[test]
fn jcn_inverted_falls_through() {
    let system = run(&[0x1C, 0x06, 0x2A, 0x77, 0x00, 0x00]);
    assert_eq!(0x77, system.cpu.pair(5).unwrap());
}

#[test]
fn jun_lands_on_its_target() {
    let system = run(&[0x40, 0x04, 0x28, 0xFF, 0x28, 0xDD]);
    assert_eq!(0xDD, system.cpu.pair(4).unwrap());
}

#[test]
fn jun_out_of_the_image_halts() {
    // the halt check runs every clock cycle, so the run stops on the jump's
    // execute cycle with pc still one short of the target
    let system = run(&[0x40, 0xFF]);
    assert!(system.cpu.halted());
    assert_eq!(0x0FE, system.cpu.pc());
    assert_eq!(14, system.cpu.cycles());
}

#[test]
fn jms_jumps_like_jun() {
    let system = run(&[0x50, 0x04, 0x28, 0xFF, 0x28, 0xDD]);
    assert_eq!(0xDD, system.cpu.pair(4).unwrap());
}

#[test]
fn jin_resumes_after_the_pair_address() {
    // rp0 holds 0x06; JIN lands there and the increment moves on to 0x07
    let system = run(&[0x20, 0x06, 0x31, 0x2A, 0xFF, 0x00, 0x00, 0x2A, 0x2D]);
    assert_eq!(0x2D, system.cpu.pair(5).unwrap());
}

#[test]
fn fin_fetches_through_pair_zero() {
    let system = run(&[0x20, 0x04, 0x32, 0x00, 0xAA]);
    assert_eq!(0xAA, system.cpu.pair(1).unwrap());
}

#[test]
fn fin_at_end_of_page_reads_the_next_bank() {
    // JUN parks the FIN on the last byte of bank 0, so it fetches from
    // bank 1 instead
    let mut program = vec![0u8; 0x103];
    program[0] = 0x20; // fim rp0, 0x02
    program[1] = 0x02;
    program[2] = 0x40; // jun 0x0FF
    program[3] = 0xFF;
    program[0xFF] = 0x32; // fin rp1
    program[0x102] = 0xBC;
    let system = run(&program);
    assert_eq!(0xBC, system.cpu.pair(1).unwrap());
}

#[test]
fn jin_at_end_of_page_jumps_into_the_next_bank() {
    let mut program = vec![0u8; 0x108];
    program[0] = 0x20; // fim rp0, 0x05
    program[1] = 0x05;
    program[2] = 0x40; // jun 0x0FF
    program[3] = 0xFF;
    program[0xFF] = 0x31; // jin rp0, lands in bank 1
    program[0x106] = 0x2A; // fim rp5, 0x99
    program[0x107] = 0x99;
    let system = run(&program);
    assert_eq!(0x99, system.cpu.pair(5).unwrap());
}

#[test]
fn inc_increments_a_register() {
    let system = run(&[0x2E, 0x04, 0x6F]);
    assert_eq!(0x05, system.cpu.pair(7).unwrap());
}

#[test]
fn inc_wraps_without_carrying() {
    // r4 wraps F -> 0, r5 goes 0 -> 1; the wrap never touches the carry flag
    let system = run(&[0x24, 0xF0, 0x64, 0x65]);
    assert_eq!(0x01, system.cpu.pair(2).unwrap());
    assert!(!system.cpu.carry());
}

#[test]
fn isz_counts_a_loop() {
    // rD counts D, E, F, 0; rC tallies one increment per pass
    let system = run(&[0x2C, 0x0D, 0x6C, 0x7D, 0x02]);
    assert_eq!(0x30, system.cpu.pair(6).unwrap());
}

#[test]
fn isz_falls_through_on_wrap() {
    let system = run(&[0x2C, 0xDF, 0x7D, 0x08, 0x2A, 0xDD, 0x00, 0x00]);
    assert_eq!(0xDD, system.cpu.pair(5).unwrap());
}

#[test]
fn undecodable_words_are_no_ops() {
    // 0x8_..0xF_ are unimplemented; they burn a cycle and change nothing
    let system = run(&[0x85, 0xB1, 0xE9, 0xF2]);
    assert_eq!(4, system.cpu.pc());
    assert_eq!(0, system.cpu.accumulator());
    assert!(system.cpu.registers().iter().all(|&reg| reg == 0));
}
