// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Unit tests for [super::CPU]
//!
//! General test format:
//! 1. Prepare to do the thing
//! 2. Do the thing
//! 3. Compare the result to the expected result

use super::*;
use crate::rom::Rom;
use rand::random;

/// Loads a program into fresh ROM banks and wires up a fresh CPU
fn setup(program: &[u8]) -> (CPU, Rom) {
    let mut rom = Rom::new();
    rom.load_bytes(program);
    let mut cpu = CPU::new();
    cpu.rom_size = rom.size();
    (cpu, rom)
}

/// Ticks the CPU until the program counter runs off the loaded program
fn run_to_halt(cpu: &mut CPU, rom: &mut Rom) {
    while !cpu.halted() {
        cpu.tick(rom).unwrap();
    }
}

/// The A/M/X instruction-cycle state machine
mod stages {
    use super::*;

    #[test]
    fn address_goes_out_low_nibble_first() {
        let (mut cpu, mut rom) = setup(&[0x00]);
        cpu.pc = 0xABC;
        cpu.tick(&mut rom).unwrap();
        assert_eq!(0xC, cpu.bus.read());
        cpu.tick(&mut rom).unwrap();
        assert_eq!(0xB, cpu.bus.read());
        cpu.tick(&mut rom).unwrap();
        assert_eq!(0xA, cpu.bus.read());
        // three nibbles reassemble the full program counter
        assert_eq!(0xABC, rom.address());
    }

    #[test]
    fn instruction_register_latches_high_nibble_first() {
        let (mut cpu, mut rom) = setup(&[0xA5]);
        for _ in 0..4 {
            cpu.tick(&mut rom).unwrap();
        }
        assert_eq!(0x0A, cpu.ir);
        cpu.tick(&mut rom).unwrap();
        assert_eq!(0xA5, cpu.ir);
    }

    #[test]
    fn instruction_cycle_takes_eight_clock_cycles() {
        let (mut cpu, mut rom) = setup(&[0x00, 0x00]);
        for _ in 0..8 {
            cpu.tick(&mut rom).unwrap();
        }
        assert_eq!(1, cpu.pc);
        assert_eq!(Stage::A, cpu.stage);
        assert_eq!(0, cpu.cycle);
        assert_eq!(8, cpu.cycles());
    }

    #[test]
    fn stage_durations() {
        assert_eq!(3, Stage::A.duration());
        assert_eq!(2, Stage::M.duration());
        assert_eq!(3, Stage::X.duration());
        assert_eq!(
            CYCLES_PER_INSTRUCTION,
            Stage::A.duration() + Stage::M.duration() + Stage::X.duration()
        );
    }
}

/// The two-word instruction protocol
mod wide {
    use super::*;

    #[test]
    fn pending_lasts_exactly_one_instruction_cycle() {
        let (mut cpu, mut rom) = setup(&[0x40, 0x04, 0x00, 0x00, 0x00]);
        for _ in 0..8 {
            cpu.tick(&mut rom).unwrap();
        }
        assert!(cpu.pending.is_some());
        for _ in 0..8 {
            cpu.tick(&mut rom).unwrap();
        }
        assert!(cpu.pending.is_none());
        // jun 0x004 lands on its target after the end-of-cycle increment
        assert_eq!(0x004, cpu.pc);
    }

    #[test]
    fn second_word_is_data_even_when_it_looks_like_the_opcode() {
        // jun 0x044: the second word's high nibble matches JUN's opcode
        let (mut cpu, mut rom) = setup(&[0x40, 0x44]);
        for _ in 0..16 {
            cpu.tick(&mut rom).unwrap();
        }
        assert!(cpu.pending.is_none());
        assert_eq!(0x044, cpu.pc);
    }
}

/// Control-flow instructions: anything that touches the program counter
mod cf {
    use super::*;

    #[test]
    fn jun_compensates_for_the_increment() {
        let (mut cpu, _) = setup(&[]);
        cpu.jun(0x234);
        assert_eq!(0x233, cpu.pc);
    }

    #[test]
    fn jms_pushes_the_program_counter() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0x123;
        cpu.jms(0x234);
        assert_eq!(0x123, cpu.stack[0]);
        assert_eq!(1, cpu.sp);
        assert_eq!(0x233, cpu.pc);
    }

    #[test]
    fn jcn_taken_when_accumulator_zero() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0x005;
        cpu.jcn(0b0100, 0x42);
        assert_eq!(0x041, cpu.pc);
    }

    #[test]
    fn jcn_taken_on_carry() {
        let (mut cpu, _) = setup(&[]);
        cpu.acc = 0x5;
        cpu.carry = true;
        cpu.jcn(0b0010, 0x42);
        assert_eq!(0x041, cpu.pc);
    }

    #[test]
    fn jcn_fall_through_leaves_pc_alone() {
        let (mut cpu, _) = setup(&[]);
        cpu.acc = 0x5;
        cpu.pc = 0x005;
        cpu.jcn(0b0100, 0x42);
        assert_eq!(0x005, cpu.pc);
    }

    #[test]
    fn jcn_inverted_jumps_when_condition_fails() {
        let (mut cpu, _) = setup(&[]);
        cpu.acc = 0x5;
        cpu.jcn(0b1100, 0x42);
        assert_eq!(0x041, cpu.pc);
    }

    #[test]
    fn jcn_inverted_falls_through_when_condition_holds() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0x005;
        cpu.jcn(0b1100, 0x42);
        assert_eq!(0x005, cpu.pc);
    }

    #[test]
    fn jin_replaces_the_low_byte_without_compensation() {
        let (mut cpu, _) = setup(&[]);
        cpu.set_pair(3, 0x42);
        cpu.pc = 0x210;
        cpu.jin(3);
        assert_eq!(0x242, cpu.pc);
    }
}

/// The circular 3-level call stack
mod stack {
    use super::*;

    #[test]
    fn wraps_after_three_pushes() {
        let (mut cpu, _) = setup(&[]);
        for (i, pc) in [0x111, 0x222, 0x333].into_iter().enumerate() {
            cpu.pc = pc;
            cpu.push();
            assert_eq!((i + 1) % STACK_LEVELS, cpu.sp);
        }
        // the fourth push overwrites the oldest entry
        cpu.pc = 0x444;
        cpu.push();
        assert_eq!([0x444, 0x222, 0x333], cpu.stack);
        assert_eq!(1, cpu.sp);
    }
}

/// Data movement: FIM and FIN
mod data {
    use super::*;

    #[test]
    fn fim_splits_the_byte_across_the_pair() {
        let (mut cpu, _) = setup(&[]);
        for pair in 0..PAIR_COUNT {
            let value = random::<u8>();
            cpu.fim(pair, value);
            assert_eq!(value >> 4, cpu.registers[2 * pair]);
            assert_eq!(value & 0x0F, cpu.registers[2 * pair + 1]);
            assert_eq!(value, cpu.pair(pair).unwrap());
        }
    }

    #[test]
    fn fin_fetches_through_pair_zero() {
        let (mut cpu, rom) = setup(&[0x00, 0x00, 0x00, 0xC3]);
        cpu.set_pair(0, 0x03);
        cpu.fin(2, &rom).unwrap();
        assert_eq!(0xC3, cpu.pair(2).unwrap());
        // pair 0 itself is untouched
        assert_eq!(0x03, cpu.pair(0).unwrap());
    }
}

/// Index-register arithmetic: INC and ISZ
mod alu {
    use super::*;

    #[test]
    fn inc_increments() {
        let (mut cpu, _) = setup(&[]);
        cpu.inc(0x5);
        assert_eq!(1, cpu.registers[0x5]);
    }

    #[test]
    fn inc_wraps_at_fifteen() {
        let (mut cpu, _) = setup(&[]);
        cpu.registers[0xB] = 0xF;
        cpu.inc(0xB);
        assert_eq!(0x0, cpu.registers[0xB]);
    }

    #[test]
    fn isz_jumps_while_nonzero() {
        let (mut cpu, _) = setup(&[]);
        cpu.registers[0x3] = 0x7;
        cpu.pc = 0x005;
        cpu.isz(0x3, 0x42);
        assert_eq!(0x8, cpu.registers[0x3]);
        assert_eq!(0x041, cpu.pc);
    }

    #[test]
    fn isz_falls_through_on_wrap_to_zero() {
        let (mut cpu, _) = setup(&[]);
        cpu.registers[0x3] = 0xF;
        cpu.pc = 0x005;
        cpu.isz(0x3, 0x42);
        assert_eq!(0x0, cpu.registers[0x3]);
        assert_eq!(0x005, cpu.pc);
    }
}

/// The end-of-page bank rollover rule
mod page_rule {
    use super::*;

    #[test]
    fn mid_page_keeps_the_current_bank() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0x0FE;
        assert_eq!(0, cpu.effective_bank());
        cpu.pc = 0x210;
        assert_eq!(2, cpu.effective_bank());
    }

    #[test]
    fn end_of_page_rolls_to_the_next_bank() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0x0FF;
        assert_eq!(1, cpu.effective_bank());
        cpu.pc = 0x2FF;
        assert_eq!(3, cpu.effective_bank());
    }

    #[test]
    fn final_bank_saturates() {
        let (mut cpu, _) = setup(&[]);
        cpu.pc = 0xFFF;
        assert_eq!(0xF, cpu.effective_bank());
    }

    #[test]
    fn sequential_fetch_crosses_the_page() {
        // FIM's two words straddle the last two bytes of bank 0
        let mut program = vec![0u8; 254];
        program.extend([0x20, 0xAB]);
        program.extend([0x00, 0x00]);
        let (mut cpu, mut rom) = setup(&program);
        run_to_halt(&mut cpu, &mut rom);
        assert_eq!(0xAB, cpu.pair(0).unwrap());
        assert_eq!(0x102, cpu.pc);
    }

    #[test]
    fn jump_from_end_of_page_targets_the_next_bank() {
        // JCN's second word sits on the last byte of bank 0, so the target
        // byte addresses bank 1
        let mut program = vec![0u8; 254];
        program.extend([0x14, 0x05]);
        program.extend([0u8; 5]);
        program.extend([0x2A, 0x77]);
        let (mut cpu, mut rom) = setup(&program);
        run_to_halt(&mut cpu, &mut rom);
        assert_eq!(0x77, cpu.pair(5).unwrap());
    }
}
