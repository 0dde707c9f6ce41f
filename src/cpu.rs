// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The 4004 processor: its registers and its instruction-cycle state machine
//!
//! One instruction cycle takes 8 clock cycles, split into three stages:
//! A (3 cycles, the CPU drives the program counter onto the bus one nibble at
//! a time), M (2 cycles, the addressed ROM answers with the instruction byte
//! one nibble at a time), and X (3 cycles, decode and execute). [CPU::tick]
//! advances the machine by exactly one clock cycle.

#[cfg(test)]
mod tests;

pub mod behavior;
pub mod instruction;

use self::instruction::{Pending, Word};
use crate::{
    bus::Bus,
    error::Result,
    rom::{Rom, BANK_COUNT, PAGE_SIZE},
};
use owo_colors::OwoColorize;

/// Number of general-purpose 4-bit registers
pub const REGISTER_COUNT: usize = 16;
/// Number of addressable register pairs
pub const PAIR_COUNT: usize = REGISTER_COUNT / 2;
/// Depth of the subroutine call stack
pub const STACK_LEVELS: usize = 3;
/// Clock cycles in one instruction cycle
pub const CYCLES_PER_INSTRUCTION: usize = 8;

/// The three architectural stages of an instruction cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// Address out: the CPU sends the 12-bit program counter over the bus
    #[default]
    A,
    /// Memory in: the addressed ROM sends the instruction byte over the bus
    M,
    /// Execute: the instruction is decoded and performed
    X,
}

impl Stage {
    /// Duration of the stage, in clock cycles
    pub const fn duration(self) -> usize {
        match self {
            Stage::A => 3,
            Stage::M => 2,
            Stage::X => 3,
        }
    }

    /// Index of the stage's final clock cycle within the instruction cycle
    pub const fn last_cycle(self) -> usize {
        match self {
            Stage::A => Stage::A.duration() - 1,
            Stage::M => Stage::A.duration() + Stage::M.duration() - 1,
            Stage::X => CYCLES_PER_INSTRUCTION - 1,
        }
    }

    /// The stage that follows this one
    pub const fn next(self) -> Self {
        match self {
            Stage::A => Stage::M,
            Stage::M => Stage::X,
            Stage::X => Stage::A,
        }
    }
}

/// Represents the internal state of one 4004
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Set to print a live disassembly of each executed word
    pub trace: bool,
    /// The shared 4-bit data bus
    pub bus: Bus,
    // registers
    ir: u8,
    acc: u8,
    carry: bool,
    registers: [u8; REGISTER_COUNT],
    pc: u16,
    sp: usize,
    stack: [u16; STACK_LEVELS],
    // instruction-cycle state
    stage: Stage,
    cycle: usize,
    decoded: bool,
    pending: Option<Pending>,
    // execution data
    cycles: usize,
    pub(crate) rom_size: usize,
}

// public interface
impl CPU {
    /// Constructs a new CPU with everything zeroed
    pub fn new() -> Self {
        CPU::default()
    }

    /// Resets the CPU to power-on state, preserving only the trace flag
    pub fn reset(&mut self) {
        *self = CPU {
            trace: self.trace,
            ..CPU::default()
        };
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use mcs4::cpu::CPU;
    /// let cpu = CPU::new();
    /// assert_eq!(0, cpu.pc());
    /// ```
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Gets the accumulator
    pub fn accumulator(&self) -> u8 {
        self.acc
    }

    /// Gets the carry flag
    pub fn carry(&self) -> bool {
        self.carry
    }

    /// Gets a slice of the sixteen 4-bit registers
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    /// Gets the number of clock cycles the CPU has run for
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Assembles an 8-bit value from a register pair.
    ///
    /// By convention, test programs leave their result in a register pair
    /// before running off the end of the ROM.
    /// # Examples
    /// ```rust
    /// # use mcs4::cpu::CPU;
    /// let cpu = CPU::new();
    /// assert_eq!(0x00, cpu.pair(7).unwrap());
    /// assert!(cpu.pair(8).is_err());
    /// ```
    pub fn pair(&self, pair: usize) -> Result<u8> {
        if pair >= PAIR_COUNT {
            return Err(crate::error::Error::InvalidPair { pair });
        }
        Ok(self.pair_value(pair))
    }

    /// Returns true when the program counter has run off the loaded program
    pub fn halted(&self) -> bool {
        self.pc as usize >= self.rom_size
    }

    /// Runs the CPU for one clock cycle.
    ///
    /// Stage A drives one nibble of the program counter onto the bus and has
    /// the ROM latch it; stage M shifts one nibble of the instruction byte
    /// into the instruction register; the first cycle of stage X decodes and
    /// executes. The last cycle of stage X clears the decode latch,
    /// increments the program counter, and wraps back to stage A.
    pub fn tick(&mut self, rom: &mut Rom) -> Result<&mut Self> {
        match self.stage {
            Stage::A => {
                self.bus.write((self.pc >> (4 * self.cycle)) as u8);
                rom.latch_address(self.bus.read());
            }
            Stage::M => {
                let nibble = rom.read_nibble()?;
                self.bus.write(nibble);
                self.ir = (self.ir << 4) | self.bus.read();
            }
            Stage::X => {
                if !self.decoded {
                    self.execute(rom)?;
                    self.decoded = true;
                }
            }
        }
        if self.cycle == self.stage.last_cycle() {
            if self.stage == Stage::X {
                self.decoded = false;
                self.pc = self.pc.wrapping_add(1);
            }
            self.stage = self.stage.next();
        }
        self.cycle = (self.cycle + 1) % CYCLES_PER_INSTRUCTION;
        self.cycles += 1;
        Ok(self)
    }

    /// Dumps the current state of all CPU registers
    /// # Examples
    /// ```rust
    /// # use mcs4::cpu::CPU;
    /// let cpu = CPU::new();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 000, ACC: 0, CY: 0, SP: 0
    /// STACK: [000, 000, 000]
    /// r0: 0 r1: 0 r2: 0 r3: 0
    /// r4: 0 r5: 0 r6: 0 r7: 0
    /// r8: 0 r9: 0 rA: 0 rB: 0
    /// rC: 0 rD: 0 rE: 0 rF: 0
    /// CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:03x}, ACC: {:x}, CY: {}, SP: {}\nSTACK: [{:03x}, {:03x}, {:03x}]\n{}CYC: {:6}",
            self.pc,
            self.acc,
            self.carry as u8,
            self.sp,
            self.stack[0],
            self.stack[1],
            self.stack[2],
            self.registers
                .into_iter()
                .enumerate()
                .map(|(i, reg)| {
                    format!(
                        "r{i:X}: {reg:x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.cycles,
        );
    }
}

// decode
impl CPU {
    /// Decodes and executes the word in the instruction register.
    ///
    /// Runs exactly once per instruction cycle, on the first cycle of stage
    /// X. If a wide instruction is pending from the previous instruction
    /// cycle, the fetched byte completes it instead of being decoded.
    fn execute(&mut self, rom: &mut Rom) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            if self.trace {
                std::println!(
                    "{:>8} {:03x}: {}    #{:02x}",
                    self.cycles.bright_black(),
                    self.pc,
                    pending,
                    self.ir,
                );
            }
            match pending {
                Pending::Jcn { condition } => self.jcn(condition, self.ir),
                Pending::Fim { pair } => self.fim(pair, self.ir),
                Pending::Jun { page } => self.jun(((page as u16) << 8) | self.ir as u16),
                Pending::Jms { page } => self.jms(((page as u16) << 8) | self.ir as u16),
                Pending::Isz { register } => self.isz(register, self.ir),
            }
            return Ok(());
        }

        let word = Word::fetch(self.ir);
        if self.trace {
            std::println!(
                "{:>8} {:03x}: {}",
                self.cycles.bright_black(),
                self.pc,
                word,
            );
        }
        match word {
            Word::nop => self.nop(),
            Word::jcn { n } => self.pending = Some(Pending::Jcn { condition: n }),
            Word::fim { n } => {
                self.pending = Some(Pending::Fim {
                    pair: (n >> 1) as usize,
                })
            }
            Word::fin { p } => self.fin(p, rom)?,
            Word::jin { p } => self.jin(p),
            Word::jun { h } => self.pending = Some(Pending::Jun { page: h }),
            Word::jms { h } => self.pending = Some(Pending::Jms { page: h }),
            Word::inc { r } => self.inc(r),
            Word::isz { r } => self.pending = Some(Pending::Isz { register: r }),
        }
        Ok(())
    }
}

// internal helpers shared by the behavior impls
impl CPU {
    /// Assembles the 8-bit value held in a register pair (high, then low)
    fn pair_value(&self, pair: usize) -> u8 {
        (self.registers[2 * pair] << 4) | self.registers[2 * pair + 1]
    }

    /// Splits a byte into a register pair (high nibble first)
    fn set_pair(&mut self, pair: usize, value: u8) {
        self.registers[2 * pair] = value >> 4;
        self.registers[2 * pair + 1] = value & 0x0F;
    }

    /// Computes the ROM bank the next jump or indirect fetch addresses.
    ///
    /// When the current word sits on the last byte of a page, the hardware
    /// has already rolled the effective bank over to the next chip; the bank
    /// saturates on the final chip instead of indexing off the end.
    fn effective_bank(&self) -> u8 {
        let bank = ((self.pc >> 8) & 0xF) as u8;
        if self.pc as usize & (PAGE_SIZE - 1) == PAGE_SIZE - 1 && (bank as usize) < BANK_COUNT - 1 {
            bank + 1
        } else {
            bank
        }
    }

    /// Pushes the program counter onto the circular 3-level call stack.
    ///
    /// A fourth push overwrites the oldest entry; the stack pointer wraps by
    /// assignment, never indexing out of range.
    fn push(&mut self) {
        self.stack[self.sp] = self.pc;
        self.sp = (self.sp + 1) % STACK_LEVELS;
    }
}
