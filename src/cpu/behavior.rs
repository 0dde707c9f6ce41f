// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each 4004 instruction [Word]

use super::*;
use crate::error::Result;
use crate::rom::Rom;

/// JCN condition bit: invert the whole condition
const CN_INVERT: u8 = 0b1000;

/// |`0x00`| No operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`0x00`| Does nothing for 8 clock cycles    |
impl CPU {
    /// |`0x00`| Does nothing. Undefined opcodes land here too.
    #[inline(always)]
    pub(super) fn nop(&mut self) {}
}

/// Conditional and unconditional jumps
///
/// |opcode| effect                                          |
/// |------|-------------------------------------------------|
/// |`1CCC`| JCN: jump to the second word's byte on condition |
/// |`4AAA`| JUN: jump to the wide instruction's 12-bit target|
/// |`5AAA`| JMS: push pc, then jump as JUN                   |
/// |`3RR1`| JIN: jump to the address held in a register pair |
impl CPU {
    /// |`1CCC`| Jumps to `target` in the page-rule bank when the condition
    /// nibble says so.
    ///
    /// The base condition is `accumulator == 0 || carry`; bit 3 of the
    /// condition nibble inverts it. The test-pin condition is not wired up
    /// and never fires. A taken jump lands one short of the target to
    /// compensate for the end-of-cycle increment; a fall-through leaves the
    /// program counter alone.
    pub(super) fn jcn(&mut self, condition: u8, target: u8) {
        let jump = self.acc == 0 || self.carry;
        let jump = if condition & CN_INVERT != 0 {
            !jump
        } else {
            jump
        };
        if jump {
            self.pc = (((self.effective_bank() as u16) << 8) | target as u16).wrapping_sub(1);
        }
    }

    /// |`4AAA`| Sets the program counter to `target - 1`; the end-of-cycle
    /// increment lands execution on the target itself.
    pub(super) fn jun(&mut self, target: u16) {
        self.pc = target.wrapping_sub(1);
    }

    /// |`5AAA`| Pushes the program counter, then jumps like [CPU::jun]
    pub(super) fn jms(&mut self, target: u16) {
        self.push();
        self.jun(target);
    }

    /// |`3RR1`| Loads the designated register pair into the low 8 bits of
    /// the program counter, bank per the page rule.
    ///
    /// Unlike the wide jumps there is no `- 1` compensation here; the next
    /// instruction executed is the one after the pair's address.
    pub(super) fn jin(&mut self, pair: usize) {
        let target = self.pair_value(pair);
        self.pc = ((self.effective_bank() as u16) << 8) | target as u16;
    }
}

/// Immediate and indirect data movement
///
/// |opcode| effect                                            |
/// |------|---------------------------------------------------|
/// |`2RRR`| FIM: load the second word's byte into a pair       |
/// |`3RR0`| FIN: fetch the ROM byte addressed by pair 0        |
impl CPU {
    /// |`2RRR`| Loads `value` into a register pair, high nibble first
    pub(super) fn fim(&mut self, pair: usize, value: u8) {
        self.set_pair(pair, value);
    }

    /// |`3RR0`| Reads the ROM byte addressed by register pair 0 (bank per
    /// the page rule) into the designated register pair.
    pub(super) fn fin(&mut self, pair: usize, rom: &Rom) -> Result<()> {
        let address = self.pair_value(0);
        let byte = rom.read_byte(self.effective_bank() as usize, address as usize)?;
        self.set_pair(pair, byte);
        Ok(())
    }
}

/// Index register arithmetic
///
/// |opcode| effect                                                  |
/// |------|---------------------------------------------------------|
/// |`6RRR`| INC: increment a register, wrapping at 0xF               |
/// |`7RRR`| ISZ: increment a register, jump unless it wrapped to 0   |
impl CPU {
    /// |`6RRR`| Increments a 4-bit register; 0xF wraps to 0x0
    pub(super) fn inc(&mut self, register: usize) {
        self.registers[register] = (self.registers[register] + 1) & 0x0F;
    }

    /// |`7RRR`| Increments a 4-bit register; if the result is nonzero,
    /// jumps to `target` in the page-rule bank (with the same `- 1`
    /// compensation as [CPU::jun]). A zero result falls through.
    pub(super) fn isz(&mut self, register: usize, target: u8) {
        let value = (self.registers[register] + 1) & 0x0F;
        self.registers[register] = value;
        if value != 0 {
            self.pc = (((self.effective_bank() as u16) << 8) | target as u16).wrapping_sub(1);
        }
    }
}
