// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The 4002 RAM banks
//!
//! Eight banks of four chips, each chip holding four registers of sixteen
//! main characters plus four status characters, all 4 bits wide. None of the
//! implemented opcodes touch RAM (SRC/WRM/RDM and friends are out of scope),
//! but the storage exists, zeroed, so those opcodes have somewhere to land
//! when they arrive.

use crate::error::{Error, Result};

/// Number of RAM banks selectable via CM-RAM
pub const RAM_BANK_COUNT: usize = 8;
/// 4002 chips per bank
pub const CHIPS_PER_BANK: usize = 4;
/// Registers per 4002 chip
pub const REGISTERS_PER_CHIP: usize = 4;
/// Main (data) characters per register
pub const MAIN_CHARACTERS: usize = 16;
/// Status characters per register
pub const STATUS_CHARACTERS: usize = 4;

/// One 4002 register: sixteen main characters and four status characters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemRegister {
    main: [u8; MAIN_CHARACTERS],
    status: [u8; STATUS_CHARACTERS],
}

/// One 4002 chip: four registers and an output port
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ram4002 {
    registers: [MemRegister; REGISTERS_PER_CHIP],
    output_port: u8,
}

/// One bank of four 4002 chips
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RamBank {
    chips: [Ram4002; CHIPS_PER_BANK],
}

/// All installed 4002 RAM, zero-initialized
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ram {
    banks: [RamBank; RAM_BANK_COUNT],
}

impl Ram {
    /// Constructs fresh, zeroed RAM banks
    pub fn new() -> Self {
        Ram::default()
    }

    /// Reads a main character
    /// # Examples
    /// ```rust
    /// # use mcs4::ram::Ram;
    /// let ram = Ram::new();
    /// assert_eq!(0, ram.main_character(0, 0, 0, 0).unwrap());
    /// assert!(ram.main_character(8, 0, 0, 0).is_err());
    /// ```
    pub fn main_character(
        &self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
    ) -> Result<u8> {
        let reg = self.register(bank, chip, register, character)?;
        Ok(reg.main[character])
    }

    /// Writes a main character. Only the low 4 bits survive.
    pub fn set_main_character(
        &mut self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
        value: u8,
    ) -> Result<()> {
        let reg = self.register_mut(bank, chip, register, character)?;
        reg.main[character] = value & 0x0F;
        Ok(())
    }

    /// Reads a status character
    pub fn status_character(
        &self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
    ) -> Result<u8> {
        if character >= STATUS_CHARACTERS {
            return Err(Error::InvalidRamAddress {
                bank,
                chip,
                register,
                character,
            });
        }
        let reg = self.register(bank, chip, register, 0)?;
        Ok(reg.status[character])
    }

    /// Writes a status character. Only the low 4 bits survive.
    pub fn set_status_character(
        &mut self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
        value: u8,
    ) -> Result<()> {
        if character >= STATUS_CHARACTERS {
            return Err(Error::InvalidRamAddress {
                bank,
                chip,
                register,
                character,
            });
        }
        let reg = self.register_mut(bank, chip, register, 0)?;
        reg.status[character] = value & 0x0F;
        Ok(())
    }

    fn register(
        &self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
    ) -> Result<&MemRegister> {
        self.banks
            .get(bank)
            .and_then(|bank| bank.chips.get(chip))
            .and_then(|chip| chip.registers.get(register))
            .filter(|_| character < MAIN_CHARACTERS)
            .ok_or(Error::InvalidRamAddress {
                bank,
                chip,
                register,
                character,
            })
    }

    fn register_mut(
        &mut self,
        bank: usize,
        chip: usize,
        register: usize,
        character: usize,
    ) -> Result<&mut MemRegister> {
        if character >= MAIN_CHARACTERS {
            return Err(Error::InvalidRamAddress {
                bank,
                chip,
                register,
                character,
            });
        }
        self.banks
            .get_mut(bank)
            .and_then(|bank| bank.chips.get_mut(chip))
            .and_then(|chip| chip.registers.get_mut(register))
            .ok_or(Error::InvalidRamAddress {
                bank,
                chip,
                register,
                character,
            })
    }
}
