// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The 4001 ROM banks
//!
//! Up to 16 chips of 256 bytes each sit on the bus, for 4096 bytes of
//! program space. A chip is selected purely by the top 4 bits of the 12-bit
//! address; there is no separate chip-select line to model. All chips share
//! one address latch, filled one nibble at a time during stage A, and answer
//! stage-M reads one nibble at a time, high nibble first.

use crate::error::{Error, Result};

/// Number of 4001 chips on the bus
pub const BANK_COUNT: usize = 16;
/// Bytes of storage per 4001 chip, one page of the address space
pub const PAGE_SIZE: usize = 256;
/// Total addressable program space, in bytes
pub const ROM_CAPACITY: usize = BANK_COUNT * PAGE_SIZE;

/// The array of 4001 ROM chips, with their shared address latch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rom {
    banks: [[u8; PAGE_SIZE]; BANK_COUNT],
    size: usize,
    address: u16,
    high_nibble: bool,
}

impl Rom {
    /// Constructs a fresh, zeroed set of ROM chips
    pub fn new() -> Self {
        Rom::default()
    }

    /// Reads a program image from a file into the banks, 256 bytes per bank.
    ///
    /// Returns the number of bytes loaded. Anything beyond the last bank is
    /// ignored.
    pub fn load_image(&mut self, path: impl AsRef<std::path::Path>) -> Result<usize> {
        let image = std::fs::read(path)?;
        Ok(self.load_bytes(&image))
    }

    /// Loads bytes into the banks, truncating at [ROM_CAPACITY]
    /// # Examples
    /// ```rust
    /// # use mcs4::rom::Rom;
    /// let mut rom = Rom::new();
    /// assert_eq!(2, rom.load_bytes(&[0x20, 0xA1]));
    /// assert_eq!(2, rom.size());
    /// ```
    pub fn load_bytes(&mut self, image: &[u8]) -> usize {
        let len = image.len().min(ROM_CAPACITY);
        for (index, byte) in image[..len].iter().enumerate() {
            self.banks[index / PAGE_SIZE][index % PAGE_SIZE] = *byte;
        }
        self.size = len;
        len
    }

    /// Gets the loaded program size, in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Shifts one address nibble into the shared 12-bit address latch.
    ///
    /// Called three times per stage A; the most significant nibble arrives
    /// last, and the top 4 bits of the latch are always forced to zero.
    /// # Examples
    /// ```rust
    /// # use mcs4::rom::Rom;
    /// let mut rom = Rom::new();
    /// for nibble in [0xC, 0xB, 0xA] {
    ///     rom.latch_address(nibble);
    /// }
    /// assert_eq!(0xABC, rom.address());
    /// ```
    pub fn latch_address(&mut self, nibble: u8) {
        self.address = ((self.address >> 4) | (((nibble & 0x0F) as u16) << 8)) & 0x0FFF;
    }

    /// Gets the current contents of the address latch
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Reads one nibble of the byte at the latched address.
    ///
    /// Consecutive reads alternate between the high and low nibble, high
    /// first, so two reads during stage M reconstruct one instruction byte.
    /// # Examples
    /// ```rust
    /// # use mcs4::rom::Rom;
    /// let mut rom = Rom::new();
    /// rom.load_bytes(&[0xA5]);
    /// assert_eq!(0xA, rom.read_nibble().unwrap());
    /// assert_eq!(0x5, rom.read_nibble().unwrap());
    /// ```
    pub fn read_nibble(&mut self) -> Result<u8> {
        let bank = (self.address >> 8) as usize;
        let offset = (self.address & 0xFF) as usize;
        let byte = self.read_byte(bank, offset)?;
        let nibble = if self.high_nibble {
            byte >> 4
        } else {
            byte & 0x0F
        };
        self.high_nibble = !self.high_nibble;
        Ok(nibble)
    }

    /// Reads a whole byte out of a bank, bypassing the bus protocol.
    ///
    /// This is the path FIN takes. Indexes are checked at the chip boundary;
    /// a bad one aborts the run rather than aliasing another chip's storage.
    /// # Examples
    /// ```rust
    /// # use mcs4::rom::Rom;
    /// let mut rom = Rom::new();
    /// rom.load_bytes(&[0x00, 0xAA]);
    /// assert_eq!(0xAA, rom.read_byte(0, 1).unwrap());
    /// assert!(rom.read_byte(16, 0).is_err());
    /// ```
    pub fn read_byte(&self, bank: usize, offset: usize) -> Result<u8> {
        self.banks
            .get(bank)
            .ok_or(Error::InvalidBank { bank })?
            .get(offset)
            .copied()
            .ok_or(Error::InvalidAddress { bank, offset })
    }
}

impl Default for Rom {
    fn default() -> Self {
        Rom {
            banks: [[0; PAGE_SIZE]; BANK_COUNT],
            size: 0,
            address: 0,
            // stage M reads the high nibble first
            high_nibble: true,
        }
    }
}
