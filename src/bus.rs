// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The shared 4-bit data bus
//!
//! Everything on an MCS-4 board talks over one 4-bit path: the CPU puts
//! address nibbles on it during stage A, and the addressed ROM answers with
//! instruction nibbles during stage M.

/// The instantaneous contents of the shared 4-bit data bus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bus {
    data: u8,
}

impl Bus {
    /// Reads the nibble currently on the bus
    /// # Examples
    /// ```rust
    /// # use mcs4::bus::Bus;
    /// let bus = Bus::default();
    /// assert_eq!(0x0, bus.read());
    /// ```
    pub fn read(&self) -> u8 {
        self.data
    }

    /// Drives a nibble onto the bus. Only the low 4 bits survive.
    /// # Examples
    /// ```rust
    /// # use mcs4::bus::Bus;
    /// let mut bus = Bus::default();
    /// bus.write(0xAB);
    /// assert_eq!(0xB, bus.read());
    /// ```
    pub fn write(&mut self, data: u8) {
        self.data = data & 0x0F;
    }
}
