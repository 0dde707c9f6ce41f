// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the MCS-4 emulator

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the MCS-4 emulator.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to select a ROM bank that doesn't exist
    #[error("rom bank {bank:x} is not connected to the bus")]
    InvalidBank {
        /// The offending bank index
        bank: usize,
    },
    /// Tried to read past the end of a ROM bank
    #[error("address {offset:02x} in rom bank {bank:x} is out of range")]
    InvalidAddress {
        /// The bank being addressed
        bank: usize,
        /// The offending in-page offset
        offset: usize,
    },
    /// Tried to read a register pair that doesn't exist
    #[error("tried to access register pair {pair:X} which does not exist")]
    InvalidPair {
        /// The offending pair index
        pair: usize,
    },
    /// Tried to address a RAM character outside the installed banks
    #[error("ram character {bank:x}:{chip:x}:{register:x}:{character:x} is out of range")]
    InvalidRamAddress {
        /// The RAM bank
        bank: usize,
        /// The chip within the bank
        chip: usize,
        /// The register within the chip
        register: usize,
        /// The character within the register
        character: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
