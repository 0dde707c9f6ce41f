// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Emulates the Intel MCS-4 chipset at the bus level: a 4004 CPU, up to
//! sixteen 4001 ROM chips, and eight banks of 4002 RAM.
//!
//! Unlike a fetch-decode-execute loop that handles one instruction per
//! iteration, the [CPU] is driven one clock cycle at a time and talks to its
//! [Rom] over a shared 4-bit [Bus](bus::Bus), eight clock cycles per
//! instruction, the way the actual chipset's pin traffic works.
//!
//! ```rust
//! use mcs4::prelude::*;
//!
//! // FIM rp0, 0xA1
//! let mut system = Mcs4::new(Throttle::unlimited());
//! system.run_bytes(&[0x20, 0xA1]).unwrap();
//! assert_eq!(0xA1, system.cpu.pair(0).unwrap());
//! assert_eq!(16, system.cpu.cycles());
//! ```

pub mod bus;
pub mod clock;
pub mod cpu;
pub mod error;
pub mod ram;
pub mod rom;

pub mod prelude {
    //! Common imports for convenience
    pub use super::{
        bus::Bus,
        clock::{Throttle, CLOCK_HZ},
        cpu::CPU,
        error::{Error, Result},
        ram::Ram,
        rom::Rom,
        Mcs4,
    };
}

use crate::{clock::Throttle, cpu::CPU, error::Result, ram::Ram, rom::Rom};
use std::{path::Path, time::Instant};

/// A complete MCS-4 system: one 4004, its ROM chips, and its RAM banks
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mcs4 {
    /// The 4004 processor
    pub cpu: CPU,
    /// The 4001 ROM chips
    pub rom: Rom,
    /// The 4002 RAM banks
    pub ram: Ram,
    /// Paces the cycle loop; swap in [Throttle::unlimited] to run flat out
    pub throttle: Throttle,
}

impl Mcs4 {
    /// Constructs a powered-off system with the given throttle
    pub fn new(throttle: Throttle) -> Self {
        Mcs4 {
            throttle,
            ..Default::default()
        }
    }

    /// Returns the chips to their power-on state, keeping the loaded ROM
    /// image and the throttle
    pub fn reset(&mut self) -> &mut Self {
        self.cpu.reset();
        self.cpu.rom_size = self.rom.size();
        self.ram = Ram::new();
        self
    }

    /// Loads a program image from a file and runs it to completion
    pub fn run(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.rom.load_image(path)?;
        self.reset();
        self.start()
    }

    /// Loads a program from a byte slice and runs it to completion
    /// # Examples
    /// ```rust
    /// # use mcs4::prelude::*;
    /// let mut system = Mcs4::new(Throttle::unlimited());
    /// // FIM rp7, 0xAF
    /// system.run_bytes(&[0x2E, 0xAF]).unwrap();
    /// assert_eq!(0xAF, system.cpu.pair(7).unwrap());
    /// ```
    pub fn run_bytes(&mut self, program: &[u8]) -> Result<&mut Self> {
        self.rom.load_bytes(program);
        self.reset();
        self.start()
    }

    /// Runs the cycle loop until the program counter leaves the loaded
    /// program.
    ///
    /// Each iteration is one clock cycle: tick the CPU, then busy-wait out
    /// the rest of the clock period. The halt condition is checked after
    /// every clock cycle, so a jump that leaves the image stops the run on
    /// its execute cycle, before the end-of-cycle increment.
    pub fn start(&mut self) -> Result<&mut Self> {
        while !self.cpu.halted() {
            let begin = Instant::now();
            self.cpu.tick(&mut self.rom)?;
            self.throttle.pace(begin);
        }
        Ok(self)
    }
}
