// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of a 4004 instruction [Word]
//!
//! A word is one 8-bit fetch: OPR in the high nibble, OPA in the low nibble.
//! Wide instructions (JCN, FIM, JUN, JMS, ISZ) need a second fetch for their
//! address or immediate byte; the first word decodes to a [Pending] value and
//! the next instruction cycle's word is consumed whole as data, never as an
//! opcode.

use imperative_rs::InstructionSet;
use std::fmt::Display;

#[allow(non_camel_case_types, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// One decoded instruction word. Anything that fails to decode is a no-op.
pub enum Word {
    /// | 00 | No operation
    #[opcode = "0x00"]
    nop,
    /// | 1n | First word of JCN; n = condition nibble
    #[opcode = "0x1n"]
    jcn { n: u8 },
    /// | 2n | First word of FIM; destination pair = n >> 1
    #[opcode = "0x2n"]
    fim { n: u8 },
    /// | 3(ppp0) | Fetch indirect: ROM byte addressed by pair 0 into pair p
    #[opcode = "0b0011_ppp0"]
    fin { p: usize },
    /// | 3(ppp1) | Jump indirect through register pair p
    #[opcode = "0b0011_ppp1"]
    jin { p: usize },
    /// | 4h | First word of JUN; h = address bits 11..8
    #[opcode = "0x4h"]
    jun { h: u8 },
    /// | 5h | First word of JMS; h = address bits 11..8
    #[opcode = "0x5h"]
    jms { h: u8 },
    /// | 6r | Increment register r, wrapping at 0xF
    #[opcode = "0x6r"]
    inc { r: usize },
    /// | 7r | First word of ISZ; r = counter register
    #[opcode = "0x7r"]
    isz { r: usize },
}

impl Word {
    /// Decodes a single fetched byte. Unrecognized opcodes are treated as
    /// [Word::nop] rather than an error; they're unimplemented extension
    /// points, not faults.
    /// # Examples
    /// ```rust
    /// # use mcs4::cpu::instruction::Word;
    /// assert_eq!(Word::inc { r: 0xF }, Word::fetch(0x6F));
    /// assert_eq!(Word::nop, Word::fetch(0xE5));
    /// ```
    pub fn fetch(byte: u8) -> Self {
        Word::decode(&[byte]).map_or(Word::nop, |(_, word)| word)
    }
}

impl Display for Word {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Word::nop           => write!(f, "nop    "),
            Word::jcn { n }     => write!(f, "jcn    #{n:x}"),
            Word::fim { n }     => write!(f, "fim    rp{}", n >> 1),
            Word::fin { p }     => write!(f, "fin    rp{p}"),
            Word::jin { p }     => write!(f, "jin    rp{p}"),
            Word::jun { h }     => write!(f, "jun    {h:x}.."),
            Word::jms { h }     => write!(f, "jms    {h:x}.."),
            Word::inc { r }     => write!(f, "inc    r{r:X}"),
            Word::isz { r }     => write!(f, "isz    r{r:X}"),
        }
    }
}

/// A wide instruction caught between its first and second word.
///
/// Carries whatever the first word contributed; the executor combines it with
/// the full second word on the next decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pending {
    /// JCN waiting on its target byte
    Jcn {
        /// The condition nibble from the first word's OPA
        condition: u8,
    },
    /// FIM waiting on its immediate byte
    Fim {
        /// The destination register pair
        pair: usize,
    },
    /// JUN waiting on the low 8 bits of its target
    Jun {
        /// Address bits 11..8 from the first word's OPA
        page: u8,
    },
    /// JMS waiting on the low 8 bits of its target
    Jms {
        /// Address bits 11..8 from the first word's OPA
        page: u8,
    },
    /// ISZ waiting on its target byte
    Isz {
        /// The counter register
        register: usize,
    },
}

impl Display for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pending::Jcn { .. } => write!(f, "jcn"),
            Pending::Fim { .. } => write!(f, "fim"),
            Pending::Jun { .. } => write!(f, "jun"),
            Pending::Jms { .. } => write!(f, "jms"),
            Pending::Isz { .. } => write!(f, "isz"),
        }
    }
}
