//! # Table-driven CRC engine
//!
//! CRCs of any degree from 1 to 64 bits, in either bit convention:
//!
//! - [`Convention::Msb`] tests the top register bit before each left shift
//!   (the "normal" form, e.g. CRC-16/CCITT-FALSE, CRC-32/MPEG-2)
//! - [`Convention::Lsb`] tests the bottom register bit before each right shift
//!   with the bit-reversed polynomial (the "reflected" form, e.g. CRC-32/ISO)
//!
//! A [`CrcTable`] holds the 256 precomputed transforms for one
//! (degree, polynomial, convention) triple and can be shared between engines.
//! A [`CrcEngine`] owns the running accumulator.
//!
//! ## Example: preset checksum
//!
//! ```rust
//! use bitcrc::crc::{CrcEngine, CrcPreset};
//!
//! let mut crc = CrcEngine::from_preset(CrcPreset::Crc32Iso);
//! crc.update(b"123456789");
//! assert_eq!(crc.get(), 0xCBF43926);
//! ```
//!
//! ## Example: custom register
//!
//! ```rust
//! use bitcrc::crc::{Convention, CrcEngine, CrcParams};
//!
//! # fn main() -> bitcrc::Result<()> {
//! // 5-bit USB token CRC register, MSB first
//! let mut crc = CrcEngine::new(CrcParams::new(5, 0x05, Convention::Msb, 0x1F))?;
//! crc.update(&[0xA5, 0x3C]);
//! let _checksum = crc.get();
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::error::{BitcrcError, Result};
use crate::utils::low_mask;

/// Accumulator engine and its byte-fold strategies
pub mod engine;

/// Named parameter sets for common CRCs
pub mod preset;

/// 256-entry transform table generation
pub mod table;


pub use engine::CrcEngine;
pub use preset::CrcPreset;
pub use table::CrcTable;

/// Highest supported register width
pub const MAX_DEGREE: u32 = 64;

/// Which end of the register is tested before each shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Top bit tested, register shifts left, message bits enter MSB first
    Msb,
    /// Bottom bit tested, register shifts right, message bits enter LSB first
    Lsb,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Msb => write!(f, "msb"),
            Convention::Lsb => write!(f, "lsb"),
        }
    }
}

/// Construction parameters of a CRC register.
///
/// `polynomial` is written without its implicit top coefficient, in normal
/// (non-reflected) order for both conventions, so it is always odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrcParams {
    /// Register width in bits (1..=64)
    pub degree: u32,
    /// Generator polynomial, masked to `degree` bits
    pub polynomial: u64,
    /// Bit convention
    pub convention: Convention,
    /// Accumulator value after a reset
    pub start_value: u64,
    /// Value XORed into the accumulator by `get()`
    pub xor_out: u64,
}

impl CrcParams {
    /// Parameters whose output XOR equals the start value, so an empty
    /// message always checksums to zero.
    pub const fn new(
        degree: u32,
        polynomial: u64,
        convention: Convention,
        start_value: u64,
    ) -> Self {
        let mask = low_mask(degree);
        Self {
            degree,
            polynomial: polynomial & mask,
            convention,
            start_value: start_value & mask,
            xor_out: start_value & mask,
        }
    }

    /// Overrides the output XOR.
    pub const fn with_xor_out(mut self, xor_out: u64) -> Self {
        self.xor_out = xor_out & low_mask(self.degree);
        self
    }

    /// Mask selecting the `degree` register bits
    pub const fn mask(&self) -> u64 {
        low_mask(self.degree)
    }

    /// Checks the register preconditions: degree in 1..=64, an odd
    /// polynomial that fits in `degree` bits, and start and output values
    /// that fit as well.
    pub fn validate(&self) -> Result<()> {
        validate_register(self.degree, self.polynomial)?;
        let mask = self.mask();
        for (name, value) in [("start value", self.start_value), ("xor_out", self.xor_out)] {
            if value & !mask != 0 {
                return Err(BitcrcError::InvalidConfig(format!(
                    "{} {:#x} does not fit in {} bits",
                    name, value, self.degree
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_register(degree: u32, polynomial: u64) -> Result<()> {
    if degree == 0 || degree > MAX_DEGREE {
        return Err(BitcrcError::InvalidConfig(format!(
            "degree {} outside 1..={}",
            degree, MAX_DEGREE
        )));
    }
    if polynomial & 1 == 0 {
        return Err(BitcrcError::InvalidConfig(format!(
            "polynomial {:#x} must be odd",
            polynomial
        )));
    }
    if polynomial & !low_mask(degree) != 0 {
        return Err(BitcrcError::InvalidConfig(format!(
            "polynomial {:#x} does not fit in {} bits",
            polynomial, degree
        )));
    }
    Ok(())
}
