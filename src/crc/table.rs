use std::fmt;

use super::{validate_register, Convention, CrcParams};
use crate::error::Result;
use crate::utils::{bit_reverse, low_mask};

/// The 256 byte transforms of one CRC register.
///
/// `entries[b]` is the register obtained by feeding the byte `b` into a zeroed
/// register, so a whole byte can be folded with one lookup. The table is
/// immutable once built and is meant to be shared (`Arc<CrcTable>`) between
/// every engine using the same register.
#[derive(Clone, PartialEq, Eq)]
pub struct CrcTable {
    degree: u32,
    polynomial: u64,
    convention: Convention,
    entries: [u64; 256],
}

impl CrcTable {
    /// Builds the table for a register, validating degree and polynomial.
    pub fn new(degree: u32, polynomial: u64, convention: Convention) -> Result<Self> {
        validate_register(degree, polynomial)?;
        Ok(Self::generate(degree, polynomial, convention))
    }

    /// Builds the table matching a parameter set.
    pub fn from_params(params: &CrcParams) -> Result<Self> {
        Self::new(params.degree, params.polynomial, params.convention)
    }

    /// Generation proper. Only the powers of two are derived by shifting;
    /// every other entry is the XOR of already-filled entries, since
    /// `T[i ^ j] == T[i] ^ T[j]` over GF(2).
    pub(crate) fn generate(degree: u32, polynomial: u64, convention: Convention) -> Self {
        log::trace!(
            "generating crc table: degree={} polynomial={:#x} convention={}",
            degree,
            polynomial,
            convention
        );

        let mask = low_mask(degree);
        let polynomial = polynomial & mask;
        let mut entries = [0u64; 256];

        match convention {
            Convention::Msb => {
                let top = 1u64 << (degree - 1);
                let mut running = polynomial;
                let mut i = 1;
                while i <= 128 {
                    if i > 1 {
                        let carry = running & top != 0;
                        running = (running << 1) & mask;
                        if carry {
                            running ^= polynomial;
                        }
                    }
                    entries[i] = running;
                    fill_combinations(&mut entries, i);
                    i <<= 1;
                }
            }
            Convention::Lsb => {
                // In the reflected register the last bit of a byte is its MSB,
                // so the single-bit entry is at 128 and the chain runs downward.
                let reflected = bit_reverse(polynomial, degree);
                let mut running = reflected;
                let mut i = 128;
                loop {
                    entries[i] = running;
                    if i == 1 {
                        break;
                    }
                    let carry = running & 1 != 0;
                    running >>= 1;
                    if carry {
                        running ^= reflected;
                    }
                    i >>= 1;
                }
                let mut i = 1;
                while i <= 128 {
                    fill_combinations(&mut entries, i);
                    i <<= 1;
                }
            }
        }

        Self {
            degree,
            polynomial,
            convention,
            entries,
        }
    }

    /// Register width in bits
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Polynomial in normal (non-reflected) order
    pub fn polynomial(&self) -> u64 {
        self.polynomial
    }

    /// Bit convention the entries were generated for
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Mask selecting the register bits
    pub fn mask(&self) -> u64 {
        low_mask(self.degree)
    }

    /// Transform of a single byte
    #[inline]
    pub fn entry(&self, index: u8) -> u64 {
        self.entries[index as usize]
    }

    /// All 256 transforms
    pub fn entries(&self) -> &[u64; 256] {
        &self.entries
    }

    /// True if this table was built for the register described by `params`.
    pub fn matches(&self, params: &CrcParams) -> bool {
        self.degree == params.degree
            && self.polynomial == params.polynomial
            && self.convention == params.convention
    }
}

#[inline]
fn fill_combinations(entries: &mut [u64; 256], power: usize) {
    for j in 1..power {
        entries[power + j] = entries[power] ^ entries[j];
    }
}

impl fmt::Debug for CrcTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrcTable")
            .field("degree", &self.degree)
            .field("polynomial", &format_args!("{:#x}", self.polynomial))
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}
