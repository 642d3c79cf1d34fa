use std::ffi::CStr;
use std::fmt;
use std::io;
use std::sync::Arc;

use bitvec::order::{Lsb0, Msb0};
use bitvec::view::BitView;

use super::{Convention, CrcParams, CrcPreset, CrcTable};
use crate::error::{BitcrcError, Result};
use crate::utils::bit_reverse;

/// Folds one byte into the accumulator through the table.
type FoldFn = fn(&CrcTable, u64, u8) -> u64;

/// MSB register no wider than a byte: the register bits still pending in the
/// accumulator line up with the top of the incoming byte. For degree 8 this is
/// the bare lookup.
fn fold_msb_narrow(table: &CrcTable, acc: u64, byte: u8) -> u64 {
    let index = (acc << (8 - table.degree())) as u8 ^ byte;
    table.entry(index)
}

fn fold_msb_wide(table: &CrcTable, acc: u64, byte: u8) -> u64 {
    let index = (acc >> (table.degree() - 8)) as u8 ^ byte;
    ((acc << 8) & table.mask()) ^ table.entry(index)
}

/// LSB register no wider than a byte: nothing survives the 8 right shifts, so
/// only the lookup remains.
fn fold_lsb_narrow(table: &CrcTable, acc: u64, byte: u8) -> u64 {
    table.entry(acc as u8 ^ byte)
}

fn fold_lsb_wide(table: &CrcTable, acc: u64, byte: u8) -> u64 {
    (acc >> 8) ^ table.entry(acc as u8 ^ byte)
}

fn select_fold(params: &CrcParams) -> FoldFn {
    match (params.convention, params.degree <= 8) {
        (Convention::Msb, true) => fold_msb_narrow,
        (Convention::Msb, false) => fold_msb_wide,
        (Convention::Lsb, true) => fold_lsb_narrow,
        (Convention::Lsb, false) => fold_lsb_wide,
    }
}

/// Incremental CRC accumulator.
///
/// `get()` returns `accumulator ^ xor_out`. With the default `xor_out`
/// (equal to the start value) a freshly reset engine reports 0.
///
/// ```
/// use bitcrc::crc::{CrcEngine, CrcPreset};
///
/// let mut crc = CrcEngine::from_preset(CrcPreset::Crc16Ccitt);
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.get(), 0x29B1);
///
/// crc.reset();
/// crc.update(b"123456789");
/// assert_eq!(crc.get(), 0x29B1);
/// ```
#[derive(Clone)]
pub struct CrcEngine {
    params: CrcParams,
    table: Arc<CrcTable>,
    fold: FoldFn,
    accumulator: u64,
}

impl CrcEngine {
    /// Creates an engine with its own freshly generated table.
    ///
    /// Fails if the degree is outside 1..=64, the polynomial is even, or any
    /// of polynomial, start value and `xor_out` is wider than the degree.
    pub fn new(params: CrcParams) -> Result<Self> {
        params.validate()?;
        let table = Arc::new(CrcTable::from_params(&params)?);
        Ok(Self::assemble(params, table))
    }

    /// Creates an engine reusing an existing table.
    pub fn with_table(params: CrcParams, table: Arc<CrcTable>) -> Result<Self> {
        params.validate()?;
        if !table.matches(&params) {
            return Err(BitcrcError::InvalidConfig(format!(
                "table {:?} does not match degree={} polynomial={:#x} convention={}",
                table, params.degree, params.polynomial, params.convention
            )));
        }
        Ok(Self::assemble(params, table))
    }

    /// Creates an engine for a preset, sharing the preset's process-wide table.
    pub fn from_preset(preset: CrcPreset) -> Self {
        Self::assemble(preset.params(), preset.table())
    }

    fn assemble(params: CrcParams, table: Arc<CrcTable>) -> Self {
        log::debug!(
            "crc engine: degree={} polynomial={:#x} convention={} start={:#x} xor_out={:#x}",
            params.degree,
            params.polynomial,
            params.convention,
            params.start_value,
            params.xor_out
        );
        Self {
            fold: select_fold(&params),
            accumulator: params.start_value,
            params,
            table,
        }
    }

    /// Parameters the engine was built with
    pub fn params(&self) -> &CrcParams {
        &self.params
    }

    /// Shared transform table
    pub fn table(&self) -> &Arc<CrcTable> {
        &self.table
    }

    /// Restores the accumulator to the start value.
    pub fn reset(&mut self) {
        self.accumulator = self.params.start_value;
    }

    /// Sets the accumulator to an arbitrary (masked) value.
    pub fn reset_to(&mut self, init: u64) {
        self.accumulator = init & self.params.mask();
    }

    /// Raw register contents, without the output XOR
    pub fn accumulator(&self) -> u64 {
        self.accumulator
    }

    /// Checksum of everything folded since the last reset.
    pub fn get(&self) -> u64 {
        self.accumulator ^ self.params.xor_out
    }

    /// Folds a single byte.
    #[inline]
    pub fn update_byte(&mut self, byte: u8) {
        self.accumulator = (self.fold)(&self.table, self.accumulator, byte);
    }

    /// Folds a byte slice through the table.
    pub fn update(&mut self, data: &[u8]) {
        let fold = self.fold;
        let table = &*self.table;
        self.accumulator = data
            .iter()
            .fold(self.accumulator, |acc, &byte| fold(table, acc, byte));
    }

    /// Folds the bytes of a C string, not including the terminating NUL.
    pub fn update_cstr(&mut self, s: &CStr) {
        self.update(s.to_bytes());
    }

    /// Folds a byte slice one bit at a time, without the table.
    ///
    /// Observably identical to [`update`](Self::update); kept as the reference
    /// the table-driven path is checked against.
    pub fn update_bruteforce(&mut self, data: &[u8]) {
        let degree = self.params.degree;
        let mask = self.params.mask();
        let mut acc = self.accumulator;

        match self.params.convention {
            Convention::Msb => {
                let polynomial = self.params.polynomial;
                for bit in data.view_bits::<Msb0>().iter().by_vals() {
                    let top = ((acc >> (degree - 1)) & 1 == 1) ^ bit;
                    acc = (acc << 1) & mask;
                    if top {
                        acc ^= polynomial;
                    }
                }
            }
            Convention::Lsb => {
                let reflected = bit_reverse(self.params.polynomial, degree);
                for bit in data.view_bits::<Lsb0>().iter().by_vals() {
                    let low = (acc & 1 == 1) ^ bit;
                    acc >>= 1;
                    if low {
                        acc ^= reflected;
                    }
                }
            }
        }

        self.accumulator = acc;
    }

    /// Folds the low `length` bytes of `value`, least significant byte first.
    /// `length` is capped at 8.
    pub fn update_integer_lsb(&mut self, value: u64, length: usize) {
        for i in 0..length.min(8) {
            self.update_byte((value >> (8 * i)) as u8);
        }
    }

    /// Folds the low `length` bytes of `value`, most significant byte first.
    /// `length` is capped at 8.
    pub fn update_integer_msb(&mut self, value: u64, length: usize) {
        for i in (0..length.min(8)).rev() {
            self.update_byte((value >> (8 * i)) as u8);
        }
    }
}

impl fmt::Debug for CrcEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrcEngine")
            .field("params", &self.params)
            .field("accumulator", &format_args!("{:#x}", self.accumulator))
            .finish_non_exhaustive()
    }
}

impl Default for CrcEngine {
    /// Engine for the configured default preset (see [`crate::config`]).
    fn default() -> Self {
        Self::from_preset(crate::config::get_crc_preset())
    }
}

/// Lets `io::copy` and friends stream data straight into the checksum.
impl io::Write for CrcEngine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
