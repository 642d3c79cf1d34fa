use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;

use super::{Convention, CrcEngine, CrcParams, CrcTable};
use crate::error::BitcrcError;

lazy_static! {
    static ref PRESET_TABLES: Vec<Arc<CrcTable>> = CrcPreset::ALL
        .iter()
        .map(|preset| {
            let params = preset.params();
            Arc::new(CrcTable::generate(params.degree, params.polynomial, params.convention))
        })
        .collect();
}

/// Named CRC configurations.
///
/// Each preset's table is generated once per process, on first use, and
/// shared by every engine created from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrcPreset {
    /// CRC-8/SMBUS: degree 8, poly 0x07, MSB, start 0
    Crc8Smbus,
    /// CRC-16/CCITT-FALSE: degree 16, poly 0x1021, MSB, start 0xFFFF, no output XOR
    Crc16Ccitt,
    /// CRC-16/X-25: degree 16, poly 0x1021, LSB, start 0xFFFF
    Crc16X25,
    /// CRC-32/ISO-HDLC (zip, gzip, png): degree 32, poly 0x04C11DB7, LSB, start all ones
    Crc32Iso,
    /// CRC-32/MPEG-2 (ITU-T H.222.0 PSI tables): degree 32, poly 0x04C11DB7, MSB,
    /// start all ones, no output XOR
    Crc32Mpeg2,
    /// CRC-64/XZ: degree 64, poly 0x42F0E1EBA9EA3693, LSB, start all ones
    Crc64Xz,
}

impl CrcPreset {
    /// Every preset, in declaration order
    pub const ALL: [CrcPreset; 6] = [
        CrcPreset::Crc8Smbus,
        CrcPreset::Crc16Ccitt,
        CrcPreset::Crc16X25,
        CrcPreset::Crc32Iso,
        CrcPreset::Crc32Mpeg2,
        CrcPreset::Crc64Xz,
    ];

    /// Register parameters of this preset
    pub const fn params(self) -> CrcParams {
        match self {
            CrcPreset::Crc8Smbus => CrcParams::new(8, 0x07, Convention::Msb, 0),
            CrcPreset::Crc16Ccitt => {
                CrcParams::new(16, 0x1021, Convention::Msb, 0xFFFF).with_xor_out(0)
            }
            CrcPreset::Crc16X25 => CrcParams::new(16, 0x1021, Convention::Lsb, 0xFFFF),
            CrcPreset::Crc32Iso => CrcParams::new(32, 0x04C11DB7, Convention::Lsb, 0xFFFF_FFFF),
            CrcPreset::Crc32Mpeg2 => {
                CrcParams::new(32, 0x04C11DB7, Convention::Msb, 0xFFFF_FFFF).with_xor_out(0)
            }
            CrcPreset::Crc64Xz => CrcParams::new(64, 0x42F0E1EBA9EA3693, Convention::Lsb, u64::MAX),
        }
    }

    /// Checksum of the ASCII string `"123456789"`, the customary check value
    pub const fn check(self) -> u64 {
        match self {
            CrcPreset::Crc8Smbus => 0xF4,
            CrcPreset::Crc16Ccitt => 0x29B1,
            CrcPreset::Crc16X25 => 0x906E,
            CrcPreset::Crc32Iso => 0xCBF43926,
            CrcPreset::Crc32Mpeg2 => 0x0376E6E7,
            CrcPreset::Crc64Xz => 0x995DC9BBDF1939FA,
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            CrcPreset::Crc8Smbus => "crc8-smbus",
            CrcPreset::Crc16Ccitt => "crc16-ccitt",
            CrcPreset::Crc16X25 => "crc16-x25",
            CrcPreset::Crc32Iso => "crc32-iso",
            CrcPreset::Crc32Mpeg2 => "crc32-mpeg2",
            CrcPreset::Crc64Xz => "crc64-xz",
        }
    }

    /// The shared transform table
    pub fn table(self) -> Arc<CrcTable> {
        Arc::clone(&PRESET_TABLES[self as usize])
    }

    /// A fresh engine for this preset
    pub fn engine(self) -> CrcEngine {
        CrcEngine::from_preset(self)
    }

    /// One-shot checksum of `data`
    pub fn checksum(self, data: &[u8]) -> u64 {
        let mut crc = self.engine();
        crc.update(data);
        crc.get()
    }
}

impl fmt::Display for CrcPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CrcPreset {
    type Err = BitcrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CrcPreset::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| BitcrcError::Parse(format!("unknown crc preset: {}", s)))
    }
}
