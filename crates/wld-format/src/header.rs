//! WLD header structure and validation

use crate::error::{Result, WldError};
use binrw::{BinRead, BinWrite};
use std::io::Cursor;

/// Magic signature at the start of every WLD file
pub const WLD_SIGNATURE: u32 = 0x5450_3D02;

/// Size of the fixed header in bytes
pub const WLD_HEADER_SIZE: usize = 28;

/// Known WLD version tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WldVersion {
    /// `0x00015500`, the first format revision
    V1,
    /// `0x1000C800`
    V2,
    /// `0x1000C801`
    V3,
}

/// Fragment layout generation a version belongs to
///
/// Framing is identical across generations; only payload layouts differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatGeneration {
    /// Original payload layouts
    Old,
    /// Revised payload layouts
    New,
}

impl WldVersion {
    /// Version tag as stored on disk
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::V1 => 0x0001_5500,
            Self::V2 => 0x1000_C800,
            Self::V3 => 0x1000_C801,
        }
    }

    /// Map an on-disk tag to a known version
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x0001_5500 => Some(Self::V1),
            0x1000_C800 => Some(Self::V2),
            0x1000_C801 => Some(Self::V3),
            _ => None,
        }
    }

    /// Payload layout generation
    pub const fn generation(self) -> FormatGeneration {
        match self {
            Self::V1 => FormatGeneration::Old,
            Self::V2 | Self::V3 => FormatGeneration::New,
        }
    }

    /// All known versions
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];
}

impl std::fmt::Display for WldVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => write!(f, "V1 (0x00015500)"),
            Self::V2 => write!(f, "V2 (0x1000C800)"),
            Self::V3 => write!(f, "V3 (0x1000C801)"),
        }
    }
}

/// Fixed 28-byte file header (little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct WldHeader {
    /// Magic signature, `WLD_SIGNATURE` for valid files
    pub signature: u32,

    /// Raw version tag
    pub version: u32,

    /// Declared number of fragment records
    pub fragment_count: u32,

    /// Not interpreted
    pub unknown_a: [u32; 2],

    /// Byte length of the obfuscated string table
    pub strings_length: u32,

    /// Not interpreted
    pub unknown_b: u32,
}

impl WldHeader {
    /// Create a header for the given version with empty tables
    pub fn new(version: WldVersion) -> Self {
        Self {
            signature: WLD_SIGNATURE,
            version: version.to_u32(),
            fragment_count: 0,
            unknown_a: [0; 2],
            strings_length: 0,
            unknown_b: 0,
        }
    }

    /// Read and validate the header at the start of `data`
    ///
    /// Returns the header together with its recognized version.
    pub fn parse(data: &[u8]) -> Result<(Self, WldVersion)> {
        if data.len() < WLD_HEADER_SIZE {
            return Err(WldError::TruncatedHeader {
                expected: WLD_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let header = Self::read(&mut Cursor::new(&data[..WLD_HEADER_SIZE]))?;
        let version = header.validate()?;
        Ok((header, version))
    }

    /// Check signature and version tag
    pub fn validate(&self) -> Result<WldVersion> {
        if self.signature != WLD_SIGNATURE {
            return Err(WldError::InvalidSignature(self.signature));
        }

        WldVersion::from_u32(self.version).ok_or(WldError::UnsupportedVersion(self.version))
    }

    /// Offset of the first fragment record
    pub fn fragments_offset(&self) -> usize {
        WLD_HEADER_SIZE + self.strings_length as usize
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use binrw::BinWriterExt;

    fn header_bytes(header: &WldHeader) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        cursor
            .write_le(header)
            .expect("Test operation should succeed");
        cursor.into_inner()
    }

    #[test]
    fn test_header_layout() {
        let mut header = WldHeader::new(WldVersion::V2);
        header.fragment_count = 3;
        header.strings_length = 0x40;

        let bytes = header_bytes(&header);
        assert_eq!(bytes.len(), WLD_HEADER_SIZE);
        assert_eq!(&bytes[0..4], &[0x02, 0x3D, 0x50, 0x54]);
        assert_eq!(&bytes[4..8], &[0x00, 0xC8, 0x00, 0x10]);
        assert_eq!(&bytes[8..12], &3u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &0x40u32.to_le_bytes());
    }

    #[test]
    fn test_parse_all_versions() {
        for version in WldVersion::ALL {
            let bytes = header_bytes(&WldHeader::new(version));
            let (header, parsed) = WldHeader::parse(&bytes).expect("Test operation should succeed");
            assert_eq!(parsed, version);
            assert_eq!(header.fragment_count, 0);
            assert_eq!(header.fragments_offset(), WLD_HEADER_SIZE);
        }
    }

    #[test]
    fn test_short_buffer() {
        let bytes = header_bytes(&WldHeader::new(WldVersion::V1));
        for len in 0..WLD_HEADER_SIZE {
            let err = WldHeader::parse(&bytes[..len]).expect_err("short header must fail");
            assert_eq!(err.kind(), ErrorKind::Corrupted);
        }
    }

    #[test]
    fn test_bad_signature() {
        let mut header = WldHeader::new(WldVersion::V1);
        header.signature = 0x1234_5678;
        let err = WldHeader::parse(&header_bytes(&header)).expect_err("bad signature must fail");
        assert!(matches!(err, WldError::InvalidSignature(0x1234_5678)));
    }

    #[test]
    fn test_bad_version() {
        let mut header = WldHeader::new(WldVersion::V1);
        header.version = 0x1000_C802;
        let err = WldHeader::parse(&header_bytes(&header)).expect_err("bad version must fail");
        assert!(matches!(err, WldError::UnsupportedVersion(0x1000_C802)));
    }

    #[test]
    fn test_version_properties() {
        assert_eq!(WldVersion::V1.generation(), FormatGeneration::Old);
        assert_eq!(WldVersion::V2.generation(), FormatGeneration::New);
        assert_eq!(WldVersion::V3.generation(), FormatGeneration::New);

        for version in WldVersion::ALL {
            assert_eq!(WldVersion::from_u32(version.to_u32()), Some(version));
        }
        assert_eq!(WldVersion::from_u32(0), None);
    }
}
