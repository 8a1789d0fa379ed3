//! Error types for WLD parsing

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse error classification shared by every failure of this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path does not resolve to a readable file
    NotFound,
    /// An allocation or growth step failed
    OutOfMemory,
    /// An I/O read failed
    FileError,
    /// Invalid arguments were passed in
    Misuse,
    /// The buffer violates the container structure
    Corrupted,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::OutOfMemory => "out of memory",
            Self::FileError => "file error",
            Self::Misuse => "misuse",
            Self::Corrupted => "corrupted",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when opening a WLD container
#[derive(Error, Debug)]
pub enum WldError {
    /// File could not be opened
    #[error("Cannot open WLD file {path}: {source}")]
    NotFound {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying open error
        source: std::io::Error,
    },

    /// Reading the input failed before EOF
    #[error("I/O error while reading WLD data: {0}")]
    FileError(#[source] std::io::Error),

    /// Growing an internal buffer failed
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Misuse(&'static str),

    /// Buffer is shorter than the fixed header
    #[error("Truncated WLD header: need {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Fixed header size
        expected: usize,
        /// Available bytes
        actual: usize,
    },

    /// Invalid magic signature
    #[error("Invalid WLD signature: 0x{0:08x}")]
    InvalidSignature(u32),

    /// Version tag is not one of the known tags
    #[error("Unsupported WLD version: 0x{0:08x}")]
    UnsupportedVersion(u32),

    /// String table runs past the end of the buffer
    #[error("String table of {length} bytes at offset {offset} exceeds buffer of {available} bytes")]
    TruncatedStrings {
        /// Start of the string table
        offset: usize,
        /// Declared string table length
        length: u32,
        /// Total buffer length
        available: usize,
    },

    /// Fragment record runs past the end of the buffer
    #[error("Truncated fragment {index} at offset {offset}: need {needed} bytes, {available} remain")]
    TruncatedFragment {
        /// Directory index the fragment would occupy
        index: u32,
        /// Offset of the record start
        offset: usize,
        /// Bytes the record requires
        needed: u64,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Declared fragment length cannot hold the name reference
    #[error("Invalid length {length} for fragment {index} at offset {offset}")]
    InvalidFragmentLength {
        /// Directory index the fragment would occupy
        index: u32,
        /// Offset of the record start
        offset: usize,
        /// Declared length
        length: u32,
    },

    /// `BinRw` parsing error on a fixed structure
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl WldError {
    /// Classify this error into one of the public kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::FileError(_) => ErrorKind::FileError,
            Self::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Self::Misuse(_) => ErrorKind::Misuse,
            Self::TruncatedHeader { .. }
            | Self::InvalidSignature(_)
            | Self::UnsupportedVersion(_)
            | Self::TruncatedStrings { .. }
            | Self::TruncatedFragment { .. }
            | Self::InvalidFragmentLength { .. }
            | Self::BinRw(_) => ErrorKind::Corrupted,
        }
    }

    /// Whether this error reports a structural violation of the format
    pub fn is_corrupted(&self) -> bool {
        self.kind() == ErrorKind::Corrupted
    }
}

/// Type alias for WLD operation results
pub type Result<T> = std::result::Result<T, WldError>;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(WldError::Misuse("empty").kind(), ErrorKind::Misuse);
        assert_eq!(
            WldError::InvalidSignature(0).kind(),
            ErrorKind::Corrupted
        );
        assert_eq!(
            WldError::FileError(std::io::Error::other("boom")).kind(),
            ErrorKind::FileError
        );
        assert!(WldError::UnsupportedVersion(7).is_corrupted());
        assert!(!WldError::Misuse("x").is_corrupted());

        let reserve = Vec::<u8>::new()
            .try_reserve(usize::MAX)
            .expect_err("reserving usize::MAX must fail");
        assert_eq!(WldError::from(reserve).kind(), ErrorKind::OutOfMemory);
    }

    #[test]
    fn test_messages() {
        let err = WldError::InvalidSignature(0xdead_beef);
        assert_eq!(err.to_string(), "Invalid WLD signature: 0xdeadbeef");
        assert_eq!(ErrorKind::Corrupted.to_string(), "corrupted");
    }
}
