//! String table obfuscation and negative-offset resolution
//!
//! The string table directly follows the header. It is stored XOR-ed with a
//! repeating 8-byte key; once decoded it is a packed run of NUL-terminated
//! strings. Fragments address a string by storing the negated byte offset of
//! its first character in their `name_ref` field.

use crate::error::{Result, WldError};
use crate::options::NameCase;
use std::borrow::Cow;

/// Repeating XOR key applied to the string table
pub const STRING_KEY: [u8; 8] = [0x95, 0x3A, 0xC5, 0x2A, 0x95, 0x7A, 0x95, 0x6A];

/// XOR `src` with the string key into `dst`
///
/// The transform is its own inverse, so this both decodes and encodes.
/// Only `min(src.len(), dst.len())` bytes are processed.
pub fn xor_into(src: &[u8], dst: &mut [u8]) {
    for (i, (out, byte)) in dst.iter_mut().zip(src).enumerate() {
        *out = byte ^ STRING_KEY[i & 7];
    }
}

/// Decode an obfuscated string blob into a new buffer
pub fn decode(raw: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(raw.len())?;
    out.resize(raw.len(), 0);
    xor_into(raw, &mut out);
    Ok(out)
}

/// Obfuscate a plaintext string blob
pub fn encode(plain: &[u8]) -> Result<Vec<u8>> {
    decode(plain)
}

/// Decoded string table addressed by negative offsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    data: Vec<u8>,
}

impl StringTable {
    /// Decode the table from its obfuscated on-disk form
    pub fn decode(raw: &[u8], case: NameCase) -> Result<Self> {
        let mut data = decode(raw)?;
        if case == NameCase::Lowercase {
            data.make_ascii_lowercase();
        }
        Ok(Self { data })
    }

    /// Slice the table out of a full WLD buffer and decode it
    ///
    /// `offset` is where the table starts, `length` its declared size.
    pub fn from_buffer(buffer: &[u8], offset: usize, length: u32, case: NameCase) -> Result<Self> {
        let raw = offset
            .checked_add(length as usize)
            .and_then(|end| buffer.get(offset..end))
            .ok_or(WldError::TruncatedStrings {
                offset,
                length,
                available: buffer.len(),
            })?;
        Self::decode(raw, case)
    }

    /// Wrap an already decoded table
    pub fn from_plain(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Table length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the table holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reference value of the sentinel slot, `-len`
    pub fn sentinel_ref(&self) -> i32 {
        i32::try_from(self.data.len()).map_or(i32::MIN, |len| -len)
    }

    /// Whether `name_ref` addresses a string inside this table
    pub fn contains_ref(&self, name_ref: i32) -> bool {
        name_ref < 0 && (name_ref.unsigned_abs() as usize) < self.data.len()
    }

    /// Resolve `name_ref` to the bytes of its string, without the terminator
    ///
    /// Returns `None` for zero, positive and out-of-range references. A
    /// string missing its terminator ends at the end of the table.
    pub fn resolve(&self, name_ref: i32) -> Option<&[u8]> {
        if !self.contains_ref(name_ref) {
            return None;
        }
        let tail = &self.data[name_ref.unsigned_abs() as usize..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        Some(&tail[..end])
    }

    /// Resolve `name_ref` to text, replacing invalid UTF-8
    pub fn resolve_str(&self, name_ref: i32) -> Option<Cow<'_, str>> {
        self.resolve(name_ref).map(String::from_utf8_lossy)
    }

    /// Iterate over every `(name_ref, string)` pair in the table
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[u8])> {
        let mut offset = 0usize;
        self.data.split(|&b| b == 0).filter_map(move |s| {
            let at = offset;
            offset += s.len() + 1;
            if at == 0 || s.is_empty() {
                return None;
            }
            i32::try_from(at).ok().map(|at| (-at, s))
        })
    }

    /// Raw decoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
