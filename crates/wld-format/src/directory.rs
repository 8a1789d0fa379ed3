//! Fragment directory and lookup index
//!
//! The directory is built by walking the records that follow the string
//! table. Slot 0 is a sentinel standing for the string table itself, so the
//! first real fragment lives at index 1, matching the positional references
//! fragments use to point at each other. A parallel array of lookup entries
//! holds each fragment's name reference and precomputed name hash.

use crate::error::{Result, WldError};
use crate::fragment::{
    FRAGMENT_HEADER_SIZE, FragmentHeader, FragmentRecord, MIN_FRAGMENT_LENGTH,
};
use crate::hash::name_hash;
use crate::header::WldHeader;
use crate::strings::StringTable;
use binrw::BinRead;
use std::io::Cursor;
use tracing::{debug, trace};

/// Name reference and hash for one directory slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LookupEntry {
    /// Raw name reference, zero when the slot is unnamed
    pub name_ref: i32,
    /// Name hash, zero when the slot is unnamed
    pub hash: u32,
}

impl LookupEntry {
    /// Entry for a slot without a resolvable name
    pub const UNNAMED: Self = Self {
        name_ref: 0,
        hash: 0,
    };

    /// Build the entry for a record, hashing its name if it resolves
    pub fn for_name_ref(name_ref: i32, strings: &StringTable) -> Self {
        strings
            .resolve(name_ref)
            .map_or(Self::UNNAMED, |name| Self {
                name_ref,
                hash: name_hash(name),
            })
    }

    /// Whether this entry carries a name
    pub fn is_named(&self) -> bool {
        self.name_ref < 0
    }
}

/// Ordered fragment records with their lookup entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    records: Vec<Option<FragmentRecord>>,
    entries: Vec<LookupEntry>,
}

impl Directory {
    /// Create a directory holding only the string table sentinel
    pub fn new(strings: &StringTable) -> Result<Self> {
        let mut directory = Self::default();
        directory.push(
            None,
            LookupEntry {
                name_ref: strings.sentinel_ref(),
                hash: 0,
            },
        )?;
        Ok(directory)
    }

    /// Scan the fragment records declared by `header`
    ///
    /// Every record is bounds checked before it is admitted. Bytes left
    /// after the declared records are ignored.
    pub fn build(data: &[u8], header: &WldHeader, strings: &StringTable) -> Result<Self> {
        let mut directory = Self::new(strings)?;
        let mut offset = header.fragments_offset();

        for index in 1..=header.fragment_count {
            let available = data.len().saturating_sub(offset);
            if available < FRAGMENT_HEADER_SIZE {
                return Err(WldError::TruncatedFragment {
                    index,
                    offset,
                    needed: FRAGMENT_HEADER_SIZE as u64,
                    available,
                });
            }

            let frag_header =
                FragmentHeader::read(&mut Cursor::new(&data[offset..offset + FRAGMENT_HEADER_SIZE]))?;

            if frag_header.length < MIN_FRAGMENT_LENGTH {
                return Err(WldError::InvalidFragmentLength {
                    index,
                    offset,
                    length: frag_header.length,
                });
            }

            let record_size = frag_header.record_size();
            if record_size > available as u64 {
                return Err(WldError::TruncatedFragment {
                    index,
                    offset,
                    needed: record_size,
                    available,
                });
            }

            trace!(
                "Fragment {} at offset {}: type 0x{:02x}, length {}, name_ref {}",
                index, offset, frag_header.frag_type, frag_header.length, frag_header.name_ref
            );

            let entry = LookupEntry::for_name_ref(frag_header.name_ref, strings);
            directory.push(
                Some(FragmentRecord {
                    offset,
                    header: frag_header,
                }),
                entry,
            )?;

            offset += record_size as usize;
        }

        let trailing = data.len().saturating_sub(offset);
        if trailing > 0 {
            debug!("Ignoring {} trailing bytes after last fragment", trailing);
        }

        Ok(directory)
    }

    /// Append a slot, doubling capacity whenever it is exhausted
    fn push(&mut self, record: Option<FragmentRecord>, entry: LookupEntry) -> Result<()> {
        let len = self.records.len();
        if len == self.records.capacity() {
            self.records.try_reserve_exact(len.max(1))?;
        }
        if len == self.entries.capacity() {
            self.entries.try_reserve_exact(len.max(1))?;
        }
        self.records.push(record);
        self.entries.push(entry);
        Ok(())
    }

    /// Number of slots including the sentinel
    pub fn slot_count(&self) -> usize {
        self.records.len()
    }

    /// Number of real fragments
    pub fn fragment_count(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    /// Record at a directory index, `None` for the sentinel or out of range
    pub fn record(&self, index: usize) -> Option<&FragmentRecord> {
        self.records.get(index).and_then(Option::as_ref)
    }

    /// Records of the real fragments with their indices
    pub fn records(&self) -> impl Iterator<Item = (u32, &FragmentRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (i as u32, r)))
    }

    /// Lookup entries, parallel to the slots
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// First index whose stored name reference equals `name_ref`
    pub fn index_of_name_ref(&self, name_ref: i32) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, entry)| entry.is_named() && entry.name_ref == name_ref)
            .map(|(i, _)| i)
    }

    /// First index whose name equals `name` byte for byte
    pub fn index_of_name(&self, name: &[u8], strings: &StringTable) -> Option<usize> {
        let hash = name_hash(name);
        self.entries
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, entry)| {
                entry.is_named()
                    && entry.hash == hash
                    && strings.resolve(entry.name_ref) == Some(name)
            })
            .map(|(i, _)| i)
    }
}
