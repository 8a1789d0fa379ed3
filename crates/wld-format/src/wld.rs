//! Parsed WLD container and its query surface

use crate::directory::Directory;
use crate::error::{Result, WldError};
use crate::fragment::{Fragment, FragmentKind};
use crate::header::{WLD_HEADER_SIZE, WldHeader, WldVersion};
use crate::options::ParseOptions;
use crate::strings::StringTable;
use std::borrow::Cow;
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Chunk size used when draining a reader
const READ_CHUNK_SIZE: usize = 8192;

/// A parsed WLD container
///
/// `B` is the source buffer the fragment views point into. `Wld<Vec<u8>>`
/// owns its buffer; `Wld<&[u8]>` borrows the caller's buffer, which must
/// then outlive the container. Dropping the container releases exactly what
/// it owns.
#[derive(Debug, Clone)]
pub struct Wld<B = Vec<u8>> {
    data: B,
    header: WldHeader,
    version: WldVersion,
    options: ParseOptions,
    strings: StringTable,
    directory: Directory,
}

impl<B: AsRef<[u8]>> Wld<B> {
    /// Parse a buffer with default options
    pub fn parse(data: B) -> Result<Self> {
        Self::parse_with(data, ParseOptions::default())
    }

    /// Parse a buffer
    ///
    /// Validates the header, decodes the string table and indexes every
    /// declared fragment. On failure everything allocated so far is dropped.
    pub fn parse_with(data: B, options: ParseOptions) -> Result<Self> {
        let bytes = data.as_ref();
        let (header, version) = WldHeader::parse(bytes)?;

        let strings = StringTable::from_buffer(
            bytes,
            WLD_HEADER_SIZE,
            header.strings_length,
            options.name_case,
        )?;
        let directory = Directory::build(bytes, &header, &strings)?;

        debug!(
            "Parsed WLD {}: {} fragments, {} string table bytes, {} buffer bytes",
            version,
            directory.fragment_count(),
            strings.len(),
            bytes.len()
        );

        Ok(Self {
            data,
            header,
            version,
            options,
            strings,
            directory,
        })
    }

    /// Source buffer
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// File header
    pub fn header(&self) -> &WldHeader {
        &self.header
    }

    /// Recognized version
    pub fn version(&self) -> WldVersion {
        self.version
    }

    /// Options the container was parsed with
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Decoded string table
    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    /// Fragment directory and lookup entries
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Number of fragments, sentinel excluded
    pub fn len(&self) -> usize {
        self.directory.fragment_count()
    }

    /// Whether the container holds no fragments
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over fragments in file order, starting at index 1
    pub fn fragments(&self) -> impl Iterator<Item = Fragment<'_>> + '_ {
        let data = self.data.as_ref();
        self.directory
            .records()
            .map(move |(index, record)| Fragment::new(index, *record, data))
    }

    /// Iterate over fragments carrying the tag of `kind`
    pub fn fragments_of_kind(&self, kind: FragmentKind) -> impl Iterator<Item = Fragment<'_>> + '_ {
        self.fragments().filter(move |frag| frag.is_kind(kind))
    }

    /// Fragment at a directory index; index 0 is never returned
    pub fn fragment(&self, index: usize) -> Option<Fragment<'_>> {
        let record = self.directory.record(index)?;
        Some(Fragment::new(index as u32, *record, self.data.as_ref()))
    }

    /// Resolve a fragment reference
    ///
    /// Positive references index the directory directly. Negative
    /// references are name references and are matched by scanning the
    /// lookup entries; the first fragment in file order wins.
    pub fn get(&self, reference: i32) -> Option<Fragment<'_>> {
        if reference >= 0 {
            self.fragment(reference as usize)
        } else {
            self.directory
                .index_of_name_ref(reference)
                .and_then(|index| self.fragment(index))
        }
    }

    /// Find the first fragment named exactly `name`
    ///
    /// When the container was parsed with lowercased names, the query is
    /// lowercased as well.
    pub fn find_by_name(&self, name: impl AsRef<[u8]>) -> Option<Fragment<'_>> {
        let name = self.options.name_case.normalize(name.as_ref());
        self.directory
            .index_of_name(&name, &self.strings)
            .and_then(|index| self.fragment(index))
    }

    /// Name of a fragment, `None` when it is unnamed
    pub fn fragment_name(&self, fragment: &Fragment<'_>) -> Option<Cow<'_, str>> {
        self.resolve_name(fragment.name_ref())
    }

    /// String addressed by a raw name reference
    pub fn resolve_name(&self, name_ref: i32) -> Option<Cow<'_, str>> {
        self.strings.resolve_str(name_ref)
    }

    /// Raw bytes of the string addressed by a name reference
    pub fn resolve_name_bytes(&self, name_ref: i32) -> Option<&[u8]> {
        self.strings.resolve(name_ref)
    }

    /// Release the container
    pub fn close(self) {}

    /// Release the indices and hand back the source buffer
    pub fn into_inner(self) -> B {
        self.data
    }
}

impl Wld<Vec<u8>> {
    /// Read and parse a file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    /// Read and parse a file with options
    pub fn open_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(WldError::Misuse("empty path"));
        }

        debug!("Opening WLD file {}", path.display());
        let file = File::open(path).map_err(|source| WldError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = Vec::new();
        if let Ok(metadata) = file.metadata() {
            data.try_reserve_exact(metadata.len() as usize)?;
        }
        read_into(file, &mut data)?;
        Self::parse_with(data, options)
    }

    /// Drain a reader to EOF and parse the result
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, ParseOptions::default())
    }

    /// Drain a reader to EOF and parse the result with options
    pub fn from_reader_with<R: Read>(reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        read_into(reader, &mut data)?;
        Self::parse_with(data, options)
    }

    /// Copy a buffer and parse the copy
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with(data, ParseOptions::default())
    }

    /// Copy a buffer and parse the copy with options
    pub fn from_bytes_with(data: &[u8], options: ParseOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(WldError::Misuse("empty buffer"));
        }
        let mut copy = Vec::new();
        copy.try_reserve_exact(data.len())?;
        copy.extend_from_slice(data);
        Self::parse_with(copy, options)
    }

    /// Take ownership of a buffer without copying it
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        Self::from_vec_with(data, ParseOptions::default())
    }

    /// Take ownership of a buffer without copying it, with options
    pub fn from_vec_with(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(WldError::Misuse("empty buffer"));
        }
        Self::parse_with(data, options)
    }
}

impl<'a> Wld<&'a [u8]> {
    /// Parse a borrowed buffer without copying it
    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        Self::from_slice_with(data, ParseOptions::default())
    }

    /// Parse a borrowed buffer without copying it, with options
    pub fn from_slice_with(data: &'a [u8], options: ParseOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(WldError::Misuse("empty buffer"));
        }
        Self::parse_with(data, options)
    }
}

/// Append everything `reader` yields to `data`
fn read_into<R: Read>(mut reader: R, data: &mut Vec<u8>) -> Result<()> {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(read) => read,
            Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
            Err(e) => return Err(WldError::FileError(e)),
        };
        data.try_reserve(read)?;
        data.extend_from_slice(&chunk[..read]);
    }
}
