//! Fragment records and views
//!
//! A fragment is framed as `length`, `frag_type`, `name_ref` followed by an
//! opaque payload. `length` counts every byte after `frag_type`, so the full
//! record occupies `length + 8` bytes and the payload `length - 4`.

use binrw::{BinRead, BinWrite};

/// Size of the fixed fragment header in bytes
pub const FRAGMENT_HEADER_SIZE: usize = 12;

/// Bytes of the framing not counted by `length` (`length` and `frag_type`)
pub const FRAGMENT_FRAMING_SIZE: usize = 8;

/// Smallest valid `length`: enough to hold `name_ref`
pub const MIN_FRAGMENT_LENGTH: u32 = 4;

/// Fixed fragment header (little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct FragmentHeader {
    /// Bytes following the `frag_type` field
    pub length: u32,
    /// Payload type tag
    pub frag_type: u32,
    /// Name reference, negative when the fragment is named
    pub name_ref: i32,
}

impl FragmentHeader {
    /// Full on-disk record size
    pub fn record_size(&self) -> u64 {
        u64::from(self.length) + FRAGMENT_FRAMING_SIZE as u64
    }

    /// Payload size, zero when `length` is too small to be valid
    pub fn payload_size(&self) -> u32 {
        self.length.saturating_sub(MIN_FRAGMENT_LENGTH)
    }
}

/// Validated location of one fragment inside the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRecord {
    /// Offset of the record start (the `length` field)
    pub offset: usize,
    /// Decoded header
    pub header: FragmentHeader,
}

impl FragmentRecord {
    /// Byte range of the full record
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.header.record_size() as usize
    }

    /// Byte range of the payload
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        self.offset + FRAGMENT_HEADER_SIZE..self.range().end
    }
}

/// Borrowed view of a fragment within a parsed container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    index: u32,
    record: FragmentRecord,
    data: &'a [u8],
}

impl<'a> Fragment<'a> {
    pub(crate) fn new(index: u32, record: FragmentRecord, data: &'a [u8]) -> Self {
        Self {
            index,
            record,
            data,
        }
    }

    /// Directory index, 1-based
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Offset of the record in the source buffer
    pub fn offset(&self) -> usize {
        self.record.offset
    }

    /// Declared length field
    pub fn length(&self) -> u32 {
        self.record.header.length
    }

    /// Raw type tag
    pub fn frag_type(&self) -> u32 {
        self.record.header.frag_type
    }

    /// Known kind of this fragment, if the tag is recognized
    pub fn kind(&self) -> Option<FragmentKind> {
        FragmentKind::from_tag(self.frag_type())
    }

    /// Whether this fragment carries the given kind's tag
    pub fn is_kind(&self, kind: FragmentKind) -> bool {
        self.frag_type() == kind.tag()
    }

    /// Raw name reference
    pub fn name_ref(&self) -> i32 {
        self.record.header.name_ref
    }

    /// Full record size including framing
    pub fn record_size(&self) -> usize {
        self.record.header.record_size() as usize
    }

    /// Record header
    pub fn header(&self) -> &FragmentHeader {
        &self.record.header
    }

    /// Opaque payload bytes following `name_ref`
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.record.payload_range()]
    }

    /// Full record bytes, framing included
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[self.record.range()]
    }
}

/// Fragment kinds with a known payload layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Texture file names (0x03)
    TextureName,
    /// Texture, possibly animated (0x04)
    Texture,
    /// Texture reference (0x05)
    TextureRef,
    /// Skeleton track set (0x10)
    Skeleton,
    /// Skeleton reference (0x11)
    SkeletonRef,
    /// Animation track (0x12)
    Animation,
    /// Animation track reference (0x13)
    AnimationRef,
    /// Model / actor definition (0x14)
    Model,
    /// Model placement (0x15)
    ModelPlacement,
    /// Mesh reference (0x2D)
    MeshRef,
    /// Vertex color reference (0x2F)
    VertexColorRef,
    /// Material (0x30)
    Material,
    /// Material list (0x31)
    MaterialList,
    /// Vertex colors (0x32)
    VertexColors,
    /// Vertex colors reference (0x33)
    VertexColorsRef,
    /// Mesh (0x36)
    Mesh,
    /// Vertex animation (0x37)
    VertexAnimation,
}

impl FragmentKind {
    /// Numeric tag stored in `frag_type`
    pub const fn tag(self) -> u32 {
        match self {
            Self::TextureName => 0x03,
            Self::Texture => 0x04,
            Self::TextureRef => 0x05,
            Self::Skeleton => 0x10,
            Self::SkeletonRef => 0x11,
            Self::Animation => 0x12,
            Self::AnimationRef => 0x13,
            Self::Model => 0x14,
            Self::ModelPlacement => 0x15,
            Self::MeshRef => 0x2D,
            Self::VertexColorRef => 0x2F,
            Self::Material => 0x30,
            Self::MaterialList => 0x31,
            Self::VertexColors => 0x32,
            Self::VertexColorsRef => 0x33,
            Self::Mesh => 0x36,
            Self::VertexAnimation => 0x37,
        }
    }

    /// Map a numeric tag to a known kind
    pub const fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0x03 => Self::TextureName,
            0x04 => Self::Texture,
            0x05 => Self::TextureRef,
            0x10 => Self::Skeleton,
            0x11 => Self::SkeletonRef,
            0x12 => Self::Animation,
            0x13 => Self::AnimationRef,
            0x14 => Self::Model,
            0x15 => Self::ModelPlacement,
            0x2D => Self::MeshRef,
            0x2F => Self::VertexColorRef,
            0x30 => Self::Material,
            0x31 => Self::MaterialList,
            0x32 => Self::VertexColors,
            0x33 => Self::VertexColorsRef,
            0x36 => Self::Mesh,
            0x37 => Self::VertexAnimation,
            _ => return None,
        })
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} (0x{:02X})", self, self.tag())
    }
}
