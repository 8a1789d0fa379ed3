//! Parser and fragment index for legacy WLD world containers
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Many WLD-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::needless_pass_by_value)] // Consuming teardown
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::use_self)] // Type clarity
//! A WLD file is a fixed header, an XOR-obfuscated table of NUL-terminated
//! strings, and a run of variable-length tagged records called fragments.
//! This crate validates the header, decodes the string table and builds an
//! index over the fragments so they can be enumerated, resolved by
//! reference, and looked up by name. Fragment payloads are handed out as
//! opaque byte slices.
//!
//! # Layout
//!
//! - **Header**: 28 bytes, little-endian, signature `0x54503D02`
//! - **String table**: `strings_length` bytes, XOR-ed with an 8-byte key
//! - **Fragments**: `length`, `frag_type`, `name_ref`, payload
//!
//! # Usage
//!
//! ```rust,no_run
//! use wld_format::{FragmentKind, Wld};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let wld = Wld::open("gfaydark_obj.wld")?;
//!
//! println!("Version: {}", wld.version());
//! println!("Fragments: {}", wld.len());
//!
//! for mesh in wld.fragments_of_kind(FragmentKind::Mesh) {
//!     println!("{:?}: {} bytes", wld.fragment_name(&mesh), mesh.payload().len());
//! }
//!
//! if let Some(frag) = wld.find_by_name("BRICK_SPRITE") {
//!     println!("Found at index {}", frag.index());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Ownership
//!
//! [`Wld<Vec<u8>>`](Wld) owns its source buffer and is produced by
//! [`Wld::open`], [`Wld::from_reader`], [`Wld::from_bytes`] (copying) and
//! [`Wld::from_vec`]. [`Wld<&[u8]>`](Wld) is produced by
//! [`Wld::from_slice`] and borrows the caller's buffer without copying.

#![warn(missing_docs)]

/// Directory of fragment records and the name lookup index
pub mod directory;
pub mod error;
/// Fragment framing, views and known fragment kinds
pub mod fragment;
pub mod hash;
/// WLD header layout and version tags
pub mod header;
pub mod options;
pub mod strings;
pub mod wld;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

// Re-export main types
pub use directory::{Directory, LookupEntry};
pub use error::{ErrorKind, Result, WldError};
pub use fragment::{Fragment, FragmentHeader, FragmentKind, FragmentRecord};
pub use hash::name_hash;
pub use header::{FormatGeneration, WLD_SIGNATURE, WldHeader, WldVersion};
pub use options::{NameCase, ParseOptions};
pub use strings::StringTable;
pub use wld::Wld;
