//! Test utilities for building WLD byte images
//!
//! The crate only reads WLD files; this builder exists so tests can produce
//! well-formed and deliberately broken inputs.

use crate::fragment::FragmentHeader;
use crate::header::{WldHeader, WldVersion};
use crate::strings;
use binrw::BinWriterExt;
use std::io::Cursor;

/// In-memory WLD image under construction
#[derive(Debug, Clone)]
pub struct WldFixture {
    header: WldHeader,
    strings: Vec<u8>,
    fragments: Vec<u8>,
    written: u32,
    count_override: Option<u32>,
}

impl WldFixture {
    /// Empty image for the given version
    pub fn new(version: WldVersion) -> Self {
        Self {
            header: WldHeader::new(version),
            strings: Vec::new(),
            fragments: Vec::new(),
            written: 0,
            count_override: None,
        }
    }

    /// Add a name to the string table and return its reference
    pub fn name(&mut self, name: &str) -> i32 {
        if self.strings.is_empty() {
            // offset 0 cannot be referenced
            self.strings.push(0);
        }
        let name_ref = -i32::try_from(self.strings.len()).expect("string table fits i32");
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        name_ref
    }

    /// Append a well-formed fragment
    pub fn fragment(&mut self, frag_type: u32, name_ref: i32, payload: &[u8]) -> &mut Self {
        let length = u32::try_from(payload.len() + 4).expect("payload fits u32");
        self.raw_fragment(length, frag_type, name_ref, payload)
    }

    /// Append a fragment with an arbitrary declared length
    pub fn raw_fragment(
        &mut self,
        length: u32,
        frag_type: u32,
        name_ref: i32,
        payload: &[u8],
    ) -> &mut Self {
        let header = FragmentHeader {
            length,
            frag_type,
            name_ref,
        };
        let end = self.fragments.len() as u64;
        let mut cursor = Cursor::new(&mut self.fragments);
        cursor.set_position(end);
        cursor.write_le(&header).expect("fragment header write");
        self.fragments.extend_from_slice(payload);
        self.written += 1;
        self
    }

    /// Override the declared fragment count
    pub fn fragment_count(&mut self, count: u32) -> &mut Self {
        self.count_override = Some(count);
        self
    }

    /// Override the signature
    pub fn signature(&mut self, signature: u32) -> &mut Self {
        self.header.signature = signature;
        self
    }

    /// Serialize the image
    pub fn build(&self) -> Vec<u8> {
        let mut header = self.header.clone();
        header.fragment_count = self.count_override.unwrap_or(self.written);
        header.strings_length = u32::try_from(self.strings.len()).expect("strings fit u32");

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&header).expect("header write");
        let mut data = cursor.into_inner();
        data.extend_from_slice(&strings::encode(&self.strings).expect("encode strings"));
        data.extend_from_slice(&self.fragments);
        data
    }
}
