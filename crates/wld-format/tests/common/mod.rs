//! Shared WLD image builder for integration tests

#![allow(dead_code)]

use binrw::BinWriterExt;
use std::io::Cursor;
use wld_format::{FragmentHeader, WldHeader, WldVersion, strings};

/// Build a WLD image from names and `(frag_type, name, payload)` triples
///
/// A `None` name produces an unnamed fragment.
pub fn build_wld(version: WldVersion, fragments: &[(u32, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut table = vec![0u8];
    let mut body = Cursor::new(Vec::new());

    for &(frag_type, name, payload) in fragments {
        let name_ref = name.map_or(0, |name| {
            let name_ref = -i32::try_from(table.len()).expect("string table fits i32");
            table.extend_from_slice(name.as_bytes());
            table.push(0);
            name_ref
        });
        let header = FragmentHeader {
            length: u32::try_from(payload.len() + 4).expect("payload fits u32"),
            frag_type,
            name_ref,
        };
        body.write_le(&header).expect("fragment header write");
        body.get_mut().extend_from_slice(payload);
        body.set_position(body.get_ref().len() as u64);
    }

    let mut header = WldHeader::new(version);
    header.fragment_count = u32::try_from(fragments.len()).expect("count fits u32");
    header.strings_length = u32::try_from(table.len()).expect("strings fit u32");

    let mut out = Cursor::new(Vec::new());
    out.write_le(&header).expect("header write");
    let mut data = out.into_inner();
    data.extend_from_slice(&strings::encode(&table).expect("encode strings"));
    data.extend_from_slice(&body.into_inner());
    data
}

/// A representative image with named and unnamed fragments
pub fn sample_wld() -> Vec<u8> {
    build_wld(
        WldVersion::V1,
        &[
            (0x03, None, &b"brick.bmp\0"[..]),
            (0x04, Some("BRICK_SPRITE"), &[1u8, 0, 0, 0, 1, 0, 0, 0][..]),
            (0x05, None, &[2u8, 0, 0, 0, 0, 0, 0, 0][..]),
            (0x30, Some("BRICK_MDF"), &[0u8; 28][..]),
            (0x31, Some("MATERIALS"), &[0u8, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0][..]),
            (0x36, Some("ITEM_0001"), &[0x5Au8; 64][..]),
        ],
    )
}
