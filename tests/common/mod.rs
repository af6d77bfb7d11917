//! Shared fixtures: minimal ZIP containers written by hand.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::fs;
use std::io::Write;
use std::path::Path;

/// One entry to place in a fixture container.
pub struct FixtureEntry<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub deflate: bool,
}

impl<'a> FixtureEntry<'a> {
    pub fn stored(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            deflate: false,
        }
    }

    pub fn deflated(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            deflate: true,
        }
    }
}

/// Build a valid ZIP archive in memory: local file headers with data,
/// central directory, EOCD with an empty comment.
pub fn build_zip(entries: &[FixtureEntry]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut centrals = Vec::new();

    for entry in entries {
        let mut crc = flate2::Crc::new();
        crc.update(entry.data);
        let crc32 = crc.sum();

        let (method, payload) = if entry.deflate {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(entry.data).unwrap();
            (8u16, encoder.finish().unwrap())
        } else {
            (0u16, entry.data.to_vec())
        };

        let lfh_offset = out.len() as u32;
        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(method).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // mod time
        out.write_u16::<LittleEndian>(0).unwrap(); // mod date
        out.write_u32::<LittleEndian>(crc32).unwrap();
        out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        out.extend_from_slice(entry.name.as_bytes());
        out.extend_from_slice(&payload);

        centrals.push((
            entry.name,
            method,
            crc32,
            payload.len() as u32,
            entry.data.len() as u32,
            lfh_offset,
        ));
    }

    let cd_offset = out.len() as u32;
    for (name, method, crc32, compressed, uncompressed, lfh_offset) in &centrals {
        out.extend_from_slice(b"PK\x01\x02");
        out.write_u16::<LittleEndian>(20).unwrap(); // version made by
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(*method).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // mod time
        out.write_u16::<LittleEndian>(0).unwrap(); // mod date
        out.write_u32::<LittleEndian>(*crc32).unwrap();
        out.write_u32::<LittleEndian>(*compressed).unwrap();
        out.write_u32::<LittleEndian>(*uncompressed).unwrap();
        out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        out.write_u16::<LittleEndian>(0).unwrap(); // comment length
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number start
        out.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        out.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        out.write_u32::<LittleEndian>(*lfh_offset).unwrap();
        out.extend_from_slice(name.as_bytes());
    }
    let cd_size = out.len() as u32 - cd_offset;

    out.extend_from_slice(b"PK\x05\x06");
    out.write_u16::<LittleEndian>(0).unwrap(); // disk number
    out.write_u16::<LittleEndian>(0).unwrap(); // disk with central directory
    out.write_u16::<LittleEndian>(centrals.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(centrals.len() as u16).unwrap();
    out.write_u32::<LittleEndian>(cd_size).unwrap();
    out.write_u32::<LittleEndian>(cd_offset).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap(); // comment length

    out
}

/// Render a conforming extension.vsixmanifest document.
pub fn manifest_xml(
    id: &str,
    version: &str,
    publisher: &str,
    display_name: &str,
    description: &str,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<PackageManifest Version="2.0.0" xmlns="http://schemas.microsoft.com/developer/vsx-schema/2011">
  <Metadata>
    <Identity Id="{id}" Version="{version}" Publisher="{publisher}" Language="en-US"/>
    <DisplayName>{display_name}</DisplayName>
    <Description>{description}</Description>
  </Metadata>
  <Installation>
    <InstallationTarget Id="Microsoft.VisualStudio.Community" Version="[17.0,)"/>
  </Installation>
</PackageManifest>
"#
    )
}

/// Write a VSIX package containing a manifest and a small payload file.
pub fn write_vsix(path: &Path, manifest: &str) {
    let bytes = build_zip(&[
        FixtureEntry::stored("extension.vsixmanifest", manifest.as_bytes()),
        FixtureEntry::stored("extension.dll", b"not a real assembly"),
    ]);
    fs::write(path, bytes).unwrap();
}
