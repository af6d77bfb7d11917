use std::io::Read;

use anyhow::{Result, bail};
use flate2::read::DeflateDecoder;

use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// An opened VSIX container.
///
/// Holds the parsed central directory and a closed flag. The archive handle
/// and the container byte stream it was parsed from are separate resources;
/// [`ChainedStream`](crate::resolver::ChainedStream) owns and closes both.
pub struct ZipArchive {
    entries: Vec<ZipFileEntry>,
    closed: bool,
}

impl ZipArchive {
    /// Open a container by parsing its central directory from `reader`.
    pub fn open<R: ReadAt + ?Sized>(reader: &mut R) -> Result<Self> {
        let entries = ZipParser::new(reader).list_files()?;
        Ok(Self {
            entries,
            closed: false,
        })
    }

    /// Look up an entry by its exact normalized relative path.
    pub fn entry(&self, name: &str) -> Option<&ZipFileEntry> {
        self.entries
            .iter()
            .find(|e| !e.is_directory && e.file_name == name)
    }

    /// Read and decompress the data for one entry.
    pub fn read_entry<R: ReadAt + ?Sized>(
        &self,
        reader: &mut R,
        entry: &ZipFileEntry,
    ) -> Result<Vec<u8>> {
        if self.closed {
            bail!("archive is closed");
        }

        let compressed = ZipParser::new(reader).read_entry_data(entry)?;

        match entry.compression_method {
            CompressionMethod::Stored => Ok(compressed),
            CompressionMethod::Deflate => {
                let mut data = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(&compressed[..]).read_to_end(&mut data)?;
                Ok(data)
            }
            CompressionMethod::Unknown(method) => {
                bail!("Unsupported compression method: {}", method)
            }
        }
    }

    /// Close the archive handle, releasing the central directory.
    pub fn close(&mut self) -> std::io::Result<()> {
        self.closed = true;
        self.entries = Vec::new();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
