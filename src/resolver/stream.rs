use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::io::ContainerStream;
use crate::zip::ZipArchive;

/// The decompressed bytes of one archive entry, with a closed flag.
///
/// Reads and seeks fail after close, so a partially torn down
/// [`ChainedStream`] can never hand out stale entry data.
pub struct EntryStream {
    data: Cursor<Vec<u8>>,
    len: u64,
    closed: bool,
}

impl EntryStream {
    pub fn new(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            data: Cursor::new(data),
            len,
            closed: false,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> u64 {
        self.data.position()
    }

    pub fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.data = Cursor::new(Vec::new());
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::other("entry stream is closed"))
        } else {
            Ok(())
        }
    }
}

impl Read for EntryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        self.data.read(buf)
    }
}

impl Seek for EntryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.check_open()?;
        self.data.seek(pos)
    }
}

/// A readable stream positioned at one decompressed entry inside a VSIX
/// container, owning everything that was opened to get there.
///
/// Three resources are held jointly: the archive handle, the container byte
/// stream it was parsed from, and the decompressed entry stream. They are
/// either all open or all closed; [`close`](ChainedStream::close) tears down
/// all three in one logical operation, and `Drop` does the same on any exit
/// path the caller forgot about. Read and seek delegate to the entry stream
/// unchanged.
pub struct ChainedStream {
    archive: ZipArchive,
    container: ContainerStream,
    entry: EntryStream,
    closed: bool,
}

impl ChainedStream {
    pub fn new(archive: ZipArchive, container: ContainerStream, entry: EntryStream) -> Self {
        Self {
            archive,
            container,
            entry,
            closed: false,
        }
    }

    /// Close the archive handle, the container stream, and the entry stream.
    ///
    /// Best-effort aggregate close: every resource is attempted even if an
    /// earlier one fails, and the first failure is reported afterwards.
    /// Calling close more than once is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let archive = self.archive.close();
        let container = self.container.close();
        let entry = self.entry.close();

        archive.and(container).and(entry)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Decompressed length of the entry.
    pub fn len(&self) -> u64 {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }

    /// Current position within the entry stream.
    pub fn position(&self) -> u64 {
        self.entry.position()
    }

    /// The underlying archive handle (for state inspection).
    pub fn archive(&self) -> &ZipArchive {
        &self.archive
    }

    /// The underlying container byte stream (for state inspection).
    pub fn container(&self) -> &ContainerStream {
        &self.container
    }

    /// The underlying entry stream (for state inspection).
    pub fn entry(&self) -> &EntryStream {
        &self.entry
    }
}

impl Read for ChainedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::other("stream is closed"));
        }
        self.entry.read(buf)
    }
}

impl Seek for ChainedStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.closed {
            return Err(io::Error::other("stream is closed"));
        }
        self.entry.seek(pos)
    }
}

impl Drop for ChainedStream {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for ChainedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedStream")
            .field("container", &self.container.location())
            .field("len", &self.entry.len())
            .field("position", &self.entry.position())
            .field("closed", &self.closed)
            .finish()
    }
}
