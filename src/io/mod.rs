mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use anyhow::{Result, bail};

/// Trait for random access reading from a data source
pub trait ReadAt {
    /// Read data at the specified offset into the buffer
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

/// A closable byte source for one VSIX container.
///
/// Routes `http://` and `https://` locations to [`HttpRangeReader`] and
/// everything else (with an optional `file:` prefix) to [`LocalFileReader`].
/// Unlike the raw readers, the container stream has an observable closed
/// state: reads after [`close`](ContainerStream::close) fail instead of
/// touching a stale handle.
pub struct ContainerStream {
    inner: Option<Box<dyn ReadAt>>,
    location: String,
}

impl ContainerStream {
    /// Open the container at the given location for shared read access.
    pub fn open(location: &str) -> Result<Self> {
        let inner: Box<dyn ReadAt> =
            if location.starts_with("http://") || location.starts_with("https://") {
                Box::new(HttpRangeReader::new(location.to_string())?)
            } else {
                // A "file:" prefix is accepted for compatibility with callers
                // that hand us file URIs; plain paths are the common case.
                let path = match location.get(..5) {
                    Some(prefix) if prefix.eq_ignore_ascii_case("file:") => &location[5..],
                    _ => location,
                };
                Box::new(LocalFileReader::new(std::path::Path::new(path))?)
            };

        Ok(Self {
            inner: Some(inner),
            location: location.to_string(),
        })
    }

    /// The location this stream was opened from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Close the underlying byte source. Subsequent reads fail.
    pub fn close(&mut self) -> std::io::Result<()> {
        self.inner = None;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl ReadAt for ContainerStream {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        match self.inner.as_mut() {
            Some(inner) => inner.read_at(offset, buf),
            None => bail!("container stream for {} is closed", self.location),
        }
    }

    fn size(&self) -> u64 {
        self.inner.as_ref().map(|inner| inner.size()).unwrap_or(0)
    }
}
