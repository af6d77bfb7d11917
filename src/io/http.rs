use reqwest::blocking::Client;
use std::time::Duration;

use super::ReadAt;
use anyhow::{Result, anyhow, bail};

/// HTTP Range reader for remote VSIX containers
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
}

impl HttpRangeReader {
    /// Create a new HTTP Range reader
    ///
    /// This will send a HEAD request to verify Range support and get file size
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        // Send HEAD request to check capabilities
        let resp = client.head(&url).send()?;

        if !resp.status().is_success() {
            bail!("HTTP request failed with status: {}", resp.status());
        }

        // Check if server supports Range requests
        let accept_ranges = resp
            .headers()
            .get("accept-ranges")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");

        if !accept_ranges.contains("bytes") {
            bail!("Remote server does not support Range requests");
        }

        // Get file size from Content-Length
        let size = resp
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow!("Remote server did not return Content-Length"))?;

        Ok(Self { client, url, size })
    }
}

impl ReadAt for HttpRangeReader {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        // A zero-length or truncated remote container must error here
        // rather than underflow the range arithmetic below.
        if self.size == 0 || offset >= self.size {
            bail!(
                "Range request at offset {} is past the end of the remote file ({} bytes)",
                offset,
                self.size
            );
        }

        let end = offset + buf.len() as u64 - 1;
        let end = end.min(self.size - 1);
        let expected_size = (end - offset + 1) as usize;

        // A server may answer a Range request with fewer bytes than asked
        // for; keep requesting the remainder until the buffer is filled.
        let mut received = 0;
        while received < expected_size {
            let current_start = offset + received as u64;
            let range = format!("bytes={}-{}", current_start, end);

            let resp = self.client.get(&self.url).header("Range", &range).send()?;

            if resp.status() != reqwest::StatusCode::PARTIAL_CONTENT {
                bail!("HTTP request failed with status: {}", resp.status());
            }

            let bytes = resp.bytes()?;
            if bytes.is_empty() {
                bail!("Remote server returned an empty Range response");
            }
            let chunk_len = bytes.len().min(expected_size - received);
            buf[received..received + chunk_len].copy_from_slice(&bytes[..chunk_len]);
            received += chunk_len;
        }

        Ok(received)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The guard trips before any request is sent, so no server is needed.
    fn reader_with_size(size: u64) -> HttpRangeReader {
        HttpRangeReader {
            client: Client::new(),
            url: "http://gallery.invalid/a.vsix".to_string(),
            size,
        }
    }

    #[test]
    fn read_past_the_end_errors_instead_of_panicking() {
        let mut reader = reader_with_size(0);
        let mut buf = [0u8; 4];
        assert!(reader.read_at(0, &mut buf).is_err());

        let mut reader = reader_with_size(10);
        assert!(reader.read_at(10, &mut buf).is_err());
        assert!(reader.read_at(u64::MAX, &mut buf).is_err());
    }

    #[test]
    fn empty_buffer_reads_nothing() {
        let mut reader = reader_with_size(0);
        assert_eq!(reader.read_at(0, &mut []).unwrap(), 0);
    }
}
