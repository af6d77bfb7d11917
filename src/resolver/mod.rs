//! Resolution of composite `vsix:<container>!<entry>` identifiers.
//!
//! The resolver checks the scheme first: identifiers that do not use the
//! `vsix:` scheme are handed to a default resolver collaborator, everything
//! else is opened as "entry inside a ZIP container". Opening is a chain of
//! three resources (container stream, archive handle, decompressed entry)
//! that [`ChainedStream`] keeps together so none of them can leak.

mod locator;
mod stream;

pub use locator::{CompositeLocator, VSIX_SCHEME};
pub use stream::{ChainedStream, EntryStream};

use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::io::ContainerStream;
use crate::zip::ZipArchive;

/// Resolution failures the callers distinguish.
///
/// I/O and archive-format failures carry no special category and surface as
/// plain [`anyhow`] errors with context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The composite locator is malformed.
    #[error(
        "vsix URI does not have a '!' between the vsix file path and the path \
         to the xml within the vsix file, or path to xml does not start with \
         a '/'. Vsix URI found was '{uri}'"
    )]
    Format { uri: String },

    /// The named entry is absent from an opened container.
    #[error("could not find the xml file {entry} in the vsix file {container}")]
    EntryNotFound { entry: String, container: String },
}

/// Capability for resolving ordinary (non-composite) identifiers.
pub trait ResolveUri {
    fn resolve(&self, uri: &str) -> Result<Box<dyn Read>>;
}

/// Default resolver: plain paths open as files, `http(s)://` fetches the body.
pub struct UrlResolver;

impl ResolveUri for UrlResolver {
    fn resolve(&self, uri: &str) -> Result<Box<dyn Read>> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let resp = reqwest::blocking::get(uri)
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("failed to fetch {uri}"))?;
            Ok(Box::new(resp))
        } else {
            let path = match uri.get(..5) {
                Some(prefix) if prefix.eq_ignore_ascii_case("file:") => &uri[5..],
                _ => uri,
            };
            let file = File::open(path).with_context(|| format!("failed to open {uri}"))?;
            Ok(Box::new(file))
        }
    }
}

/// Resolver for `vsix:` composite identifiers with fallback delegation.
pub struct VsixResolver<R = UrlResolver> {
    fallback: R,
}

impl Default for VsixResolver<UrlResolver> {
    fn default() -> Self {
        Self::with_fallback(UrlResolver)
    }
}

impl VsixResolver<UrlResolver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ResolveUri> VsixResolver<R> {
    /// Build a resolver that delegates non-`vsix:` identifiers to `fallback`.
    pub fn with_fallback(fallback: R) -> Self {
        Self { fallback }
    }

    /// Resolve an identifier to a readable stream.
    ///
    /// Composite identifiers yield the decompressed entry inside the named
    /// container; anything else goes to the fallback resolver.
    pub fn resolve(&self, uri: &str) -> Result<Box<dyn Read>> {
        match CompositeLocator::parse(uri)? {
            Some(locator) => Ok(Box::new(self.open_entry(&locator)?)),
            None => self.fallback.resolve(uri),
        }
    }

    /// Open the entry named by an already-parsed composite locator.
    ///
    /// On any failure after the container stream opens, the stream (and the
    /// archive handle, if it got that far) is closed before the error
    /// propagates.
    pub fn open_entry(&self, locator: &CompositeLocator) -> Result<ChainedStream> {
        let mut container = ContainerStream::open(&locator.container)
            .with_context(|| format!("failed to open vsix file {}", locator.container))?;

        match Self::read_entry(&mut container, locator) {
            Ok((archive, data)) => Ok(ChainedStream::new(
                archive,
                container,
                EntryStream::new(data),
            )),
            Err(err) => {
                let _ = container.close();
                Err(err)
            }
        }
    }

    fn read_entry(
        container: &mut ContainerStream,
        locator: &CompositeLocator,
    ) -> Result<(ZipArchive, Vec<u8>)> {
        let mut archive = ZipArchive::open(container)
            .with_context(|| format!("failed to read vsix file {}", locator.container))?;

        let result = match archive.entry(&locator.entry) {
            Some(entry) => {
                let entry = entry.clone();
                archive.read_entry(container, &entry)
            }
            None => Err(ResolveError::EntryNotFound {
                entry: locator.entry.clone(),
                container: locator.container.clone(),
            }
            .into()),
        };

        match result {
            Ok(data) => Ok((archive, data)),
            Err(err) => {
                let _ = archive.close();
                Err(err)
            }
        }
    }
}
