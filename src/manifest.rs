//! Extraction of extension metadata from `extension.vsixmanifest`.
//!
//! The manifest schema this tool targets is fixed, so the five fields are
//! plucked from fixed structural positions in the parsed document rather
//! than looked up by name. A manifest that does not match aborts the run;
//! there is no per-file recovery.

use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::resolver::{ResolveUri, UrlResolver, VSIX_SCHEME, VsixResolver};
use crate::xml::{self, Element};

/// Well-known name of the metadata document inside every VSIX package.
pub const MANIFEST_FILE_NAME: &str = "extension.vsixmanifest";

/// The five metadata fields a feed entry is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    pub id: String,
    pub version: String,
    pub publisher: String,
    pub display_name: String,
    pub description: String,
}

/// Reads the manifest out of a VSIX package and maps it to
/// [`ExtensionMetadata`].
pub struct ManifestExtractor<R: ResolveUri = UrlResolver> {
    resolver: VsixResolver<R>,
}

impl Default for ManifestExtractor<UrlResolver> {
    fn default() -> Self {
        Self {
            resolver: VsixResolver::new(),
        }
    }
}

impl ManifestExtractor<UrlResolver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ResolveUri> ManifestExtractor<R> {
    /// Extract the metadata of the VSIX package at `vsix_path`.
    pub fn extract(&self, vsix_path: &Path) -> Result<ExtensionMetadata> {
        let uri = format!(
            "{VSIX_SCHEME}{}!/{MANIFEST_FILE_NAME}",
            vsix_path.display()
        );

        // The chained stream is scoped to this call; drop tears down the
        // archive handle, container stream and entry stream together.
        let stream = self
            .resolver
            .resolve(&uri)
            .with_context(|| format!("unable to load {MANIFEST_FILE_NAME} for {uri}"))?;
        let document = xml::parse(BufReader::new(stream))
            .with_context(|| format!("unable to load {MANIFEST_FILE_NAME} for {uri}"))?;

        Self::from_document(&document)
            .with_context(|| format!("invalid {MANIFEST_FILE_NAME} in {}", vsix_path.display()))
    }

    /// Pluck the five fields from their fixed positions under the root's
    /// first child element.
    fn from_document(root: &Element) -> Result<ExtensionMetadata> {
        let Some(metadata) = root.child(0) else {
            bail!("manifest root element has no children");
        };
        let identity = metadata
            .child(0)
            .context("manifest metadata element has no identity element")?;

        let attribute = |name: &str| -> Result<String> {
            identity
                .attribute(name)
                .map(str::to_string)
                .with_context(|| format!("identity element is missing the {name} attribute"))
        };

        let child_text = |index: usize| -> Result<String> {
            metadata
                .child(index)
                .map(|child| child.text.clone())
                .with_context(|| format!("manifest metadata element has no child at {index}"))
        };

        Ok(ExtensionMetadata {
            id: attribute("Id")?,
            version: attribute("Version")?,
            publisher: attribute("Publisher")?,
            display_name: child_text(1)?,
            description: child_text(2)?,
        })
    }
}
