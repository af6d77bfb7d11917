//! # vsixfeed
//!
//! Generates the `atom.xml` feed for a private Visual Studio extension
//! gallery.
//!
//! Given a gallery root whose immediate subdirectories are categories and
//! whose files are VSIX packages, this library reads the
//! `extension.vsixmanifest` inside each package and aggregates one Atom feed
//! entry per extension. Manifests are resolved through a composite
//! `vsix:<container>!<entry>` locator that opens a stream positioned at an
//! entry inside a ZIP container, from the local filesystem or over HTTP
//! using Range requests.
//!
//! ## Features
//!
//! - One-shot batch feed generation, overwriting any previous atom.xml
//! - Composite locator resolution with fallback to plain URL resolution
//! - Chained stream ownership: archive handle, container stream and entry
//!   stream are closed together on every exit path
//! - VSIX containers on the local filesystem or behind an HTTP server
//! - STORED and DEFLATE manifest entries, ZIP64 containers
//!
//! ## Example
//!
//! ```no_run
//! use vsixfeed::feed::AtomFeed;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Scan /srv/gallery/<category>/<package>.vsix and write
//!     // /srv/gallery/atom.xml
//!     AtomFeed::new("/srv/gallery").generate()
//! }
//! ```

pub mod cli;
pub mod feed;
pub mod io;
pub mod manifest;
pub mod resolver;
pub mod xml;
pub mod zip;

pub use cli::Cli;
pub use feed::AtomFeed;
pub use io::{ContainerStream, HttpRangeReader, LocalFileReader, ReadAt};
pub use manifest::{ExtensionMetadata, MANIFEST_FILE_NAME, ManifestExtractor};
pub use resolver::{ChainedStream, CompositeLocator, ResolveError, VsixResolver};
pub use zip::{ZipArchive, ZipFileEntry};
