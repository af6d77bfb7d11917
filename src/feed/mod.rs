//! The aggregated gallery feed: model types and the atom.xml generator.

mod atom;
mod model;

pub use atom::{ATOM_NS, AtomFeed, FEED_FILE_NAME, VSIX_NS, to_xml};
pub use model::{Author, Category, Content, Entry, Feed, Summary, Title, Vsix};
