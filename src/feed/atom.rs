//! Feed generation: gallery walk, entry assembly, atom.xml serialization.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::manifest::{ExtensionMetadata, ManifestExtractor};

use super::model::{Author, Category, Content, Entry, Feed, Summary, Title, Vsix};

/// Name of the output feed file written at the gallery root.
pub const FEED_FILE_NAME: &str = "atom.xml";

/// Atom syndication namespace of the feed root.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Namespace of the Vsix element, per the VS gallery syndication schema.
pub const VSIX_NS: &str = "http://schemas.microsoft.com/developer/vsx-syndication-schema/2010";

/// Generates the atom.xml feed for one extension gallery root.
///
/// The root's immediate subdirectories are categories; the files directly
/// inside each category are VSIX packages. One run produces one feed,
/// overwriting any previous atom.xml.
pub struct AtomFeed {
    gallery_path: PathBuf,
}

impl AtomFeed {
    pub fn new(gallery_path: impl Into<PathBuf>) -> Self {
        Self {
            gallery_path: gallery_path.into(),
        }
    }

    /// Generate the feed, listing all extensions found in the subdirectories
    /// of the gallery path.
    ///
    /// A failure on any single archive aborts the whole run. The stale feed
    /// file is deleted up front, so an aborted run leaves no atom.xml behind.
    pub fn generate(&self) -> Result<()> {
        let feed_path = self.gallery_path.join(FEED_FILE_NAME);
        if feed_path.exists() {
            fs::remove_file(&feed_path)
                .with_context(|| format!("failed to delete {}", feed_path.display()))?;
        }

        let extractor = ManifestExtractor::new();
        let mut feed = Feed::default();

        // Enumeration order is whatever the filesystem yields; the feed is
        // not sorted.
        for dir in fs::read_dir(&self.gallery_path)
            .with_context(|| format!("failed to list {}", self.gallery_path.display()))?
        {
            let dir = dir?;
            if !dir.file_type()?.is_dir() {
                continue;
            }

            // The category label is the final path segment only.
            let category = dir.file_name().to_string_lossy().into_owned();

            for file in fs::read_dir(dir.path())? {
                let file = file?;
                if !file.file_type()?.is_file() {
                    continue;
                }
                feed.entries
                    .push(self.generate_entry(&extractor, &category, &file.path())?);
            }
        }

        fs::write(&feed_path, to_xml(&feed)?)
            .with_context(|| format!("failed to write {}", feed_path.display()))?;

        Ok(())
    }

    /// Build the feed entry for one extension package.
    fn generate_entry(
        &self,
        extractor: &ManifestExtractor,
        category: &str,
        vsix_path: &Path,
    ) -> Result<Entry> {
        let ExtensionMetadata {
            id,
            version,
            publisher,
            display_name,
            description,
        } = extractor.extract(vsix_path)?;

        let file_name = vsix_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Entry {
            id: id.clone(),
            title: Title {
                r#type: "text".to_string(),
                text: display_name,
            },
            summary: Summary {
                r#type: "text".to_string(),
                text: description,
            },
            author: Author { name: publisher },
            category: Category {
                term: category.to_string(),
            },
            content: Content {
                r#type: "application/octet-stream".to_string(),
                src: format!("{category}/{file_name}"),
            },
            vsix: Vsix { id, version },
        })
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        start.push_attribute((*key, *value));
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_entry<W: std::io::Write>(writer: &mut Writer<W>, entry: &Entry) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("entry")))?;

    write_text_element(writer, "id", &[], &entry.id)?;
    write_text_element(
        writer,
        "title",
        &[("type", entry.title.r#type.as_str())],
        &entry.title.text,
    )?;
    write_text_element(
        writer,
        "summary",
        &[("type", entry.summary.r#type.as_str())],
        &entry.summary.text,
    )?;

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    write_text_element(writer, "name", &[], &entry.author.name)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    let mut category = BytesStart::new("category");
    category.push_attribute(("term", entry.category.term.as_str()));
    writer.write_event(Event::Empty(category))?;

    let mut content = BytesStart::new("content");
    content.push_attribute(("type", entry.content.r#type.as_str()));
    content.push_attribute(("src", entry.content.src.as_str()));
    writer.write_event(Event::Empty(content))?;

    let mut vsix = BytesStart::new("Vsix");
    vsix.push_attribute(("xmlns", VSIX_NS));
    writer.write_event(Event::Start(vsix))?;
    write_text_element(writer, "Id", &[], &entry.vsix.id)?;
    write_text_element(writer, "Version", &[], &entry.vsix.version)?;
    writer.write_event(Event::End(BytesEnd::new("Vsix")))?;

    writer.write_event(Event::End(BytesEnd::new("entry")))?;
    Ok(())
}

/// Serialize a feed to its XML document.
pub fn to_xml(feed: &Feed) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("feed");
    root.push_attribute(("xmlns", ATOM_NS));
    writer.write_event(Event::Start(root))?;

    for entry in &feed.entries {
        write_entry(&mut writer, entry)?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}
