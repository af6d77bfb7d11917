//! A small generic XML document tree.
//!
//! The manifest extractor addresses the parsed document by child position
//! rather than by element name, so the tree keeps children in document order
//! and exposes positional access alongside attribute lookup.

use std::io::BufRead;

use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One parsed XML element: name, attributes, element children in document
/// order, and accumulated text content.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child element at the given document-order position.
    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Parse an XML document into its root element.
///
/// Fails on malformed XML and on documents with no root element.
pub fn parse<R: BufRead>(reader: R) -> Result<Element> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    bail!("document has more than one root element");
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => bail!("document has more than one root element"),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let element = match stack.pop() {
                    Some(element) => element,
                    None => bail!("unexpected closing tag"),
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => bail!("document has more than one root element"),
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no
            // document content.
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(root) => Ok(root),
        None => bail!("document has no root element"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(xml: &str) -> Element {
        parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn parses_nested_elements_in_document_order() {
        let root = parse_str(
            r#"<?xml version="1.0"?>
            <Root>
              <Meta>
                <Identity Id="a.b" Version="1.2"/>
                <DisplayName>Demo</DisplayName>
                <Description>Text &amp; more</Description>
              </Meta>
            </Root>"#,
        );

        assert_eq!(root.name, "Root");
        let meta = root.child(0).unwrap();
        assert_eq!(meta.children.len(), 3);
        assert_eq!(meta.child(0).unwrap().attribute("Id"), Some("a.b"));
        assert_eq!(meta.child(1).unwrap().text, "Demo");
        assert_eq!(meta.child(2).unwrap().text, "Text & more");
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(parse("".as_bytes()).is_err());
        assert!(parse("<!-- nothing here -->".as_bytes()).is_err());
    }

    #[test]
    fn multiple_root_elements_are_rejected() {
        assert!(parse("<A/><B/>".as_bytes()).is_err());
        assert!(parse("<A>text</A><B>text</B>".as_bytes()).is_err());
        assert!(parse("<A/><B>trailing</B>".as_bytes()).is_err());
    }

    #[test]
    fn self_closing_root_parses() {
        let root = parse_str(r#"<Root a="1"/>"#);
        assert_eq!(root.attribute("a"), Some("1"));
        assert!(!root.has_children());
    }
}
