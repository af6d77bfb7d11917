//! Plain data model mirroring the feed document shape.
//!
//! One [`Entry`] per processed archive, owned by the [`Feed`] and immutable
//! after construction. Insertion order is directory enumeration order.

#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub title: Title,
    pub summary: Summary,
    pub author: Author,
    pub category: Category,
    pub content: Content,
    pub vsix: Vsix,
}

#[derive(Debug, Clone)]
pub struct Title {
    pub r#type: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub r#type: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub term: String,
}

#[derive(Debug, Clone)]
pub struct Content {
    pub r#type: String,
    pub src: String,
}

/// The extension-specific element carrying identifier and version.
#[derive(Debug, Clone)]
pub struct Vsix {
    pub id: String,
    pub version: String,
}
