mod common;

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vsixfeed::feed::{AtomFeed, FEED_FILE_NAME};
use vsixfeed::xml::{self, Element};

fn make_gallery(root: &Path, categories: &[(&str, &str, &str)]) {
    // categories: (category, file name, extension id)
    for (category, file_name, id) in categories {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        common::write_vsix(
            &dir.join(file_name),
            &common::manifest_xml(id, "1.0", "P", "X", "D"),
        );
    }
}

fn parse_feed(root: &Path) -> Element {
    let bytes = fs::read(root.join(FEED_FILE_NAME)).unwrap();
    xml::parse(&bytes[..]).unwrap()
}

fn entry_field<'a>(entry: &'a Element, name: &str) -> &'a Element {
    entry
        .children
        .iter()
        .find(|child| child.name == name)
        .unwrap_or_else(|| panic!("entry has no {name} element"))
}

#[test]
fn generates_one_entry_per_archive_with_category_paths() {
    let dir = TempDir::new().unwrap();
    make_gallery(
        dir.path(),
        &[("A", "fileA.vsix", "x.y"), ("B", "fileB.vsix", "x.y")],
    );

    AtomFeed::new(dir.path()).generate().unwrap();

    let feed = parse_feed(dir.path());
    assert_eq!(feed.name, "feed");
    assert_eq!(
        feed.attribute("xmlns"),
        Some("http://www.w3.org/2005/Atom")
    );
    assert_eq!(feed.children.len(), 2);

    // Enumeration order is unspecified; compare as a set.
    let mut placements: Vec<(String, String)> = feed
        .children
        .iter()
        .map(|entry| {
            (
                entry_field(entry, "category")
                    .attribute("term")
                    .unwrap()
                    .to_string(),
                entry_field(entry, "content")
                    .attribute("src")
                    .unwrap()
                    .to_string(),
            )
        })
        .collect();
    placements.sort();
    assert_eq!(
        placements,
        vec![
            ("A".to_string(), "A/fileA.vsix".to_string()),
            ("B".to_string(), "B/fileB.vsix".to_string()),
        ]
    );

    for entry in &feed.children {
        assert_eq!(entry_field(entry, "id").text, "x.y");
        assert_eq!(entry_field(entry, "title").text, "X");
        assert_eq!(entry_field(entry, "title").attribute("type"), Some("text"));
        assert_eq!(entry_field(entry, "summary").text, "D");
        assert_eq!(entry_field(entry, "author").child(0).unwrap().text, "P");
        assert_eq!(
            entry_field(entry, "content").attribute("type"),
            Some("application/octet-stream")
        );
        let vsix = entry_field(entry, "Vsix");
        assert_eq!(vsix.child(0).unwrap().text, "x.y");
        assert_eq!(vsix.child(1).unwrap().text, "1.0");
    }
}

#[test]
fn empty_gallery_produces_an_empty_feed() {
    let dir = TempDir::new().unwrap();

    AtomFeed::new(dir.path()).generate().unwrap();

    let feed = parse_feed(dir.path());
    assert_eq!(feed.name, "feed");
    assert!(feed.children.is_empty());
}

#[test]
fn files_at_the_gallery_root_are_ignored() {
    let dir = TempDir::new().unwrap();
    make_gallery(dir.path(), &[("Tools", "a.vsix", "x.y")]);
    fs::write(dir.path().join("stray.vsix"), b"not scanned").unwrap();

    AtomFeed::new(dir.path()).generate().unwrap();

    let feed = parse_feed(dir.path());
    assert_eq!(feed.children.len(), 1);
}

#[test]
fn prior_feed_file_is_overwritten() {
    let dir = TempDir::new().unwrap();
    make_gallery(dir.path(), &[("Tools", "a.vsix", "new.id")]);
    fs::write(dir.path().join(FEED_FILE_NAME), "stale contents").unwrap();

    AtomFeed::new(dir.path()).generate().unwrap();

    let feed = parse_feed(dir.path());
    assert_eq!(feed.children.len(), 1);
    assert_eq!(entry_field(&feed.children[0], "id").text, "new.id");
}

#[test]
fn regeneration_is_idempotent_up_to_order() {
    let dir = TempDir::new().unwrap();
    make_gallery(
        dir.path(),
        &[("A", "a.vsix", "a.ext"), ("B", "b.vsix", "b.ext")],
    );

    let extract_ids = |feed: &Element| {
        let mut ids: Vec<String> = feed
            .children
            .iter()
            .map(|entry| entry_field(entry, "id").text.clone())
            .collect();
        ids.sort();
        ids
    };

    AtomFeed::new(dir.path()).generate().unwrap();
    let first = extract_ids(&parse_feed(dir.path()));

    AtomFeed::new(dir.path()).generate().unwrap();
    let second = extract_ids(&parse_feed(dir.path()));

    assert_eq!(first, second);
    assert_eq!(first, vec!["a.ext".to_string(), "b.ext".to_string()]);
}

#[test]
fn structurally_short_manifest_aborts_and_leaves_no_feed() {
    let dir = TempDir::new().unwrap();
    make_gallery(dir.path(), &[("A", "good.vsix", "x.y")]);

    // Manifest whose metadata element has fewer than three children.
    let bad_dir = dir.path().join("B");
    fs::create_dir_all(&bad_dir).unwrap();
    common::write_vsix(
        &bad_dir.join("bad.vsix"),
        r#"<PackageManifest>
             <Metadata>
               <Identity Id="x.y" Version="1.0" Publisher="P"/>
               <DisplayName>X</DisplayName>
             </Metadata>
           </PackageManifest>"#,
    );

    // A stale feed from an earlier run is deleted before generation starts,
    // so the failed run leaves no atom.xml at all.
    fs::write(dir.path().join(FEED_FILE_NAME), "stale contents").unwrap();

    assert!(AtomFeed::new(dir.path()).generate().is_err());
    assert!(!dir.path().join(FEED_FILE_NAME).exists());
}

#[test]
fn archive_without_manifest_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let category = dir.path().join("Tools");
    fs::create_dir_all(&category).unwrap();
    fs::write(
        category.join("empty.vsix"),
        common::build_zip(&[common::FixtureEntry::stored("readme.txt", b"hello")]),
    )
    .unwrap();

    let err = AtomFeed::new(dir.path()).generate().unwrap_err();
    assert!(format!("{err:#}").contains("extension.vsixmanifest"));
}
