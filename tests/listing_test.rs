use anyhow::Result;
use linkpane::models::file_entry::FileKind;
use linkpane::services::fs::listing::{list_dir, list_dir_sync, ListParams};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

fn populate(root: &std::path::Path) -> Result<()> {
    fs::create_dir(root.join("Movies"))?;
    fs::create_dir(root.join("books"))?;
    fs::write(root.join("single.mkv"), "one link")?;
    fs::write(root.join("Shared.mkv"), "two links")?;
    fs::write(root.join("notes.txt"), "plain")?;
    fs::hard_link(root.join("Shared.mkv"), root.join("books").join("shared-copy.mkv"))?;
    Ok(())
}

#[test]
fn plain_listing_contains_exactly_the_immediate_children() -> Result<()> {
    let temp = tempdir()?;
    let root = fs::canonicalize(temp.path())?;
    populate(&root)?;

    let entries = list_dir_sync(ListParams {
        path: &root.to_string_lossy(),
        ..Default::default()
    })?;

    let listed: BTreeSet<String> = entries.iter().map(|e| e.path.clone()).collect();
    let expected: BTreeSet<String> = fs::read_dir(&root)?
        .map(|e| e.map(|e| e.path().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(listed, expected);

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["books", "Movies", "notes.txt", "Shared.mkv", "single.mkv"]
    );

    let shared = entries.iter().find(|e| e.name == "Shared.mkv").unwrap();
    assert_eq!(shared.kind, FileKind::File);
    assert_eq!(shared.link_count, Some(2));
    Ok(())
}

#[test]
fn filtered_listing_keeps_directories_and_single_link_files() -> Result<()> {
    let temp = tempdir()?;
    populate(temp.path())?;
    let path = temp.path().to_string_lossy().into_owned();

    let all = list_dir_sync(ListParams {
        path: &path,
        ..Default::default()
    })?;
    let filtered = list_dir_sync(ListParams {
        path: &path,
        filter_single_link: true,
        ..Default::default()
    })?;

    for entry in &filtered {
        assert!(all.contains(entry));
    }
    let expected: Vec<_> = all
        .iter()
        .filter(|e| e.is_dir() || e.link_count == Some(1))
        .cloned()
        .collect();
    assert_eq!(filtered, expected);
    assert!(!filtered.iter().any(|e| e.name == "Shared.mkv"));
    Ok(())
}

#[test]
fn repeated_listings_are_identical() -> Result<()> {
    let temp = tempdir()?;
    populate(temp.path())?;
    let path = temp.path().to_string_lossy().into_owned();
    let params = ListParams {
        path: &path,
        ..Default::default()
    };

    assert_eq!(list_dir_sync(params)?, list_dir_sync(params)?);
    Ok(())
}

#[tokio::test]
async fn async_listing_matches_sync_listing() -> Result<()> {
    let temp = tempdir()?;
    populate(temp.path())?;
    let path = temp.path().to_string_lossy().into_owned();
    let params = ListParams {
        path: &path,
        filter_single_link: true,
        include_parent: true,
    };

    let from_async = list_dir(params).await?;
    assert_eq!(from_async, list_dir_sync(params)?);
    assert_eq!(from_async[0].name, "..");
    Ok(())
}
