//! Directory indexing and display-metadata derivation.
//!
//! A scan is a read-only snapshot: records are recomputed on every call and
//! never persisted. Traversal and title derivation are pure functions over
//! the filesystem state at scan time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use crate::library::MediaStore;

/// Category assigned to files that sit directly under the media root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A single indexed media file.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRecord {
    /// Path relative to the media root, forward-slash normalized. Opaque
    /// key: it is re-validated by [`MediaStore::resolve`] on every request.
    pub identifier: String,
    /// Display title derived from the file name.
    pub title: String,
    /// Top-level path segment, or [`UNCATEGORIZED`] for root-level files.
    pub category: String,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Walk the store's root and produce a record for every allow-listed file,
/// sorted by identifier for stable output.
pub fn scan(store: &MediaStore) -> Vec<MediaRecord> {
    let root = store.root();
    let Ok(canonical_root) = root.canonicalize() else {
        return Vec::new();
    };
    let mut records = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_dir() || !store.is_allowed(path) {
            continue;
        }

        // Links are followed during traversal, so an in-root symlink can name
        // a file outside the root. [`MediaStore::resolve`] refuses to serve
        // those, so the index must not advertise them.
        match path.canonicalize() {
            Ok(resolved) if resolved.starts_with(&canonical_root) => {}
            Ok(resolved) => {
                warn!("Skipping {:?}: resolves outside media root to {:?}", path, resolved);
                continue;
            }
            Err(e) => {
                warn!("Failed to canonicalize {:?}: {}", path, e);
                continue;
            }
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to read metadata for {:?}: {}", path, e);
                continue;
            }
        };

        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        records.push(MediaRecord {
            identifier: identifier_for(relative),
            title: title_for(relative),
            category: category_for(relative),
            size: metadata.len(),
            modified,
        });
    }

    records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    records
}

/// Distinct categories present in `records`, sorted.
pub fn categories(records: &[MediaRecord]) -> Vec<String> {
    let mut cats: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}

/// Forward-slash-normalized relative path.
fn identifier_for(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Top-level directory name, or [`UNCATEGORIZED`] for root-level files.
fn category_for(relative: &Path) -> String {
    let mut components = relative.components();
    let first = components.next();
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.as_os_str().to_string_lossy().into_owned(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Derive a display title from the file stem: dots and underscores become
/// spaces, runs of whitespace collapse, each word is capitalized.
fn title_for(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.replace(['.', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("movies")).unwrap();
        std::fs::create_dir_all(dir.path().join("shows/archive")).unwrap();
        std::fs::write(dir.path().join("movies/the_big.sleep.1946.mp4"), b"aaaa").unwrap();
        std::fs::write(dir.path().join("shows/archive/pilot.mkv"), b"bb").unwrap();
        std::fs::write(dir.path().join("loose.mp4"), b"c").unwrap();
        std::fs::write(dir.path().join("movies/readme.txt"), b"ignored").unwrap();

        let store = MediaStore::new(
            dir.path().to_path_buf(),
            vec!["mp4".into(), "mkv".into()],
        );
        (dir, store)
    }

    #[test]
    fn scan_lists_allowed_files_sorted() {
        let (_dir, store) = fixture_store();
        let records = scan(&store);
        let ids: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "loose.mp4",
                "movies/the_big.sleep.1946.mp4",
                "shows/archive/pilot.mkv",
            ]
        );
    }

    #[test]
    fn category_is_top_level_segment() {
        let (_dir, store) = fixture_store();
        let records = scan(&store);
        let by_id = |id: &str| records.iter().find(|r| r.identifier == id).unwrap();

        assert_eq!(by_id("movies/the_big.sleep.1946.mp4").category, "movies");
        assert_eq!(by_id("shows/archive/pilot.mkv").category, "shows");
        assert_eq!(by_id("loose.mp4").category, UNCATEGORIZED);
    }

    #[test]
    fn title_is_prettified_stem() {
        let (_dir, store) = fixture_store();
        let records = scan(&store);
        let movie = records
            .iter()
            .find(|r| r.identifier == "movies/the_big.sleep.1946.mp4")
            .unwrap();
        assert_eq!(movie.title, "The Big Sleep 1946");
    }

    #[test]
    fn records_carry_size() {
        let (_dir, store) = fixture_store();
        let records = scan(&store);
        let movie = records
            .iter()
            .find(|r| r.identifier == "movies/the_big.sleep.1946.mp4")
            .unwrap();
        assert_eq!(movie.size, 4);
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let (_dir, store) = fixture_store();
        let records = scan(&store);
        assert_eq!(
            categories(&records),
            vec!["movies", "shows", UNCATEGORIZED]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escaping_root_is_not_listed() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.mp4"), b"secret").unwrap();

        let (dir, store) = fixture_store();
        std::os::unix::fs::symlink(
            outside.path().join("secret.mp4"),
            dir.path().join("link.mp4"),
        )
        .unwrap();

        let records = scan(&store);
        assert!(records.iter().all(|r| r.identifier != "link.mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_listed() {
        let (dir, store) = fixture_store();
        std::os::unix::fs::symlink(
            dir.path().join("loose.mp4"),
            dir.path().join("alias.mp4"),
        )
        .unwrap();

        let records = scan(&store);
        assert!(records.iter().any(|r| r.identifier == "alias.mp4"));
    }

    #[test]
    fn scan_of_missing_root_is_empty() {
        let store = MediaStore::new("/nonexistent/reelhouse".into(), vec!["mp4".into()]);
        assert!(scan(&store).is_empty());
    }
}
