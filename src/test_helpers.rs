//! Shared test utilities.
//!
//! Fixture builders that lay out content trees on disk, in-memory story
//! builders for code that never touches the filesystem, and catalog lookups
//! that panic with the available names on a miss.

use std::fs;
use std::path::{Path, PathBuf};

use crate::naming;
use crate::types::{Catalog, Chapter, Genre, Story};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `<root>/<genre>/<story>/` with one Markdown file per name.
///
/// Each chapter's body names its file so rendered pages are identifiable.
pub fn write_story(root: &Path, genre: &str, story: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(genre).join(story);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), format!("# {file}\n\nBody of *{file}*.\n")).unwrap();
    }
    dir
}

/// An in-memory story, keyed and ordered the way the scanner does it.
pub fn story_with_files(genre: &str, story: &str, files: &[&str]) -> Story {
    let mut sorted: Vec<&str> = files.to_vec();
    sorted.sort();
    let stems: Vec<&str> = sorted
        .iter()
        .map(|f| f.strip_suffix(".md").unwrap_or(*f))
        .collect();
    let keys = naming::ordering_keys(&stems);

    let path = format!("{genre}/{story}");
    let mut chapters: Vec<Chapter> = sorted
        .iter()
        .zip(&stems)
        .zip(keys)
        .map(|((file, stem), number)| Chapter {
            number,
            filename: file.to_string(),
            source_path: format!("{path}/{file}"),
            output_path: format!("{path}/{stem}.html"),
        })
        .collect();
    chapters.sort_by_key(|c| c.number);

    Story {
        name: story.to_string(),
        title: naming::display_title(story),
        path,
        chapters,
        cover: None,
    }
}

// =========================================================================
// Catalog lookups (panic with the available names on a miss)
// =========================================================================

/// Find a genre by directory name. Panics if not found.
pub fn find_genre<'a>(catalog: &'a Catalog, name: &str) -> &'a Genre {
    catalog
        .genres
        .iter()
        .find(|g| g.name == name)
        .unwrap_or_else(|| {
            let names = genre_names(catalog);
            panic!("genre '{name}' not found. Available: {names:?}")
        })
}

/// Find a story by directory name in any genre. Panics if not found.
pub fn find_story<'a>(catalog: &'a Catalog, name: &str) -> &'a Story {
    catalog.stories().find(|s| s.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = catalog.stories().map(|s| s.name.as_str()).collect();
        panic!("story '{name}' not found. Available: {names:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn genre_names(catalog: &Catalog) -> Vec<&str> {
    catalog.genres.iter().map(|g| g.name.as_str()).collect()
}

pub fn story_names(genre: &Genre) -> Vec<&str> {
    genre.stories.iter().map(|s| s.name.as_str()).collect()
}

/// Ordering keys in reading order.
pub fn chapter_numbers(story: &Story) -> Vec<u32> {
    story.chapters.iter().map(|c| c.number).collect()
}

/// Source file names in reading order.
pub fn chapter_files(story: &Story) -> Vec<&str> {
    story.chapters.iter().map(|c| c.filename.as_str()).collect()
}
