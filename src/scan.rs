//! Content tree scanning.
//!
//! First stage of the build. Walks the content root and produces a [`Catalog`]
//! without touching the output tree: covers are discovered here but copied by
//! the renderer.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                     # Content root
//! ├── config.toml              # Site configuration (optional, ignored here)
//! ├── fantasy/                 # Genre
//! │   ├── red-lily/            # Story
//! │   │   ├── cover.png        # Cover (png > jpg > jpeg)
//! │   │   ├── 1.md             # Chapter 1
//! │   │   ├── 2.md
//! │   │   └── 10.md            # Numeric order, not filename order
//! │   └── glass-tower/
//! │       ├── epilogue.md      # Non-numeric: position in filename order
//! │       └── prologue.md
//! └── mystery/
//!     └── ...
//! ```
//!
//! ## Ordering
//!
//! A chapter's ordering key is its stem parsed as an integer, falling back to
//! its 1-based position among the story's `.md` files sorted by name. Two
//! chapters of one story resolving to the same key is an error.
//!
//! Genres and stories are sorted by directory name. Hidden entries (leading
//! `.`) are skipped everywhere.

use crate::naming;
use crate::paths;
use crate::types::{Catalog, Chapter, Cover, Genre, Story};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("content root not found: {0}")]
    NotFound(PathBuf),
    #[error("content root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("chapter {number} appears more than once in {path}")]
    DuplicateChapter { number: u32, path: PathBuf },
}

/// Cover file extensions in priority order.
pub const COVER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

const CHAPTER_EXTENSION: &str = "md";

/// Scan `root` into a catalog.
pub fn scan(root: &Path) -> Result<Catalog, ScanError> {
    if !paths::exists(root) {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut genres = Vec::new();
    for genre_dir in subdirectories(root)? {
        genres.push(scan_genre(root, &genre_dir)?);
    }

    Ok(Catalog {
        root: root.to_path_buf(),
        genres,
    })
}

fn scan_genre(root: &Path, genre_dir: &Path) -> Result<Genre, ScanError> {
    let name = dir_name(genre_dir);
    let mut stories = Vec::new();
    for story_dir in subdirectories(genre_dir)? {
        stories.push(scan_story(root, &story_dir)?);
    }
    debug!("genre {name}: {} stories", stories.len());

    Ok(Genre {
        title: naming::display_title(&name),
        name,
        stories,
    })
}

fn scan_story(root: &Path, story_dir: &Path) -> Result<Story, ScanError> {
    let name = dir_name(story_dir);
    let rel = paths::relativize(root, story_dir).unwrap_or_else(|| PathBuf::from(&name));
    let story_path = paths::to_url_path(&rel);

    let chapters = collect_chapters(story_dir, &story_path)?;
    let cover = find_cover(story_dir).map(|filename| Cover {
        source_path: format!("{story_path}/{filename}"),
        filename,
    });
    debug!(
        "story {story_path}: {} chapters, cover {:?}",
        chapters.len(),
        cover.as_ref().map(|c| &c.filename)
    );

    Ok(Story {
        title: naming::display_title(&name),
        name,
        path: story_path,
        chapters,
        cover,
    })
}

/// Enumerate, key, and order the chapter files of one story directory.
fn collect_chapters(story_dir: &Path, story_path: &str) -> Result<Vec<Chapter>, ScanError> {
    let filenames: Vec<String> = read_entries(story_dir)?
        .into_iter()
        .filter(|p| p.is_file() && is_chapter(p))
        .map(|p| dir_name(&p))
        .collect();

    // read_entries sorts by path, which within one directory is filename order
    let stems: Vec<&str> = filenames
        .iter()
        .map(|f| f.strip_suffix(".md").unwrap_or(f.as_str()))
        .collect();
    let keys = naming::ordering_keys(&stems);

    let mut ordered: BTreeMap<u32, Chapter> = BTreeMap::new();
    for ((filename, stem), number) in filenames.iter().zip(&stems).zip(keys) {
        let chapter = Chapter {
            number,
            filename: filename.clone(),
            source_path: format!("{story_path}/{filename}"),
            output_path: format!("{story_path}/{stem}.html"),
        };
        if ordered.insert(number, chapter).is_some() {
            return Err(ScanError::DuplicateChapter {
                number,
                path: story_dir.to_path_buf(),
            });
        }
    }

    Ok(ordered.into_values().collect())
}

/// First `cover.<ext>` present in priority order.
fn find_cover(story_dir: &Path) -> Option<String> {
    COVER_EXTENSIONS
        .iter()
        .map(|ext| format!("cover.{ext}"))
        .find(|filename| story_dir.join(filename).is_file())
}

fn is_chapter(path: &Path) -> bool {
    path.extension()
        .map(|e| e == CHAPTER_EXTENSION)
        .unwrap_or(false)
}

fn subdirectories(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    Ok(read_entries(path)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

/// Non-hidden entries of `path`, sorted. Unreadable entries are errors, not skips.
fn read_entries(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
