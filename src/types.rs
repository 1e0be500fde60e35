//! The catalog: the in-memory model of the content tree.
//!
//! Built once by [`crate::scan`] and only borrowed afterwards. All paths are
//! relative to the content root with `/` separators, so they double as URL
//! paths inside the output tree.

use serde::Serialize;
use std::path::PathBuf;

/// Every genre discovered under the content root, sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub root: PathBuf,
    pub genres: Vec<Genre>,
}

impl Catalog {
    /// All stories in catalog order.
    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.genres.iter().flat_map(|g| g.stories.iter())
    }

    pub fn story_count(&self) -> usize {
        self.genres.iter().map(|g| g.stories.len()).sum()
    }

    pub fn chapter_count(&self) -> usize {
        self.stories().map(|s| s.chapters.len()).sum()
    }
}

/// A first-level directory of the content root.
#[derive(Debug, Clone, Serialize)]
pub struct Genre {
    /// Directory name, e.g. `science-fiction`
    pub name: String,
    /// Display title, e.g. `science fiction`
    pub title: String,
    pub stories: Vec<Story>,
}

/// A second-level directory: one story and its chapters.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub name: String,
    pub title: String,
    /// `genre/story`
    pub path: String,
    /// Sorted by ascending ordering key
    pub chapters: Vec<Chapter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
}

impl Story {
    /// Directory names from the content root down to this story.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// One Markdown chapter file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    /// Ordering key: the numeric stem, or the 1-based position among the
    /// story's files in filename order when the stem is not a number.
    pub number: u32,
    /// Source file name, e.g. `3.md`
    pub filename: String,
    /// `genre/story/3.md`
    pub source_path: String,
    /// `genre/story/3.html`
    pub output_path: String,
}

impl Chapter {
    /// Output file name within the story directory, e.g. `3.html`.
    pub fn output_filename(&self) -> &str {
        self.output_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.output_path)
    }
}

/// A story cover image (`cover.png`, `cover.jpg` or `cover.jpeg`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cover {
    pub filename: String,
    /// `genre/story/cover.png`; same path in the output tree
    pub source_path: String,
}
