//! Site index generation.
//!
//! Folds the whole catalog into a genre → story → chapter tree and writes it
//! as `index.html` at the output root. The aggregation ([`build_index_data`])
//! is pure; only [`write_index`] touches the filesystem. Every URL in the index
//! is relative to the output root, where the index itself lives.

use crate::link;
use crate::paths;
use crate::render::{self, RenderError};
use crate::templates::{ChapterEntry, GenreEntry, IndexData, IndexTemplate, StoryEntry};
use crate::types::{Catalog, Story};
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";

/// Aggregate the catalog into the index template record.
pub fn build_index_data(
    catalog: &Catalog,
    site_title: &str,
    chapter_word: &str,
    year: i32,
) -> IndexData {
    let genres = catalog
        .genres
        .iter()
        .map(|genre| GenreEntry {
            name: genre.name.clone(),
            title: genre.title.clone(),
            stories: genre
                .stories
                .iter()
                .map(|story| story_entry(story, chapter_word))
                .collect(),
        })
        .collect();

    IndexData {
        site_title: site_title.to_string(),
        year,
        genres,
    }
}

fn story_entry(story: &Story, chapter_word: &str) -> StoryEntry {
    let chapters: Vec<ChapterEntry> = story
        .chapters
        .iter()
        .map(|chapter| ChapterEntry {
            label: link::chapter_label(chapter_word, chapter),
            url: paths::normalize_slashes(&chapter.output_path),
        })
        .collect();

    StoryEntry {
        name: story.name.clone(),
        title: story.title.clone(),
        url: chapters.first().map(|c| c.url.clone()),
        cover_url: story
            .cover
            .as_ref()
            .map(|c| paths::normalize_slashes(&c.source_path)),
        chapters,
    }
}

/// Render `index.html` into `output_root`. Returns the path written.
pub fn write_index(
    output_root: &Path,
    data: &IndexData,
    template: &dyn IndexTemplate,
) -> Result<PathBuf, RenderError> {
    let target = output_root.join(INDEX_FILE);
    render::write_with(&target, |out| template.render_index(data, out))?;
    Ok(target)
}
