//! Chapter linking: previous/next navigation and breadcrumbs.
//!
//! Adjacency is positional. A story with chapters `2.md` and `4.md` links
//! 2 → 4 directly; nothing ever computes `n - 1` or `n + 1` from the ordering
//! key, so gaps in numbering never break the chain.
//!
//! All hrefs are relative to the story's output directory, which is where every
//! chapter page of the story is written.

use crate::naming;
use crate::types::{Chapter, Story};
use serde::Serialize;

/// A link to a sibling chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NavigationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crumb {
    pub name: String,
    pub href: String,
}

/// A chapter annotated with everything its page needs to link elsewhere.
#[derive(Debug, Clone)]
pub struct LinkedChapter<'a> {
    pub chapter: &'a Chapter,
    /// 0-based position in the story's reading order
    pub position: usize,
    pub navigation: NavigationLinks,
    pub breadcrumbs: Vec<Crumb>,
}

/// Display label for a chapter, e.g. `Chapter 3`.
pub fn chapter_label(chapter_word: &str, chapter: &Chapter) -> String {
    format!("{} {}", chapter_word, chapter.number)
}

/// Link every chapter of `story`, in reading order.
pub fn link_story<'a>(story: &'a Story, chapter_word: &str) -> Vec<LinkedChapter<'a>> {
    let crumbs = breadcrumbs(story);
    story
        .chapters
        .iter()
        .enumerate()
        .map(|(position, chapter)| LinkedChapter {
            chapter,
            position,
            navigation: navigation(&story.chapters, position, chapter_word),
            breadcrumbs: crumbs.clone(),
        })
        .collect()
}

/// Previous/next links for the chapter at `position` in `chapters`.
pub fn navigation(chapters: &[Chapter], position: usize, chapter_word: &str) -> NavigationLinks {
    let to_link = |c: &Chapter| NavLink {
        label: chapter_label(chapter_word, c),
        href: c.output_filename().to_string(),
    };

    NavigationLinks {
        prev: position
            .checked_sub(1)
            .and_then(|i| chapters.get(i))
            .map(to_link),
        next: chapters.get(position + 1).map(to_link),
    }
}

/// One crumb per directory from the content root down to the story, each
/// pointing at the story's first chapter. Empty for a story with no chapters.
pub fn breadcrumbs(story: &Story) -> Vec<Crumb> {
    let Some(first) = story.chapters.first() else {
        return Vec::new();
    };
    story
        .segments()
        .map(|segment| Crumb {
            name: naming::display_title(segment),
            href: first.output_filename().to_string(),
        })
        .collect()
}
