//! CLI output formatting.
//!
//! Output is information-first: each story leads with its positional index and
//! title, with filesystem paths shown as indented `Source:` context lines.
//!
//! ## Check
//!
//! ```text
//! fantasy
//!     001 glass tower (2 chapters)
//!         Source: fantasy/glass-tower/
//!         001 Chapter 1
//!             Source: epilogue.md
//!         002 Chapter 2
//!             Source: prologue.md
//!     002 red lily (2 chapters)
//!         Source: fantasy/red-lily/
//!         Cover: cover.png
//!         001 Chapter 1
//!         002 Chapter 2
//! ```
//!
//! ## Build
//!
//! ```text
//! Found 1 genre, 2 stories, 4 chapters
//! Built fantasy/glass-tower/epilogue.html
//! ...
//! Copied fantasy/red-lily/cover.png
//! Built index.html
//! Copied 3 static files → static/
//! ```
//!
//! Each `format_*` function returns lines and does no I/O; the `print_*`
//! wrappers write them to stdout.

use crate::link;
use crate::pipeline::{BuildEvent, BuildReport};
use crate::types::Catalog;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format the catalog as a genre → story → chapter tree.
///
/// A chapter's `Source:` line is shown only when its file name differs from
/// `<number>.md`, i.e. when the label alone does not identify the file.
pub fn format_scan_output(catalog: &Catalog, chapter_word: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if catalog.genres.is_empty() {
        lines.push(format!("No genres found in {}", catalog.root.display()));
        return lines;
    }

    for genre in &catalog.genres {
        lines.push(genre.title.clone());
        for (i, story) in genre.stories.iter().enumerate() {
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(i + 1),
                story.title,
                plural(story.chapters.len(), "chapter", "chapters")
            ));
            lines.push(format!("{}Source: {}/", indent(2), story.path));
            if let Some(cover) = &story.cover {
                lines.push(format!("{}Cover: {}", indent(2), cover.filename));
            }

            for (j, chapter) in story.chapters.iter().enumerate() {
                lines.push(format!(
                    "{}{} {}",
                    indent(2),
                    format_index(j + 1),
                    link::chapter_label(chapter_word, chapter)
                ));
                if chapter.filename != format!("{}.md", chapter.number) {
                    lines.push(format!("{}Source: {}", indent(3), chapter.filename));
                }
            }
        }
    }

    lines
}

/// Print the catalog tree to stdout.
pub fn print_scan_output(catalog: &Catalog, chapter_word: &str) {
    for line in format_scan_output(catalog, chapter_word) {
        println!("{}", line);
    }
}

/// Format one build progress event as a status line.
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::Scanned {
            genres,
            stories,
            chapters,
        } => format!(
            "Found {}, {}, {}",
            plural(*genres, "genre", "genres"),
            plural(*stories, "story", "stories"),
            plural(*chapters, "chapter", "chapters"),
        ),
        BuildEvent::ChapterWritten { output_path } | BuildEvent::IndexWritten { output_path } => {
            format!("Built {}", output_path)
        }
        BuildEvent::CoverCopied { output_path } => format!("Copied {}", output_path),
        BuildEvent::AssetsCopied { files } => format!(
            "Copied {} \u{2192} {}/",
            plural(*files, "static file", "static files"),
            crate::assets::STATIC_DIR
        ),
        BuildEvent::AssetsSkipped { static_root } => {
            format!("No static directory at {}, skipped", static_root.display())
        }
    }
}

/// Print one build progress event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    println!("{}", format_build_event(event));
}

/// Final line of a successful build.
pub fn format_build_summary(report: &BuildReport, output_root: &Path) -> String {
    format!(
        "Site built in {}: {}, {}, {}, {}",
        output_root.display(),
        plural(report.stories, "story", "stories"),
        plural(report.chapters, "chapter", "chapters"),
        plural(report.covers, "cover", "covers"),
        plural(report.assets, "asset", "assets"),
    )
}
