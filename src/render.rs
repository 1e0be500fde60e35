//! Chapter page rendering.
//!
//! Materializes the catalog: one HTML page per chapter, written to the same
//! relative path as its source with `.md` replaced by `.html`, plus the story
//! cover copied next to the pages. Reading the content tree and writing the
//! output tree only ever happens through [`paths::safe_join`], so a catalog
//! path can never escape either root.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! └── fantasy/
//!     └── red-lily/
//!         ├── 1.html       # prev: none, next: 2.html
//!         ├── 2.html       # prev: 1.html, next: none
//!         └── cover.png    # copied from content/fantasy/red-lily/
//! ```

use crate::link::{self, LinkedChapter};
use crate::markdown::{ConversionError, MarkdownConverter};
use crate::paths::{self, PathError};
use crate::templates::{PageData, PageTemplate, TemplateError};
use crate::types::Story;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot convert {path}: {source}")]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },
    #[error("template failed for {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Site-wide values stamped into every page.
#[derive(Debug, Clone)]
pub struct PageSettings<'a> {
    pub site_title: &'a str,
    pub chapter_label: &'a str,
    pub year: i32,
}

/// Page title for a chapter: `red lily — Chapter 2`.
pub fn chapter_title(
    story: &Story,
    linked: &LinkedChapter<'_>,
    settings: &PageSettings<'_>,
) -> String {
    format!(
        "{} — {}",
        story.title,
        link::chapter_label(settings.chapter_label, linked.chapter)
    )
}

/// Assemble the template record for one chapter.
pub fn page_data(
    story: &Story,
    linked: &LinkedChapter<'_>,
    content: String,
    settings: &PageSettings<'_>,
) -> PageData {
    PageData {
        content,
        title: chapter_title(story, linked, settings),
        year: settings.year,
        prev_link: linked.navigation.prev.clone(),
        next_link: linked.navigation.next.clone(),
        breadcrumbs: linked.breadcrumbs.clone(),
        site_title: settings.site_title.to_string(),
        home_link: paths::relative_url(&story.path, "index.html"),
    }
}

/// Convert and write one chapter page. Returns the path written.
pub fn render_chapter(
    content_root: &Path,
    output_root: &Path,
    story: &Story,
    linked: &LinkedChapter<'_>,
    markdown: &dyn MarkdownConverter,
    template: &dyn PageTemplate,
    settings: &PageSettings<'_>,
) -> Result<PathBuf, RenderError> {
    let source = paths::safe_join(content_root, &linked.chapter.source_path)?;
    let target = paths::safe_join(output_root, &linked.chapter.output_path)?;

    let html = fs::read(&source)
        .map_err(ConversionError::from)
        .and_then(|bytes| markdown.convert(&bytes))
        .map_err(|source_err| RenderError::Conversion {
            path: source.clone(),
            source: source_err,
        })?;

    let data = page_data(story, linked, html, settings);
    write_with(&target, |out| template.render_page(&data, out))?;
    debug!("rendered {} -> {}", source.display(), target.display());
    Ok(target)
}

/// Copy the story's cover into the output tree, if it has one.
pub fn copy_cover(
    content_root: &Path,
    output_root: &Path,
    story: &Story,
) -> Result<Option<PathBuf>, RenderError> {
    let Some(cover) = &story.cover else {
        return Ok(None);
    };
    let source = paths::safe_join(content_root, &cover.source_path)?;
    let target = paths::safe_join(output_root, &cover.source_path)?;
    create_parent(&target)?;
    fs::copy(&source, &target).map_err(|e| RenderError::Io {
        path: target.clone(),
        source: e,
    })?;
    Ok(Some(target))
}

/// Create `target`, hand a buffered writer to `render`, and flush.
///
/// Template failures are reported against `target`.
pub(crate) fn write_with(
    target: &Path,
    render: impl FnOnce(&mut dyn Write) -> Result<(), TemplateError>,
) -> Result<(), RenderError> {
    create_parent(target)?;
    let file = File::create(target).map_err(|e| RenderError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;
    let mut out = BufWriter::new(file);
    render(&mut out).map_err(|e| RenderError::Template {
        path: target.to_path_buf(),
        source: e,
    })?;
    out.flush().map_err(|e| RenderError::Io {
        path: target.to_path_buf(),
        source: e,
    })
}

fn create_parent(target: &Path) -> Result<(), RenderError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| RenderError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
