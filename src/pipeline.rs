//! The build driver.
//!
//! Runs the stages in order: scan → link + render chapters → index → static
//! assets. It is the only place that decides what a failure means: every stage
//! returns its error here and the first one aborts the build. Nothing is rolled
//! back, so an aborted build can leave a partial output tree.
//!
//! The collaborators (Markdown converter and templates) are built once by the
//! caller and passed in through [`Collaborators`].
//!
//! Each build is a full rebuild: after a successful scan the previous output
//! root is removed, so every file under it afterwards comes from this run.

use crate::assets::{self, AssetError, AssetOutcome};
use crate::index;
use crate::link;
use crate::markdown::MarkdownConverter;
use crate::render::{self, PageSettings, RenderError};
use crate::scan::{self, ScanError};
use crate::templates::{IndexTemplate, PageTemplate};
use crate::types::Catalog;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("refusing to use {output} as output: it overlaps input directory {input}")]
    UnsafeOutput { output: PathBuf, input: PathBuf },
    #[error("genre directory `{name}` in {content_root} is reserved for static assets")]
    ReservedGenre { name: String, content_root: PathBuf },
    #[error("cannot prepare output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where to read from and write to, and what to stamp on every page.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub content_root: PathBuf,
    pub output_root: PathBuf,
    pub static_root: PathBuf,
    pub site_title: String,
    pub chapter_label: String,
    pub year: i32,
}

/// The external components the build delegates to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub markdown: &'a dyn MarkdownConverter,
    pub page: &'a dyn PageTemplate,
    pub index: &'a dyn IndexTemplate,
}

/// Progress notifications, one per completed output.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Scanned {
        genres: usize,
        stories: usize,
        chapters: usize,
    },
    ChapterWritten {
        /// `genre/story/3.html`
        output_path: String,
    },
    CoverCopied {
        output_path: String,
    },
    IndexWritten {
        output_path: String,
    },
    AssetsCopied {
        files: usize,
    },
    AssetsSkipped {
        static_root: PathBuf,
    },
}

/// Totals for a finished build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub genres: usize,
    pub stories: usize,
    pub chapters: usize,
    pub covers: usize,
    pub assets: usize,
}

/// Run the whole pipeline once.
pub fn build(
    options: &BuildOptions,
    collaborators: Collaborators<'_>,
    on_event: &mut dyn FnMut(&BuildEvent),
) -> Result<BuildReport, BuildError> {
    let catalog = scan::scan(&options.content_root)?;
    on_event(&BuildEvent::Scanned {
        genres: catalog.genres.len(),
        stories: catalog.story_count(),
        chapters: catalog.chapter_count(),
    });

    check_reserved_names(&catalog)?;
    check_output_root(options)?;
    reset_output_root(&options.output_root)?;

    let mut report = BuildReport {
        genres: catalog.genres.len(),
        stories: catalog.story_count(),
        ..BuildReport::default()
    };

    render_catalog(&catalog, options, collaborators, &mut report, on_event)?;

    let index_data = index::build_index_data(
        &catalog,
        &options.site_title,
        &options.chapter_label,
        options.year,
    );
    index::write_index(&options.output_root, &index_data, collaborators.index)?;
    on_event(&BuildEvent::IndexWritten {
        output_path: index::INDEX_FILE.to_string(),
    });

    let static_dest = options.output_root.join(assets::STATIC_DIR);
    match assets::copy_static(&options.static_root, &static_dest)? {
        AssetOutcome::Copied(files) => {
            report.assets = files;
            on_event(&BuildEvent::AssetsCopied { files });
        }
        AssetOutcome::Skipped => {
            warn!(
                "static directory {} not found, skipping assets",
                options.static_root.display()
            );
            on_event(&BuildEvent::AssetsSkipped {
                static_root: options.static_root.clone(),
            });
        }
    }

    Ok(report)
}

/// Render every chapter and copy every cover, story by story.
fn render_catalog(
    catalog: &Catalog,
    options: &BuildOptions,
    collaborators: Collaborators<'_>,
    report: &mut BuildReport,
    on_event: &mut dyn FnMut(&BuildEvent),
) -> Result<(), BuildError> {
    let settings = PageSettings {
        site_title: &options.site_title,
        chapter_label: &options.chapter_label,
        year: options.year,
    };

    for story in catalog.stories() {
        // The full sibling set is linked before any page of the story is written
        let linked = link::link_story(story, &options.chapter_label);
        for chapter in &linked {
            render::render_chapter(
                &catalog.root,
                &options.output_root,
                story,
                chapter,
                collaborators.markdown,
                collaborators.page,
                &settings,
            )?;
            report.chapters += 1;
            on_event(&BuildEvent::ChapterWritten {
                output_path: chapter.chapter.output_path.clone(),
            });
        }

        if render::copy_cover(&catalog.root, &options.output_root, story)?.is_some()
            && let Some(cover) = &story.cover
        {
            report.covers += 1;
            on_event(&BuildEvent::CoverCopied {
                output_path: cover.source_path.clone(),
            });
        }
    }
    Ok(())
}

/// Genre pages land beside the mirrored assets, so no genre may claim their
/// directory name.
fn check_reserved_names(catalog: &Catalog) -> Result<(), BuildError> {
    match catalog.genres.iter().find(|g| g.name == assets::STATIC_DIR) {
        Some(genre) => Err(BuildError::ReservedGenre {
            name: genre.name.clone(),
            content_root: catalog.root.clone(),
        }),
        None => Ok(()),
    }
}

/// The output root must not nest with an input in either direction: wiping it
/// would delete input, and scanning or copying would read back output.
fn check_output_root(options: &BuildOptions) -> Result<(), BuildError> {
    let output = absolute(&options.output_root);
    for input in [&options.content_root, &options.static_root] {
        let input_abs = absolute(input);
        if input_abs.starts_with(&output) || output.starts_with(&input_abs) {
            return Err(BuildError::UnsafeOutput {
                output: options.output_root.clone(),
                input: input.clone(),
            });
        }
    }
    Ok(())
}

fn reset_output_root(output_root: &Path) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: output_root.to_path_buf(),
        source,
    };
    if output_root.exists() {
        debug!("removing previous output {}", output_root.display());
        fs::remove_dir_all(output_root).map_err(io_err)?;
    }
    fs::create_dir_all(output_root).map_err(io_err)
}

/// Canonical form of the deepest existing ancestor, with the missing tail
/// appended, so paths that do not exist yet compare against canonical ones.
fn absolute(path: &Path) -> PathBuf {
    let lexical = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = lexical.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return tail.iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                existing = parent;
            }
            _ => return lexical.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::markdown::{CommonMark, ConversionError};
    use crate::templates::Theme;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        theme: Theme,
        markdown: CommonMark,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tmp: TempDir::new().unwrap(),
                theme: Theme::new(&SiteConfig::default()),
                markdown: CommonMark::new(),
            }
        }

        fn content(&self) -> PathBuf {
            self.tmp.path().join("content")
        }

        fn output(&self) -> PathBuf {
            self.tmp.path().join("public")
        }

        fn options(&self) -> BuildOptions {
            BuildOptions {
                content_root: self.content(),
                output_root: self.output(),
                static_root: self.tmp.path().join("static"),
                site_title: "Stories".to_string(),
                chapter_label: "Chapter".to_string(),
                year: 2026,
            }
        }

        fn collaborators(&self) -> Collaborators<'_> {
            Collaborators {
                markdown: &self.markdown,
                page: &self.theme,
                index: &self.theme,
            }
        }

        fn build(&self) -> (Result<BuildReport, BuildError>, Vec<BuildEvent>) {
            let mut events = Vec::new();
            let result = build(&self.options(), self.collaborators(), &mut |e| {
                events.push(e.clone())
            });
            (result, events)
        }

        fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.output().join(rel)).unwrap()
        }
    }

    /// Every file under `root`, as `/`-separated relative paths.
    fn files_under(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| crate::paths::to_url_path(e.path().strip_prefix(root).unwrap()))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn red_lily_scenario() {
        let fx = Fixture::new();
        let dir = write_story(&fx.content(), "fantasy", "red-lily", &["1.md", "2.md"]);
        fs::write(dir.join("cover.png"), "png").unwrap();

        let (result, _) = fx.build();
        let report = result.unwrap();
        assert_eq!(report.chapters, 2);
        assert_eq!(report.covers, 1);

        let first = fx.read("fantasy/red-lily/1.html");
        assert!(first.contains(r#"rel="next" href="2.html""#));
        assert!(!first.contains(r#"rel="prev""#));

        let second = fx.read("fantasy/red-lily/2.html");
        assert!(second.contains(r#"rel="prev" href="1.html""#));
        assert!(!second.contains(r#"rel="next""#));

        assert_eq!(fx.read("fantasy/red-lily/cover.png"), "png");

        let index = fx.read("index.html");
        assert!(index.contains(r#"id="fantasy""#));
        assert!(index.contains("red lily"));
        assert!(index.contains("2 chapters"));
        assert!(index.contains(r#"src="fantasy/red-lily/cover.png""#));
    }

    #[test]
    fn every_chapter_has_exactly_one_page() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md", "2.md", "10.md"]);
        write_story(&fx.content(), "mystery", "cold-case", &["prologue.md", "epilogue.md"]);

        fx.build().0.unwrap();

        assert_eq!(
            files_under(&fx.output()),
            vec![
                "fantasy/red-lily/1.html",
                "fantasy/red-lily/10.html",
                "fantasy/red-lily/2.html",
                "index.html",
                "mystery/cold-case/epilogue.html",
                "mystery/cold-case/prologue.html",
            ]
        );
    }

    #[test]
    fn gap_tolerant_navigation() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["2.md", "4.md"]);

        fx.build().0.unwrap();

        let two = fx.read("fantasy/red-lily/2.html");
        assert!(two.contains(r#"rel="next" href="4.html""#));
        assert!(!two.contains(r#"rel="prev""#));
        let four = fx.read("fantasy/red-lily/4.html");
        assert!(four.contains(r#"rel="prev" href="2.html""#));
        assert!(!four.contains(r#"rel="next""#));
    }

    #[test]
    fn missing_content_root_leaves_output_alone() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.output()).unwrap();
        fs::write(fx.output().join("old.html"), "previous build").unwrap();

        let (result, events) = fx.build();

        assert!(matches!(
            result,
            Err(BuildError::Scan(ScanError::NotFound(_)))
        ));
        assert!(events.is_empty());
        assert_eq!(fx.read("old.html"), "previous build");
    }

    #[test]
    fn stale_output_is_removed() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        fs::create_dir_all(fx.output().join("fantasy/red-lily")).unwrap();
        fs::write(fx.output().join("fantasy/red-lily/9.html"), "stale").unwrap();

        fx.build().0.unwrap();

        assert!(!fx.output().join("fantasy/red-lily/9.html").exists());
        assert!(fx.output().join("fantasy/red-lily/1.html").exists());
    }

    #[test]
    fn static_assets_mirrored() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        let static_root = fx.tmp.path().join("static");
        fs::create_dir_all(static_root.join("css")).unwrap();
        fs::write(static_root.join("css/site.css"), "h1 {}").unwrap();

        let (result, events) = fx.build();
        assert_eq!(result.unwrap().assets, 1);
        assert_eq!(fx.read("static/css/site.css"), "h1 {}");
        assert!(events.contains(&BuildEvent::AssetsCopied { files: 1 }));
    }

    #[test]
    fn missing_static_root_is_reported_not_fatal() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);

        let (result, events) = fx.build();
        assert!(result.is_ok());
        assert!(matches!(
            events.last(),
            Some(BuildEvent::AssetsSkipped { .. })
        ));
    }

    #[test]
    fn events_in_pipeline_order() {
        let fx = Fixture::new();
        let dir = write_story(&fx.content(), "fantasy", "red-lily", &["1.md", "2.md"]);
        fs::write(dir.join("cover.jpg"), "jpg").unwrap();

        let (_, events) = fx.build();

        assert_eq!(
            events[..5],
            [
                BuildEvent::Scanned {
                    genres: 1,
                    stories: 1,
                    chapters: 2,
                },
                BuildEvent::ChapterWritten {
                    output_path: "fantasy/red-lily/1.html".to_string(),
                },
                BuildEvent::ChapterWritten {
                    output_path: "fantasy/red-lily/2.html".to_string(),
                },
                BuildEvent::CoverCopied {
                    output_path: "fantasy/red-lily/cover.jpg".to_string(),
                },
                BuildEvent::IndexWritten {
                    output_path: "index.html".to_string(),
                },
            ]
        );
    }

    #[test]
    fn output_containing_content_is_refused() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        let mut options = fx.options();
        options.output_root = fx.tmp.path().to_path_buf();

        let result = build(&options, fx.collaborators(), &mut |_| {});
        assert!(matches!(result, Err(BuildError::UnsafeOutput { .. })));
        assert!(fx.content().join("fantasy/red-lily/1.md").exists());
    }

    #[test]
    fn output_inside_content_is_refused() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        let mut options = fx.options();
        options.output_root = fx.content().join("public");

        let result = build(&options, fx.collaborators(), &mut |_| {});
        assert!(matches!(result, Err(BuildError::UnsafeOutput { .. })));
        assert!(!fx.content().join("public").exists());
    }

    #[test]
    fn output_inside_static_is_refused() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        let static_root = fx.tmp.path().join("static");
        fs::create_dir_all(&static_root).unwrap();
        fs::write(static_root.join("a.css"), "a {}").unwrap();
        let mut options = fx.options();
        options.output_root = static_root.join("out");

        let result = build(&options, fx.collaborators(), &mut |_| {});
        assert!(matches!(result, Err(BuildError::UnsafeOutput { .. })));
        assert_eq!(files_under(&static_root), vec!["a.css"]);
        assert!(!static_root.join("out").exists());
    }

    #[test]
    fn output_through_missing_dirs_still_compared() {
        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md"]);
        let mut options = fx.options();
        options.output_root = fx.content().join("not/yet/here");

        let result = build(&options, fx.collaborators(), &mut |_| {});
        assert!(matches!(result, Err(BuildError::UnsafeOutput { .. })));
    }

    #[test]
    fn genre_named_static_is_refused() {
        let fx = Fixture::new();
        write_story(&fx.content(), "static", "red-lily", &["1.md"]);
        fs::create_dir_all(fx.output()).unwrap();
        fs::write(fx.output().join("old.html"), "previous build").unwrap();

        let (result, _) = fx.build();

        match result {
            Err(BuildError::ReservedGenre { name, .. }) => assert_eq!(name, "static"),
            other => panic!("expected reserved genre error, got {other:?}"),
        }
        assert_eq!(fx.read("old.html"), "previous build");
    }

    #[test]
    fn conversion_failure_aborts() {
        struct Broken;
        impl MarkdownConverter for Broken {
            fn convert(&self, _source: &[u8]) -> Result<String, ConversionError> {
                Err(ConversionError::Other("broken".to_string()))
            }
        }

        let fx = Fixture::new();
        write_story(&fx.content(), "fantasy", "red-lily", &["1.md", "2.md"]);
        let broken = Broken;
        let collaborators = Collaborators {
            markdown: &broken,
            ..fx.collaborators()
        };

        let mut written = 0;
        let result = build(&fx.options(), collaborators, &mut |e| {
            if matches!(e, BuildEvent::ChapterWritten { .. }) {
                written += 1;
            }
        });

        let err = result.unwrap_err();
        assert!(matches!(err, BuildError::Render(RenderError::Conversion { .. })));
        assert!(err.to_string().contains("1.md"));
        assert_eq!(written, 0);
        assert!(!fx.output().join("index.html").exists());
    }
}
