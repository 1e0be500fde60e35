//! # storyshelf
//!
//! A minimal static site generator for serialized fiction. Your filesystem is
//! the data source: first-level directories are genres, second-level
//! directories are stories, and every Markdown file in a story is a chapter.
//!
//! # Architecture: Discover, Then Materialize
//!
//! ```text
//! 1. Scan      content/  →  Catalog          (read-only, in memory)
//! 2. Link      Catalog   →  prev/next + breadcrumbs per chapter
//! 3. Render    chapters  →  public/<genre>/<story>/<n>.html (+ covers)
//! 4. Index     Catalog   →  public/index.html
//! 5. Assets    static/   →  public/static/
//! ```
//!
//! Scanning never writes and the later stages never walk the content tree, so
//! the catalog is a plain value that tests can assert on directly. Every run is
//! a full rebuild.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content root and produces the [`types::Catalog`] |
//! | [`link`] | Positional prev/next links and breadcrumbs |
//! | [`render`] | Chapter pages and cover copies |
//! | [`index`] | Genre → story → chapter index page |
//! | [`assets`] | Mirrors the static directory into the output |
//! | [`pipeline`] | Runs the stages in order and owns failure policy |
//! | [`markdown`] | Markdown converter trait and its CommonMark implementation |
//! | [`templates`] | Page/index records, template traits, the built-in maud theme |
//! | [`config`] | Optional `config.toml` loading, merging and validation |
//! | [`naming`] | Chapter ordering keys and display titles |
//! | [`paths`] | Safe joins, relative URLs, slash normalization |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Positional Adjacency
//!
//! Chapters are ordered by the number in their file name (`3.md`), falling back
//! to file name order for names like `prologue.md`. Previous/next links come
//! from position in that order, never from arithmetic on the number, so a story
//! with `2.md` and `4.md` still forms one unbroken chain.
//!
//! ## Injected Collaborators
//!
//! Markdown conversion and templating sit behind traits
//! ([`markdown::MarkdownConverter`], [`templates::PageTemplate`],
//! [`templates::IndexTemplate`]). The binary builds one of each and passes them
//! to [`pipeline::build`]; tests pass stubs.
//!
//! ## Maud Over Template Files
//!
//! The built-in [`templates::Theme`] uses [Maud](https://maud.lambda.xyz/):
//! markup is checked at compile time, interpolation is escaped by default, and
//! there is no template directory to ship alongside the binary.

pub mod assets;
pub mod config;
pub mod index;
pub mod link;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
