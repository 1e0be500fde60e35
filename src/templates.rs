//! Page and index templates.
//!
//! The renderer and index builder hand a data record to a template trait
//! object and never see HTML structure themselves. [`Theme`] is the built-in
//! implementation of both traits, written with [maud](https://maud.lambda.xyz/)
//! so markup is checked at compile time and every interpolation is escaped.
//! The chapter body is the one exception: it is already HTML from the Markdown
//! converter and is inserted verbatim.
//!
//! ## Stylesheet
//!
//! `assets/theme.css` is embedded at compile time and prefixed with the color
//! custom properties generated from [`SiteConfig`].

use crate::config::{self, SiteConfig};
use crate::link::{Crumb, NavLink};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("template failed: {0}")]
    Render(String),
}

/// Everything a chapter page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// HTML fragment produced by the Markdown converter
    pub content: String,
    /// `<story title> — Chapter <n>`
    pub title: String,
    pub year: i32,
    pub prev_link: Option<NavLink>,
    pub next_link: Option<NavLink>,
    pub breadcrumbs: Vec<Crumb>,
    pub site_title: String,
    /// Relative link from the chapter page back to `index.html`
    pub home_link: String,
}

/// Everything the index page shows.
#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub site_title: String,
    pub year: i32,
    pub genres: Vec<GenreEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreEntry {
    pub name: String,
    pub title: String,
    pub stories: Vec<StoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryEntry {
    pub name: String,
    pub title: String,
    /// First chapter, if the story has any
    pub url: Option<String>,
    pub cover_url: Option<String>,
    pub chapters: Vec<ChapterEntry>,
}

impl StoryEntry {
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterEntry {
    pub label: String,
    pub url: String,
}

/// Renders one chapter page.
pub trait PageTemplate {
    fn render_page(&self, page: &PageData, out: &mut dyn Write) -> Result<(), TemplateError>;
}

/// Renders the site index.
pub trait IndexTemplate {
    fn render_index(&self, index: &IndexData, out: &mut dyn Write) -> Result<(), TemplateError>;
}

const THEME_CSS: &str = include_str!("../assets/theme.css");

/// The built-in look: inline CSS, no JavaScript.
#[derive(Debug, Clone)]
pub struct Theme {
    language: String,
    css: String,
}

impl Theme {
    pub fn new(config: &SiteConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            language: config.language.clone(),
            css: format!("{}\n\n{}", color_css, THEME_CSS),
        }
    }

    pub fn page_markup(&self, page: &PageData) -> Markup {
        let content = html! {
            header.site-header {
                nav.breadcrumb {
                    a href=(page.home_link) { (page.site_title) }
                    @for crumb in &page.breadcrumbs {
                        " › "
                        a href=(crumb.href) { (crumb.name) }
                    }
                }
            }
            main.chapter-page {
                article.chapter-content {
                    (PreEscaped(&page.content))
                }
                (chapter_nav(page.prev_link.as_ref(), page.next_link.as_ref()))
            }
            (site_footer(page.year, &page.site_title))
        };
        self.base_document(&page.title, content)
    }

    pub fn index_markup(&self, index: &IndexData) -> Markup {
        let content = html! {
            header.site-header {
                h1 { (index.site_title) }
            }
            main.index-page {
                @if index.genres.is_empty() {
                    p.empty { "No stories yet." }
                }
                @for genre in &index.genres {
                    section.genre id=(genre.name) {
                        h2 { (genre.title) }
                        ul.story-list {
                            @for story in &genre.stories {
                                (story_card(story))
                            }
                        }
                    }
                }
            }
            (site_footer(index.year, &index.site_title))
        };
        self.base_document(&index.site_title, content)
    }

    fn base_document(&self, title: &str, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(self.language) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    style { (PreEscaped(&self.css)) }
                }
                body {
                    (content)
                }
            }
        }
    }
}

impl PageTemplate for Theme {
    fn render_page(&self, page: &PageData, out: &mut dyn Write) -> Result<(), TemplateError> {
        out.write_all(self.page_markup(page).into_string().as_bytes())?;
        Ok(())
    }
}

impl IndexTemplate for Theme {
    fn render_index(&self, index: &IndexData, out: &mut dyn Write) -> Result<(), TemplateError> {
        out.write_all(self.index_markup(index).into_string().as_bytes())?;
        Ok(())
    }
}

fn chapter_nav(prev: Option<&NavLink>, next: Option<&NavLink>) -> Markup {
    html! {
        nav.chapter-nav {
            @if let Some(prev) = prev {
                a.prev rel="prev" href=(prev.href) { "← " (prev.label) }
            }
            @if let Some(next) = next {
                a.next rel="next" href=(next.href) { (next.label) " →" }
            }
        }
    }
}

fn story_card(story: &StoryEntry) -> Markup {
    html! {
        li.story-card {
            @if let Some(cover) = &story.cover_url {
                img.cover src=(cover) alt={ "Cover of " (story.title) } loading="lazy";
            }
            h3 {
                @if let Some(url) = &story.url {
                    a href=(url) { (story.title) }
                } @else {
                    (story.title)
                }
            }
            span.chapter-count { (chapter_count_label(story.chapter_count())) }
            @if !story.chapters.is_empty() {
                ol.chapter-list {
                    @for chapter in &story.chapters {
                        li { a href=(chapter.url) { (chapter.label) } }
                    }
                }
            }
        }
    }
}

fn site_footer(year: i32, site_title: &str) -> Markup {
    html! {
        footer.site-footer {
            "© " (year) " " (site_title)
        }
    }
}

fn chapter_count_label(count: usize) -> String {
    match count {
        1 => "1 chapter".to_string(),
        n => format!("{n} chapters"),
    }
}
