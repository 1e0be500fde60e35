//! Site configuration.
//!
//! An optional `config.toml` in the content root, next to the genre
//! directories. The scanner only descends into directories, so the file never
//! shows up as content.
//!
//! ## Options
//!
//! ```toml
//! title = "Stories"          # Site title, shown on every page
//! language = "en"            # <html lang="...">
//! chapter_label = "Chapter"  # "Chapter 3" in page titles and navigation
//!
//! [colors.light]
//! background = "#fdfcf8"
//! text = "#1d1d1d"
//! text_muted = "#6b6b6b"     # Breadcrumbs, footer, chapter counts
//! border = "#e4e0d8"
//! link = "#7a3b2e"
//! link_hover = "#4d1f15"
//!
//! [colors.dark]
//! background = "#141311"
//! text = "#e8e4dc"
//! text_muted = "#9a958c"
//! border = "#34312c"
//! link = "#d9a38f"
//! link_hover = "#f3c9b8"
//! ```
//!
//! ## Layering
//!
//! The file is merged key by key over the stock defaults before it is
//! deserialized, so a file holding only
//!
//! ```toml
//! [colors.dark]
//! background = "#000000"
//! ```
//!
//! keeps every other dark color. Misspelled keys fail the load instead of being
//! ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::Value;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config.toml: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Shown in every page header and as the index heading.
    pub title: String,
    /// `lang` attribute of every page.
    pub language: String,
    /// Word in front of chapter numbers.
    pub chapter_label: String,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Stories".to_string(),
            language: "en".to_string(),
            chapter_label: "Chapter".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Every text setting must have visible content.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let blank = [
            ("title", &self.title),
            ("language", &self.language),
            ("chapter_label", &self.chapter_label),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match blank {
            Some((key, _)) => Err(ConfigError::Validation(format!("`{key}` is empty"))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// One palette, emitted as `--color-*` custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    /// Warm paper.
    pub fn default_light() -> Self {
        Self::from_hex([
            "#fdfcf8", "#1d1d1d", "#6b6b6b", "#e4e0d8", "#7a3b2e", "#4d1f15",
        ])
    }

    /// Lamp-lit night reading.
    pub fn default_dark() -> Self {
        Self::from_hex([
            "#141311", "#e8e4dc", "#9a958c", "#34312c", "#d9a38f", "#f3c9b8",
        ])
    }

    fn from_hex([background, text, text_muted, border, link, link_hover]: [&str; 6]) -> Self {
        Self {
            background: background.to_string(),
            text: text.to_string(),
            text_muted: text_muted.to_string(),
            border: border.to_string(),
            link: link.to_string(),
            link_hover: link_hover.to_string(),
        }
    }

    /// `(custom property, value)` pairs in stylesheet order.
    fn properties(&self) -> [(&'static str, &str); 6] {
        [
            ("--color-bg", self.background.as_str()),
            ("--color-text", self.text.as_str()),
            ("--color-text-muted", self.text_muted.as_str()),
            ("--color-border", self.border.as_str()),
            ("--color-link", self.link.as_str()),
            ("--color-link-hover", self.link_hover.as_str()),
        ]
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// The defaults as a TOML table, the bottom layer of every load.
pub fn stock_defaults_value() -> Result<Value, ConfigError> {
    Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("defaults do not serialize: {e}")))
}

/// Lay `overlay` over `base`. Tables merge recursively; any other overlay
/// value replaces what it lands on.
pub fn merge_toml(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(mut merged), Value::Table(top)) => {
            for (key, value) in top {
                let combined = match merged.remove(&key) {
                    Some(below) => merge_toml(below, value),
                    None => value,
                };
                merged.insert(key, combined);
            }
            Value::Table(merged)
        }
        (_, top) => top,
    }
}

/// Read `<dir>/config.toml` as an untyped table, if the file exists.
pub fn load_raw_config(dir: &Path) -> Result<Option<Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Some(toml::from_str(&text)?))
}

/// Merge, deserialize, validate.
pub fn resolve_config(base: Value, overlay: Option<Value>) -> Result<SiteConfig, ConfigError> {
    let value = match overlay {
        Some(top) => merge_toml(base, top),
        None => base,
    };
    let config: SiteConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Site config for a content root. No file (or no root) means defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// The `gen-config` output: every option at its default, with comments.
pub fn stock_config_toml() -> &'static str {
    r##"# storyshelf site configuration
#
# Save as config.toml in the content root, beside the genre directories.
# Every key is optional and the values below are the defaults. Delete what
# you don't change; misspelled keys are rejected.

# Shown in every page header and as the index heading.
title = "Stories"

# lang attribute of every generated page.
language = "en"

# Word in front of chapter numbers: "Chapter 3" in titles and prev/next links.
chapter_label = "Chapter"

# Palette used when the reader's system is in light mode.
[colors.light]
background = "#fdfcf8"
text = "#1d1d1d"
text_muted = "#6b6b6b"    # breadcrumbs, footer, chapter counts
border = "#e4e0d8"
link = "#7a3b2e"
link_hover = "#4d1f15"

# Palette used under prefers-color-scheme: dark.
[colors.dark]
background = "#141311"
text = "#e8e4dc"
text_muted = "#9a958c"
border = "#34312c"
link = "#d9a38f"
link_hover = "#f3c9b8"
"##
}

/// `:root` custom properties for both palettes, dark behind a media query.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let block = |scheme: &ColorScheme, pad: &str| {
        scheme
            .properties()
            .iter()
            .map(|(name, value)| format!("{pad}{name}: {value};\n"))
            .collect::<String>()
    };
    format!(
        ":root {{\n{}}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}    }}\n}}",
        block(&colors.light, "    "),
        block(&colors.dark, "        "),
    )
}
