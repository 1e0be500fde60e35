//! Centralized name parsing for chapter files and content directories.
//!
//! Chapter files are ordered by their numeric stem (`3.md` → 3). Stems that are
//! not plain integers fall back to their 1-based position among the story's
//! chapter files in lexicographic order, so a story written as `prologue.md`,
//! `the-storm.md` still gets a stable reading order.
//!
//! ## Display Titles
//!
//! Directory names become display titles by converting dashes and underscores
//! to spaces:
//! - `red-lily/` → "red lily"
//! - `science_fiction/` → "science fiction"

/// Parse a chapter file stem as an ordering key.
///
/// Accepts plain non-negative integers, with or without leading zeros:
/// - `"1"` → Some(1)
/// - `"007"` → Some(7)
/// - `"prologue"` → None
/// - `"1-intro"` → None
/// - `"-1"` → None
pub fn parse_chapter_number(stem: &str) -> Option<u32> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Assign ordering keys to a story's chapter file stems.
///
/// `stems` must already be in lexicographic filename order. Numeric stems keep
/// their number; the rest take their 1-based position in `stems`.
pub fn ordering_keys<S: AsRef<str>>(stems: &[S]) -> Vec<u32> {
    stems
        .iter()
        .enumerate()
        .map(|(idx, stem)| parse_chapter_number(stem.as_ref()).unwrap_or(idx as u32 + 1))
        .collect()
}

/// Display title for a genre or story directory name.
pub fn display_title(name: &str) -> String {
    name.replace(['-', '_'], " ")
}
