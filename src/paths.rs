//! Path utilities shared by every stage.
//!
//! Catalog paths are stored relative to the content root with `/` separators so
//! the same string works as a filesystem suffix and as a URL. Everything that
//! crosses that boundary goes through these functions.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("absolute path not allowed here: {0}")]
    Absolute(PathBuf),
    #[error("path escapes its root: {0}")]
    Escapes(PathBuf),
}

/// True when the path can be stat'ed.
pub fn exists(path: &Path) -> bool {
    path.metadata().is_ok()
}

/// Join `relative` under `root`, refusing anything that would land outside it.
pub fn safe_join(root: &Path, relative: impl AsRef<Path>) -> Result<PathBuf, PathError> {
    let relative = relative.as_ref();
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(PathError::Escapes(relative.to_path_buf())),
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::Absolute(relative.to_path_buf()));
            }
        }
    }
    Ok(joined)
}

/// `path` relative to `base`, or `None` if it is not inside `base`.
pub fn relativize(base: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(Path::to_path_buf)
}

/// Join the normal components of `path` with `/`.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a URL-ish string: backslashes become `/`, runs of slashes collapse,
/// and a trailing slash is dropped (except for the root `/` itself).
pub fn normalize_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_slash = false;
    for c in input.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if !last_slash {
                out.push('/');
            }
            last_slash = true;
        } else {
            out.push(c);
            last_slash = false;
        }
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Relative URL from a page directory to a target, both given as
/// root-relative URL paths.
///
/// `relative_url("fantasy/red-lily", "index.html")` → `"../../index.html"`.
pub fn relative_url(from_dir: &str, to: &str) -> String {
    let from_dir = normalize_slashes(from_dir);
    let to = normalize_slashes(to);
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let target: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", from.len() - common).collect();
    parts.extend(&target[common..]);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
