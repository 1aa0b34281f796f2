//! Lexical path normalization.
//!
//! Source map paths describe where files live in the asset pipeline, not
//! on this machine, so nothing here touches the filesystem:
//! - `clean` - fold `.` and `..` components
//! - `relative_to` - express a path relative to a base directory
//! - `to_slash` - render with `/` separators

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without resolving symlinks.
///
/// A `..` that would climb above a root is dropped; one that climbs above
/// the start of a relative path is kept.
///
/// # Example
/// ```ignore
/// assert_eq!(clean(Path::new("a/./b/../c.js")), PathBuf::from("a/c.js"));
/// ```
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().collect()
}

/// Express `path` relative to the directory `base`.
///
/// Both are cleaned first. Returns `None` when one is absolute and the
/// other is not, since no relative path connects them.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = clean(path);
    let base = clean(base);
    if path.has_root() != base.has_root() {
        return None;
    }

    let path_parts: Vec<_> = path.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    // Can't climb out of an unknown parent.
    if base_parts[common..]
        .iter()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part);
    }
    Some(out)
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
