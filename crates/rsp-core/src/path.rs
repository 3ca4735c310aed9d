//! Slash-delimited repository path helpers.
//!
//! Paths are absolute (`/content/site/en`), never end with a slash (except the
//! root `/`), and contain no empty segments. Ancestry checks are segment-aware:
//! `/content` contains `/content/en` but not `/contents`.

use crate::error::RepoError;

/// The repository root path.
pub const ROOT: &str = "/";

/// Check that `path` is a well-formed absolute repository path.
pub fn validate(path: &str) -> Result<(), RepoError> {
    if path == ROOT {
        return Ok(());
    }
    if !path.starts_with('/') || path.ends_with('/') {
        return Err(RepoError::InvalidPath(path.to_string()));
    }
    if path[1..].split('/').any(str::is_empty) {
        return Err(RepoError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Strip trailing slashes from a user-supplied path. `"/content/"` becomes
/// `"/content"`; a path made only of slashes becomes the root.
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        ROOT
    } else {
        trimmed
    }
}

/// The final segment of a path. The root has an empty name.
pub fn name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// The parent path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Append a child name to a parent path.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Append a relative path (`a/b/c`) to a base path.
pub fn join_relative(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        base.to_string()
    } else {
        join(base, relative)
    }
}

/// True when `path` equals `ancestor` or lies somewhere below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT {
        return path.starts_with('/');
    }
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// The part of `path` below `ancestor`, without a leading slash.
///
/// Returns `None` when `path` is not within `ancestor`, and `Some("")` when the
/// two are equal.
pub fn relative_to<'a>(path: &'a str, ancestor: &str) -> Option<&'a str> {
    if !is_within(path, ancestor) {
        return None;
    }
    if ancestor == ROOT {
        return Some(&path[1..]);
    }
    Some(path[ancestor.len()..].trim_start_matches('/'))
}

/// Iterate `path` and each of its ancestors, nearest first, ending at the root.
pub fn ancestors_inclusive(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(path), |&p| parent(p))
}
