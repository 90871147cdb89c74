// src/archive/path.rs

//! Path sanitization for extracting archive members
//!
//! Member names come from untrusted archives. Before anything is written to
//! a scratch directory the name is normalized so it cannot escape it.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Reasons a member path cannot be written to disk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsafePath {
    #[error("path traversal attempt: {0}")]
    Traversal(String),

    #[error("empty path after sanitization: '{0}'")]
    Empty(String),
}

/// Sanitize a member path
///
/// 1. Rejects paths containing `..` components
/// 2. Skips `.` components
/// 3. Strips leading slashes to make the path relative
/// 4. Rejects paths that end up empty
///
/// # Examples
///
/// ```
/// use distcheck::archive::path::sanitize_path;
/// use std::path::PathBuf;
///
/// assert_eq!(sanitize_path("pkg/lib.so").unwrap(), PathBuf::from("pkg/lib.so"));
/// assert_eq!(sanitize_path("/pkg/lib.so").unwrap(), PathBuf::from("pkg/lib.so"));
/// assert!(sanitize_path("../etc/passwd").is_err());
/// ```
pub fn sanitize_path(path: &str) -> Result<PathBuf, UnsafePath> {
    let relative = path.trim_start_matches('/');
    let mut normalized = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir => return Err(UnsafePath::Traversal(path.to_string())),
            Component::Prefix(_) | Component::RootDir => {}
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(UnsafePath::Empty(path.to_string()));
    }

    Ok(normalized)
}

/// Join an untrusted member path under `root`
pub fn safe_join(root: &Path, path: &str) -> Result<PathBuf, UnsafePath> {
    Ok(root.join(sanitize_path(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_normal_paths() {
        assert_eq!(sanitize_path("a/b/c.so").unwrap(), PathBuf::from("a/b/c.so"));
        assert_eq!(sanitize_path("./a/./b").unwrap(), PathBuf::from("a/b"));
        assert_eq!(sanitize_path("///a").unwrap(), PathBuf::from("a"));
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(
            sanitize_path("a/../../etc/passwd"),
            Err(UnsafePath::Traversal("a/../../etc/passwd".to_string()))
        );
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(sanitize_path("/"), Err(UnsafePath::Empty(_))));
        assert!(matches!(sanitize_path("./"), Err(UnsafePath::Empty(_))));
    }

    #[test]
    fn test_safe_join() {
        let root = Path::new("/tmp/scratch");
        assert_eq!(
            safe_join(root, "/pkg/lib.so").unwrap(),
            PathBuf::from("/tmp/scratch/pkg/lib.so")
        );
        assert!(safe_join(root, "../outside").is_err());
    }
}
