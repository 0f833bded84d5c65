//! Remote path helpers.
//!
//! Remote paths are always absolute and `/`-separated regardless of the
//! local OS, with no trailing slash except for the root `"/"` itself.

/// Checks whether a remote path is absolute.
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Strips any trailing slash, keeping the root `"/"` intact. A run of
/// slashes collapses to the root instead of an empty path.
#[must_use]
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Joins a child name onto a base path using the `/` separator.
#[must_use]
pub fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Returns the parent of an absolute path, or `None` for the root.
#[must_use]
pub fn parent(path: &str) -> Option<String> {
    let path = normalize(path);
    if path == "/" {
        return None;
    }

    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => None,
    }
}

/// Returns the last component of a path. The root has no name.
#[must_use]
pub fn file_name(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }

    path.trim_end_matches('/').rsplit('/').next()
}
