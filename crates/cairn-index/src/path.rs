//! Repository-relative path rules shared by the index and working trees.

/// Check that `path` is a clean, slash-separated, repository-relative path.
///
/// Returns the reason on failure so each caller can wrap it in its own error.
pub fn check_path(path: &str) -> Result<(), &'static str> {
    if path.is_empty() {
        return Err("empty path");
    }
    if path.starts_with('/') {
        return Err("absolute path");
    }
    if path.contains('\\') {
        return Err("backslash in path");
    }
    for component in path.split('/') {
        match component {
            "" => return Err("empty path component"),
            "." | ".." => return Err("relative path component"),
            _ => {}
        }
    }
    Ok(())
}
