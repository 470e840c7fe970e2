//! Lexical path resolution.
//!
//! Paths are absolute strings with `/` separators. Resolution never touches
//! the tree: a resolved path may point at nothing, which the filesystem
//! lookup reports later.

/// Resolve `path` against `current` into an absolute path.
///
/// Rules, first match wins:
/// - `/...` is already absolute and returned unchanged
/// - `~` is the user's home directory
/// - `~/rest` replaces the tilde with the home directory
/// - anything else is applied segment by segment to `current`: `..` pops
///   (stopping at the root), `.` and empty segments are skipped
pub fn resolve(path: &str, current: &str, home: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    if path == "~" {
        return home.to_string();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return format!("{}/{}", home.trim_end_matches('/'), rest);
    }

    let mut parts: Vec<&str> = segments(current).collect();
    for part in path.split('/') {
        match part {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            _ => parts.push(part),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Non-empty segments of an absolute path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Split a path into its parent path and final name.
///
/// Returns `None` for the root, which has no name.
pub fn split_parent(path: &str) -> Option<(String, &str)> {
    let mut parts: Vec<&str> = segments(path).collect();
    let name = parts.pop()?;
    Some((format!("/{}", parts.join("/")), name))
}

/// Final component of a path, if any.
pub fn base_name(path: &str) -> Option<&str> {
    segments(path).last()
}

/// True for the `.` and `..` entries, which never name a stored node.
pub fn is_dot_name(name: &str) -> bool {
    matches!(name, "." | "..")
}

/// Append `name` to a directory path.
pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Canonical form used for comparisons: `/a/b` without duplicate or trailing slashes.
pub fn normalize(path: &str) -> String {
    format!("/{}", segments(path).collect::<Vec<_>>().join("/"))
}

/// True if `path` is `ancestor` or lies inside it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let path = normalize(path);
    let ancestor = normalize(ancestor);
    ancestor == "/" || path == ancestor || path.starts_with(&format!("{}/", ancestor))
}

/// Render a path for the prompt, abbreviating the home directory to `~`.
pub fn display(path: &str, home: &str) -> String {
    let path = normalize(path);
    let home = normalize(home);
    if home == "/" {
        return path;
    }
    if path == home {
        "~".to_string()
    } else if let Some(rest) = path.strip_prefix(&format!("{}/", home)) {
        format!("~/{}", rest)
    } else {
        path
    }
}
