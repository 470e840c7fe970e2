use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ROOT_USER;
use crate::core::error::FsError;
use crate::core::path;
use crate::models::{DirEntry, FsNode, NodeKind};

/// Canonical `rwxrwxrwx`-style permission string.
static CANONICAL_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([r-][w-][x-]){3}$").expect("mode pattern is valid"));

/// True if `mode` is a well-formed 9-character permission string.
pub fn is_canonical_mode(mode: &str) -> bool {
    CANONICAL_MODE.is_match(mode)
}

fn base_name_is_dot(target: &str) -> bool {
    path::base_name(target).is_some_and(path::is_dot_name)
}

/// Virtual filesystem tree.
///
/// All operations take absolute paths (see [`path::resolve`]). Lookups skip
/// empty segments, so `/etc/` and `/etc` name the same node.
///
/// # Path Convention
///
/// - Root: `"/"`
/// - Nested entry: `"/home/ubuntu/notes.txt"`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualFs {
    /// Root directory entry containing all files
    root: FsNode,
}

impl VirtualFs {
    /// Create a filesystem with a single root directory owned by root.
    pub fn empty(now: u64) -> Self {
        Self {
            root: FsNode::directory(ROOT_USER, now),
        }
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Get a node by absolute path.
    ///
    /// Returns `None` if any segment is missing or a file sits where a
    /// directory was expected.
    pub fn get_node(&self, path: &str) -> Option<&FsNode> {
        let mut current = &self.root;
        for part in path::segments(path) {
            current = current.children()?.get(part)?;
        }
        Some(current)
    }

    fn get_node_mut(&mut self, path: &str) -> Option<&mut FsNode> {
        let mut current = &mut self.root;
        for part in path::segments(path) {
            current = current.children_mut()?.get_mut(part)?;
        }
        Some(current)
    }

    /// Check if a path is a directory.
    pub fn is_directory(&self, path: &str) -> bool {
        matches!(self.get_node(path), Some(FsNode::Directory { .. }))
    }

    /// Child map of the parent of `path`, plus the final name.
    fn parent_children_mut<'a>(
        &mut self,
        path: &'a str,
    ) -> Result<(&mut BTreeMap<String, FsNode>, &'a str), FsError> {
        let (parent, name) = path::split_parent(path).ok_or(FsError::InvalidPath)?;
        let children = self
            .get_node_mut(&parent)
            .ok_or(FsError::NotFound)?
            .children_mut()
            .ok_or(FsError::NotADirectory)?;
        Ok((children, name))
    }

    /// Create a file or directory.
    ///
    /// Fails if the parent is missing or not a directory, or if the name is
    /// already taken or is `.` / `..`. The new node is owned by `owner` with
    /// default permissions for its kind.
    pub fn create_node(
        &mut self,
        path: &str,
        kind: NodeKind,
        content: &str,
        owner: &str,
        now: u64,
    ) -> Result<(), FsError> {
        if path::split_parent(path).is_none() {
            return Err(FsError::AlreadyExists);
        }
        let (children, name) = self.parent_children_mut(path)?;
        if path::is_dot_name(name) {
            return Err(FsError::InvalidPath);
        }
        if children.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        children.insert(name.to_string(), FsNode::new(kind, content, owner, now));
        Ok(())
    }

    /// Create a directory and any missing parents (`mkdir -p`).
    ///
    /// Existing directories along the way are left untouched.
    pub fn create_dir_all(&mut self, path: &str, owner: &str, now: u64) -> Result<(), FsError> {
        let mut current = String::from("/");
        for part in path::segments(path) {
            current = path::join(&current, part);
            match self.get_node(&current) {
                Some(FsNode::Directory { .. }) => {}
                Some(FsNode::File { .. }) => return Err(FsError::NotADirectory),
                None => self.create_node(&current, NodeKind::Directory, "", owner, now)?,
            }
        }
        Ok(())
    }

    /// Replace a file's content, creating the file if it does not exist.
    pub fn write_file(
        &mut self,
        path: &str,
        content: &str,
        owner: &str,
        now: u64,
    ) -> Result<(), FsError> {
        match self.get_node_mut(path) {
            Some(FsNode::File {
                content: existing,
                meta,
            }) => {
                *existing = content.to_string();
                meta.modified = now;
                Ok(())
            }
            Some(FsNode::Directory { .. }) => Err(FsError::IsADirectory),
            None => self.create_node(path, NodeKind::File, content, owner, now),
        }
    }

    /// Append a line to a file, creating the file if it does not exist.
    ///
    /// Non-empty content is separated from the new text by a newline.
    pub fn append_file(
        &mut self,
        path: &str,
        text: &str,
        owner: &str,
        now: u64,
    ) -> Result<(), FsError> {
        match self.get_node_mut(path) {
            Some(FsNode::File { content, meta }) => {
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(text);
                meta.modified = now;
                Ok(())
            }
            Some(FsNode::Directory { .. }) => Err(FsError::IsADirectory),
            None => self.create_node(path, NodeKind::File, text, owner, now),
        }
    }

    /// Refresh the modification time of an existing node, or create an empty file.
    pub fn touch(&mut self, path: &str, owner: &str, now: u64) -> Result<(), FsError> {
        match self.get_node_mut(path) {
            Some(node) => {
                node.meta_mut().modified = now;
                Ok(())
            }
            None => self.create_node(path, NodeKind::File, "", owner, now),
        }
    }

    /// Remove a node and its whole subtree.
    pub fn delete_node(&mut self, path: &str) -> Result<(), FsError> {
        let (children, name) = self.parent_children_mut(path)?;
        children.remove(name).map(|_| ()).ok_or(FsError::NotFound)
    }

    /// Path a copy of `src` would land at for destination `dst`.
    ///
    /// An existing directory destination receives the source under its own
    /// base name; any other destination is the literal target path. A
    /// directory never replaces an existing file.
    pub fn copy_target(&self, src: &str, dst: &str) -> Result<String, FsError> {
        let source = self.get_node(src).ok_or(FsError::NotFound)?;
        let base = path::base_name(src).ok_or(FsError::InvalidPath)?;

        let target = if self.is_directory(dst) {
            path::join(&path::normalize(dst), base)
        } else {
            path::normalize(dst)
        };

        if base_name_is_dot(&target) {
            return Err(FsError::InvalidPath);
        }
        if target == path::normalize(src) {
            return Err(FsError::SameFile);
        }
        if source.is_directory() && path::is_within(&target, src) {
            return Err(FsError::IntoItself);
        }
        match (source.is_directory(), self.get_node(&target)) {
            (true, Some(FsNode::File { .. })) => Err(FsError::NotADirectory),
            (false, Some(FsNode::Directory { .. })) => Err(FsError::IsADirectory),
            _ => Ok(target),
        }
    }

    /// Deep-copy `src` to `dst`, returning the path of the copy.
    ///
    /// Every copied node gets `modified = now`; `created` is preserved.
    /// An existing file at the target is overwritten by a file source.
    pub fn copy_node(&mut self, src: &str, dst: &str, now: u64) -> Result<String, FsError> {
        let target = self.copy_target(src, dst)?;
        let copy = self
            .get_node(src)
            .ok_or(FsError::NotFound)?
            .clone_refreshed(now);
        let (children, name) = self.parent_children_mut(&target)?;
        children.insert(name.to_string(), copy);
        Ok(target)
    }

    /// Move `src` to `dst`: a copy followed by deleting the source.
    ///
    /// Not atomic. If the delete fails after the copy succeeded, both paths
    /// hold equivalent nodes and the delete error is returned.
    pub fn move_node(&mut self, src: &str, dst: &str, now: u64) -> Result<String, FsError> {
        let target = self.copy_node(src, dst, now)?;
        self.delete_node(src)?;
        Ok(target)
    }

    /// Store a new permission string on a node.
    ///
    /// The check is inverted: a canonical `rwxr-xr-x`-style string is
    /// rejected and any other string is stored as-is.
    pub fn change_permissions(&mut self, path: &str, mode: &str) -> Result<(), FsError> {
        let node = self.get_node_mut(path).ok_or(FsError::NotFound)?;
        if is_canonical_mode(mode) {
            return Err(FsError::InvalidMode(mode.to_string()));
        }
        node.meta_mut().permissions = mode.to_string();
        Ok(())
    }

    /// Change the owner of a single node.
    pub fn set_owner(&mut self, path: &str, owner: &str) -> Result<(), FsError> {
        let node = self.get_node_mut(path).ok_or(FsError::NotFound)?;
        node.meta_mut().owner = owner.to_string();
        Ok(())
    }

    /// List directory contents sorted by name.
    ///
    /// Returns `None` if the path is missing or is a file.
    pub fn list_dir(&self, path: &str) -> Option<Vec<DirEntry>> {
        let children = self.get_node(path)?.children()?;
        Some(
            children
                .iter()
                .map(|(name, node)| DirEntry {
                    name: name.clone(),
                    is_dir: node.is_directory(),
                    size: node.display_size(),
                    meta: node.meta().clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_fs() -> VirtualFs {
        let mut fs = VirtualFs::empty(1);
        fs.create_dir_all("/home/ubuntu/docs", "ubuntu", 1).unwrap();
        fs.create_node(
            "/home/ubuntu/notes.txt",
            NodeKind::File,
            "one\ntwo",
            "ubuntu",
            1,
        )
        .unwrap();
        fs.create_node("/home/ubuntu/docs/a.md", NodeKind::File, "a", "ubuntu", 1)
            .unwrap();
        fs.create_node("/home/ubuntu/.hidden", NodeKind::File, "", "ubuntu", 1)
            .unwrap();
        fs
    }

    #[test]
    fn test_get_node() {
        let fs = create_test_fs();
        assert!(fs.get_node("/").is_some_and(FsNode::is_directory));
        assert!(fs.is_directory("/home/ubuntu/docs"));
        assert!(fs.is_directory("/home/ubuntu/docs/"));
        assert_eq!(
            fs.get_node("/home/ubuntu/notes.txt").and_then(FsNode::content),
            Some("one\ntwo")
        );
    }

    #[test]
    fn test_get_node_through_file() {
        let fs = create_test_fs();
        assert!(fs.get_node("/home/ubuntu/notes.txt/x").is_none());
        assert!(fs.get_node("/nope/x").is_none());
    }

    #[test]
    fn test_create_then_get() {
        let mut fs = create_test_fs();
        fs.create_node("/home/ubuntu/new.txt", NodeKind::File, "", "ubuntu", 2)
            .unwrap();
        let node = fs.get_node("/home/ubuntu/new.txt").unwrap();
        assert_eq!(node.content(), Some(""));
        assert_eq!(node.meta().owner, "ubuntu");
        assert_eq!(node.meta().permissions, "rw-r--r--");

        assert_eq!(
            fs.create_node("/home/ubuntu/new.txt", NodeKind::Directory, "", "ubuntu", 3),
            Err(FsError::AlreadyExists)
        );
    }

    #[test]
    fn test_create_failures() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.create_node("/missing/file", NodeKind::File, "", "root", 1),
            Err(FsError::NotFound)
        );
        assert_eq!(
            fs.create_node("/home/ubuntu/notes.txt/x", NodeKind::File, "", "root", 1),
            Err(FsError::NotADirectory)
        );
        assert_eq!(
            fs.create_node("/", NodeKind::Directory, "", "root", 1),
            Err(FsError::AlreadyExists)
        );
    }

    #[test]
    fn test_create_rejects_dot_names() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.create_node("/tmp/..", NodeKind::Directory, "", "root", 1),
            Err(FsError::NotFound)
        );
        fs.create_dir_all("/tmp", "root", 1).unwrap();
        for name in ["/tmp/..", "/tmp/."] {
            assert_eq!(
                fs.create_node(name, NodeKind::Directory, "", "root", 1),
                Err(FsError::InvalidPath)
            );
        }
        assert_eq!(
            fs.create_dir_all("/tmp/..", "root", 1),
            Err(FsError::InvalidPath)
        );
        assert!(fs.list_dir("/tmp").unwrap().is_empty());
    }

    #[test]
    fn test_copy_directory_onto_file_rejected() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.copy_node("/home/ubuntu/docs", "/home/ubuntu/notes.txt", 2),
            Err(FsError::NotADirectory)
        );
        assert_eq!(
            fs.get_node("/home/ubuntu/notes.txt").and_then(FsNode::content),
            Some("one\ntwo")
        );
        assert_eq!(
            fs.copy_node("/home/ubuntu/notes.txt", "/home/ubuntu/..", 2),
            Err(FsError::InvalidPath)
        );
    }

    #[test]
    fn test_create_dir_all_through_file() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.create_dir_all("/home/ubuntu/notes.txt/sub", "root", 1),
            Err(FsError::NotADirectory)
        );
        assert!(fs.create_dir_all("/home/ubuntu/docs", "root", 1).is_ok());
    }

    #[test]
    fn test_delete_removes_only_named_entry() {
        let mut fs = create_test_fs();
        fs.delete_node("/home/ubuntu/notes.txt").unwrap();

        let names: Vec<_> = fs
            .list_dir("/home/ubuntu")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec![".hidden", "docs"]);
    }

    #[test]
    fn test_delete_is_recursive() {
        let mut fs = create_test_fs();
        fs.delete_node("/home").unwrap();
        assert!(fs.get_node("/home/ubuntu/docs/a.md").is_none());
        assert_eq!(fs.delete_node("/home"), Err(FsError::NotFound));
        assert_eq!(fs.delete_node("/"), Err(FsError::InvalidPath));
    }

    #[test]
    fn test_write_and_append() {
        let mut fs = create_test_fs();
        fs.write_file("/tmp.txt", "hello", "ubuntu", 5).unwrap();
        fs.append_file("/tmp.txt", "world", "ubuntu", 6).unwrap();
        let node = fs.get_node("/tmp.txt").unwrap();
        assert_eq!(node.content(), Some("hello\nworld"));
        assert_eq!(node.meta().modified, 6);

        fs.append_file("/fresh.txt", "first", "ubuntu", 7).unwrap();
        let fresh = fs.get_node("/fresh.txt").unwrap();
        assert_eq!(fresh.content(), Some("first"));

        assert_eq!(
            fs.write_file("/home", "x", "ubuntu", 8),
            Err(FsError::IsADirectory)
        );
    }

    #[test]
    fn test_touch_existing_refreshes() {
        let mut fs = create_test_fs();
        fs.touch("/home/ubuntu/notes.txt", "ubuntu", 42).unwrap();
        let node = fs.get_node("/home/ubuntu/notes.txt").unwrap();
        assert_eq!(node.meta().modified, 42);
        assert_eq!(node.meta().created, 1);
        assert_eq!(node.content(), Some("one\ntwo"));
    }

    #[test]
    fn test_copy_into_directory_keeps_base_name() {
        let mut fs = create_test_fs();
        let target = fs
            .copy_node("/home/ubuntu/notes.txt", "/home/ubuntu/docs", 9)
            .unwrap();
        assert_eq!(target, "/home/ubuntu/docs/notes.txt");
        assert!(fs.get_node("/home/ubuntu/docs/notes.txt").is_some());
        assert!(fs.get_node("/home/ubuntu/notes.txt").is_some());
    }

    #[test]
    fn test_copy_to_literal_path() {
        let mut fs = create_test_fs();
        fs.copy_node("/home/ubuntu/notes.txt", "/home/ubuntu/copy.txt", 9)
            .unwrap();
        assert_eq!(
            fs.get_node("/home/ubuntu/copy.txt").and_then(FsNode::content),
            Some("one\ntwo")
        );
        assert_eq!(
            fs.copy_node("/home/ubuntu/notes.txt", "/missing/copy.txt", 9),
            Err(FsError::NotFound)
        );
    }

    #[test]
    fn test_copy_directory_deep_clone() {
        let mut fs = create_test_fs();
        fs.copy_node("/home/ubuntu/docs", "/backup", 50).unwrap();

        let dir = fs.get_node("/backup").unwrap();
        assert_eq!(dir.meta().created, 1);
        assert_eq!(dir.meta().modified, 50);
        let child = fs.get_node("/backup/a.md").unwrap();
        assert_eq!(child.meta().created, 1);
        assert_eq!(child.meta().modified, 50);

        // original untouched
        let original = fs.get_node("/home/ubuntu/docs/a.md").unwrap();
        assert_eq!(original.meta().modified, 1);
    }

    #[test]
    fn test_copy_rejects_self_and_subtree() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.copy_node("/home/ubuntu/notes.txt", "/home/ubuntu/notes.txt", 2),
            Err(FsError::SameFile)
        );
        assert_eq!(
            fs.copy_node("/home/ubuntu", "/home/ubuntu/docs", 2),
            Err(FsError::IntoItself)
        );
        assert_eq!(fs.copy_node("/", "/tmp", 2), Err(FsError::InvalidPath));
    }

    #[test]
    fn test_move_node() {
        let mut fs = create_test_fs();
        fs.move_node("/home/ubuntu/notes.txt", "/home/ubuntu/docs", 3)
            .unwrap();
        assert!(fs.get_node("/home/ubuntu/notes.txt").is_none());
        assert!(fs.get_node("/home/ubuntu/docs/notes.txt").is_some());

        fs.move_node("/home/ubuntu/docs", "/home/ubuntu/papers", 4)
            .unwrap();
        assert!(fs.is_directory("/home/ubuntu/papers"));
        assert!(fs.get_node("/home/ubuntu/papers/a.md").is_some());
    }

    #[test]
    fn test_move_missing_source() {
        let mut fs = create_test_fs();
        let before = fs.clone();
        assert_eq!(fs.move_node("/nope", "/tmp", 1), Err(FsError::NotFound));
        assert_eq!(fs, before);
    }

    #[test]
    fn test_change_permissions_inverted_check() {
        let mut fs = create_test_fs();
        assert_eq!(
            fs.change_permissions("/home/ubuntu/notes.txt", "rwxr-xr-x"),
            Err(FsError::InvalidMode("rwxr-xr-x".to_string()))
        );
        fs.change_permissions("/home/ubuntu/notes.txt", "755").unwrap();
        assert_eq!(
            fs.get_node("/home/ubuntu/notes.txt").unwrap().meta().permissions,
            "755"
        );
        assert_eq!(
            fs.change_permissions("/nope", "755"),
            Err(FsError::NotFound)
        );
    }

    #[test]
    fn test_is_canonical_mode() {
        assert!(is_canonical_mode("rw-r--r--"));
        assert!(is_canonical_mode("---------"));
        assert!(!is_canonical_mode("rwxrwxrw"));
        assert!(!is_canonical_mode("xwrxwrxwr"));
        assert!(!is_canonical_mode("u+x"));
    }

    #[test]
    fn test_list_dir() {
        let fs = create_test_fs();
        let entries = fs.list_dir("/home/ubuntu").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".hidden", "docs", "notes.txt"]);
        assert!(entries[1].is_dir);
        assert_eq!(entries[2].size, 7);
        assert!(fs.list_dir("/home/ubuntu/notes.txt").is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let fs = create_test_fs();
        let json = serde_json::to_string(&fs).unwrap();
        let back: VirtualFs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fs);
    }
}
