use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};

// =============================================================================
// Node Metadata
// =============================================================================

/// Ownership, permissions and timestamps shared by files and directories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Owning username
    pub owner: String,
    /// Cosmetic 9-character permission string (not enforced)
    pub permissions: String,
    /// Creation time as Unix timestamp
    pub created: u64,
    /// Last modification time as Unix timestamp
    pub modified: u64,
}

// =============================================================================
// Node Kind
// =============================================================================

/// Kind of node requested from [`crate::core::VirtualFs::create_node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    /// Permission string a new node of this kind starts with.
    pub fn default_permissions(self) -> &'static str {
        match self {
            Self::File => DEFAULT_FILE_PERMISSIONS,
            Self::Directory => DEFAULT_DIR_PERMISSIONS,
        }
    }
}

// =============================================================================
// Filesystem Node
// =============================================================================

/// A single entry in the virtual filesystem tree.
///
/// Files carry text content and never have children; directories always
/// carry a (possibly empty) child map keyed by unique names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FsNode {
    File {
        content: String,
        #[serde(flatten)]
        meta: NodeMeta,
    },
    Directory {
        children: BTreeMap<String, FsNode>,
        #[serde(flatten)]
        meta: NodeMeta,
    },
}

impl FsNode {
    /// Create an empty node of the given kind with default permissions.
    pub fn new(kind: NodeKind, content: impl Into<String>, owner: &str, now: u64) -> Self {
        let meta = NodeMeta {
            owner: owner.to_string(),
            permissions: kind.default_permissions().to_string(),
            created: now,
            modified: now,
        };
        match kind {
            NodeKind::File => Self::File {
                content: content.into(),
                meta,
            },
            NodeKind::Directory => Self::Directory {
                children: BTreeMap::new(),
                meta,
            },
        }
    }

    /// Create a file node.
    pub fn file(content: impl Into<String>, owner: &str, now: u64) -> Self {
        Self::new(NodeKind::File, content, owner, now)
    }

    /// Create an empty directory node.
    pub fn directory(owner: &str, now: u64) -> Self {
        Self::new(NodeKind::Directory, "", owner, now)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            Self::File { meta, .. } | Self::Directory { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Self::File { meta, .. } | Self::Directory { meta, .. } => meta,
        }
    }

    /// File content, or `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    /// Child map, or `None` for files.
    pub fn children(&self) -> Option<&BTreeMap<String, FsNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, FsNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    /// Size shown by `ls -l`: content bytes for files, 4096 for directories.
    pub fn display_size(&self) -> u64 {
        match self {
            Self::File { content, .. } => content.len() as u64,
            Self::Directory { .. } => 4096,
        }
    }

    /// Deep clone of this subtree with every `modified` set to `now`.
    ///
    /// `created` timestamps are kept from the original nodes.
    pub fn clone_refreshed(&self, now: u64) -> Self {
        let mut meta = self.meta().clone();
        meta.modified = now;
        match self {
            Self::File { content, .. } => Self::File {
                content: content.clone(),
                meta,
            },
            Self::Directory { children, .. } => Self::Directory {
                children: children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.clone_refreshed(now)))
                    .collect(),
                meta,
            },
        }
    }
}

// =============================================================================
// Directory Listing
// =============================================================================

/// Directory entry returned by [`crate::core::VirtualFs::list_dir`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub meta: NodeMeta,
}

impl DirEntry {
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Permission column for `ls -l` (type flag + stored string).
    pub fn mode_string(&self) -> String {
        format!(
            "{}{}",
            if self.is_dir { 'd' } else { '-' },
            self.meta.permissions
        )
    }
}
