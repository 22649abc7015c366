//! Tree nodes produced by a scan.
//!
//! The tree is built once during the walk and is read-only afterwards;
//! subtree totals are fixed when each node is constructed.

use serde::Serialize;
use std::path::PathBuf;

/// One counted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileNode {
    /// File name (final path component).
    pub name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Line count; a file that could not be decoded counts as zero.
    pub lines: u64,
}

/// One scanned directory and the children that survived filtering.
#[derive(Debug, Clone, Serialize)]
pub struct DirNode {
    /// Directory name (final path component).
    pub name: String,
    /// Full path of the directory.
    pub path: PathBuf,
    /// Total lines across the whole subtree.
    pub lines: u64,
    /// Number of counted files across the whole subtree.
    pub file_count: u64,
    /// Included children, in enumeration order.
    pub children: Vec<TreeNode>,
}

/// A directory entry: either a counted file or a nested directory.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Dir(DirNode),
    File(FileNode),
}

impl DirNode {
    /// Build a directory node from its included children, fixing the cached
    /// subtree totals.
    pub fn from_children(name: String, path: PathBuf, children: Vec<TreeNode>) -> DirNode {
        let lines = children.iter().map(TreeNode::lines).sum();
        let file_count = children.iter().map(TreeNode::file_count).sum();
        DirNode {
            name,
            path,
            lines,
            file_count,
            children,
        }
    }
}

impl TreeNode {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Dir(dir) => &dir.name,
            TreeNode::File(file) => &file.name,
        }
    }

    /// Lines contributed by this entry (subtree total for directories).
    pub fn lines(&self) -> u64 {
        match self {
            TreeNode::Dir(dir) => dir.lines,
            TreeNode::File(file) => file.lines,
        }
    }

    /// Counted files in this entry's subtree.
    pub fn file_count(&self) -> u64 {
        match self {
            TreeNode::Dir(dir) => dir.file_count,
            TreeNode::File(_) => 1,
        }
    }
}
