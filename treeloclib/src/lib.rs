//! # treeloclib
//!
//! An ignore-aware directory-tree line counter. Walks a project directory,
//! counts lines in text files, aggregates totals per directory, and renders
//! a weighted breakdown of where the code mass lives.
//!
//! ## Overview
//!
//! Unlike flat LOC counters, the scan preserves the directory hierarchy:
//! every directory node carries the total of its subtree, and the report
//! lists contributors sorted by weight with their share of the parent.
//!
//! - **Ignore-aware**: honors `.gitignore`-style rules, inherited from every
//!   directory down its own subtree (root-anchored `/build`, directory-only
//!   `logs/`, single-segment wildcards `*.log`). `.git` is always skipped.
//! - **Resilient**: a file that cannot be decoded counts as zero lines; a
//!   missing ignore file means no extra rules. Only an invalid scan root is
//!   an error.
//! - **Pure data out**: the scan returns a [`DirNode`] tree; rendering
//!   produces a `String` with no I/O side effects.
//!
//! ## Example
//!
//! ```rust
//! use treeloclib::{render_report, scan_tree, ScanOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Set up a small project
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("src")).unwrap();
//! fs::write(dir.path().join("src/main.rs"), "fn main() {\n    println!(\"Hi\");\n}\n").unwrap();
//! fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();
//!
//! // Scan and aggregate
//! let tree = scan_tree(dir.path(), &ScanOptions::new()).unwrap();
//! assert_eq!(tree.lines, 3);
//! assert_eq!(tree.file_count, 1);
//!
//! // Render the weighted report
//! let report = render_report(&tree);
//! assert!(report.contains("src: 3 lines (100%)"));
//! assert!(report.ends_with("Total 3 lines\n"));
//! ```

pub mod error;
pub mod ignore;
pub mod report;
pub mod scanner;
pub mod tree;

pub use error::TreelocError;
pub use ignore::{is_excluded, IgnoreRule, IgnoreSet, IGNORE_FILE};
pub use report::render_report;
pub use scanner::{
    estimate_file_count, scan_tree, scan_tree_with_progress, ScanOptions, ScanProgress,
};
pub use tree::{DirNode, FileNode, TreeNode};

/// Result type for treeloclib operations
pub type Result<T> = std::result::Result<T, TreelocError>;
