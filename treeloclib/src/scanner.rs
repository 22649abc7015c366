//! Filtered directory walk and line-count aggregation.
//!
//! The walk is depth-first and single-threaded: at each directory it loads
//! that directory's ignore rules, pushes them onto the inherited chain,
//! filters the children, counts lines of included files, and sums totals on
//! the way back up. Ignore files and the `.git` directory are never counted.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::TreelocError;
use crate::ignore::{self, IgnoreSet, IGNORE_FILE};
use crate::tree::{DirNode, FileNode, TreeNode};
use crate::Result;

/// Options controlling a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Exclusion fragments supplied on invocation, additive to ignore-file
    /// rules. A fragment starting with `/` is a prefix match on the
    /// root-relative path; anything else is a substring match.
    pub excludes: Vec<String>,
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclusion fragment.
    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.excludes.push(fragment.into());
        self
    }

    /// Whether a root-relative path (`/`-joined) is excluded by the
    /// invocation fragments.
    fn excludes_path(&self, rel: &str) -> bool {
        self.excludes.iter().any(|fragment| {
            if let Some(prefix) = fragment.strip_prefix('/') {
                rel.starts_with(prefix)
            } else {
                rel.contains(fragment.as_str())
            }
        })
    }
}

/// Running counters for a scan in progress.
///
/// Threaded through the walk and handed to the caller's callback; never
/// process-wide state, so concurrent scans cannot interfere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanProgress {
    /// Files counted so far.
    pub files_found: u64,
    /// Directories entered so far.
    pub dirs_visited: u64,
}

/// Scan `root` and build the aggregated tree.
///
/// # Example
///
/// ```rust,ignore
/// use treeloclib::{scan_tree, ScanOptions};
///
/// let tree = scan_tree(".", &ScanOptions::new())?;
/// println!("{} lines in {} files", tree.lines, tree.file_count);
/// ```
pub fn scan_tree(root: impl AsRef<Path>, options: &ScanOptions) -> Result<DirNode> {
    scan_tree_with_progress(root, options, |_| {})
}

/// Scan `root`, invoking `on_progress` after every counted file.
pub fn scan_tree_with_progress(
    root: impl AsRef<Path>,
    options: &ScanOptions,
    mut on_progress: impl FnMut(&ScanProgress),
) -> Result<DirNode> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(TreelocError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(TreelocError::NotADirectory(root.to_path_buf()));
    }
    // An unreadable root is as fatal as a missing one; deeper directories
    // degrade instead.
    fs::read_dir(root)?;

    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string());

    let mut chain = Vec::new();
    let mut segments = Vec::new();
    let mut progress = ScanProgress::default();

    Ok(walk(
        root,
        name,
        &mut segments,
        &mut chain,
        options,
        &mut progress,
        &mut on_progress,
    ))
}

/// Recurse into one directory, returning its aggregated node.
#[allow(clippy::too_many_arguments)]
fn walk(
    dir: &Path,
    name: String,
    segments: &mut Vec<String>,
    chain: &mut Vec<IgnoreSet>,
    options: &ScanOptions,
    progress: &mut ScanProgress,
    on_progress: &mut dyn FnMut(&ScanProgress),
) -> DirNode {
    progress.dirs_visited += 1;
    chain.push(IgnoreSet::load(dir, segments.len()));

    // An unreadable directory degrades to an empty subtree; only the scan
    // root is fatal.
    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(iter) => iter.filter_map(|entry| entry.ok()).collect(),
        Err(_) => Vec::new(),
    };
    // Name order keeps repeated scans and sort tie-breaking deterministic.
    entries.sort_by_key(|entry| entry.file_name());

    let mut children = Vec::new();
    for entry in entries {
        let child_name = entry.file_name().to_string_lossy().into_owned();
        if child_name == IGNORE_FILE {
            continue;
        }
        segments.push(child_name.clone());

        let segs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let excluded =
            options.excludes_path(&segs.join("/")) || ignore::is_excluded(&segs, chain);

        if !excluded {
            let path = entry.path();
            if path.is_file() {
                progress.files_found += 1;
                let lines = count_lines(&path);
                children.push(TreeNode::File(FileNode {
                    name: child_name,
                    path,
                    lines,
                }));
                on_progress(progress);
            } else if path.is_dir() {
                let sub = walk(
                    &path, child_name, segments, chain, options, progress, on_progress,
                );
                // A subtree without a single counted file carries no signal.
                if sub.file_count > 0 {
                    children.push(TreeNode::Dir(sub));
                }
            }
        }
        segments.pop();
    }

    chain.pop();
    DirNode::from_children(name, dir.to_path_buf(), children)
}

/// Count line records in a file.
///
/// A trailing unterminated line counts as one. Files that cannot be read or
/// decoded as UTF-8 count as zero; a single bad file never aborts the scan.
fn count_lines(path: &Path) -> u64 {
    match fs::read(path) {
        Ok(bytes) => match std::str::from_utf8(&bytes) {
            Ok(text) => text.lines().count() as u64,
            Err(_) => 0,
        },
        Err(_) => 0,
    }
}

/// Rough file total for progress displays: a flat sweep of everything under
/// `root`, before any ignore rule is applied.
pub fn estimate_file_count(root: impl AsRef<Path>) -> u64 {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn find<'a>(dir: &'a DirNode, name: &str) -> Option<&'a TreeNode> {
        dir.children.iter().find(|child| child.name() == name)
    }

    #[test]
    fn test_total_is_sum_of_file_counts() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a/x.txt"), "1\n2\n3\n");
        write_file(&temp.path().join("a/y.txt"), "1\n");
        write_file(&temp.path().join("top.txt"), "1\n2\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 6);
        assert_eq!(tree.file_count, 3);
        let a = find(&tree, "a").unwrap();
        assert_eq!(a.lines(), 4);
    }

    #[test]
    fn test_unterminated_trailing_line_counts() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("f.txt"), "one\ntwo");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 2);
    }

    #[test]
    fn test_undecodable_file_counts_zero() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("blob.dat"), [0xff, 0xfe, b'\n']).unwrap();
        write_file(&temp.path().join("ok.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 1);
        // The bad file is still a counted file, just a zero contributor.
        assert_eq!(tree.file_count, 2);
    }

    #[test]
    fn test_root_gitignore_excludes_subtree() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "b/\n");
        write_file(&temp.path().join("a/x.txt"), "1\n2\n3\n");
        write_file(&temp.path().join("b/z.txt"), "1\n2\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 3);
        assert!(find(&tree, "b").is_none());
    }

    #[test]
    fn test_ignore_file_itself_is_not_counted() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "b/\n");
        write_file(&temp.path().join("a.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 1);
        assert_eq!(tree.file_count, 1);
    }

    #[test]
    fn test_nested_gitignore_scoped_to_its_directory() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("sub/.gitignore"), "*.txt\n");
        write_file(&temp.path().join("sub/skipped.txt"), "1\n2\n");
        write_file(&temp.path().join("sub/kept.md"), "1\n");
        write_file(&temp.path().join("sibling/kept.txt"), "1\n2\n3\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        // The nested rule binds below "sub" only; the sibling survives.
        assert_eq!(tree.lines, 4);
        let sub = find(&tree, "sub").unwrap();
        assert_eq!(sub.lines(), 1);
    }

    #[test]
    fn test_anchored_rule_spares_nested_namesakes() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "/build\n");
        write_file(&temp.path().join("build/out.txt"), "1\n");
        write_file(&temp.path().join("sub/build/out.txt"), "1\n2\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert!(find(&tree, "build").is_none());
        assert_eq!(tree.lines, 2);
    }

    #[test]
    fn test_unanchored_rule_excludes_at_any_depth() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "build\n");
        write_file(&temp.path().join("build/out.txt"), "1\n");
        write_file(&temp.path().join("sub/build/out.txt"), "1\n2\n");
        write_file(&temp.path().join("sub/src.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 1);
        assert!(find(&tree, "build").is_none());
    }

    #[test]
    fn test_dir_only_rule_spares_file_of_same_name() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "logs/\n");
        write_file(&temp.path().join("logs"), "1\n2\n");
        write_file(&temp.path().join("sub/logs/trace.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        // The file named "logs" survives; the directory's contents do not.
        assert_eq!(tree.lines, 2);
        assert!(find(&tree, "logs").is_some());
        assert!(find(&tree, "sub").is_none());
    }

    #[test]
    fn test_git_dir_always_skipped() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".git/HEAD"), "ref: refs/heads/main\n");
        write_file(&temp.path().join("a.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.lines, 1);
        assert!(find(&tree, ".git").is_none());
    }

    #[test]
    fn test_empty_directories_are_omitted() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("empty/deeper")).unwrap();
        write_file(&temp.path().join("a.txt"), "1\n");

        let tree = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(tree.children.len(), 1);
        assert!(find(&tree, "empty").is_none());
    }

    #[test]
    fn test_exclude_fragment_substring() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("cache/data.txt"), "1\n2\n");
        write_file(&temp.path().join("src/cache.txt"), "1\n");
        write_file(&temp.path().join("src/main.txt"), "1\n");

        let options = ScanOptions::new().exclude("cache");
        let tree = scan_tree(temp.path(), &options).unwrap();

        // Substring fragments hit every path containing the fragment.
        assert_eq!(tree.lines, 1);
    }

    #[test]
    fn test_exclude_fragment_prefix_anchors_to_root() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("venv/lib.txt"), "1\n2\n");
        write_file(&temp.path().join("sub/venv/lib.txt"), "1\n");

        let options = ScanOptions::new().exclude("/venv");
        let tree = scan_tree(temp.path(), &options).unwrap();

        // A leading '/' anchors the fragment to the scan root.
        assert_eq!(tree.lines, 1);
        assert!(find(&tree, "venv").is_none());
        assert!(find(&tree, "sub").is_some());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = scan_tree("/nonexistent/path", &ScanOptions::new());
        assert!(matches!(result, Err(TreelocError::PathNotFound(_))));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("f.txt");
        fs::write(&file, "1\n").unwrap();

        let result = scan_tree(&file, &ScanOptions::new());
        assert!(matches!(result, Err(TreelocError::NotADirectory(_))));
    }

    #[test]
    fn test_repeated_scans_are_identical() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a/x.txt"), "1\n2\n");
        write_file(&temp.path().join("b/y.txt"), "1\n2\n");

        let first = scan_tree(temp.path(), &ScanOptions::new()).unwrap();
        let second = scan_tree(temp.path(), &ScanOptions::new()).unwrap();

        assert_eq!(first.lines, second.lines);
        let first_names: Vec<_> = first.children.iter().map(TreeNode::name).collect();
        let second_names: Vec<_> = second.children.iter().map(TreeNode::name).collect();
        assert_eq!(first_names, second_names);
    }

    #[test]
    fn test_progress_counts_files() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.txt"), "1\n");
        write_file(&temp.path().join("sub/b.txt"), "1\n");

        let mut seen = 0;
        let mut last = 0;
        scan_tree_with_progress(temp.path(), &ScanOptions::new(), |progress| {
            seen += 1;
            last = progress.files_found;
        })
        .unwrap();

        assert_eq!(seen, 2);
        assert_eq!(last, 2);
    }

    #[test]
    fn test_estimate_file_count_sees_everything() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join(".gitignore"), "b/\n");
        write_file(&temp.path().join("a.txt"), "1\n");
        write_file(&temp.path().join("b/z.txt"), "1\n");

        // The estimate runs before filtering, so it counts all three.
        assert_eq!(estimate_file_count(temp.path()), 3);
    }
}
