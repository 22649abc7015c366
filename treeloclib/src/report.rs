//! Rendering of the aggregated tree as a weighted text report.
//!
//! Each directory lists its nonzero contributors sorted by line count,
//! annotated with their share of the immediate parent. Rendering returns a
//! `String` so callers and tests can inspect it without capturing stdout.

use std::cmp::Reverse;

use crate::tree::{DirNode, TreeNode};

/// Render the hierarchical report for a completed scan.
///
/// The root shows `(100%)`; every other entry shows `floor(lines * 100 /
/// parent)`, with `(<1%)` standing in for nonzero contributors that would
/// floor to zero. A tree without any text lines reports `No text files
/// found` instead of a percentage table. A `Total N lines` summary closes
/// the report either way.
pub fn render_report(root: &DirNode) -> String {
    let mut out = String::new();
    if root.lines == 0 {
        out.push_str("No text files found\n");
    } else {
        render_dir(root, 0, None, &mut out);
    }
    out.push('\n');
    out.push_str(&format!("Total {} lines\n", root.lines));
    out
}

fn render_dir(dir: &DirNode, level: usize, parent_lines: Option<u64>, out: &mut String) {
    let indent = "    ".repeat(level);
    let share = match parent_lines {
        Some(parent) => percent_label(dir.lines, parent),
        None => "(100%)".to_string(),
    };
    out.push_str(&format!("{indent}{}: {} lines {share}\n", dir.name, dir.lines));

    let mut children: Vec<&TreeNode> = dir.children.iter().filter(|c| c.lines() > 0).collect();
    // Stable sort: ties keep enumeration order.
    children.sort_by_key(|child| Reverse(child.lines()));

    for child in children {
        match child {
            TreeNode::File(file) => {
                out.push_str(&format!(
                    "{indent}    {}: {} lines {}\n",
                    file.name,
                    file.lines,
                    percent_label(file.lines, dir.lines)
                ));
            }
            TreeNode::Dir(sub) => render_dir(sub, level + 1, Some(dir.lines), out),
        }
    }
}

/// Share of a parent total, floored to whole percent.
///
/// Callers only pass nonzero parents: the zero-total tree never reaches
/// percentage rendering.
fn percent_label(lines: u64, parent_lines: u64) -> String {
    let percent = lines * 100 / parent_lines;
    if percent == 0 {
        "(<1%)".to_string()
    } else {
        format!("({percent}%)")
    }
}
