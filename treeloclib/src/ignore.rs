//! `.gitignore`-style exclusion rules, inherited down the directory tree.
//!
//! This implements the subset of ignore semantics needed for whole-directory
//! exclusion: root-anchored patterns (`/build`), directory-only patterns
//! (`logs/`), and single-segment wildcards (`*.log`) via [`glob::Pattern`].
//! Negation (`!pattern`) and cross-directory `**` globs are not supported;
//! once a path is excluded, nothing deeper can re-include it.
//!
//! Rules are always evaluated relative to the directory that defines them,
//! so a rule in a nested ignore file never affects siblings or ancestors of
//! that directory.

use std::fs;
use std::path::Path;

use glob::Pattern;

use crate::error::TreelocError;
use crate::Result;

/// Name of the ignore file loaded from each scanned directory.
pub const IGNORE_FILE: &str = ".gitignore";

/// A single parsed exclusion rule.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// Compiled pattern, one per path segment.
    segments: Vec<Pattern>,
    /// Applies only relative to the defining directory, not at every depth.
    root_anchored: bool,
    /// Matches directory entries only, never a same-named file.
    dir_only: bool,
}

impl IgnoreRule {
    /// Compile a single pattern string into a rule.
    ///
    /// A leading `/` or an interior `/` anchors the rule to its defining
    /// directory; a trailing `/` restricts it to directories.
    pub fn compile(pattern: &str) -> Result<IgnoreRule> {
        let dir_only = pattern.ends_with('/');
        let bare = pattern.strip_prefix('/').unwrap_or(pattern);
        let bare = bare.strip_suffix('/').unwrap_or(bare);
        if bare.is_empty() {
            return Err(TreelocError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "empty pattern".to_string(),
            });
        }
        let root_anchored = pattern.starts_with('/') || bare.contains('/');

        let segments = bare
            .split('/')
            .map(|seg| {
                Pattern::new(seg).map_err(|e| TreelocError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IgnoreRule {
            segments,
            root_anchored,
            dir_only,
        })
    }

    /// Parse one ignore-file line.
    ///
    /// Blank lines and `#` comments yield `None`, as do patterns that fail
    /// to compile: a bad line in an ignore file is skipped, never fatal.
    pub fn parse(line: &str) -> Option<IgnoreRule> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        IgnoreRule::compile(line).ok()
    }

    /// Test the rule against a candidate's path segments, taken relative to
    /// the rule's defining directory.
    pub fn matches(&self, segments: &[&str]) -> bool {
        if self.root_anchored {
            if segments.len() < self.segments.len() {
                return false;
            }
            let lead = self
                .segments
                .iter()
                .zip(segments)
                .all(|(pat, seg)| pat.matches(seg));
            if !lead {
                return false;
            }
            // A directory-only rule names a directory, so the candidate must
            // reach below the matched prefix; a file sharing the name ends
            // exactly at it.
            !self.dir_only || segments.len() > self.segments.len()
        } else {
            // Unanchored rules are single-segment by construction.
            let pat = &self.segments[0];
            let end = if self.dir_only {
                // The leaf segment is the candidate itself, not one of its
                // parent directories.
                segments.len().saturating_sub(1)
            } else {
                segments.len()
            };
            segments[..end].iter().any(|seg| pat.matches(seg))
        }
    }
}

/// Ordered rules defined by one directory, tagged with that directory's
/// depth in segments below the scan root.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    depth: usize,
    rules: Vec<IgnoreRule>,
}

impl IgnoreSet {
    /// Load the ignore file sitting directly in `dir`.
    ///
    /// A missing or unreadable file yields an empty set; unparseable lines
    /// are skipped.
    pub fn load(dir: &Path, depth: usize) -> IgnoreSet {
        let mut rules = Vec::new();
        if let Ok(content) = fs::read_to_string(dir.join(IGNORE_FILE)) {
            rules.extend(content.lines().filter_map(IgnoreRule::parse));
        }
        IgnoreSet { depth, rules }
    }

    /// Build a set from already-parsed rules.
    pub fn from_rules(rules: Vec<IgnoreRule>, depth: usize) -> IgnoreSet {
        IgnoreSet { depth, rules }
    }

    /// True when the set carries no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule matches the candidate, whose `segments` are relative
    /// to the scan root.
    fn matches(&self, segments: &[&str]) -> bool {
        if self.depth >= segments.len() {
            return false;
        }
        let local = &segments[self.depth..];
        self.rules.iter().any(|rule| rule.matches(local))
    }
}

/// Decide whether a candidate path is excluded from the scan.
///
/// `segments` is the candidate's path relative to the scan root, one entry
/// per component. `sets` is the governing chain of ignore sets from the scan
/// root down to the candidate's immediate parent. The literal `.git`
/// directory is always excluded, independent of ignore-file content. The
/// first matching rule wins; absence of any match means included.
pub fn is_excluded(segments: &[&str], sets: &[IgnoreSet]) -> bool {
    if segments.iter().any(|seg| *seg == ".git") {
        return true;
    }
    sets.iter().any(|set| set.matches(segments))
}
