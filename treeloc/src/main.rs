//! # treeloc
//!
//! A CLI tool that reports where the lines live in a directory tree.
//!
//! ## Overview
//!
//! treeloc is built on top of treeloclib. It scans a directory, honoring
//! `.gitignore`-style rules found along the way, counts lines in every text
//! file, and prints a breakdown of directories and files sorted by how much
//! they contribute, each annotated with its share of the parent.
//!
//! ## Usage
//!
//! ```bash
//! # Report line counts under a project
//! treeloc ~/code/some-project
//!
//! # Exclude paths on top of the ignore files
//! treeloc . -e /venv -e __pycache__
//!
//! # Output the aggregated tree as JSON
//! treeloc . --output json
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use console::Term;
use treeloclib::{
    estimate_file_count, render_report, scan_tree_with_progress, ScanOptions, ScanProgress,
};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("treeloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Counts lines of text files in a directory tree, weighted per directory")
        .arg(
            Arg::new("path")
                .help("Directory to scan")
                .required(true),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Skip paths containing this fragment; a leading '/' anchors it to the root"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .help("Do not print the scan progress indicator"),
        )
}

fn run() -> anyhow::Result<()> {
    let matches = build_command().get_matches();

    let path = matches
        .get_one::<String>("path")
        .context("path argument is required")?;

    let mut options = ScanOptions::new();
    if let Some(fragments) = matches.get_many::<String>("exclude") {
        for fragment in fragments {
            options = options.exclude(fragment.clone());
        }
    }

    let term = Term::stdout();
    let show_progress = !matches.get_flag("no-progress") && term.is_term();

    // Flat pre-count so the indicator can show found/total.
    let total_files = if show_progress {
        estimate_file_count(path)
    } else {
        0
    };

    let tree = scan_tree_with_progress(path, &options, |progress: &ScanProgress| {
        if show_progress {
            let _ = term.clear_line();
            let _ = term.write_str(&format!(
                "Scanning... {}/{} files",
                progress.files_found, total_files
            ));
        }
    })?;

    if show_progress {
        term.clear_line()?;
    }

    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&tree)?),
        _ => print!("{}", render_report(&tree)),
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
