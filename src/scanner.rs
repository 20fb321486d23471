use crate::pattern::SearchPattern;
use anyhow::{Result, Context, bail};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which entries of a directory are scanned
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Directory to start from
    pub root: PathBuf,

    /// Descend into subdirectories instead of scanning the top level only
    pub recursive: bool,

    /// Include dot files and dot directories
    pub hidden: bool,
}

impl WalkOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            hidden: false,
        }
    }
}

/// Find every file under the root whose content matches the pattern
///
/// Unreadable and binary files are skipped, never reported as errors.
///
/// # Arguments
/// * `pattern` - Pattern to look for
/// * `opts` - Root directory and walk options
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Matching files, sorted and without duplicates
pub fn find_matches(pattern: &SearchPattern, opts: &WalkOptions) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(&opts.root)
        .with_context(|| format!("Failed to read directory: {:?}", opts.root))?;
    if !meta.is_dir() {
        bail!("Not a directory: {:?}", opts.root);
    }

    let mut matches = Vec::new();

    for path in candidate_files(opts) {
        match read_text(&path) {
            Ok(Some(content)) => {
                if pattern.is_match(&content) {
                    debug!(path = %path.display(), "match found");
                    matches.push(path);
                }
            },
            Ok(None) => {
                debug!(path = %path.display(), "skipping binary file");
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
            },
        }
    }

    matches.sort();
    matches.dedup();
    Ok(matches)
}

/// List the regular files the walk options select
///
/// # Arguments
/// * `opts` - Root directory and walk options
///
/// # Returns
/// * `Vec<PathBuf>` - Regular files; symlinks and directories are left out
fn candidate_files(opts: &WalkOptions) -> Vec<PathBuf> {
    // A plain shell glob: no ignore files, dot files only on request
    let walker = WalkBuilder::new(&opts.root)
        .standard_filters(false)
        .hidden(!opts.hidden)
        .max_depth(if opts.recursive { None } else { Some(1) })
        .build();

    let mut files = Vec::new();

    for result in walker {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            },
            Err(err) => {
                warn!(error = %err, "error walking directory");
            }
        }
    }

    files
}

/// Read a file as text
///
/// # Returns
/// * `Ok(Some(String))` - The content, if it is UTF-8 without NUL bytes
/// * `Ok(None)` - The file looks binary
/// * `Err` - The file could not be read
pub fn read_text(path: &Path) -> std::io::Result<Option<String>> {
    let bytes = fs::read(path)?;
    if bytes.contains(&0) {
        return Ok(None);
    }
    Ok(String::from_utf8(bytes).ok())
}
