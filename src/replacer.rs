use crate::args::Config;
use crate::pattern::SearchPattern;
use crate::scanner;
use anyhow::{Result, Context, anyhow};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Result of rewriting one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was rewritten with this many substitutions
    Replaced { count: usize },

    /// Nothing matched any more; the file was left alone
    Unchanged,
}

/// What a run over the working set did
#[derive(Debug, Default)]
pub struct Summary {
    /// Files rewritten, in processing order
    pub replaced: Vec<PathBuf>,

    /// Total substitutions across all files
    pub substitutions: usize,

    /// Files that could not be processed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Replace every match in a file, in place
///
/// The new content goes to a temporary file next to the target, which then
/// takes over the target's permissions and is renamed over it.
///
/// # Arguments
/// * `path` - File to rewrite
/// * `pattern` - Pattern to replace
/// * `replacement` - The replacement string
///
/// # Returns
/// * `Result<Outcome>` - Number of substitutions, or `Unchanged` if nothing matched
pub fn replace_in_file(path: &Path, pattern: &SearchPattern, replacement: &str) -> Result<Outcome> {
    let content = match scanner::read_text(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?
    {
        Some(content) => content,
        None => return Ok(Outcome::Unchanged),
    };

    let (replaced, count) = pattern.replace_all(&content, replacement);
    if count == 0 {
        return Ok(Outcome::Unchanged);
    }

    write_atomic(path, replaced.as_bytes())?;

    Ok(Outcome::Replaced { count })
}

/// Write content to a path through a temporary file in the same directory
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let permissions = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {:?}", path))?
        .permissions();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    tmp.write_all(content)
        .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file for {:?}", path))?;
    tmp.as_file()
        .set_permissions(permissions)
        .with_context(|| format!("Failed to set permissions for {:?}", path))?;

    tmp.persist(path)
        .map_err(|e| anyhow!("Failed to write file: {:?}: {}", path, e.error))?;

    Ok(())
}

/// Run the replacer over every file of the working set
///
/// Prints one `Replaced <findstr> in <file>` line per rewritten file. A
/// failing file is reported on stderr and the rest are still processed.
///
/// # Arguments
/// * `files` - Working set, in the order it should be processed
/// * `config` - Validated run configuration
///
/// # Returns
/// * `Summary` - Replaced and failed files
pub fn replace_files(files: &[PathBuf], config: &Config) -> Summary {
    let mut summary = Summary::default();

    for file_path in files {
        let shown = display_path(file_path, &config.walk.root);

        match replace_in_file(file_path, &config.pattern, &config.replacement) {
            Ok(Outcome::Replaced { count }) => {
                info!(path = %shown.display(), count, "replaced");
                println!("Replaced {} in {}", config.findstr, shown.display());
                summary.replaced.push(file_path.clone());
                summary.substitutions += count;
            },
            Ok(Outcome::Unchanged) => {
                debug!(path = %shown.display(), "no longer matches, left unchanged");
            },
            Err(e) => {
                eprintln!("Error: {:#}", e);
                summary.failed.push((file_path.clone(), format!("{:#}", e)));
            },
        }
    }

    summary
}

/// Path relative to the scanned root, the way a shell glob would print it
fn display_path<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
