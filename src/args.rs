use clap::Parser;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

use crate::pattern::SearchPattern;
use crate::scanner::WalkOptions;

/// Invalid or missing command line input; nothing on disk is touched
#[derive(Debug, Clone, PartialEq)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\ntry using --help", self.0)
    }
}

impl std::error::Error for UsageError {}

fn usage(msg: impl Into<String>) -> anyhow::Error {
    UsageError(msg.into()).into()
}

/// Command line arguments parser
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Find a string in the files of a directory and replace it in place")]
#[command(name = "fnr")]
pub struct Args {
    /// String to search for
    #[arg(short = 'f', long = "findstr", value_name = "FIND")]
    pub findstr: Option<String>,

    /// String to replace every match with
    #[arg(short = 'r', long = "replacestr", value_name = "REPLACE")]
    pub replacestr: Option<String>,

    /// Directory to scan
    #[arg(short = 'd', long = "directory", default_value = ".")]
    pub directory: PathBuf,

    /// Treat FIND as a regular expression; REPLACE may use $1 / ${name}
    #[arg(long = "regex")]
    pub regex: bool,

    /// Descend into subdirectories
    #[arg(short = 'R', long = "recursive")]
    pub recursive: bool,

    /// Include hidden (dot) files
    #[arg(long = "hidden")]
    pub hidden: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validated settings for one run
#[derive(Debug)]
pub struct Config {
    /// The search term as typed by the user
    pub findstr: String,

    /// Compiled search pattern
    pub pattern: SearchPattern,

    /// Replacement term
    pub replacement: String,

    /// Which files the scanner visits
    pub walk: WalkOptions,

    pub verbose: bool,
}

/// Parse command line arguments and validate them
///
/// # Returns
/// * `Result<Config>` - Validated configuration, or a `UsageError`
pub fn parse() -> Result<Config> {
    validate_args(Args::parse())
}

/// Validate command line arguments and compile the search pattern
///
/// # Arguments
/// * `args` - Raw command line arguments
///
/// # Returns
/// * `Result<Config>` - Ok if valid, `UsageError` otherwise
pub fn validate_args(args: Args) -> Result<Config> {
    // Missing and empty values are rejected the same way
    let findstr = match args.findstr {
        Some(s) if !s.is_empty() => s,
        _ => return Err(usage("Missing or empty --findstr")),
    };

    let replacement = match args.replacestr {
        Some(s) if !s.is_empty() => s,
        _ => return Err(usage("Missing or empty --replacestr")),
    };

    let pattern = if args.regex {
        SearchPattern::regex(&findstr)
    } else {
        SearchPattern::literal(&findstr)
    }
    .map_err(|e| usage(e.to_string()))?;

    if !args.directory.is_dir() {
        return Err(usage(format!("Not a directory: {}", args.directory.display())));
    }

    Ok(Config {
        findstr,
        pattern,
        replacement,
        walk: WalkOptions {
            recursive: args.recursive,
            hidden: args.hidden,
            ..WalkOptions::new(args.directory)
        },
        verbose: args.verbose,
    })
}
