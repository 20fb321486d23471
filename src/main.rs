mod args;
mod pattern;
mod replacer;
mod scanner;

use anyhow::Result;
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit status when a file could not be processed or the run failed
const EXIT_FAILURE: i32 = 1;

/// Exit status for missing or invalid arguments
const EXIT_USAGE: i32 = 2;

/// Main entry point of the application
/// Handles argument parsing and executes the program with error handling
fn main() {
    let config = match args::parse() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            let code = if e.is::<args::UsageError>() { EXIT_USAGE } else { EXIT_FAILURE };
            process::exit(code);
        }
    };

    init_logging(config.verbose);

    match run(&config) {
        Ok(summary) if summary.has_failures() => process::exit(EXIT_FAILURE),
        Ok(_) => {},
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Send diagnostics to stderr; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Find the matching files, then rewrite each of them
///
/// # Arguments
/// * `config` - Validated command line configuration
fn run(config: &args::Config) -> Result<replacer::Summary> {
    let files = scanner::find_matches(&config.pattern, &config.walk)?;

    if files.is_empty() {
        eprintln!("No files contain {}", config.findstr);
        return Ok(replacer::Summary::default());
    }

    let summary = replacer::replace_files(&files, config);
    tracing::info!(
        files = summary.replaced.len(),
        substitutions = summary.substitutions,
        failed = summary.failed.len(),
        "done"
    );

    Ok(summary)
}
