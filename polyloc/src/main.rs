//! # polyloc
//!
//! A CLI tool that counts lines of source code per language, honoring
//! nested `.gitignore` files along the way.
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory
//! polyloc
//!
//! # Count a specific tree, verbosely
//! polyloc path/to/repo -v
//!
//! # Output as JSON
//! polyloc . --output json
//!
//! # Extra exclude patterns on top of the defaults
//! polyloc . --exclude node_modules --exclude "*.min.js"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use polyloclib::{scan, ScanOptions};
use tracing_subscriber::EnvFilter;

mod render;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("polyloc")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Gitignore-aware polyglot line counter")
        .arg(
            Arg::new("path")
                .help("File or directory to scan (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log skipped files and subtrees to stderr"),
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
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .value_name("PATTERN")
                .help("Extra entry-name pattern to exclude (repeatable)"),
        )
        .arg(
            Arg::new("hidden")
                .long("hidden")
                .action(ArgAction::SetTrue)
                .help("Scan hidden files and directories (VCS metadata stays excluded)"),
        )
        .arg(
            Arg::new("follow-symlinks")
                .long("follow-symlinks")
                .action(ArgAction::SetTrue)
                .help("Follow symlinked directories"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_parser(clap::value_parser!(usize))
                .value_name("N")
                .help("Classification worker count (defaults to available parallelism)"),
        )
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "polyloclib=debug,polyloc=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Translate CLI matches into scan options.
fn scan_options(matches: &ArgMatches) -> ScanOptions {
    let mut options = ScanOptions::default();

    if matches.get_flag("hidden") {
        options = options
            .excludes(vec![".git".into(), ".svn".into(), ".hg".into()])
            .skip_hidden(false);
    }
    if let Some(patterns) = matches.get_many::<String>("exclude") {
        for pattern in patterns {
            options = options.exclude(pattern);
        }
    }
    if matches.get_flag("follow-symlinks") {
        options = options.follow_symlinks(true);
    }
    if let Some(jobs) = matches.get_one::<usize>("jobs") {
        options = options.workers(*jobs);
    }
    options
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = PathBuf::from(matches.get_one::<String>("path").expect("has default"));
    let options = scan_options(matches);

    let report = scan(&path, &options)
        .with_context(|| format!("failed to scan '{}'", path.display()))?;

    match matches
        .get_one::<String>("output")
        .expect("has default")
        .as_str()
    {
        "json" => println!("{}", render::render_json(&report)?),
        _ => print!("{}", render::render_table(&report)),
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_style = Style::new().red().bold();
            eprintln!("{} {:#}", error_style.apply_to("error:"), err);
            ExitCode::FAILURE
        }
    }
}
