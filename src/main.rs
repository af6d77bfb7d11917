//! Main entry point for the vsixfeed CLI application.
//!
//! Walks an extension gallery directory tree and writes the aggregated
//! atom.xml feed at its root. Any error is printed to standard output and
//! the process still exits with the conventional success code; tooling that
//! scripts around this generator relies on that behavior.

use anyhow::Result;
use clap::Parser;
use std::env;

use vsixfeed::cli::{self, Cli};
use vsixfeed::feed::AtomFeed;

fn main() {
    // The help aliases (including the legacy "/?" form) are recognized only
    // as the first argument, before regular parsing.
    if let Some(first) = env::args().nth(1)
        && cli::is_help_flag(&first)
    {
        cli::print_usage();
        return;
    }

    if let Err(e) = run() {
        println!("{e:?}");
    }
}

fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders its own message for parse errors and --version;
            // either way the exit code stays conventional.
            let _ = e.print();
            return Ok(());
        }
    };

    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir()?,
    };

    AtomFeed::new(root).generate()
}
