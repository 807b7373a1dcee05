//! autobump - Pin-aware package update publisher CLI tool
//!
//! Reads update proposals (one `<package> <old> <new>` per line), gates
//! each against the version pin encoded in the package's catalog name, and
//! publishes accepted bumps as version-control branches and pull requests.

use anyhow::Context;
use autobump::cli::CliArgs;
use autobump::orchestrator::Orchestrator;
use autobump::output::{create_formatter, OutputConfig};
use clap::Parser;
use std::io::{self, Read, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("autobump v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Catalog: {}", args.path.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let proposals_text = read_input(&args)?;

    let orchestrator = Orchestrator::new(args.clone());
    let result = orchestrator.run(&proposals_text);

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if args.verbose && !result.errors.is_empty() {
        eprintln!();
        eprintln!("Errors encountered:");
        for error in &result.errors {
            eprintln!("  - {}", error);
        }
    }

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Partial success - some proposals could not be processed
        Ok(ExitCode::from(2))
    }
}

/// Read proposal text from the input file, or stdin when none was given
fn read_input(args: &CliArgs) -> anyhow::Result<String> {
    match args.input {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
