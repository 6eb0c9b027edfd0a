mod flow;
mod prompt;

use anyhow::Result;
use clap::Parser;
use flow::{run, Outcome, OutputFormat, RunSettings};
use log::LevelFilter;
use prompt::TerminalPrompt;
use seqrename_core::{default_probe, validate_template, RenameMode};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "seqrename-cli")]
#[command(about = "Renames the images in a folder to 001.jpg, 002.jpg, ... or to a placeholder pattern")]
struct Cli {
    /// Folder to rename in; asked interactively when omitted
    #[arg(long)]
    dir: Option<PathBuf>,
    /// e.g. "{datetime}_{camera}_{counter}"; keeps each file's extension
    #[arg(long)]
    pattern: Option<String>,
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let mode = match cli.pattern {
        Some(pattern) => {
            validate_template(&pattern)?;
            RenameMode::Pattern(pattern)
        }
        None => RenameMode::Sequential,
    };

    let settings = RunSettings {
        dir: cli.dir,
        mode,
        assume_yes: cli.yes,
        dry_run: cli.dry_run,
        output: cli.output,
    };

    let probe = default_probe();
    let mut stdout = io::stdout();
    // Keeps stdout a single parseable document in JSON mode.
    let mut status: Box<dyn Write> = match settings.output {
        OutputFormat::Json => Box::new(io::stderr()),
        OutputFormat::Table => Box::new(io::stdout()),
    };
    let outcome = run(
        &settings,
        &mut TerminalPrompt::new(),
        &mut stdout,
        &mut status,
        probe.as_ref(),
    )?;
    if let Outcome::Completed(result) = outcome {
        log::debug!(
            "batch finished: renamed={} skipped={}",
            result.renamed,
            result.skipped
        );
    }
    Ok(())
}
