use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use pddlpatch::cli::{Cli, Command};
use pddlpatch::config::Config;
use pddlpatch::{FailureReport, PatchError, StatePatcher};
use plantrace::{Source, TraceParser, WorldState, parse_plan_steps};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match run(cli.command, &config) {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("Ending process.");
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn run(command: Command, config: &Config) -> Result<(), PatchError> {
    match command {
        Command::States { trace, index } => {
            let parser = TraceParser::new(config.trace.clone());
            let parsed = parser.parse_trace(&Source::file(&trace))?;
            if !parsed.warnings.is_empty() {
                warn!("Skipped {} malformed lines", parsed.warnings.len());
            }
            match index {
                Some(index) => print_state(index, parser.state_at(&parsed.trace, index)?),
                None => {
                    for (index, state) in parsed.trace.iter().enumerate() {
                        print_state(index, state);
                    }
                }
            }
        }
        Command::Plan { solution, raw } => {
            let parser = TraceParser::new(config.trace.clone());
            let body = parser.extract_plan(&Source::file(&solution))?;
            if raw {
                println!("{}", body.trim());
            } else {
                for step in parse_plan_steps(&body) {
                    println!("{:>4}: {}", step.number.to_string().dimmed(), step.action);
                }
            }
        }
        Command::Show { problem } => {
            let patcher = StatePatcher::open(&problem, config)?;
            patcher.print_current_state()?;
        }
        Command::FromTrace {
            problem,
            trace,
            index,
            output,
        } => {
            let mut patcher = StatePatcher::open(&problem, config)?;
            let report = patcher.patch_from_trace(&Source::file(&trace), index)?;
            println!(
                "{} Merged {} literals ({} closed-world negatives) from state {}",
                "✓".green(),
                report.literals,
                report.negated,
                report.state_index
            );
            finish(&patcher, output.as_deref())?;
        }
        Command::FromFacts {
            problem,
            output,
            facts,
        } => {
            let mut patcher = StatePatcher::open(&problem, config)?;
            patcher.patch_from_facts(&facts)?;
            finish(&patcher, output.as_deref())?;
        }
        Command::Restart {
            problem,
            trace,
            index,
            output,
            facts,
        } => {
            let mut patcher = StatePatcher::open(&problem, config)?;
            patcher.patch_from_trace_then_facts(index, &Source::file(&trace), &facts)?;
            finish(&patcher, output.as_deref())?;
        }
        Command::Replace {
            problem,
            symbol,
            output,
            facts,
        } => {
            let mut patcher = StatePatcher::open(&problem, config)?;
            let purged = patcher.patch_with_replacement(&symbol, &facts)?;
            println!("{} Replaced {} facts about '{}'", "✓".green(), purged, symbol.cyan());
            finish(&patcher, output.as_deref())?;
        }
        Command::Replan {
            problem,
            trace,
            report,
            output,
        } => {
            let report = FailureReport::load(&report)?;
            let mut patcher = StatePatcher::open(&problem, config)?;
            patcher.replan(&Source::file(&trace), &report)?;
            finish(&patcher, output.as_deref())?;
        }
    }

    Ok(())
}

fn print_state(index: usize, state: &dyn WorldState) {
    println!("{} {}", "State".yellow(), index.to_string().cyan());
    for prop in state.literals() {
        println!("  {}", prop);
    }
}

/// Write the patched problem if an output path was given, otherwise print the init block
fn finish(patcher: &StatePatcher, output: Option<&Path>) -> Result<(), PatchError> {
    match output {
        Some(path) => {
            patcher.serialize_current_state(path)?;
            println!("{} Wrote patched problem to {}", "✓".green(), path.display());
        }
        None => patcher.print_current_state()?,
    }
    Ok(())
}
