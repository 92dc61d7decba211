//! CLI argument parsing for pddlpatch

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pp")]
#[command(author, version, about = "Patch a PDDL problem's initial state from planner traces", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the states of a planner trace
    States {
        /// Planner output containing the state trace
        #[arg(required = true)]
        trace: PathBuf,

        /// Show only this state
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Print the plan found by the planner
    Plan {
        /// Planner solution output
        #[arg(required = true)]
        solution: PathBuf,

        /// Print the plan body as extracted, without parsing steps
        #[arg(long)]
        raw: bool,
    },

    /// Print the initial state of a problem
    Show {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,
    },

    /// Patch the initial state with a state from a planner trace
    FromTrace {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,

        /// Planner output containing the state trace
        #[arg(short, long)]
        trace: PathBuf,

        /// Trace index of the state to patch with (0 = before the first action)
        #[arg(short, long)]
        index: usize,

        /// Write the patched problem here instead of printing the initial state
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Patch the initial state with literal facts
    FromFacts {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,

        /// Write the patched problem here instead of printing the initial state
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Facts such as "(at robot room1)" or "(not (holding obj1))"
        #[arg(required = true)]
        facts: Vec<String>,
    },

    /// Reset to the original initial state, patch from a trace, then apply facts
    Restart {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,

        /// Planner output containing the state trace
        #[arg(short, long)]
        trace: PathBuf,

        /// Trace index of the state to patch with
        #[arg(short, long)]
        index: usize,

        /// Write the patched problem here instead of printing the initial state
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Facts applied after the trace state
        facts: Vec<String>,
    },

    /// Replace every fact about a symbol
    Replace {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,

        /// Predicate symbol whose facts are replaced
        #[arg(short, long)]
        symbol: String,

        /// Write the patched problem here instead of printing the initial state
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replacement facts
        facts: Vec<String>,
    },

    /// Patch from an execution failure report
    Replan {
        /// PDDL problem file
        #[arg(short, long)]
        problem: PathBuf,

        /// Planner output containing the state trace
        #[arg(short, long)]
        trace: PathBuf,

        /// Failure report: "linenumber: N" followed by observed facts
        #[arg(short, long)]
        report: PathBuf,

        /// Write the patched problem here instead of printing the initial state
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
