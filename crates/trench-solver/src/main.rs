//! CLI entry point for the trench solver.
//!
//! Usage:
//!   trench-solver solve                    Solve the classic puzzle
//!   trench-solver solve <puzzle.json>      Solve a puzzle file
//!   trench-solver solve --stdin            Read the puzzle JSON from stdin
//!   trench-solver solve --cells "<13 ints>"
//!
//! Options:
//!   --algorithm <ucs|astar>  Search algorithm (default: ucs)
//!   --trace                  Print every expanded board to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use trench_solver::{
    solve_with_observer, Algorithm, Expansion, ExpansionObserver, NoopObserver, SolverConfig,
    SolverResult, State, TrenchConfig,
};

#[derive(Parser)]
#[command(name = "trench-solver")]
#[command(about = "Best-first solver for the nine men in a trench puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the shortest solution of a puzzle
    Solve {
        /// Path to puzzle JSON file ({"trench": [10 ints], "recesses": [3 ints]})
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Puzzle as 13 integers: the trench row then the recesses, 0 for blank
        #[arg(long, conflicts_with_all = ["file", "stdin"])]
        cells: Option<String>,

        /// Search algorithm
        #[arg(long, value_enum, default_value = "ucs")]
        algorithm: Algorithm,

        /// Print each expanded state and the running peak queue size to stderr
        #[arg(long)]
        trace: bool,
    },
}

/// Output format for a search result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    nodes_expanded: usize,
    max_frontier_size: usize,
    time_elapsed_ms: u64,
}

/// Prints progress in the board layout, one block per expansion.
struct TracePrinter {
    show_costs: bool,
}

impl ExpansionObserver for TracePrinter {
    fn on_expand(&mut self, expansion: &Expansion<'_>) {
        if self.show_costs && expansion.nodes_expanded > 0 {
            eprintln!(
                "The best state to expand with g(n) = {} and h(n) = {} is...",
                expansion.path_cost, expansion.heuristic
            );
        } else {
            eprintln!("Expanding state:");
        }
        eprintln!("{}", expansion.state);
    }

    fn on_frontier(&mut self, max_frontier_size: usize) {
        eprintln!("Queue size: {}", max_frontier_size);
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            cells,
            algorithm,
            trace,
        } => {
            let initial = read_initial_state(file, stdin, cells)?;
            let config = SolverConfig::with_algorithm(algorithm);

            let result = if trace {
                let mut printer = TracePrinter {
                    show_costs: algorithm.uses_heuristic(),
                };
                solve_with_observer(initial, &config, &mut printer)
            } else {
                solve_with_observer(initial, &config, &mut NoopObserver)
            };

            let output = format_result(algorithm, &result);
            println!("{}", serde_json::to_string_pretty(&output)?);

            // Exit with appropriate code
            Ok(if result.solved() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read_initial_state(
    file: Option<PathBuf>,
    stdin: bool,
    cells: Option<String>,
) -> anyhow::Result<State> {
    if let Some(cells) = cells {
        return cells
            .parse::<State>()
            .with_context(|| format!("invalid --cells value {cells:?}"));
    }

    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read puzzle from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        tracing::info!("no puzzle given, using the classic starting position");
        return Ok(State::DEFAULT_PUZZLE);
    };

    let config: TrenchConfig =
        serde_json::from_str(&json_content).context("failed to parse puzzle JSON")?;
    config.to_state().context("invalid puzzle")
}

fn format_result(algorithm: Algorithm, result: &SolverResult) -> SolveOutput {
    SolveOutput {
        solved: result.solved(),
        algorithm,
        depth: result.depth(),
        nodes_expanded: result.nodes_expanded,
        max_frontier_size: result.max_frontier_size,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}
