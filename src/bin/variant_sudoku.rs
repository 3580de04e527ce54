use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use variant_sudoku::{Board, CancelToken, SolveConfig, cant_attempt, evaluate_warnings, solve};

#[derive(Parser)]
#[command(author, version, about = "Variant sudoku board-to-CNF compiler and solver")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feasibility gate against a board snapshot, without solving
    Check {
        /// Path to a board JSON file
        board: PathBuf,
    },
    /// Solve a board snapshot and print each solution found
    Solve {
        /// Path to a board JSON file
        board: PathBuf,
        /// Stop after this many solutions (default 2, enough to detect non-uniqueness)
        #[arg(short, long, default_value_t = 2)]
        max_solutions: usize,
    },
    /// Evaluate local constraint-violation warnings against a partial fill
    Warnings {
        /// Path to a board JSON file
        board: PathBuf,
        /// Path to a JSON object mapping cellIdx -> digit
        digits: PathBuf,
    },
}

fn load_board(path: &PathBuf) -> Result<Board> {
    let text = fs::read_to_string(path).with_context(|| format!("reading board file '{}'", path.display()))?;
    Board::from_json(&text).with_context(|| format!("parsing board file '{}'", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { board } => {
            let board = load_board(&board)?;
            match cant_attempt(&board) {
                Some(reason) => println!("Cannot attempt this board: {reason}"),
                None => println!("Board accepted."),
            }
        }
        Commands::Solve { board, max_solutions } => {
            let board = load_board(&board)?;
            if let Some(reason) = cant_attempt(&board) {
                println!("Cannot attempt this board: {reason}");
                return Ok(());
            }

            let config = SolveConfig {
                time_slice: Duration::from_millis(100),
                max_solutions,
            };
            let cancel = CancelToken::new();
            let mut count = 0usize;
            let completed = solve(
                &board,
                config,
                |event| match event {
                    Some(solution) => {
                        count += 1;
                        println!("--- Solution {count} ---");
                        print_solution(&board, &solution);
                    }
                    None => println!("Enumeration finished."),
                },
                &cancel,
            )?;

            if count == 0 {
                println!("No solutions found.");
            } else if !completed {
                println!("Cancelled after {count} solution(s).");
            }
        }
        Commands::Warnings { board, digits } => {
            let board = load_board(&board)?;
            let digits_text = fs::read_to_string(&digits)
                .with_context(|| format!("reading digits file '{}'", digits.display()))?;
            let digits: HashMap<usize, u8> = serde_json::from_str(&digits_text)
                .with_context(|| format!("parsing digits file '{}'", digits.display()))?;

            let flagged = evaluate_warnings(&board, &digits);
            let cells: Vec<usize> = flagged.ones().collect();
            if cells.is_empty() {
                println!("No warnings.");
            } else {
                println!("Flagged cells: {cells:?}");
            }
        }
    }

    Ok(())
}

fn print_solution(board: &Board, solution: &HashMap<usize, u8>) {
    let n = board.n();
    for row in 0..n {
        let line: String = (0..n)
            .map(|col| {
                solution
                    .get(&(row * n + col))
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| ".".to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
}
