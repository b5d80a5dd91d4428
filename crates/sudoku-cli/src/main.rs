//! Command-line harness over the sudoku engine: generate puzzles, solve
//! board strings, rate difficulty.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use sudoku_engine::{Board, Builder, SolveOutcome, Solver};

#[derive(Parser)]
#[command(name = "sudoku", about = "Generate and solve 9x9 sudoku puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate puzzles with their solutions and statistics
    Generate {
        /// Number of puzzles to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// Percentage of cells to show (0-100)
        #[arg(long, default_value_t = 35)]
        show_ratio: u32,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Emit one JSON object per puzzle instead of text
        #[arg(long)]
        json: bool,
        /// Print framed boards instead of 81-character lines
        #[arg(long)]
        pretty: bool,
    },
    /// Solve a board given as an 81-character string (digits are clues,
    /// anything else is an empty cell)
    Solve {
        board: String,
        /// Print a framed board instead of an 81-character line
        #[arg(long)]
        pretty: bool,
    },
    /// Rate the difficulty of a board string
    Rate { board: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            count,
            show_ratio,
            seed,
            json,
            pretty,
        } => generate(count, show_ratio, seed, json, pretty),
        Command::Solve { board, pretty } => solve(&board, pretty),
        Command::Rate { board } => rate(&board),
    }
}

fn generate(count: u32, show_ratio: u32, seed: Option<u64>, json: bool, pretty: bool) -> ExitCode {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let builder = Builder::with_show_ratio(show_ratio);

    for i in 0..count {
        let generated = match builder.build(&mut rng) {
            Ok(generated) => generated,
            Err(e) => {
                eprintln!("generation failed: {}", e);
                return ExitCode::FAILURE;
            }
        };

        if json {
            match serde_json::to_string(&generated) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("serialization failed: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            if count > 1 {
                println!("# puzzle {}", i + 1);
            }
            if pretty {
                print!("{}", Board::from_line(&generated.puzzle).pretty());
            } else {
                println!("puzzle:   [{}]", generated.puzzle);
            }
            println!("solution: [{}]", generated.solution);
            println!(
                "difficulty: {} (build tries {}, mask tries {})",
                generated.difficulty, generated.build_tries, generated.solve_tries
            );
        }
    }
    ExitCode::SUCCESS
}

fn solve(line: &str, pretty: bool) -> ExitCode {
    let board = Board::from_line(line);
    let report = Solver::new().solve(&board);
    match report.outcome {
        SolveOutcome::Solved(solved) => {
            if pretty {
                print!("{}", solved.pretty());
            } else {
                println!("[{}]", solved);
            }
            println!("difficulty: {}", report.difficulty);
            ExitCode::SUCCESS
        }
        SolveOutcome::Unsolved {
            best,
            made_progress,
        } => {
            eprintln!(
                "unsolved: reached {} of 81 cells ({})",
                best.coverage(),
                if made_progress {
                    "partial progress"
                } else {
                    "no progress at all"
                }
            );
            ExitCode::FAILURE
        }
    }
}

fn rate(line: &str) -> ExitCode {
    let report = Solver::new().solve(&Board::from_line(line));
    if report.solved_board().is_some() {
        println!("{}", report.difficulty);
        ExitCode::SUCCESS
    } else {
        println!("{}", report.difficulty.label());
        ExitCode::FAILURE
    }
}
