use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use griddy::{PuzzleBuilder, PuzzleError, PuzzleSource, SolveOptions, Uniqueness, UrlSource, Verdict};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Solve a puzz.link or pzv.jp puzzle given by its URL.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Puzzle URL, ending in `<genre>/<width>/<height>/<payload>`.
    url: String,

    /// Time limit for each solver run, in milliseconds.
    #[arg(short, long, default_value_t = 30_000)]
    timeout: u64,

    /// Also report whether the solution found is the only one.
    #[arg(long = "check_unique")]
    check_unique: bool,

    /// Solve Masyu as Ura-Masyu, with the black and white pearl rules swapped.
    #[arg(long = "ura_masyu")]
    ura_masyu: bool,
}

const EXIT_TIMED_OUT: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let options = SolveOptions { timeout: Duration::from_millis(args.timeout), check_unique: args.check_unique };

    let built = UrlSource.fetch(&args.url)
        .map_err(|err| PuzzleError::Source(Box::new(err)))
        .and_then(|layers| PuzzleBuilder::from(layers).ura_masyu(args.ura_masyu).build());
    let mut puzzle = match built {
        Ok(puzzle) => puzzle,
        Err(PuzzleError::UnknownGenre(genre)) => {
            error!(%genre, "unknown genre");
            return ExitCode::from(1);
        }
        Err(err) => {
            error!(%err, "could not load puzzle");
            return ExitCode::FAILURE;
        }
    };

    let report = match puzzle.run(&options) {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "solver failed");
            return ExitCode::FAILURE;
        }
    };

    match report.verdict {
        Verdict::Solved(solution) => print!("{}", solution),
        Verdict::NoSolution => {
            println!("No solution");
            return ExitCode::SUCCESS;
        }
        Verdict::TimedOut => {
            println!("Timed out");
            return ExitCode::from(EXIT_TIMED_OUT);
        }
    }

    match report.uniqueness {
        Some(Uniqueness::Unique) => println!("Unique solution"),
        Some(Uniqueness::Alternate(_)) => println!("Alternate solution"),
        Some(Uniqueness::Undetermined) => {
            println!("Timed out checking uniqueness");
            return ExitCode::from(EXIT_TIMED_OUT);
        }
        None => {}
    }

    ExitCode::SUCCESS
}
