//! # `griddy`
//!
//! A solver for pencil puzzles as shared through puzz.link style URLs: [Masyu](https://en.wikipedia.org/wiki/Masyu), Simple
//! Loop and [Nurikabe](https://en.wikipedia.org/wiki/Nurikabe_(puzzle)).
//! Begin with a [`PuzzleData`] record, usually from [`PuzzleData::from_url`] or a [`PuzzleSource`], and turn it into a
//! [`Puzzle`] with [`Puzzle::new`] or a [`PuzzleBuilder`]. Then call [`solve()`](Puzzle::solve), and optionally
//! [`check_unique()`](Puzzle::check_unique) to find out whether the solution is the only one.
//!
//! # Internals
//! Every puzzle is expressed as a Boolean satisfiability problem (a "SAT") over a grid of cells, each taking exactly one
//! symbol out of a [`SymbolSet`](symbol::SymbolSet): loop segments for the loop genres, shaded and unshaded for Nurikabe.
//!
//! A high level overview is as follows:
//!
//! 1. A genre decodes its payload into sparse clues, keyed by cell.
//! 2. The grid allocates one variable per cell and symbol, with exactly one true per cell.
//! 3. Structural constrainers add the global shape rules that plain local clauses cannot state.
//!    The [loop constrainer](loops::LoopConstrainer) forces the segments into a single closed loop by numbering the loop's
//!    cells along their order from a root cell.
//!    The [region constrainer](regions::RegionConstrainer) partitions the grid into trees of parent links, with region ids,
//!    sizes and depths as order-encoded integers.
//! 4. The genre adds its clue rules on top.
//!
//! We then solve and read the grid back from the model. Uniqueness is checked by excluding the solution found and solving
//! again.

pub use board::{Puzzle, Report, Solution, SolveOptions, Uniqueness, Verdict};
pub use builder::{PuzzleBuilder, PuzzleError};
pub use genre::{DecodeError, Genre, Givens};
pub use location::Point;
pub use solver::SolverFailure;
pub use source::{FileDataSource, Payload, PuzzleData, PuzzleSource, UrlSource};

mod board;
mod builder;
pub mod check;
pub mod genre;
pub mod grid;
pub mod lattice;
pub mod location;
pub(crate) mod logic;
pub mod loops;
pub mod regions;
pub mod shape;
pub mod solver;
pub mod source;
pub mod symbol;
mod tests;
