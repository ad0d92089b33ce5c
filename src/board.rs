use std::fmt::{Display, Formatter};
use std::time::Duration;

use itertools::Itertools;
use ndarray::Array2;
use tracing::info;

use crate::builder::{PuzzleBuilder, PuzzleError};
use crate::genre::Givens;
use crate::grid::SymbolGrid;
use crate::lattice::Lattice;
use crate::location::Point;
use crate::loops::LoopConstrainer;
use crate::regions::{RegionConstrainer, RegionRecord};
use crate::solver::{SatSolver, SolveOutcome, SolverFailure};
use crate::source::{PuzzleData, PuzzleSource};
use crate::symbol::{SymbolId, SymbolSet};

/// How to run a [`Puzzle`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolveOptions {
    /// Upper bound for each satisfiability check.
    pub timeout: Duration,
    /// Whether to look for a second solution after finding one.
    pub check_unique: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), check_unique: false }
    }
}

/// The result of looking for a solution.
#[derive(Clone, Debug)]
pub enum Verdict {
    Solved(Solution),
    NoSolution,
    /// The check ran out of time before deciding either way.
    TimedOut,
}

/// The result of looking for a second solution.
#[derive(Clone, Debug)]
pub enum Uniqueness {
    Unique,
    /// Some other solution exists; there may be more.
    Alternate(Solution),
    /// The check ran out of time.
    Undetermined,
}

/// Everything [`Puzzle::run`] found out.
#[derive(Clone, Debug)]
pub struct Report {
    pub verdict: Verdict,
    /// Present when uniqueness was requested and a first solution was found.
    pub uniqueness: Option<Uniqueness>,
}

/// A decoded, fully constrained puzzle, ready to solve.
///
/// Build one with [`Puzzle::new`], [`Puzzle::fetch`] or a [`PuzzleBuilder`]. Solving never repeats decoding or constraint
/// building: [`Self::check_unique`] only adds one clause to the constraints [`Self::solve`] already checked.
pub struct Puzzle {
    grid: SymbolGrid,
    solver: SatSolver,
    layers: Vec<Givens>,
    loops: Option<LoopConstrainer>,
    regions: Option<RegionConstrainer>,
}

impl Puzzle {
    /// Build a puzzle out of `layers`, see [`PuzzleBuilder::build`].
    pub fn new(layers: Vec<PuzzleData>) -> Result<Self, PuzzleError> {
        PuzzleBuilder::from(layers).build()
    }

    /// Ask `source` for the puzzle at `url` and build it.
    pub fn fetch<S: PuzzleSource>(source: &mut S, url: &str) -> Result<Self, PuzzleError> {
        let layers = source.fetch(url).map_err(|err| PuzzleError::Source(Box::new(err)))?;
        Self::new(layers)
    }

    pub(crate) fn from_parts(
        grid: SymbolGrid,
        solver: SatSolver,
        layers: Vec<Givens>,
        loops: Option<LoopConstrainer>,
        regions: Option<RegionConstrainer>,
    ) -> Self {
        Self { grid, solver, layers, loops, regions }
    }

    pub fn lattice(&self) -> &Lattice {
        self.grid.lattice()
    }

    pub fn symbols(&self) -> &SymbolSet {
        self.grid.symbols()
    }

    /// The decoded clues of each layer, in layer order.
    pub fn layers(&self) -> &[Givens] {
        &self.layers
    }

    pub fn solver(&self) -> &SatSolver {
        &self.solver
    }

    /// Look for a solution, giving up after `timeout`.
    ///
    /// A check that times out leaves its worker thread searching in the background, holding a copy of the constraints
    /// until it ends. [`Self::stale_workers`] counts them.
    pub fn solve(&mut self, timeout: Duration) -> Result<Verdict, SolverFailure> {
        let verdict = match self.solver.solve(timeout)? {
            SolveOutcome::Sat => Verdict::Solved(self.solution()),
            SolveOutcome::Unsat => Verdict::NoSolution,
            SolveOutcome::Unknown => Verdict::TimedOut,
        };
        info!(verdict = verdict.name(), "solved puzzle");
        Ok(verdict)
    }

    /// Exclude the solution just found and look for another.
    ///
    /// Timing out leaves a worker behind, as with [`Self::solve`].
    ///
    /// # Panics
    /// If the last [`Self::solve`] or [`Self::check_unique`] did not find a solution.
    pub fn check_unique(&mut self, timeout: Duration) -> Result<Uniqueness, SolverFailure> {
        self.solver.block_current_model();
        let uniqueness = match self.solver.solve(timeout)? {
            SolveOutcome::Sat => Uniqueness::Alternate(self.solution()),
            SolveOutcome::Unsat => Uniqueness::Unique,
            SolveOutcome::Unknown => Uniqueness::Undetermined,
        };
        info!(unique = matches!(uniqueness, Uniqueness::Unique), "checked uniqueness");
        Ok(uniqueness)
    }

    /// Workers from timed out checks of this puzzle that have not finished yet.
    pub fn stale_workers(&mut self) -> usize {
        self.solver.stale_workers()
    }

    /// Solve, then check uniqueness if `options` ask for it and a solution was found.
    pub fn run(&mut self, options: &SolveOptions) -> Result<Report, SolverFailure> {
        let verdict = self.solve(options.timeout)?;
        let uniqueness = match (&verdict, options.check_unique) {
            (Verdict::Solved(_), true) => Some(self.check_unique(options.timeout)?),
            _ => None,
        };
        Ok(Report { verdict, uniqueness })
    }

    fn solution(&self) -> Solution {
        let model = self.solver.model();
        let cells = self.grid.solved(model);
        let rendered = Array2::from_shape_fn(cells.raw_dim(), |index| {
            let point = Point::from(index);
            let symbol = cells[index];
            self.layers.iter()
                .find_map(|layer| layer.print_override(point, symbol))
                .or_else(|| self.symbols().get(symbol).map(|symbol| symbol.label().to_owned()))
                .unwrap_or_default()
        });

        Solution {
            lattice: self.lattice().clone(),
            symbols: self.symbols().clone(),
            cells,
            rendered,
            loop_orders: self.loops.as_ref().map(|loops| loops.orders(model)),
            regions: self.regions.as_ref().map(|regions| regions.records(model)),
            declared_sizes: self.regions.as_ref()
                .map(|regions| regions.declared_sizes().to_vec())
                .unwrap_or_default(),
        }
    }
}

impl Verdict {
    fn name(&self) -> &'static str {
        match self {
            Verdict::Solved(_) => "solved",
            Verdict::NoSolution => "no solution",
            Verdict::TimedOut => "timed out",
        }
    }
}

/// A solved assignment: one symbol per cell, plus the loop and region data behind it.
///
/// Displays as one line per row, each cell printed as a layer's override for it or else its symbol's label.
#[derive(Clone, Debug)]
pub struct Solution {
    lattice: Lattice,
    symbols: SymbolSet,
    cells: Array2<SymbolId>,
    rendered: Array2<String>,
    loop_orders: Option<Vec<Option<usize>>>,
    regions: Option<Vec<RegionRecord>>,
    declared_sizes: Vec<(Point, usize)>,
}

impl Solution {
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn symbol_at(&self, point: Point) -> SymbolId {
        self.cells[point.as_index()]
    }

    /// The name of the symbol at `point`.
    pub fn name_at(&self, point: Point) -> &str {
        self.symbols.get(self.symbol_at(point)).map(|symbol| symbol.name()).unwrap_or_default()
    }

    /// Loop order per cell in scan order, [`None`] off the loop. Absent unless some layer draws a loop.
    pub fn loop_orders(&self) -> Option<&[Option<usize>]> {
        self.loop_orders.as_deref()
    }

    /// Region data per cell in scan order. Absent unless some layer partitions the grid.
    pub fn regions(&self) -> Option<&[RegionRecord]> {
        self.regions.as_deref()
    }

    /// Region sizes fixed by clues, by root.
    pub fn declared_sizes(&self) -> &[(Point, usize)] {
        &self.declared_sizes
    }

    /// The printed rows, without line breaks.
    pub fn rows(&self) -> Vec<String> {
        self.rendered.rows()
            .into_iter()
            .map(|row| row.iter().join(""))
            .collect_vec()
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
