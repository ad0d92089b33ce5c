use std::error::Error;
use std::num::NonZero;

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::board::Puzzle;
use crate::genre::{Context, DecodeError, Genre};
use crate::grid::SymbolGrid;
use crate::lattice::Lattice;
use crate::loops::LoopConstrainer;
use crate::solver::SatSolver;
use crate::source::PuzzleData;
use crate::symbol::SymbolSet;

/// Reasons a [`Puzzle`] cannot be built.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The builder was given no layers at all.
    #[error("no puzzle layers given")]
    NoLayers,
    /// No genre is registered under this alias.
    #[error("unknown genre {0:?}")]
    UnknownGenre(String),
    /// A puzzle needs at least one row and one column.
    #[error("puzzle dimensions must be nonzero, found {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    /// Layers disagree on the grid size, given in `(width, height)` order.
    #[error("layer is {found:?} but the puzzle is {expected:?}")]
    DimensionMismatch { expected: (usize, usize), found: (usize, usize) },
    /// A layer's payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// More than one layer partitions the grid into regions.
    #[error("only one layer may partition the grid into regions")]
    SharedRegions,
    /// The merged symbol set lacks symbols a genre's rules refer to.
    #[error("the puzzle's symbols lack {0}")]
    MissingSymbols(&'static str),
    /// The data source failed to produce puzzle records.
    #[error("could not fetch puzzle data")]
    Source(#[source] Box<dyn Error + Send + Sync>),
}

/// Assembles a [`Puzzle`] out of one or more [`PuzzleData`] layers over the same grid.
///
/// Layers are only inspected by [`Self::build`], which validates them all before any solver state exists.
#[derive(Clone, Debug, Default)]
pub struct PuzzleBuilder {
    layers: Vec<PuzzleData>,
    ura_masyu: bool,
}

impl From<Vec<PuzzleData>> for PuzzleBuilder {
    fn from(layers: Vec<PuzzleData>) -> Self {
        Self { layers, ura_masyu: false }
    }
}

impl PuzzleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer. Its rules apply on top of every layer added before it.
    pub fn add_layer(&mut self, layer: PuzzleData) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Swap the black and white pearl rules of every Masyu layer.
    pub fn ura_masyu(&mut self, swapped: bool) -> &mut Self {
        self.ura_masyu = swapped;
        self
    }

    /// Remove the most recently added layer, if any.
    pub fn pop_layer(&mut self) -> &mut Self {
        self.layers.pop();
        self
    }

    /// Decode every layer, allocate the shared grid and add every layer's rules.
    ///
    /// Genres and dimensions are checked first: an unknown alias or a dimension disagreement fails before any solver variable
    /// is allocated, as does more than one layer using regions. Symbol sets are merged by name in layer order, and every layer whose genre uses a loop shares one set of
    /// loop constraints.
    pub fn build(&self) -> Result<Puzzle, PuzzleError> {
        let first = self.layers.first().ok_or(PuzzleError::NoLayers)?;
        let genres = self.layers.iter()
            .map(|layer| Genre::from_alias(&layer.genre).ok_or_else(|| PuzzleError::UnknownGenre(layer.genre.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let (width, height) = (first.width, first.height);
        let (Some(nz_width), Some(nz_height)) = (NonZero::new(width), NonZero::new(height)) else {
            return Err(PuzzleError::ZeroDimension { width, height });
        };
        if let Some(layer) = self.layers.iter().find(|layer| (layer.width, layer.height) != (width, height)) {
            return Err(PuzzleError::DimensionMismatch { expected: (width, height), found: (layer.width, layer.height) });
        }
        if genres.iter().filter(|genre| genre.uses_regions()).count() > 1 {
            return Err(PuzzleError::SharedRegions);
        }

        let givens = self.layers.iter()
            .zip(genres.iter())
            .map(|(layer, genre)| genre.decode(layer))
            .collect::<Result<Vec<_>, _>>()?;

        let mut symbols = SymbolSet::default();
        for genre in &genres {
            symbols.merge(&genre.symbols());
        }

        let mut solver = SatSolver::new();
        let grid = SymbolGrid::new(Lattice::with_dims((nz_width, nz_height)), symbols, &mut solver);
        let mut loops = match genres.iter().any(Genre::uses_loop) {
            true => Some(LoopConstrainer::new(&grid, &mut solver).ok_or(PuzzleError::MissingSymbols("loop segment"))?),
            false => None,
        };
        let mut regions = None;

        for layer in &givens {
            let mut ctx = Context {
                grid: &grid,
                solver: &mut solver,
                loops: loops.as_mut(),
                regions: &mut regions,
                ura_masyu: self.ura_masyu,
            };
            layer.add_constraints(&mut ctx)?;
        }

        debug!(
            genres = ?genres.iter().map(Genre::name).collect_vec(),
            width,
            height,
            vars = solver.var_count(),
            clauses = solver.clause_count(),
            "built puzzle",
        );

        Ok(Puzzle::from_parts(grid, solver, givens, loops, regions))
    }
}
