use itertools::Itertools;
use ndarray::Array2;
use varisat::Lit;

use crate::lattice::Lattice;
use crate::location::Point;
use crate::solver::{Model, SatSolver};
use crate::symbol::{SymbolId, SymbolSet};

/// One symbol choice per lattice cell, one-hot encoded as primary variables.
pub struct SymbolGrid {
    lattice: Lattice,
    symbols: SymbolSet,
    // [row, col] -> one literal per symbol id
    cells: Array2<Vec<Lit>>,
}

impl SymbolGrid {
    /// Allocate the cell variables on `solver` and require every cell to take exactly one symbol.
    pub fn new(lattice: Lattice, symbols: SymbolSet, solver: &mut SatSolver) -> Self {
        let cells = Array2::from_shape_fn((lattice.height(), lattice.width()), |index| {
            let point = Point::from(index);
            symbols.iter()
                .map(|(_, symbol)| solver.alloc_bool(&format!("{}@{},{}", symbol.name(), point.row(), point.col())).positive())
                .collect_vec()
        });

        for choices in cells.iter() {
            solver.require_exactly_one(choices.clone());
        }

        Self { lattice, symbols, cells }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// The literal stating that `point` holds `symbol`.
    ///
    /// # Panics
    /// If `point` is off the lattice or `symbol` is not in this grid's set.
    pub fn cell_is(&self, point: Point, symbol: SymbolId) -> Lit {
        self.cells[point.as_index()][symbol]
    }

    /// Literals, any of which states that `point` holds one of `symbols`; ready to use as a clause.
    pub fn cell_is_one_of(&self, point: Point, symbols: &[SymbolId]) -> Vec<Lit> {
        symbols.iter().map(|symbol| self.cell_is(point, *symbol)).collect_vec()
    }

    /// The symbol each cell holds under `model`.
    pub fn solved(&self, model: &Model) -> Array2<SymbolId> {
        self.cells.map(|choices| choices.iter()
            .position(|lit| model.lit(*lit))
            .unwrap_or_default())
    }
}
