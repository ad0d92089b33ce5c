use itertools::Itertools;
use strum::VariantArray;
use tracing::debug;
use varisat::Lit;

use crate::grid::SymbolGrid;
use crate::lattice::Lattice;
use crate::location::Point;
use crate::shape::Direction;
use crate::solver::{IntVar, Model, SatSolver, Term};
use crate::symbol::{SymbolId, SymbolSet};

/// Name of the symbol for a cell the loop does not visit.
pub const EMPTY: &str = "EMPTY";

/// The shape of the loop inside one cell, named by the two sides it leaves through.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum LoopSegment {
    NS,
    EW,
    NE,
    SE,
    SW,
    NW,
}

impl LoopSegment {
    pub const STRAIGHTS: &'static [Self] = &[Self::NS, Self::EW];
    pub const TURNS: &'static [Self] = &[Self::NE, Self::SE, Self::SW, Self::NW];

    pub fn exits(&self) -> [Direction; 2] {
        match self {
            Self::NS => [Direction::North, Direction::South],
            Self::EW => [Direction::East, Direction::West],
            Self::NE => [Direction::North, Direction::East],
            Self::SE => [Direction::South, Direction::East],
            Self::SW => [Direction::South, Direction::West],
            Self::NW => [Direction::North, Direction::West],
        }
    }

    pub fn exits_toward(&self, direction: Direction) -> bool {
        self.exits().contains(&direction)
    }

    /// The straight segment running along `direction`'s axis.
    pub fn straight_along(direction: Direction) -> Self {
        match direction.is_vertical() {
            true => Self::NS,
            false => Self::EW,
        }
    }

    pub fn name(&self) -> String {
        self.exits().iter().map(Direction::letter).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NS => "\u{2502}",
            Self::EW => "\u{2500}",
            Self::NE => "\u{2514}",
            Self::SE => "\u{250c}",
            Self::SW => "\u{2510}",
            Self::NW => "\u{2518}",
        }
    }

    /// The six segments plus [`EMPTY`], with `straights`, `turns` and `loop` subsets.
    pub fn symbols() -> SymbolSet {
        let mut set = SymbolSet::default();
        for segment in Self::VARIANTS {
            set.append(&segment.name(), segment.label());
        }
        set.append(EMPTY, " ");

        let names = |segments: &[Self]| segments.iter().map(Self::name).collect_vec();
        let (straights, turns, all) = (names(Self::STRAIGHTS), names(Self::TURNS), names(Self::VARIANTS));
        set.define_subset("straights", &straights.iter().map(String::as_str).collect_vec())
            .define_subset("turns", &turns.iter().map(String::as_str).collect_vec())
            .define_subset("loop", &all.iter().map(String::as_str).collect_vec());
        set
    }
}

/// Per-cell loop bookkeeping, indexed by scan order.
struct LoopCell {
    on_loop: Term,
    // -1 off the loop, otherwise the position along the loop counted from the root
    order: IntVar,
    root: Term,
}

/// Constrains a [`SymbolGrid`] holding [`LoopSegment`] symbols to draw exactly one closed loop.
///
/// # Logical setup
/// Segments must agree with their neighbors: a segment leaving a cell toward a neighbor requires the neighbor to have a
/// segment leaving back toward it, and no segment may leave the lattice. Together with its mirror image from the other cell
/// this also forbids a neighbor pointing at a cell that does not point back.
///
/// Agreement alone permits several disjoint loops. To rule them out, each cell carries an order integer: `-1` off the loop,
/// otherwise its distance along the loop from a single root cell of order 0. Every other loop cell picks exactly one
/// predecessor among the neighbors it connects to, whose order is one less, and no cell is predecessor to more than one
/// cell. Following predecessors strictly decreases the order and must end at the unique root, so the predecessor links form
/// a single path through every loop cell with orders `0, 1, ..., L - 1`; the loop closes from the last cell back to the
/// root. Adjacent connected cells therefore differ by exactly one modulo `L`.
pub struct LoopConstrainer {
    segments: [SymbolId; 6],
    empty: Option<SymbolId>,
    cells: Vec<LoopCell>,
    pinned: Option<Point>,
}

impl LoopConstrainer {
    /// Add single-loop constraints for `grid` to `solver`.
    ///
    /// Returns [`None`] if the grid's symbol set lacks any of the [`LoopSegment`] symbols.
    pub fn new(grid: &SymbolGrid, solver: &mut SatSolver) -> Option<Self> {
        let ids: [SymbolId; 6] = LoopSegment::VARIANTS.iter()
            .map(|segment| grid.symbols().index_of(&segment.name()))
            .collect::<Option<Vec<_>>>()?
            .try_into()
            .ok()?;
        let segments = LoopSegment::VARIANTS.iter().copied().zip(ids).collect_vec();
        let empty = grid.symbols().index_of(EMPTY);
        let lattice = grid.lattice();
        let last = lattice.len() as i64 - 1;

        let exiting = |point: Point, direction: Direction| segments.iter()
            .filter(|(segment, _)| segment.exits_toward(direction))
            .map(|(_, id)| grid.cell_is(point, *id))
            .collect_vec();

        for point in lattice.points() {
            for direction in Direction::VARIANTS {
                let neighbor = lattice.neighbor(point, *direction);
                for (segment, id) in &segments {
                    if !segment.exits_toward(*direction) {
                        continue;
                    }

                    let mut clause = vec![!grid.cell_is(point, *id)];
                    if let Some(neighbor) = neighbor {
                        // this segment leaving toward the neighbor requires the neighbor to leave back
                        clause.extend(exiting(neighbor, direction.invert()));
                    }
                    solver.add_formula(vec![clause]);
                }
            }
        }

        let mut cells = Vec::with_capacity(lattice.len());
        for point in lattice.points() {
            let on_loop = solver.define_or(&segments.iter()
                .map(|(_, id)| Term::Lit(grid.cell_is(point, *id)))
                .collect_vec());
            let order = solver.alloc_int(&format!("loop-order@{},{}", point.row(), point.col()), -1, last);
            // order is -1 exactly when the cell is off the loop
            solver.add_clause([on_loop, !order.at_least(0)]);
            solver.implies(&[on_loop], order.at_least(0));
            let root = solver.define_and(&[on_loop, order.at_most(0)]);
            cells.push(LoopCell { on_loop, order, root });
        }

        // exactly one cell has order 0
        let roots = cells.iter().filter_map(|cell| match cell.root {
            Term::Lit(lit) => Some(lit),
            _ => None,
        }).collect_vec();
        solver.require_exactly_one(roots);

        // predecessor choices, keyed by the chosen cell so each can be picked at most once
        let mut chosen_by: Vec<Vec<Lit>> = vec![Vec::new(); lattice.len()];
        for point in lattice.points() {
            let cell = &cells[lattice.index(point)];
            let mut choices = Vec::with_capacity(4);
            for (direction, neighbor) in lattice.neighbors(point) {
                let pred = solver.alloc_aux().positive();
                // the predecessor must be connected to this cell...
                solver.add_formula(vec![
                    std::iter::once(!pred).chain(exiting(point, direction)).collect_vec()
                ]);
                // ...and come one step earlier along the loop
                solver.require_int_offset(&[Term::Lit(pred)], &cell.order, &cells[lattice.index(neighbor)].order, 1);
                chosen_by[lattice.index(neighbor)].push(pred);
                choices.push(pred);
            }

            solver.require_at_most_one(&choices);
            // every loop cell but the root has a predecessor
            solver.add_clause([!cell.on_loop, cell.root].into_iter().chain(choices.into_iter().map(Term::Lit)));
        }

        for choosers in &chosen_by {
            solver.require_at_most_one(choosers);
        }

        debug!(cells = cells.len(), vars = solver.var_count(), clauses = solver.clause_count(), "added single loop constraints");

        Some(Self { segments: ids, empty, cells, pinned: None })
    }

    /// The symbol id of `segment` in the grid this constrainer was built for.
    pub fn segment(&self, segment: LoopSegment) -> SymbolId {
        self.segments[segment as usize]
    }

    pub fn segments_of(&self, segments: &[LoopSegment]) -> Vec<SymbolId> {
        segments.iter().map(|segment| self.segment(*segment)).collect_vec()
    }

    /// The [`EMPTY`] symbol id, if the grid has one.
    pub fn empty(&self) -> Option<SymbolId> {
        self.empty
    }

    /// The term stating the loop passes through `point`.
    pub fn on_loop(&self, lattice: &Lattice, point: Point) -> Term {
        self.cells[lattice.index(point)].on_loop
    }

    /// Fix the loop's root at `point`, a cell known to be on the loop.
    ///
    /// This only breaks the loop's rotational symmetry to shrink the search; it does not change which loops are solutions.
    /// Only the first pin takes effect; returns whether this call placed it.
    pub fn pin_root(&mut self, lattice: &Lattice, point: Point, solver: &mut SatSolver) -> bool {
        if self.pinned.is_some() {
            return false;
        }

        solver.require(self.cells[lattice.index(point)].root);
        self.pinned = Some(point);
        true
    }

    /// Loop order per cell in scan order under `model`; [`None`] off the loop.
    pub fn orders(&self, model: &Model) -> Vec<Option<usize>> {
        self.cells.iter()
            .map(|cell| usize::try_from(model.int(&cell.order)).ok())
            .collect_vec()
    }
}
