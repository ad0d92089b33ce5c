use itertools::Itertools;
use tracing::{debug, trace};
use varisat::Lit;

use crate::grid::SymbolGrid;
use crate::lattice::Lattice;
use crate::location::Point;
use crate::shape::Direction;
use crate::solver::{IntVar, Model, SatSolver, Term};
use crate::symbol::SymbolId;

/// Where a cell's region tree continues.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Parent {
    /// The cell is its region's root.
    Root,
    /// The parent is the neighbor in this direction.
    Toward(Direction),
}

/// Per-cell region bookkeeping, indexed by scan order.
struct RegionCell {
    parents: Vec<(Parent, Lit)>,
    id: IntVar,
    size: IntVar,
    // strictly greater than the parent's, so parent links never cycle
    depth: IntVar,
}

/// Solved region data for one cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegionRecord {
    pub parent: Parent,
    pub id: usize,
    pub size: usize,
}

/// Partitions a lattice into connected regions, each a tree of parent links rooted at one cell.
///
/// # Logical setup
/// Every cell has exactly one parent: the root marker, or an edge-sharing neighbor. A non-root cell shares its parent's
/// region id and region size and has a strictly greater depth, so following parents always reaches a root. A root's region
/// id is its own scan index, making ids unique per region. Sizes are only tied to cell counts where
/// [`Self::require_region_size`] declares them.
pub struct RegionConstrainer {
    cells: Vec<RegionCell>,
    declared: Vec<(Point, usize)>,
}

impl RegionConstrainer {
    /// Add region tree constraints over `lattice`, with every region size in `min_size..=max_size` when given.
    pub fn new(lattice: &Lattice, solver: &mut SatSolver, min_size: Option<usize>, max_size: Option<usize>) -> Self {
        let last = lattice.len() as i64 - 1;
        let min_size = min_size.unwrap_or(1).max(1) as i64;
        let max_size = max_size.unwrap_or(lattice.len()) as i64;

        let mut cells = Vec::with_capacity(lattice.len());
        for point in lattice.points() {
            let tag = format!("{},{}", point.row(), point.col());
            let parents = [Parent::Root].into_iter()
                .chain(lattice.neighbors(point).into_iter().map(|(direction, _)| Parent::Toward(direction)))
                .map(|parent| (parent, solver.alloc_aux().positive()))
                .collect_vec();
            solver.require_exactly_one(parents.iter().map(|(_, lit)| *lit).collect_vec());

            let id = solver.alloc_int(&format!("region-id@{}", tag), 0, last);
            let size = solver.alloc_int(&format!("region-size@{}", tag), min_size, max_size);
            let depth = solver.alloc_int(&format!("region-depth@{}", tag), 0, last);

            // a root names its region after itself
            let index = lattice.index(point) as i64;
            solver.require_int_constant(&[Term::Lit(parents[0].1)], &id, index);

            cells.push(RegionCell { parents, id, size, depth });
        }

        for point in lattice.points() {
            let cell = &cells[lattice.index(point)];
            for (parent, lit) in cell.parents.iter().skip(1) {
                let Parent::Toward(direction) = parent else { continue };
                let Some(neighbor) = lattice.neighbor(point, *direction) else { continue };
                let other = &cells[lattice.index(neighbor)];
                let guard = [Term::Lit(*lit)];
                solver.require_int_equal(&guard, &cell.id, &other.id);
                solver.require_int_equal(&guard, &cell.size, &other.size);
                solver.require_int_greater(&guard, &cell.depth, &other.depth);
            }
        }

        debug!(cells = cells.len(), vars = solver.var_count(), clauses = solver.clause_count(), "added region tree constraints");

        Self { cells, declared: Vec::new() }
    }

    fn cell(&self, lattice: &Lattice, point: Point) -> &RegionCell {
        &self.cells[lattice.index(point)]
    }

    /// The term stating `point` is its region's root.
    pub fn is_root(&self, lattice: &Lattice, point: Point) -> Term {
        Term::Lit(self.cell(lattice, point).parents[0].1)
    }

    /// The term stating `point` belongs to the region rooted at `root`.
    pub fn in_region_of(&self, lattice: &Lattice, point: Point, root: Point, solver: &mut SatSolver) -> Term {
        solver.int_equals(&self.cell(lattice, point).id, lattice.index(root) as i64)
    }

    /// Make `root` a region root whose region holds exactly `size` cells.
    ///
    /// Only cells within `size - 1` steps of `root` can belong to such a region; the rest are excluded outright and only
    /// the near ones are counted.
    pub fn require_region_size(&mut self, lattice: &Lattice, root: Point, size: usize, solver: &mut SatSolver) {
        solver.require(self.is_root(lattice, root));
        solver.require_int_constant(&[], &self.cell(lattice, root).size, size as i64);

        let index = lattice.index(root) as i64;
        let reach = size.saturating_sub(1);
        let mut members = Vec::new();
        for point in lattice.points() {
            let distance = point.row().abs_diff(root.row()) + point.col().abs_diff(root.col());
            if distance > reach {
                solver.forbid_int_constant(&[], &self.cell(lattice, point).id, index);
            } else {
                members.push(solver.int_equals(&self.cell(lattice, point).id, index));
            }
        }
        solver.require_count(&members, size);

        trace!(?root, size, candidates = members.len(), "declared region size");
        self.declared.push((root, size));
    }

    /// Tie regions to symbol classes: edge-sharing cells that both hold the same symbol of `classes` share a region, and
    /// parent links never join cells of different symbols.
    ///
    /// Since ids are unique per tree, cells of different classes then always carry different region ids, so two neighbors
    /// share a class exactly when they share a region.
    pub fn couple_classes(&self, grid: &SymbolGrid, classes: &[SymbolId], solver: &mut SatSolver) {
        let lattice = grid.lattice();
        for (pair, _) in lattice.edges() {
            let (a, b) = (pair.0, pair.1);
            for class in classes {
                let guards = [Term::Lit(grid.cell_is(a, *class)), Term::Lit(grid.cell_is(b, *class))];
                solver.require_int_equal(&guards, &self.cell(lattice, a).id, &self.cell(lattice, b).id);
            }
        }

        for point in lattice.points() {
            for (parent, lit) in self.cell(lattice, point).parents.iter().skip(1) {
                let Parent::Toward(direction) = parent else { continue };
                let Some(neighbor) = lattice.neighbor(point, *direction) else { continue };
                for class in classes {
                    solver.implies(
                        &[Term::Lit(*lit), Term::Lit(grid.cell_is(point, *class))],
                        Term::Lit(grid.cell_is(neighbor, *class)),
                    );
                }
            }
        }
    }

    /// Region sizes declared through [`Self::require_region_size`], by root.
    pub fn declared_sizes(&self) -> &[(Point, usize)] {
        &self.declared
    }

    /// Region data per cell in scan order under `model`.
    pub fn records(&self, model: &Model) -> Vec<RegionRecord> {
        self.cells.iter()
            .map(|cell| RegionRecord {
                parent: cell.parents.iter()
                    .find(|(_, lit)| model.lit(*lit))
                    .map(|(parent, _)| *parent)
                    .unwrap_or(Parent::Root),
                id: model.int(&cell.id) as usize,
                size: model.int(&cell.size) as usize,
            })
            .collect_vec()
    }
}
